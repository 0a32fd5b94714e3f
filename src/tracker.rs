//! Tracking of nested file inclusion
//!
//! The tracker keeps one frame per file currently being read (innermost on
//! top) and the set of every file entered during the current parse. Paths
//! are canonicalised before they are compared, so `a.ini`, `./a.ini` and
//! `sub/../a.ini` are the same node of the inclusion graph.

use crate::error::{IniError, Location, Result};
use indexmap::IndexSet;
use smallvec::SmallVec;
use std::path::{Path, PathBuf};

/// A single file being read
#[derive(Debug, Clone, PartialEq, Eq)]
struct Frame {
    file: Option<PathBuf>,
    line: usize,
}

/// Stack of open frames plus the visited-path set of one parse session
#[derive(Debug, Clone)]
pub struct InclusionTracker {
    frames: SmallVec<[Frame; 8]>,
    visited: IndexSet<PathBuf>,
    max_depth: Option<usize>,
}

impl InclusionTracker {
    /// Creates an empty tracker without a depth limit
    pub fn new() -> Self {
        Self::with_max_depth(None)
    }

    /// Creates an empty tracker with an optional depth limit.
    ///
    /// The limit counts inclusions nested below the top-level frame, so
    /// `Some(0)` accepts a top-level file or stream but no inclusion.
    pub fn with_max_depth(max_depth: Option<usize>) -> Self {
        Self {
            frames: SmallVec::new(),
            visited: IndexSet::new(),
            max_depth,
        }
    }

    /// Pushes a frame for `path`.
    ///
    /// Fails with [`IniError::IncludeLoop`] when the file was already entered
    /// during this session. The error is stamped with the frame that asked
    /// for the inclusion, not with the file being entered.
    pub fn enter(&mut self, path: &Path) -> Result<()> {
        let absolute = absolute_path(path);
        if self.visited.contains(&absolute) {
            return Err(IniError::IncludeLoop {
                location: self.location(),
                path: path.to_path_buf(),
            });
        }
        self.check_depth()?;

        tracing::debug!("parsing {}", path.display());
        self.visited.insert(absolute);
        self.frames.push(Frame {
            file: Some(path.to_path_buf()),
            line: 0,
        });
        Ok(())
    }

    /// Pushes a frame for a stream that has no path
    pub fn enter_unnamed(&mut self) {
        tracing::debug!("parsing unnamed stream");
        self.frames.push(Frame { file: None, line: 0 });
    }

    /// Pops the innermost frame, does nothing when no frame is open
    pub fn leave(&mut self) {
        self.frames.pop();
    }

    fn check_depth(&self) -> Result<()> {
        match self.max_depth {
            Some(max_depth) if self.frames.len() > max_depth => {
                Err(IniError::IncludeDepthExceeded {
                    location: self.location(),
                    max_depth,
                })
            }
            _ => Ok(()),
        }
    }

    /// Counts one more line read in the innermost frame
    pub fn advance_line(&mut self) {
        if let Some(frame) = self.frames.last_mut() {
            frame.line += 1;
        }
    }

    /// File of the innermost frame, `None` for unnamed streams or no frame
    pub fn current_file(&self) -> Option<&Path> {
        self.frames.last().and_then(|frame| frame.file.as_deref())
    }

    /// Line counter of the innermost frame
    pub fn current_line(&self) -> usize {
        self.frames.last().map_or(0, |frame| frame.line)
    }

    /// Location of the innermost frame, used to stamp errors
    pub fn location(&self) -> Location {
        Location {
            file: self.current_file().map(Path::to_path_buf),
            line: self.current_line(),
        }
    }

    /// Directory that relative inclusion targets are resolved against
    pub fn current_dir(&self) -> &Path {
        self.current_file()
            .and_then(Path::parent)
            .unwrap_or_else(|| Path::new(""))
    }

    /// Number of open frames
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Returns true if `path` has been entered during this session
    pub fn is_visited(&self, path: &Path) -> bool {
        self.visited.contains(&absolute_path(path))
    }

    /// Absolute paths entered so far, in the order they were entered
    pub fn visited(&self) -> impl Iterator<Item = &Path> {
        self.visited.iter().map(PathBuf::as_path)
    }
}

impl Default for InclusionTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolves `path` to the form used as the identity of a file.
///
/// Canonicalisation follows symlinks and removes `.`/`..`. A path that
/// cannot be canonicalised is made absolute lexically so that it still
/// compares consistently within a session.
fn absolute_path(path: &Path) -> PathBuf {
    std::fs::canonicalize(path)
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}
