//! Error types and location tracking for INI parsing
//!
//! Every error raised while parsing is stamped with the file and line of the
//! frame that was being read when it happened. Errors raised inside an
//! included file keep the inner file's stamp as they travel outward.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, IniError>;

/// Represents a line inside a named file or an unnamed stream
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Location {
    /// File being parsed, `None` for a stream without a path
    pub file: Option<PathBuf>,
    /// Line number (1-based, 0 before the first line is read)
    pub line: usize,
}

impl Location {
    /// Creates a location inside a named file
    pub fn new(file: impl Into<PathBuf>, line: usize) -> Self {
        Self {
            file: Some(file.into()),
            line,
        }
    }

    /// Creates a location inside an unnamed stream
    pub fn unnamed(line: usize) -> Self {
        Self { file: None, line }
    }

    /// Returns the file path, if any
    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.file {
            Some(file) => write!(f, "{}:{}", file.display(), self.line),
            None => write!(f, "{}", self.line),
        }
    }
}

/// Main error type for INI parsing operations
#[derive(Debug, Error)]
pub enum IniError {
    /// Section header with a blank name, or a label written before any section
    #[error("{location}: empty section name")]
    EmptySectionName { location: Location },

    /// Assignment, append or continuation without a label
    #[error("{location}: empty label")]
    EmptyLabel { location: Location },

    /// Include or Require of a file already entered in this parse
    #[error("{location}: include loop")]
    IncludeLoop { location: Location, path: PathBuf },

    /// Include chain nested deeper than the configured limit
    #[error("{location}: maximum include depth of {max_depth} exceeded")]
    IncludeDepthExceeded {
        location: Location,
        max_depth: usize,
    },

    /// Top-level file could not be opened
    #[error("{}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Required file could not be opened
    #[error("{location}: cannot open required file {}: {source}", .path.display())]
    Require {
        location: Location,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// I/O or encoding failure while reading lines
    #[error("{location}: {source}")]
    Read {
        location: Location,
        #[source]
        source: io::Error,
    },
}

impl IniError {
    /// Returns the file/line stamp of the error, if it has one
    pub fn location(&self) -> Option<&Location> {
        match self {
            IniError::EmptySectionName { location }
            | IniError::EmptyLabel { location }
            | IniError::IncludeLoop { location, .. }
            | IniError::IncludeDepthExceeded { location, .. }
            | IniError::Require { location, .. }
            | IniError::Read { location, .. } => Some(location),
            IniError::Open { .. } => None,
        }
    }

    /// Returns the line number of the error, 0 when it has no stamp
    pub fn line(&self) -> usize {
        self.location().map_or(0, |location| location.line)
    }

    /// Returns true for failures of the underlying byte source
    pub fn is_io(&self) -> bool {
        matches!(
            self,
            IniError::Open { .. } | IniError::Require { .. } | IniError::Read { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_display_named() {
        let location = Location::new("conf/main.ini", 12);
        assert_eq!(format!("{}", location), "conf/main.ini:12");
    }

    #[test]
    fn test_location_display_unnamed() {
        let location = Location::unnamed(3);
        assert_eq!(format!("{}", location), "3");
        assert!(location.file().is_none());
    }

    #[test]
    fn test_error_location_accessor() {
        let error = IniError::EmptyLabel {
            location: Location::new("a.ini", 2),
        };
        assert_eq!(error.line(), 2);
        assert_eq!(
            error.location().and_then(Location::file),
            Some(Path::new("a.ini"))
        );
        assert!(!error.is_io());

        let error = IniError::Open {
            path: PathBuf::from("missing.ini"),
            source: io::Error::new(io::ErrorKind::NotFound, "not found"),
        };
        assert!(error.location().is_none());
        assert_eq!(error.line(), 0);
        assert!(error.is_io());
    }
}
