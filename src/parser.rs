//! INI parser that drives the line state machine
//!
//! This module reads input line by line, classifies each line and writes the
//! results into a [`ConfigStore`]. `Include` and `Require` directives recurse
//! into other files within the same parse session.

use crate::classifier::{self, Directive, LineKind};
use crate::error::{IniError, Result};
use crate::store::ConfigStore;
use crate::tracker::InclusionTracker;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

/// Separator used when a value is appended to an existing one
pub const APPEND_SEPARATOR: &str = " ";

/// Byte order mark some editors write at the start of a file
const BYTE_ORDER_MARK: char = '\u{feff}';

/// Configuration options for the parser
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Maximum number of inclusions nested below the top-level input,
    /// `None` for no limit
    pub max_include_depth: Option<usize>,
}

impl ParserConfig {
    /// Creates a new parser configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Limits how deep inclusions may nest, 0 forbids inclusion entirely
    pub fn with_max_include_depth(mut self, max_include_depth: usize) -> Self {
        self.max_include_depth = Some(max_include_depth);
        self
    }
}

/// State of one top-level parse call
#[derive(Debug)]
struct ParseContext {
    section: String,
    label: String,
    tracker: InclusionTracker,
}

impl ParseContext {
    fn new(config: &ParserConfig) -> Self {
        Self {
            section: String::new(),
            label: String::new(),
            tracker: InclusionTracker::with_max_depth(config.max_include_depth),
        }
    }
}

/// How a missing inclusion target is treated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OpenPolicy {
    /// The file must exist
    Strict,
    /// A file that cannot be opened is skipped
    Lenient,
}

impl From<Directive> for OpenPolicy {
    fn from(directive: Directive) -> Self {
        match directive {
            Directive::Require => OpenPolicy::Strict,
            Directive::Include => OpenPolicy::Lenient,
        }
    }
}

/// INI parser writing into a shared [`ConfigStore`].
///
/// The parser itself holds no per-parse state, so one instance can serve
/// several parse calls, including from several threads at once.
#[derive(Debug, Clone, Default)]
pub struct Parser {
    store: ConfigStore,
    config: ParserConfig,
}

impl Parser {
    /// Creates a parser with a fresh, empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a parser writing into an existing store
    pub fn with_store(store: ConfigStore) -> Self {
        Self {
            store,
            config: ParserConfig::default(),
        }
    }

    /// Sets the parser configuration
    pub fn with_config(mut self, config: ParserConfig) -> Self {
        self.config = config;
        self
    }

    /// Store receiving parsed values
    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    /// Active configuration
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Consumes the parser and returns its store
    pub fn into_store(self) -> ConfigStore {
        self.store
    }

    /// Parses a stream that has no path.
    ///
    /// Errors carry bare line numbers, and inclusion targets are resolved
    /// against the current working directory. Bytes that are not valid
    /// UTF-8 are replaced with U+FFFD rather than rejected.
    pub fn parse<R: Read>(&self, reader: R) -> Result<()> {
        let mut context = ParseContext::new(&self.config);
        context.tracker.enter_unnamed();
        let result = self.parse_frame(BufReader::new(reader), &mut context);
        context.tracker.leave();
        result
    }

    /// Parses in-memory text, see [`Parser::parse`]
    pub fn parse_str(&self, text: &str) -> Result<()> {
        self.parse(text.as_bytes())
    }

    /// Parses a file. Errors read `path:line: message`.
    pub fn parse_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| IniError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let mut context = ParseContext::new(&self.config);
        self.parse_entered(file, path, &mut context)
    }

    /// Runs a frame for an already opened file, popping it on every exit path
    fn parse_entered(&self, file: File, path: &Path, context: &mut ParseContext) -> Result<()> {
        context.tracker.enter(path)?;
        let result = self.parse_frame(BufReader::new(file), context);
        context.tracker.leave();
        result
    }

    fn parse_frame<R: BufRead>(&self, mut reader: R, context: &mut ParseContext) -> Result<()> {
        let mut buffer = Vec::new();
        loop {
            buffer.clear();
            context.tracker.advance_line();
            let read = reader
                .read_until(b'\n', &mut buffer)
                .map_err(|source| IniError::Read {
                    location: context.tracker.location(),
                    source,
                })?;
            if read == 0 {
                return Ok(());
            }

            let decoded = String::from_utf8_lossy(&buffer);
            let mut line: &str = &decoded;
            if context.tracker.current_line() == 1 {
                line = line.strip_prefix(BYTE_ORDER_MARK).unwrap_or(line);
            }
            self.handle_line(line, context)?;
        }
    }

    fn handle_line(&self, line: &str, context: &mut ParseContext) -> Result<()> {
        match classifier::classify(line) {
            LineKind::Comment => Ok(()),
            LineKind::Directive { directive, target } => {
                self.include(target, directive.into(), context)
            }
            LineKind::Section(name) => {
                if name.is_empty() {
                    return Err(IniError::EmptySectionName {
                        location: context.tracker.location(),
                    });
                }
                tracing::trace!("entering section {}", name);
                context.section = name.to_string();
                Ok(())
            }
            LineKind::Append { label, value } => {
                context.label = label.to_string();
                self.insert_value(context, value, true)
            }
            LineKind::Assign { label, value } => {
                context.label = label.to_string();
                self.insert_value(context, value, false)
            }
            LineKind::Continuation(text) => self.insert_value(context, text, true),
        }
    }

    fn insert_value(&self, context: &ParseContext, value: &str, append: bool) -> Result<()> {
        if context.section.is_empty() {
            return Err(IniError::EmptySectionName {
                location: context.tracker.location(),
            });
        }
        if context.label.is_empty() {
            return Err(IniError::EmptyLabel {
                location: context.tracker.location(),
            });
        }

        if append {
            self.store
                .append_value(&context.section, &context.label, value, APPEND_SEPARATOR);
        } else {
            self.store.set(&context.section, &context.label, value);
        }
        Ok(())
    }

    fn include(&self, target: &str, policy: OpenPolicy, context: &mut ParseContext) -> Result<()> {
        let path = resolve_include(&context.tracker, target);
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(error) if policy == OpenPolicy::Lenient => {
                tracing::debug!("skipping include {}: {}", path.display(), error);
                return Ok(());
            }
            Err(source) => {
                return Err(IniError::Require {
                    location: context.tracker.location(),
                    path,
                    source,
                });
            }
        };

        self.parse_entered(file, &path, context)
    }
}

/// Resolves an inclusion target relative to the directory of the current file
fn resolve_include(tracker: &InclusionTracker, target: &str) -> PathBuf {
    tracker.current_dir().join(target)
}
