//! # INI Section Parser
//!
//! A parser for line-oriented, section-based configuration files in the
//! style of classic INI files, with value accumulation and nested file
//! inclusion.
//!
//! ## Overview
//!
//! Parsed values land in a [`ConfigStore`], a thread-safe table of
//! section -> label -> value. Values are opaque text: nothing is coerced or
//! validated.
//!
//! ## Syntax
//!
//! ```ini
//! # Comments start with '#' or ';' and run to end of line
//! [Server]
//! Name = main            ; plain assignment
//! Flags = -v
//! Flags += --color       ; append, joined with a single space
//!          --no-pager    ; continuation, appended to the last label
//!
//! [Include local.ini]    ; parsed if present, skipped otherwise
//! [Require base.ini]     ; must exist
//! ```
//!
//! Inclusion targets are resolved relative to the directory of the file that
//! contains the directive. Entering a file twice during one parse, directly
//! or through any chain of directives, fails with [`IniError::IncludeLoop`].
//!
//! ## Basic Usage
//!
//! ```rust
//! use ini_parser::Parser;
//!
//! let parser = Parser::new();
//! parser.parse_str("[Section A]\nLabel A = Value A\n\n[Section A]\nLabel A += B C D")?;
//!
//! assert_eq!(parser.store().get("Section A", "Label A"), "Value A B C D");
//! # Ok::<(), ini_parser::IniError>(())
//! ```
//!
//! ## Sharing a Store
//!
//! ```rust
//! use ini_parser::{ConfigStore, Parser};
//!
//! let store = ConfigStore::new();
//! Parser::with_store(store.clone()).parse_str("[a]\nx = 1")?;
//! Parser::with_store(store.clone()).parse_str("[b]\ny = 2")?;
//!
//! assert_eq!(store.sections().len(), 2);
//! # Ok::<(), ini_parser::IniError>(())
//! ```
//!
//! ## Error Handling
//!
//! Errors are stamped with the file and line where they happened:
//!
//! ```rust
//! use ini_parser::{IniError, Parser};
//!
//! let error = Parser::new().parse_str("[Main]\n= value").unwrap_err();
//! assert!(matches!(error, IniError::EmptyLabel { .. }));
//! assert_eq!(error.to_string(), "2: empty label");
//! ```

pub mod classifier;
pub mod error;
pub mod parser;
pub mod store;
pub mod tracker;


// Re-export main types and functions
pub use classifier::{Directive, LineKind, classify};
pub use error::{IniError, Location, Result};
pub use parser::{Parser, ParserConfig};
pub use store::{ConfigStore, Section, Table};
pub use tracker::InclusionTracker;
