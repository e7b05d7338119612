//! sindent - structural indentation checker and fixer
//!
//! Computes the canonical leading whitespace of every line of a
//! brace-delimited source text (Java-like by default) from its nesting
//! structure, then either reports the lines that differ or rewrites them.
//!
//! ```
//! use sindent::{check, fix, Config};
//!
//! let config = Config::default();
//! let report = check("class A {\n  int x;\n}\n", &config).unwrap();
//! assert!(!report.conforms);
//! assert_eq!(fix("class A {\n  int x;\n}\n", &config).unwrap(), "class A {\n    int x;\n}\n");
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod directive;
pub mod error;
pub mod format;
pub mod parser;
pub mod process;
pub mod rules;
pub mod scope;

// Re-export commonly used types
pub use cli::{build_cli, parse_args, parse_args_from, CliArgs};
pub use config::{Config, ContinuationMode, IndentUnit};
pub use directive::{find_directive, parse_directive, DirectiveOverrides};
pub use error::{ConfigError, Result};
pub use process::{check, fix, format_file, CheckReport, Diagnostic, DiagnosticKind, Severity};
pub use rules::RuleTable;
