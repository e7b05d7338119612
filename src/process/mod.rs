//! Check and fix processing.
//!
//! This module drives one analysis pass per text:
//!
//! - Split the input into physical lines and classify their tokens
//! - Fold the lines through the indenter to get each line's canonical indent
//! - Compare against the leading whitespace found in the input
//!
//! [`check`] turns the comparison into [`Diagnostic`]s, [`fix`] rewrites the
//! flagged lines, and [`format_file`] does the latter for any reader/writer
//! pair.

pub mod diagnostic;
pub mod pipeline;

pub use diagnostic::{CheckReport, Diagnostic, DiagnosticKind, Severity};
pub use pipeline::{
    analyze, check, check_with_rules, fix, fix_with_rules, format_file, Analysis, LogicalLine,
};
