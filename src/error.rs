//! Error types and result aliases for sindent.
//!
//! This module defines the error handling infrastructure:
//! - [`Result<T>`]: Type alias for `anyhow::Result<T>` used by the driver and I/O helpers
//! - [`ConfigError`]: Invalid rule configuration, rejected before analysis starts
//! - [`LexError`]: Unterminated string or block comment (recoverable)
//! - [`StructuralMismatch`]: Closer without a matching opener (recoverable)

use anyhow::Result as AnyhowResult;
use thiserror::Error;

pub type Result<T> = AnyhowResult<T>;

/// Rule configuration problems. These are the only fatal errors of the engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("indent_width must be between 1 and {max}, got {value}")]
    IndentWidth { value: usize, max: usize },
    #[error("tab_width must be between 1 and {max}, got {value}")]
    TabWidth { value: usize, max: usize },
    #[error("{name} must be at most {max}, got {value}")]
    Increment {
        name: &'static str,
        value: usize,
        max: usize,
    },
    #[error("unknown bracket pair ({open:?}, {close:?})")]
    UnknownBracketPair { open: String, close: String },
    #[error("bracket pair ({open:?}, {close:?}) is listed twice")]
    DuplicateBracketPair { open: String, close: String },
    #[error("comment marker `{0}` must not be empty")]
    EmptyCommentMarker(&'static str),
    #[error("comment marker `{name}` must not contain whitespace, got {value:?}")]
    WhitespaceInCommentMarker { name: &'static str, value: String },
    #[error("comment markers `{0}` and `{1}` must differ")]
    CommentMarkerClash(String, String),
    #[error("clause keyword {0:?} is not an identifier")]
    InvalidKeyword(String),
    #[error("annotation marker must be a single punctuation character, got {0:?}")]
    InvalidAnnotationMarker(String),
}

/// Tokenizer failures. The tokenizer never stops on them; they become warnings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("unterminated string literal")]
    UnterminatedString { line: usize, column: usize },
    #[error("unterminated block comment opened at line {line}")]
    UnterminatedBlockComment { line: usize, column: usize },
    #[error("unterminated text block opened at line {line}")]
    UnterminatedTextBlock { line: usize, column: usize },
}

impl LexError {
    /// 1-based line and 0-based column of the offending token
    #[must_use]
    pub fn position(&self) -> (usize, usize) {
        match *self {
            LexError::UnterminatedString { line, column }
            | LexError::UnterminatedBlockComment { line, column }
            | LexError::UnterminatedTextBlock { line, column } => (line, column),
        }
    }
}

/// Bracket structure problems found by the indenter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructuralMismatch {
    #[error("`{found}` has no matching opener")]
    Unmatched { found: String },
    #[error("`{found}` closes `{expected_open}` opened at line {opener_line}")]
    WrongKind {
        found: String,
        expected_open: String,
        opener_line: usize,
    },
    #[error("`{open}` opened here is never closed")]
    Unterminated { open: String },
}
