//! Source text reading and tokenizing.
//!
//! This module turns raw text into the structures the indenter consumes:
//! - [`SourceLines`]: Physical lines split into indent, content and line ending
//! - [`Tokenizer`]: Lazy token stream that keeps strings and comments opaque
//! - [`Classifier`]: Groups tokens per line and tags annotation and comment roles
//!
//! Brackets, keywords and commas inside string literals or comments are never
//! reported as structural tokens.

pub mod classifier;
pub mod lexer;
pub mod stream;
pub mod token;

pub use classifier::{
    classify, comment_spans, ClassifiedLine, ClassifiedSource, ClassifiedToken, Classifier,
    CommentKind, CommentSpan, LineRole, TokenRole,
};
pub use lexer::Tokenizer;
pub use stream::{split_lines, SourceLine, SourceLines};
pub use token::{BracketKind, Token, TokenKind};
