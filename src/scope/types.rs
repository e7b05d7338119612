/// Nesting context types for the indent state machine
use std::fmt;

use crate::parser::{BracketKind, Token};

/// Kind of an open nesting context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextKind {
    /// `{ ... }` body, also used for the top-level sentinel
    BraceBlock,
    /// Wrapped `( ... )` list
    ParenList,
    /// Wrapped `[ ... ]` list
    BracketList,
    /// Comma-separated list introduced by a clause keyword
    ClauseList,
}

impl ContextKind {
    /// Context kind opened by a bracket
    #[must_use]
    pub fn from_bracket(kind: BracketKind) -> Self {
        match kind {
            BracketKind::Paren => ContextKind::ParenList,
            BracketKind::Square => ContextKind::BracketList,
            BracketKind::Curly => ContextKind::BraceBlock,
        }
    }

    /// Bracket that closes this context (clause lists have none)
    #[must_use]
    pub fn bracket(self) -> Option<BracketKind> {
        match self {
            ContextKind::BraceBlock => Some(BracketKind::Curly),
            ContextKind::ParenList => Some(BracketKind::Paren),
            ContextKind::BracketList => Some(BracketKind::Square),
            ContextKind::ClauseList => None,
        }
    }

    /// Lines inside a list context are items of that list
    #[must_use]
    pub fn is_list(self) -> bool {
        !matches!(self, ContextKind::BraceBlock)
    }

    /// Paren and bracket lists
    #[must_use]
    pub fn is_bracket_list(self) -> bool {
        matches!(self, ContextKind::ParenList | ContextKind::BracketList)
    }
}

impl fmt::Display for ContextKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ContextKind::BraceBlock => "brace block",
            ContextKind::ParenList => "paren list",
            ContextKind::BracketList => "bracket list",
            ContextKind::ClauseList => "clause list",
        };
        f.write_str(name)
    }
}

/// One open context on the indentation stack
///
/// All indents are canonical columns (what the engine computes), never the
/// whitespace found in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NestingContext {
    pub kind: ContextKind,
    /// Indent of the line (or declaration) that opened the context; closing lines go here
    pub opener_indent: usize,
    /// Indent of non-continuation lines inside the context
    pub base_indent: usize,
    /// Indent of continuation lines (list items, wrapped statements)
    pub continuation_indent: usize,
    /// Line of the opening token; `None` for the top-level sentinel
    pub opener_line: Option<usize>,
    /// Column of the opening token (0-based)
    pub opener_column: usize,
    /// Opening token text, for diagnostics
    pub opener_text: String,
    /// Brace blocks only: indent of the line that began the statement in progress
    pub statement_start: Option<usize>,
}

impl NestingContext {
    /// Top-level sentinel: a brace block at column 0 that is never popped
    #[must_use]
    pub fn sentinel(indent_width: usize) -> Self {
        Self {
            kind: ContextKind::BraceBlock,
            opener_indent: 0,
            base_indent: 0,
            continuation_indent: indent_width,
            opener_line: None,
            opener_column: 0,
            opener_text: String::new(),
            statement_start: None,
        }
    }

    /// `{ ... }` body whose declaration starts at `opener_indent`
    #[must_use]
    pub fn brace_block(opener_indent: usize, indent_width: usize, opener: &Token<'_>) -> Self {
        let base_indent = opener_indent + indent_width;
        Self {
            kind: ContextKind::BraceBlock,
            opener_indent,
            base_indent,
            continuation_indent: base_indent + indent_width,
            opener_line: Some(opener.line),
            opener_column: opener.column,
            opener_text: opener.text.to_string(),
            statement_start: None,
        }
    }

    /// Paren, bracket or clause list whose items sit at `item_indent`
    #[must_use]
    pub fn list(
        kind: ContextKind,
        opener_indent: usize,
        item_indent: usize,
        opener: &Token<'_>,
    ) -> Self {
        Self {
            kind,
            opener_indent,
            base_indent: opener_indent,
            continuation_indent: item_indent,
            opener_line: Some(opener.line),
            opener_column: opener.column,
            opener_text: opener.text.to_string(),
            statement_start: None,
        }
    }

    #[must_use]
    pub fn is_sentinel(&self) -> bool {
        self.opener_line.is_none()
    }

    /// Brace block (or sentinel) with a statement begun on an earlier token
    #[must_use]
    pub fn statement_in_progress(&self) -> bool {
        self.kind == ContextKind::BraceBlock && self.statement_start.is_some()
    }
}
