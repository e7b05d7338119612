/// `Aligner` - Item columns for wrapped lists
///
/// Wrapped list items are placed in one of two ways:
/// 1. Align mode: under the first item written on the opener's line
/// 2. Increment mode (or nothing after the opener): a fixed increment from an anchor
///
/// Columns are measured from the opener line's canonical indent, never from
/// the whitespace actually found in the input, so fixing a file does not move
/// its alignment targets.
use crate::config::ContinuationMode;
use crate::parser::{ClassifiedToken, Token};
use crate::rules::RuleTable;

/// Computes list item indents for one rule table
#[derive(Debug, Clone, Copy)]
pub struct Aligner<'r> {
    rules: &'r RuleTable,
}

impl<'r> Aligner<'r> {
    #[must_use]
    pub fn new(rules: &'r RuleTable) -> Self {
        Self { rules }
    }

    /// Canonical column of `token` on a line whose indent is `line_indent`
    ///
    /// `lead_chars` is the number of whitespace characters before the line's
    /// content in the input.
    #[must_use]
    pub fn column_of(line_indent: usize, lead_chars: usize, token: &Token<'_>) -> usize {
        line_indent + token.column.saturating_sub(lead_chars)
    }

    /// Align column of the first item after an opener, if align mode applies
    fn align_column(
        &self,
        line_indent: usize,
        lead_chars: usize,
        next: Option<&ClassifiedToken<'_>>,
    ) -> Option<usize> {
        match (self.rules.continuation_mode, next) {
            (ContinuationMode::Align, Some(item)) => {
                Some(Self::column_of(line_indent, lead_chars, &item.token))
            }
            _ => None,
        }
    }

    /// Item indent of a paren or bracket list opened on a line at `line_indent`
    #[must_use]
    pub fn bracket_items(
        &self,
        line_indent: usize,
        lead_chars: usize,
        next: Option<&ClassifiedToken<'_>>,
    ) -> usize {
        self.align_column(line_indent, lead_chars, next)
            .unwrap_or(line_indent + self.rules.list_increment)
    }

    /// Item indent of a clause list whose statement started at `statement_start`
    #[must_use]
    pub fn clause_items(
        &self,
        line_indent: usize,
        lead_chars: usize,
        next: Option<&ClassifiedToken<'_>>,
        statement_start: usize,
    ) -> usize {
        self.align_column(line_indent, lead_chars, next)
            .unwrap_or(statement_start + self.rules.clause_increment)
    }
}
