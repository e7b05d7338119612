/// `Indenter` - Context-stack indentation state machine
///
/// Folds classified lines left to right over an explicit [`ContextStack`].
/// The expected indent of a line depends only on the stack before the line
/// and on the line's own leading token; the rest of the line then updates
/// the stack for the lines that follow.
use log::trace;

use crate::error::StructuralMismatch;
use crate::format::aligner::Aligner;
use crate::parser::{
    BracketKind, ClassifiedLine, ClassifiedToken, SourceLine, Token, TokenKind, TokenRole,
};
use crate::rules::RuleTable;
use crate::scope::{CloseOutcome, ContextKind, ContextStack, NestingContext};

/// Indentation decided for one physical line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineIndent {
    /// Canonical indent; `None` for lines exempt from checking
    pub expected: Option<usize>,
    /// Line continues the previous statement or is a list item
    pub is_continuation: bool,
}

/// A structural problem and where it was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuralIssue {
    /// 1-based line
    pub line: usize,
    /// 0-based character column
    pub column: usize,
    pub mismatch: StructuralMismatch,
}

/// `Indenter` tracks nesting and computes the indent of each line
pub struct Indenter<'r> {
    rules: &'r RuleTable,
    aligner: Aligner<'r>,
    stack: ContextStack,
    /// Canonical column of the block comment opener while a comment is open
    comment_anchor: Option<usize>,
    issues: Vec<StructuralIssue>,
}

impl<'r> Indenter<'r> {
    #[must_use]
    pub fn new(rules: &'r RuleTable) -> Self {
        Self {
            rules,
            aligner: Aligner::new(rules),
            stack: ContextStack::new(rules.indent_width),
            comment_anchor: None,
            issues: Vec::new(),
        }
    }

    /// Number of open contexts
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.depth()
    }

    /// Compute the indent of `line` and consume its tokens
    pub fn process_line(&mut self, line: &ClassifiedLine<'_>, source: &SourceLine<'_>) -> LineIndent {
        let lead_chars = source.lead_chars();

        if line.starts_in_comment {
            let expected = self.comment_body_indent(source);
            // Code after the comment closes still needs an anchor column
            let anchor = expected.unwrap_or_else(|| self.natural_indent().0);
            self.consume(line, anchor, lead_chars);
            return LineIndent {
                expected,
                is_continuation: false,
            };
        }

        if line.starts_in_text_block {
            // Text block content is literal; the rest of the line still counts
            let anchor = self.natural_indent().0;
            self.consume(line, anchor, lead_chars);
            return LineIndent {
                expected: None,
                is_continuation: false,
            };
        }

        let leading = line.leading();
        self.adjust_for_leading(leading);
        let (expected, is_continuation) = self.expected_indent(leading);
        trace!(
            "line {}: expected {expected}, continuation {is_continuation}, depth {}",
            line.line,
            self.stack.depth()
        );
        self.consume(line, expected, lead_chars);

        LineIndent {
            expected: Some(expected),
            is_continuation,
        }
    }

    /// Report every context still open at end of input
    #[must_use]
    pub fn finish(mut self) -> Vec<StructuralIssue> {
        let mut open = self.stack.drain_open();
        open.reverse();
        for context in open {
            self.issues.push(StructuralIssue {
                line: context.opener_line.unwrap_or_default(),
                column: context.opener_column,
                mismatch: StructuralMismatch::Unterminated {
                    open: context.opener_text,
                },
            });
        }
        self.issues
    }

    /// Comment body lines starting with `*` sit one column right of the opener
    fn comment_body_indent(&self, source: &SourceLine<'_>) -> Option<usize> {
        if source.content.starts_with('*') {
            self.comment_anchor.map(|anchor| anchor + 1)
        } else {
            None
        }
    }

    /// Indent of a line with no special leading token
    fn natural_indent(&self) -> (usize, bool) {
        let top = self.stack.top();
        if top.kind.is_list() || top.statement_in_progress() {
            (top.continuation_indent, true)
        } else {
            (top.base_indent, false)
        }
    }

    /// Stack changes implied by the leading token before the line is placed
    fn adjust_for_leading(&mut self, leading: Option<&ClassifiedToken<'_>>) {
        let Some(leading) = leading else {
            return;
        };
        match leading.token.kind {
            // `extends` after `implements`: the sibling clause ends
            TokenKind::Keyword
                if leading.role == TokenRole::Code
                    && self.stack.top().kind == ContextKind::ClauseList =>
            {
                self.stack.pop_clauses();
            }
            TokenKind::OpenBracket(BracketKind::Curly) => self.stack.pop_clauses(),
            _ => {}
        }
    }

    fn expected_indent(&self, leading: Option<&ClassifiedToken<'_>>) -> (usize, bool) {
        if let Some(leading) = leading {
            match leading.token.kind {
                TokenKind::CloseBracket(kind) => {
                    let kind = ContextKind::from_bracket(kind);
                    let top = self.stack.top_ignoring_clauses();
                    if top.kind == kind && !top.is_sentinel() {
                        return (top.opener_indent, false);
                    }
                    if let Some(context) = self.stack.find(kind) {
                        return (context.opener_indent, false);
                    }
                }
                TokenKind::OpenBracket(BracketKind::Curly) => {
                    let top = self.stack.top();
                    if top.kind == ContextKind::BraceBlock {
                        return (top.statement_start.unwrap_or(top.base_indent), false);
                    }
                }
                _ => {}
            }
        }
        self.natural_indent()
    }

    /// Apply every token of the line to the stack
    fn consume(&mut self, line: &ClassifiedLine<'_>, line_indent: usize, lead_chars: usize) {
        let tokens = &line.tokens;
        for (index, classified) in tokens.iter().enumerate() {
            let token = &classified.token;

            if classified.role == TokenRole::Comment {
                if token.kind == TokenKind::BlockCommentOpen {
                    self.comment_anchor = Some(Aligner::column_of(line_indent, lead_chars, token));
                }
                continue;
            }

            let next = tokens[index + 1..]
                .iter()
                .find(|t| t.role != TokenRole::Comment);

            match token.kind {
                TokenKind::OpenBracket(BracketKind::Curly) => self.open_block(token, line_indent),
                TokenKind::OpenBracket(kind) => {
                    if classified.role == TokenRole::Code {
                        self.start_statement(line_indent);
                    }
                    let items = self.aligner.bracket_items(line_indent, lead_chars, next);
                    self.stack.push(NestingContext::list(
                        ContextKind::from_bracket(kind),
                        line_indent,
                        items,
                        token,
                    ));
                }
                TokenKind::CloseBracket(kind) => self.close(kind, token),
                TokenKind::Keyword
                    if classified.role == TokenRole::Code
                        && !self.stack.top().kind.is_bracket_list() =>
                {
                    self.open_clause(token, line_indent, lead_chars, next);
                }
                TokenKind::Semicolon => self.end_statement(),
                // Enum constants and initializer items are separate statements
                TokenKind::Comma
                    if classified.role == TokenRole::Code
                        && self.stack.top().kind == ContextKind::BraceBlock =>
                {
                    self.end_statement();
                }
                _ if classified.role == TokenRole::Code => self.start_statement(line_indent),
                _ => {}
            }
        }
    }

    fn end_statement(&mut self) {
        self.stack.pop_clauses();
        let top = self.stack.top_mut();
        if top.kind == ContextKind::BraceBlock {
            top.statement_start = None;
        }
    }

    /// Any code token begins a statement when none is in progress
    fn start_statement(&mut self, line_indent: usize) {
        let top = self.stack.top_mut();
        if top.kind == ContextKind::BraceBlock && top.statement_start.is_none() {
            top.statement_start = Some(line_indent);
        }
    }

    /// `{` closes pending clauses and opens a body at the declaration's level
    fn open_block(&mut self, token: &Token<'_>, line_indent: usize) {
        self.stack.pop_clauses();
        let top = self.stack.top_mut();
        let opener_indent = if top.kind == ContextKind::BraceBlock {
            top.statement_start.take().unwrap_or(line_indent)
        } else {
            line_indent
        };
        self.stack.push(NestingContext::brace_block(
            opener_indent,
            self.rules.indent_width,
            token,
        ));
    }

    fn open_clause(
        &mut self,
        token: &Token<'_>,
        line_indent: usize,
        lead_chars: usize,
        next: Option<&ClassifiedToken<'_>>,
    ) {
        self.stack.pop_clauses();
        let top = self.stack.top_mut();
        let statement_start = if top.kind == ContextKind::BraceBlock {
            *top.statement_start.get_or_insert(line_indent)
        } else {
            line_indent
        };
        let items = self
            .aligner
            .clause_items(line_indent, lead_chars, next, statement_start);
        self.stack.push(NestingContext::list(
            ContextKind::ClauseList,
            line_indent,
            items,
            token,
        ));
    }

    fn close(&mut self, kind: BracketKind, token: &Token<'_>) {
        let mismatch = match self.stack.close(ContextKind::from_bracket(kind)) {
            CloseOutcome::Matched(_) => return,
            CloseOutcome::Permissive(popped) => {
                let innermost = &popped[0];
                StructuralMismatch::WrongKind {
                    found: token.text.to_string(),
                    expected_open: innermost.opener_text.clone(),
                    opener_line: innermost.opener_line.unwrap_or_default(),
                }
            }
            CloseOutcome::Unmatched => StructuralMismatch::Unmatched {
                found: token.text.to_string(),
            },
        };
        trace!("line {}: {mismatch}", token.line);
        self.issues.push(StructuralIssue {
            line: token.line,
            column: token.column,
            mismatch,
        });
    }
}
