/// `ContextStack` - Explicit stack of open nesting contexts
///
/// The bottom entry is a sentinel brace block at column 0. It can not be
/// popped, so `top()` always has a context to answer with.
use log::trace;

use super::types::{ContextKind, NestingContext};

/// What happened when a closer was applied to the stack
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseOutcome {
    /// The top context matched and was popped
    Matched(NestingContext),
    /// A context of the right kind was found deeper down; it and everything
    /// above it were popped. Holds the popped contexts, innermost first.
    Permissive(Vec<NestingContext>),
    /// No open context of that kind; nothing was popped
    Unmatched,
}

#[derive(Debug, Clone)]
pub struct ContextStack {
    contexts: Vec<NestingContext>,
}

impl ContextStack {
    #[must_use]
    pub fn new(indent_width: usize) -> Self {
        Self {
            contexts: vec![NestingContext::sentinel(indent_width)],
        }
    }

    /// Innermost open context (the sentinel when nothing is open)
    #[must_use]
    pub fn top(&self) -> &NestingContext {
        // The sentinel is never popped
        &self.contexts[self.contexts.len() - 1]
    }

    pub fn top_mut(&mut self) -> &mut NestingContext {
        let last = self.contexts.len() - 1;
        &mut self.contexts[last]
    }

    /// Innermost context that is not a clause list
    #[must_use]
    pub fn top_ignoring_clauses(&self) -> &NestingContext {
        self.contexts
            .iter()
            .rev()
            .find(|ctx| ctx.kind != ContextKind::ClauseList)
            .unwrap_or(&self.contexts[0])
    }

    /// Number of open contexts, sentinel excluded
    #[must_use]
    pub fn depth(&self) -> usize {
        self.contexts.len() - 1
    }

    pub fn push(&mut self, context: NestingContext) {
        trace!(
            "push {} at line {:?}: opener {}, base {}, continuation {}",
            context.kind,
            context.opener_line,
            context.opener_indent,
            context.base_indent,
            context.continuation_indent
        );
        self.contexts.push(context);
    }

    /// Close every clause list sitting on top of the stack
    pub fn pop_clauses(&mut self) {
        while self.contexts.len() > 1 && self.top().kind == ContextKind::ClauseList {
            if let Some(clause) = self.contexts.pop() {
                trace!("pop clause list `{}`", clause.opener_text);
            }
        }
    }

    /// Nearest open context of `kind`, searching from the top; never the sentinel
    #[must_use]
    pub fn find(&self, kind: ContextKind) -> Option<&NestingContext> {
        self.contexts[1..].iter().rev().find(|ctx| ctx.kind == kind)
    }

    /// Apply a closer of `kind`
    ///
    /// Pending clause lists are closed first. Popping a brace block ends the
    /// statement that was in progress in the enclosing block.
    pub fn close(&mut self, kind: ContextKind) -> CloseOutcome {
        self.pop_clauses();

        let Some(index) = self.contexts[1..]
            .iter()
            .rposition(|ctx| ctx.kind == kind)
            .map(|i| i + 1)
        else {
            trace!("closer of {kind} has no opener");
            return CloseOutcome::Unmatched;
        };

        let mut popped = self.contexts.split_off(index);
        popped.reverse();
        if popped.iter().any(|ctx| ctx.kind == ContextKind::BraceBlock) {
            self.top_mut().statement_start = None;
        }
        trace!("close {kind}, {} context(s) popped", popped.len());

        if popped.len() == 1 {
            CloseOutcome::Matched(popped.remove(0))
        } else {
            CloseOutcome::Permissive(popped)
        }
    }

    /// Remove and return every open context, innermost first
    pub fn drain_open(&mut self) -> Vec<NestingContext> {
        let mut open = self.contexts.split_off(1);
        open.reverse();
        open
    }
}
