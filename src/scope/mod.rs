//! Nesting context tracking.
//!
//! The indenter keeps an explicit, heap-allocated stack of open contexts:
//! - Brace blocks: `{ ... }` bodies, plus the top-level sentinel
//! - Paren and bracket lists: wrapped `( ... )` / `[ ... ]` item lists
//! - Clause lists: `implements`, `extends`, `throws` and other configured keywords
//!
//! [`ContextStack`] owns the contexts and implements matched and permissive
//! closing, while [`NestingContext`] records the indents a context imposes.

pub mod stack;
pub mod types;

pub use stack::{CloseOutcome, ContextStack};
pub use types::{ContextKind, NestingContext};
