//! Indentation computation.
//!
//! This module contains the core indentation logic organized into submodules:
//! - [`indenter`]: Context-stack state machine that computes each line's canonical indent
//! - [`aligner`]: Item columns for wrapped paren, bracket and clause lists
//! - [`whitespace`]: Measures leading whitespace and renders canonical indentation

pub mod aligner;
pub mod indenter;
pub mod whitespace;

pub use aligner::Aligner;
pub use indenter::{Indenter, LineIndent, StructuralIssue};
pub use whitespace::{indent_parts, is_canonical, measure_indent, render_indent, write_indent};
