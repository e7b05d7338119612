//! Leading whitespace measurement and rendering
//!
//! Widths are counted in columns: a space is one column, a tab advances to
//! the next multiple of `tab_width`. The canonical rendering of a width is
//! either all spaces, or as many tabs as fit followed by spaces.

use std::io::Write;

use crate::config::IndentUnit;
use crate::rules::RuleTable;

/// Pre-allocated buffer of spaces for indentation.
const SPACES: &[u8; 256] = &[b' '; 256];
/// Pre-allocated buffer of tabs for indentation.
const TABS: &[u8; 64] = &[b'\t'; 64];

/// Column width of a run of spaces and tabs
#[must_use]
pub fn measure_indent(indent: &str, tab_width: usize) -> usize {
    indent.chars().fold(0, |width, c| match c {
        '\t' => (width / tab_width + 1) * tab_width,
        _ => width + 1,
    })
}

/// Number of tabs and spaces that render `width` columns
#[must_use]
pub fn indent_parts(width: usize, unit: IndentUnit, tab_width: usize) -> (usize, usize) {
    match unit {
        IndentUnit::Spaces => (0, width),
        IndentUnit::Tabs => (width / tab_width, width % tab_width),
    }
}

/// Write `count` bytes of a uniform `buffer`, chunk by chunk
fn write_repeated<W: Write>(output: &mut W, buffer: &[u8], count: usize) -> std::io::Result<()> {
    let mut left = count;
    while left > 0 {
        let chunk = left.min(buffer.len());
        output.write_all(&buffer[..chunk])?;
        left -= chunk;
    }
    Ok(())
}

/// Write the canonical rendering of `width` columns
pub fn write_indent<W: Write>(output: &mut W, width: usize, rules: &RuleTable) -> std::io::Result<()> {
    let (tabs, spaces) = indent_parts(width, rules.indent_unit, rules.tab_width);
    write_repeated(output, TABS, tabs)?;
    write_repeated(output, SPACES, spaces)
}

/// Canonical rendering of `width` columns as a string
#[must_use]
pub fn render_indent(width: usize, rules: &RuleTable) -> String {
    let (tabs, spaces) = indent_parts(width, rules.indent_unit, rules.tab_width);
    let mut rendered = "\t".repeat(tabs);
    rendered.push_str(&" ".repeat(spaces));
    rendered
}

/// Whether `indent` is exactly the canonical rendering of `width`
#[must_use]
pub fn is_canonical(indent: &str, width: usize, rules: &RuleTable) -> bool {
    let (tabs, spaces) = indent_parts(width, rules.indent_unit, rules.tab_width);
    indent.len() == tabs + spaces
        && indent[..tabs].bytes().all(|b| b == b'\t')
        && indent[tabs..].bytes().all(|b| b == b' ')
}
