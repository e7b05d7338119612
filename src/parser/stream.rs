//! `SourceLines` - Splits a text into physical lines
//!
//! Each line is cut into leading whitespace, content and line ending so the
//! rewriter can swap the indentation while leaving every other byte alone.
//! Only spaces and tabs count as indentation; a lone `\r` before the `\n`
//! belongs to the ending.

/// One physical line of the input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLine<'a> {
    /// 1-based line number
    pub number: usize,
    /// Leading run of spaces and tabs
    pub indent: &'a str,
    /// Everything between the indent and the line ending
    pub content: &'a str,
    /// `"\n"`, `"\r\n"` or `""` for a final line without newline
    pub ending: &'a str,
}

impl SourceLine<'_> {
    /// Whitespace-only lines (including a bare `\r`) have no indentation to check
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }

    /// Number of characters in the indent; token columns count from the line start
    #[must_use]
    pub fn lead_chars(&self) -> usize {
        // Spaces and tabs are single-byte
        self.indent.len()
    }
}

/// Iterator over the physical lines of a text
#[derive(Debug, Clone)]
pub struct SourceLines<'a> {
    rest: &'a str,
    number: usize,
}

impl<'a> SourceLines<'a> {
    #[must_use]
    pub fn new(text: &'a str) -> Self {
        Self {
            rest: text,
            number: 0,
        }
    }
}

impl<'a> Iterator for SourceLines<'a> {
    type Item = SourceLine<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }

        let (line, rest) = match self.rest.find('\n') {
            Some(pos) => self.rest.split_at(pos + 1),
            None => (self.rest, ""),
        };
        self.rest = rest;
        self.number += 1;

        let body_len = if line.ends_with("\r\n") {
            line.len() - 2
        } else if line.ends_with('\n') {
            line.len() - 1
        } else {
            line.len()
        };
        let (body, ending) = line.split_at(body_len);
        let indent_len = body.len() - body.trim_start_matches([' ', '\t']).len();
        let (indent, content) = body.split_at(indent_len);

        Some(SourceLine {
            number: self.number,
            indent,
            content,
            ending,
        })
    }
}

/// Split `text` into physical lines
#[must_use]
pub fn split_lines(text: &str) -> SourceLines<'_> {
    SourceLines::new(text)
}
