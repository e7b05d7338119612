//! Diagnostics reported by check mode

use std::fmt;

use crate::error::{LexError, StructuralMismatch};
use crate::format::StructuralIssue;

/// How serious a diagnostic is; only errors make a text non-conforming
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("warning"),
            Severity::Error => f.write_str("error"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// Leading whitespace differs from the canonical indent
    Indentation,
    /// Unterminated string or block comment
    Lex,
    /// Closer without a matching opener, or of the wrong kind
    StructuralMismatch,
    /// Context still open at end of input
    UnterminatedStructure,
}

/// One finding of check mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// 1-based line
    pub line: usize,
    /// 1-based column
    pub column: usize,
    pub expected_indent: Option<usize>,
    pub actual_indent: Option<usize>,
    pub severity: Severity,
    pub kind: DiagnosticKind,
    pub message: String,
}

impl Diagnostic {
    /// Misindented line
    #[must_use]
    pub fn indentation(line: usize, column: usize, expected: usize, actual: usize) -> Self {
        let message = if expected == actual {
            format!("indentation of width {expected} uses the wrong whitespace characters")
        } else {
            format!("expected indentation of {expected}, found {actual}")
        };
        Self {
            line,
            column,
            expected_indent: Some(expected),
            actual_indent: Some(actual),
            severity: Severity::Error,
            kind: DiagnosticKind::Indentation,
            message,
        }
    }

    /// Warning for a lexical problem
    #[must_use]
    pub fn lex(error: &LexError) -> Self {
        let (line, column) = error.position();
        Self {
            line,
            column: column + 1,
            expected_indent: None,
            actual_indent: None,
            severity: Severity::Warning,
            kind: DiagnosticKind::Lex,
            message: error.to_string(),
        }
    }

    /// Warning for a bracket structure problem
    #[must_use]
    pub fn structural(issue: &StructuralIssue) -> Self {
        let kind = match issue.mismatch {
            StructuralMismatch::Unterminated { .. } => DiagnosticKind::UnterminatedStructure,
            _ => DiagnosticKind::StructuralMismatch,
        };
        Self {
            line: issue.line,
            column: issue.column + 1,
            expected_indent: None,
            actual_indent: None,
            severity: Severity::Warning,
            kind,
            message: issue.mismatch.to_string(),
        }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {}: {}",
            self.line, self.column, self.severity, self.message
        )
    }
}

/// Result of checking one text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    /// Diagnostics ordered by position
    pub diagnostics: Vec<Diagnostic>,
    /// Canonical indent per physical line; `None` for exempt lines
    pub expected_indents: Vec<Option<usize>>,
    /// No error-severity diagnostic was produced
    pub conforms: bool,
}

impl CheckReport {
    #[must_use]
    pub fn new(mut diagnostics: Vec<Diagnostic>, expected_indents: Vec<Option<usize>>) -> Self {
        diagnostics.sort_by_key(|d| (d.line, d.column));
        let conforms = !diagnostics.iter().any(Diagnostic::is_error);
        Self {
            diagnostics,
            expected_indents,
            conforms,
        }
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| !d.is_error())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let diagnostic = Diagnostic::indentation(3, 3, 4, 2);
        assert_eq!(
            diagnostic.to_string(),
            "3:3: error: expected indentation of 4, found 2"
        );
    }

    #[test]
    fn test_wrong_characters_message() {
        let diagnostic = Diagnostic::indentation(1, 2, 4, 4);
        assert!(diagnostic.message.contains("wrong whitespace"));
    }

    #[test]
    fn test_lex_diagnostic_is_warning() {
        let error = LexError::UnterminatedBlockComment { line: 5, column: 4 };
        let diagnostic = Diagnostic::lex(&error);
        assert_eq!(diagnostic.severity, Severity::Warning);
        assert_eq!(diagnostic.kind, DiagnosticKind::Lex);
        assert_eq!((diagnostic.line, diagnostic.column), (5, 5));
    }

    #[test]
    fn test_structural_kind() {
        let issue = StructuralIssue {
            line: 2,
            column: 0,
            mismatch: StructuralMismatch::Unterminated {
                open: "{".to_string(),
            },
        };
        assert_eq!(
            Diagnostic::structural(&issue).kind,
            DiagnosticKind::UnterminatedStructure
        );
    }

    #[test]
    fn test_report_orders_and_conforms() {
        let warning = Diagnostic::lex(&LexError::UnterminatedString { line: 1, column: 0 });
        let report = CheckReport::new(vec![warning.clone()], vec![Some(0)]);
        assert!(report.conforms);

        let error = Diagnostic::indentation(1, 1, 4, 0);
        let report = CheckReport::new(vec![Diagnostic::indentation(2, 1, 4, 0), warning, error], vec![]);
        assert!(!report.conforms);
        assert_eq!(report.diagnostics[0].line, 1);
        assert_eq!(report.diagnostics[2].line, 2);
        assert_eq!(report.errors().count(), 2);
        assert_eq!(report.warnings().count(), 1);
    }
}
