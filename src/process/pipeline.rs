//! Check and fix pipeline
//!
//! Runs the tokenizer, classifier and indenter over a text once, then either
//! reports misindented lines (check) or rewrites their leading whitespace
//! (fix). Only the leading whitespace of flagged lines ever changes.

use std::io::{BufRead, Write};

use log::{debug, trace};

use crate::config::Config;
use crate::error::{ConfigError, LexError};
use crate::format::{
    is_canonical, measure_indent, render_indent, write_indent, Indenter, LineIndent,
    StructuralIssue,
};
use crate::parser::{
    classify, comment_spans, split_lines, ClassifiedToken, CommentSpan, LineRole,
};
use crate::process::diagnostic::{CheckReport, Diagnostic};
use crate::rules::RuleTable;
use crate::Result;

/// A physical line together with its computed indentation
#[derive(Debug, Clone)]
pub struct LogicalLine<'a> {
    /// 1-based line number
    pub number: usize,
    pub leading_whitespace: &'a str,
    pub content: &'a str,
    pub ending: &'a str,
    pub tokens: Vec<ClassifiedToken<'a>>,
    pub role: LineRole,
    pub is_continuation: bool,
    /// `None` for exempt lines
    pub expected_indent: Option<usize>,
    /// Measured width of `leading_whitespace`
    pub actual_indent: usize,
}

impl LogicalLine<'_> {
    /// Expected indent when the leading whitespace is not its canonical rendering
    #[must_use]
    pub fn misindented(&self, rules: &RuleTable) -> Option<usize> {
        self.expected_indent
            .filter(|&expected| !is_canonical(self.leading_whitespace, expected, rules))
    }
}

/// Per-line view of a text plus the problems found while analysing it
#[derive(Debug, Clone)]
pub struct Analysis<'a> {
    pub lines: Vec<LogicalLine<'a>>,
    pub lex_errors: Vec<LexError>,
    pub structural_issues: Vec<StructuralIssue>,
    pub comment_spans: Vec<CommentSpan>,
}

const EXEMPT: LineIndent = LineIndent {
    expected: None,
    is_continuation: false,
};

/// Compute the canonical indentation of every line of `text`
#[must_use]
pub fn analyze<'a>(text: &'a str, rules: &'a RuleTable) -> Analysis<'a> {
    let classified = classify(text, rules);
    let comment_spans = comment_spans(&classified.lines);
    let mut classified_lines = classified.lines.into_iter().peekable();
    let mut indenter = Indenter::new(rules);
    let mut lines = Vec::new();

    for source in split_lines(text) {
        let (indent, tokens, role) =
            match classified_lines.next_if(|line| line.line == source.number) {
                Some(line) => {
                    let mut indent = indenter.process_line(&line, &source);
                    if source.is_blank() {
                        indent = EXEMPT;
                    }
                    (indent, line.tokens, line.role)
                }
                None => (EXEMPT, Vec::new(), LineRole::Blank),
            };

        lines.push(LogicalLine {
            number: source.number,
            leading_whitespace: source.indent,
            content: source.content,
            ending: source.ending,
            tokens,
            role,
            is_continuation: indent.is_continuation,
            expected_indent: indent.expected,
            actual_indent: measure_indent(source.indent, rules.tab_width),
        });
    }

    let structural_issues = indenter.finish();
    let lex_errors = classified.lex_errors;

    // Nothing after an unterminated block comment opener is checked
    if let Some(opener_line) = lex_errors.iter().find_map(|error| match error {
        LexError::UnterminatedBlockComment { line, .. } => Some(*line),
        LexError::UnterminatedString { .. } | LexError::UnterminatedTextBlock { .. } => None,
    }) {
        trace!("lines after {opener_line} are inside an unterminated comment");
        for line in lines.iter_mut().filter(|line| line.number > opener_line) {
            line.expected_indent = None;
            line.is_continuation = false;
        }
    }

    debug!(
        "analyzed {} lines: {} lexical, {} structural issues",
        lines.len(),
        lex_errors.len(),
        structural_issues.len()
    );

    Analysis {
        lines,
        lex_errors,
        structural_issues,
        comment_spans,
    }
}

/// Check `text` against already compiled rules
#[must_use]
pub fn check_with_rules(text: &str, rules: &RuleTable) -> CheckReport {
    report(&analyze(text, rules), rules)
}

fn report(analysis: &Analysis<'_>, rules: &RuleTable) -> CheckReport {
    let mut diagnostics: Vec<Diagnostic> = analysis
        .lines
        .iter()
        .filter_map(|line| {
            line.misindented(rules).map(|expected| {
                Diagnostic::indentation(
                    line.number,
                    line.leading_whitespace.len() + 1,
                    expected,
                    line.actual_indent,
                )
            })
        })
        .collect();
    diagnostics.extend(analysis.lex_errors.iter().map(Diagnostic::lex));
    diagnostics.extend(analysis.structural_issues.iter().map(Diagnostic::structural));

    let expected_indents = analysis
        .lines
        .iter()
        .map(|line| line.expected_indent)
        .collect();
    CheckReport::new(diagnostics, expected_indents)
}

/// Rewrite `text` against already compiled rules
#[must_use]
pub fn fix_with_rules(text: &str, rules: &RuleTable) -> String {
    let analysis = analyze(text, rules);
    let mut fixed = String::with_capacity(text.len());
    for line in &analysis.lines {
        match line.misindented(rules) {
            Some(expected) => fixed.push_str(&render_indent(expected, rules)),
            None => fixed.push_str(line.leading_whitespace),
        }
        fixed.push_str(line.content);
        fixed.push_str(line.ending);
    }
    fixed
}

/// Report indentation problems in `text`
///
/// The configuration is validated first; a [`ConfigError`] is the only failure.
pub fn check(text: &str, config: &Config) -> std::result::Result<CheckReport, ConfigError> {
    let rules = RuleTable::from_config(config)?;
    Ok(check_with_rules(text, &rules))
}

/// Return `text` with every misindented line reindented
pub fn fix(text: &str, config: &Config) -> std::result::Result<String, ConfigError> {
    let rules = RuleTable::from_config(config)?;
    Ok(fix_with_rules(text, &rules))
}

/// Read a whole input, write its fixed form and return the report of the original
pub fn format_file<R: BufRead, W: Write>(
    mut input: R,
    output: &mut W,
    config: &Config,
) -> Result<CheckReport> {
    let mut text = String::new();
    input.read_to_string(&mut text)?;

    let rules = RuleTable::from_config(config)?;
    let analysis = analyze(&text, &rules);
    for line in &analysis.lines {
        match line.misindented(&rules) {
            Some(expected) => write_indent(output, expected, &rules)?,
            None => output.write_all(line.leading_whitespace.as_bytes())?,
        }
        output.write_all(line.content.as_bytes())?;
        output.write_all(line.ending.as_bytes())?;
    }

    Ok(report(&analysis, &rules))
}
