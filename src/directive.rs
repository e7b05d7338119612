//! Inline directive parsing for `// sindent:` comments
//!
//! Supports in-file configuration overrides via special comments written
//! with the configured line-comment marker:
//! `// sindent: --indent-width 2 --tabs --continuation increment`

use std::sync::LazyLock;

use regex::Regex;

use crate::config::{Config, ContinuationMode, IndentUnit};
use crate::parser::{TokenKind, Tokenizer};
use crate::rules::RuleTable;

/// Directive comment: marker, the `sindent:` tag and the option string.
/// Markers never contain whitespace, so the first non-space run is the marker.
static DIRECTIVE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(\S+?)\s*sindent:\s*(.*?)\s*$").expect("valid directive pattern")
});

/// Option string of a directive written with `marker`
fn directive_args<'t>(line: &'t str, marker: &str) -> Option<&'t str> {
    let caps = DIRECTIVE_RE.captures(line)?;
    if caps.get(1)?.as_str() != marker {
        return None;
    }
    Some(caps.get(2)?.as_str())
}

/// Parsed directive options that can override config
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DirectiveOverrides {
    pub indent_unit: Option<IndentUnit>,
    pub indent_width: Option<usize>,
    pub tab_width: Option<usize>,
    pub continuation_mode: Option<ContinuationMode>,
    pub increment: Option<usize>,
    pub paren_increment: Option<usize>,
}

impl DirectiveOverrides {
    /// Check if any overrides are set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Override the fields set by the directive
    pub fn apply(&self, config: &mut Config) {
        if let Some(v) = self.indent_unit {
            config.indent_unit = v;
        }
        if let Some(v) = self.indent_width {
            config.indent_width = v;
        }
        if let Some(v) = self.tab_width {
            config.tab_width = v;
        }
        if let Some(v) = self.continuation_mode {
            config.continuation_mode = v;
        }
        if let Some(v) = self.increment {
            config.increment = v;
        }
        if let Some(v) = self.paren_increment {
            config.paren_increment = v;
        }
    }
}

/// Check if a line contains a sindent directive
#[must_use]
pub fn is_directive_line(line: &str, marker: &str) -> bool {
    directive_args(line, marker).is_some()
}

/// Parse a sindent directive line and return option overrides
///
/// # Returns
/// * `Some(DirectiveOverrides)` if the line is a directive with at least one known option
/// * `None` otherwise
#[must_use]
pub fn parse_directive(line: &str, marker: &str) -> Option<DirectiveOverrides> {
    parse_directive_args(directive_args(line, marker)?)
}

/// Parse directive arguments into overrides
fn parse_directive_args(args_str: &str) -> Option<DirectiveOverrides> {
    let mut overrides = DirectiveOverrides::default();
    let mut tokens = args_str.split_whitespace();

    while let Some(token) = tokens.next() {
        match token {
            "-i" | "--indent-width" => {
                overrides.indent_width = tokens.next().and_then(|v| v.parse().ok());
            }
            "--tab-width" => {
                overrides.tab_width = tokens.next().and_then(|v| v.parse().ok());
            }
            "--tabs" => overrides.indent_unit = Some(IndentUnit::Tabs),
            "--spaces" => overrides.indent_unit = Some(IndentUnit::Spaces),
            "--continuation" => {
                overrides.continuation_mode = match tokens.next() {
                    Some("align") => Some(ContinuationMode::Align),
                    Some("increment") => Some(ContinuationMode::Increment),
                    _ => None,
                };
            }
            "--increment" => {
                overrides.increment = tokens.next().and_then(|v| v.parse().ok());
            }
            "--paren-increment" => {
                overrides.paren_increment = tokens.next().and_then(|v| v.parse().ok());
            }
            _ => {
                // Unknown option, skip
            }
        }
    }

    if overrides.is_empty() {
        None
    } else {
        Some(overrides)
    }
}

/// Scan `source` for sindent directives and return the first found
///
/// Only line comments that start their line count, so directive text inside
/// strings, text blocks or block comments is ignored. Only the first
/// directive is used (subsequent ones are ignored).
#[must_use]
pub fn find_directive(source: &str, rules: &RuleTable) -> Option<DirectiveOverrides> {
    let mut line_start = true;
    for token in Tokenizer::new(source, rules) {
        if token.kind == TokenKind::LineComment && line_start {
            if let Some(args) = directive_args(token.text, &rules.line_comment) {
                return parse_directive_args(args);
            }
        }
        line_start = token.kind == TokenKind::Newline;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_directive_line() {
        assert!(is_directive_line("// sindent: --indent-width 4", "//"));
        assert!(is_directive_line("   //sindent: --tabs", "//"));
        assert!(is_directive_line("// SINDENT: --tabs", "//"));
        assert!(!is_directive_line("// this is a regular comment", "//"));
        assert!(!is_directive_line("int x; // sindent: --tabs", "//"));
    }

    #[test]
    fn test_custom_marker_is_escaped() {
        assert!(is_directive_line("# sindent: --tabs", "#"));
        assert!(is_directive_line("-- sindent: --tabs", "--"));
        assert!(!is_directive_line("// sindent: --tabs", "#"));
    }

    #[test]
    fn test_parse_directive_multiple() {
        let overrides =
            parse_directive("// sindent: --indent-width 2 --tabs --tab-width 8", "//").unwrap();
        assert_eq!(overrides.indent_width, Some(2));
        assert_eq!(overrides.tab_width, Some(8));
        assert_eq!(overrides.indent_unit, Some(IndentUnit::Tabs));
        assert_eq!(overrides.continuation_mode, None);
    }

    #[test]
    fn test_parse_directive_continuation() {
        let overrides =
            parse_directive("// sindent: --continuation increment --increment 2", "//").unwrap();
        assert_eq!(
            overrides.continuation_mode,
            Some(ContinuationMode::Increment)
        );
        assert_eq!(overrides.increment, Some(2));
    }

    #[test]
    fn test_parse_invalid_directive() {
        assert!(parse_directive("// sindent:", "//").is_none());
        assert!(parse_directive("// sindent: --bogus", "//").is_none());
    }

    #[test]
    fn test_apply_overrides() {
        let overrides = parse_directive("// sindent: -i 2 --paren-increment 1", "//").unwrap();
        let mut config = Config::default();
        overrides.apply(&mut config);
        assert_eq!(config.indent_width, 2);
        assert_eq!(config.paren_increment, 1);
        assert_eq!(config.tab_width, 4);
    }

    #[test]
    fn test_find_directive_first_wins() {
        let rules = RuleTable::default();
        let text = "package a;\r\n// sindent: --indent-width 3\n// sindent: --indent-width 8\n";
        let overrides = find_directive(text, &rules).unwrap();
        assert_eq!(overrides.indent_width, Some(3));
    }

    #[test]
    fn test_find_directive_none() {
        let rules = RuleTable::default();
        assert!(find_directive("class A {}\n", &rules).is_none());
    }

    #[test]
    fn test_find_directive_skips_strings_and_block_comments() {
        let rules = RuleTable::default();
        let text = "/*\n// sindent: --tabs\n*/\nString s = \"\"\"\n// sindent: -i 8\n\"\"\";\n\
                    x = \"// sindent: -i 7\";\n   // sindent: -i 2\n";
        let overrides = find_directive(text, &rules).unwrap();
        assert_eq!(overrides.indent_width, Some(2));
        assert_eq!(overrides.indent_unit, None);
    }

    #[test]
    fn test_find_directive_ignores_trailing_comment() {
        let rules = RuleTable::default();
        assert!(find_directive("int x; // sindent: --tabs\n", &rules).is_none());
    }

    #[test]
    fn test_find_directive_custom_marker() {
        let mut config = Config::default();
        config.comment_markers.line_start = "#".to_string();
        let rules = RuleTable::from_config(&config).unwrap();
        let overrides = find_directive("# sindent: --tabs\n", &rules).unwrap();
        assert_eq!(overrides.indent_unit, Some(IndentUnit::Tabs));
    }
}
