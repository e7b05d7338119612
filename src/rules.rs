//! Rule table builder - compiles a validated [`Config`] into lookup tables
//!
//! The tokenizer and indenter never look at [`Config`] directly; they read the
//! [`RuleTable`] built here. Building it is the single point where a bad
//! configuration is rejected.

use std::collections::HashSet;

use crate::config::{Config, ContinuationMode, IndentUnit};
use crate::error::ConfigError;
use crate::parser::BracketKind;

/// Validated, ready-to-use indentation rules
#[derive(Debug, Clone)]
pub struct RuleTable {
    pub indent_unit: IndentUnit,
    pub indent_width: usize,
    pub tab_width: usize,
    pub continuation_mode: ContinuationMode,
    /// Clause-list increment in columns
    pub clause_increment: usize,
    /// Paren/bracket list increment in columns
    pub list_increment: usize,
    brackets: Vec<BracketKind>,
    keywords: HashSet<String>,
    pub line_comment: String,
    pub block_comment_start: String,
    pub block_comment_end: String,
    pub annotation_marker: char,
}

impl RuleTable {
    /// Validate `config` and compile it
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut brackets = Vec::with_capacity(config.bracket_pairs.len());
        for (open, close) in &config.bracket_pairs {
            let kind = BracketKind::from_pair(open, close).ok_or_else(|| {
                ConfigError::UnknownBracketPair {
                    open: open.clone(),
                    close: close.clone(),
                }
            })?;
            brackets.push(kind);
        }

        let annotation_marker = config
            .annotation_marker
            .chars()
            .next()
            .ok_or_else(|| ConfigError::InvalidAnnotationMarker(String::new()))?;

        Ok(Self {
            indent_unit: config.indent_unit,
            indent_width: config.indent_width,
            tab_width: config.tab_width,
            continuation_mode: config.continuation_mode,
            clause_increment: config.increment * config.indent_width,
            list_increment: config.paren_increment * config.indent_width,
            brackets,
            keywords: config.clause_keywords.iter().cloned().collect(),
            line_comment: config.comment_markers.line_start.clone(),
            block_comment_start: config.comment_markers.block_start.clone(),
            block_comment_end: config.comment_markers.block_end.clone(),
            annotation_marker,
        })
    }

    /// Bracket kind opened by `ch`, if that pair is enabled
    #[must_use]
    pub fn open_bracket(&self, ch: char) -> Option<BracketKind> {
        self.brackets
            .iter()
            .copied()
            .find(|kind| kind.open_str().starts_with(ch))
    }

    /// Bracket kind closed by `ch`, if that pair is enabled
    #[must_use]
    pub fn close_bracket(&self, ch: char) -> Option<BracketKind> {
        self.brackets
            .iter()
            .copied()
            .find(|kind| kind.close_str().starts_with(ch))
    }

    #[must_use]
    pub fn is_clause_keyword(&self, word: &str) -> bool {
        self.keywords.contains(word)
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::from_config(&Config::default()).expect("default configuration is valid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rules() {
        let rules = RuleTable::default();
        assert_eq!(rules.open_bracket('('), Some(BracketKind::Paren));
        assert_eq!(rules.close_bracket('}'), Some(BracketKind::Curly));
        assert_eq!(rules.open_bracket('<'), None);
        assert!(rules.is_clause_keyword("throws"));
        assert!(!rules.is_clause_keyword("class"));
        assert_eq!(rules.clause_increment, 4);
        assert_eq!(rules.list_increment, 8);
        assert_eq!(rules.annotation_marker, '@');
    }

    #[test]
    fn test_disabled_bracket_pair() {
        let config = Config {
            bracket_pairs: vec![("{".to_string(), "}".to_string())],
            ..Default::default()
        };
        let rules = RuleTable::from_config(&config).unwrap();
        assert_eq!(rules.open_bracket('('), None);
        assert_eq!(rules.open_bracket('{'), Some(BracketKind::Curly));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = Config {
            bracket_pairs: vec![("<".to_string(), ">".to_string())],
            ..Default::default()
        };
        assert!(matches!(
            RuleTable::from_config(&config),
            Err(ConfigError::UnknownBracketPair { .. })
        ));
    }
}
