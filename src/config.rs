//! Configuration management for sindent.
//!
//! This module provides the [`Config`] struct, the rule table that drives the
//! indentation engine. Configuration can be loaded from:
//! - TOML files (`sindent.toml`)
//! - CLI arguments (which override file settings)
//! - In-file directives (`// sindent: --indent-width 2`)
//!
//! Config files are auto-discovered by searching parent directories from the file
//! being checked up to the filesystem root, plus the user's home directory.

use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Config file names to search for (in order of priority, later overrides earlier)
const CONFIG_FILE_NAMES: &[&str] = &["sindent.toml", ".sindent.toml"];

/// Bracket pairs the engine knows how to nest
pub const KNOWN_BRACKET_PAIRS: &[(&str, &str)] = &[("(", ")"), ("[", "]"), ("{", "}")];

/// Home directory from `HOME`, or `USERPROFILE` on Windows
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}

// Serde default functions
fn default_width() -> usize {
    4
}
fn default_increment() -> usize {
    1
}
fn default_paren_increment() -> usize {
    2
}
fn default_bracket_pairs() -> Vec<(String, String)> {
    KNOWN_BRACKET_PAIRS
        .iter()
        .map(|&(open, close)| (open.to_string(), close.to_string()))
        .collect()
}
fn default_clause_keywords() -> Vec<String> {
    vec![
        "implements".to_string(),
        "extends".to_string(),
        "throws".to_string(),
    ]
}
fn default_annotation_marker() -> String {
    "@".to_string()
}

/// Characters used for one indentation unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndentUnit {
    #[default]
    Spaces,
    Tabs,
}

/// How wrapped list items are placed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContinuationMode {
    /// Align items under the first item of the list
    #[default]
    Align,
    /// Indent items by a fixed number of units
    Increment,
}

/// Comment delimiters of the analysed language
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentMarkers {
    pub line_start: String,
    pub block_start: String,
    pub block_end: String,
}

impl Default for CommentMarkers {
    fn default() -> Self {
        Self {
            line_start: "//".to_string(),
            block_start: "/*".to_string(),
            block_end: "*/".to_string(),
        }
    }
}

/// Main configuration struct for sindent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Spaces or tabs for leading whitespace (default: spaces)
    #[serde(default)]
    pub indent_unit: IndentUnit,

    /// Columns per indent level (default: 4)
    #[serde(default = "default_width")]
    pub indent_width: usize,

    /// Columns a tab advances to (default: 4)
    #[serde(default = "default_width")]
    pub tab_width: usize,

    /// Placement of wrapped list items (default: align)
    #[serde(default)]
    pub continuation_mode: ContinuationMode,

    /// Indent units for clause-list items in increment mode (default: 1)
    #[serde(default = "default_increment")]
    pub increment: usize,

    /// Indent units for items of wrapped paren/bracket lists (default: 2)
    #[serde(default = "default_paren_increment")]
    pub paren_increment: usize,

    /// Recognized bracket pairs (default: `()`, `[]`, `{}`)
    #[serde(default = "default_bracket_pairs")]
    pub bracket_pairs: Vec<(String, String)>,

    /// Keywords opening a clause list (default: implements, extends, throws)
    #[serde(default = "default_clause_keywords")]
    pub clause_keywords: Vec<String>,

    /// Comment delimiters (default: `//`, `/*`, `*/`)
    #[serde(default)]
    pub comment_markers: CommentMarkers,

    /// Decorator/annotation marker (default: `@`)
    #[serde(default = "default_annotation_marker")]
    pub annotation_marker: String,
}

/// Partial configuration for TOML parsing
///
/// All fields are `Option<T>` so we can distinguish between
/// "explicitly set" and "not specified" when merging configs.
#[derive(Debug, Clone, Default, Deserialize)]
struct PartialConfig {
    pub indent_unit: Option<IndentUnit>,
    pub indent_width: Option<usize>,
    pub tab_width: Option<usize>,
    pub continuation_mode: Option<ContinuationMode>,
    pub increment: Option<usize>,
    pub paren_increment: Option<usize>,
    pub bracket_pairs: Option<Vec<(String, String)>>,
    pub clause_keywords: Option<Vec<String>>,
    pub comment_markers: Option<PartialCommentMarkers>,
    pub annotation_marker: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct PartialCommentMarkers {
    pub line_start: Option<String>,
    pub block_start: Option<String>,
    pub block_end: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            indent_unit: IndentUnit::Spaces,
            indent_width: 4,
            tab_width: 4,
            continuation_mode: ContinuationMode::Align,
            increment: 1,
            paren_increment: 2,
            bracket_pairs: default_bracket_pairs(),
            clause_keywords: default_clause_keywords(),
            comment_markers: CommentMarkers::default(),
            annotation_marker: default_annotation_marker(),
        }
    }
}

impl Config {
    /// Maximum reasonable indent or tab width
    const MAX_WIDTH: usize = 16;
    /// Maximum reasonable increment (in indent units)
    const MAX_INCREMENT: usize = 8;

    /// Validate configuration values
    ///
    /// Runs before any analysis; a rejected configuration never reaches the engine.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.indent_width == 0 || self.indent_width > Self::MAX_WIDTH {
            return Err(ConfigError::IndentWidth {
                value: self.indent_width,
                max: Self::MAX_WIDTH,
            });
        }
        if self.tab_width == 0 || self.tab_width > Self::MAX_WIDTH {
            return Err(ConfigError::TabWidth {
                value: self.tab_width,
                max: Self::MAX_WIDTH,
            });
        }
        if self.increment > Self::MAX_INCREMENT {
            return Err(ConfigError::Increment {
                name: "increment",
                value: self.increment,
                max: Self::MAX_INCREMENT,
            });
        }
        if self.paren_increment > Self::MAX_INCREMENT {
            return Err(ConfigError::Increment {
                name: "paren_increment",
                value: self.paren_increment,
                max: Self::MAX_INCREMENT,
            });
        }

        for (idx, (open, close)) in self.bracket_pairs.iter().enumerate() {
            let known = KNOWN_BRACKET_PAIRS
                .iter()
                .any(|&(o, c)| o == open && c == close);
            if !known {
                return Err(ConfigError::UnknownBracketPair {
                    open: open.clone(),
                    close: close.clone(),
                });
            }
            if self.bracket_pairs[..idx].iter().any(|(o, _)| o == open) {
                return Err(ConfigError::DuplicateBracketPair {
                    open: open.clone(),
                    close: close.clone(),
                });
            }
        }

        let markers = &self.comment_markers;
        for (name, marker) in [
            ("line_start", &markers.line_start),
            ("block_start", &markers.block_start),
            ("block_end", &markers.block_end),
        ] {
            if marker.is_empty() {
                return Err(ConfigError::EmptyCommentMarker(name));
            }
            if marker.chars().any(char::is_whitespace) {
                return Err(ConfigError::WhitespaceInCommentMarker {
                    name,
                    value: marker.clone(),
                });
            }
        }
        if markers.line_start == markers.block_start {
            return Err(ConfigError::CommentMarkerClash(
                markers.line_start.clone(),
                markers.block_start.clone(),
            ));
        }
        if markers.block_start == markers.block_end {
            return Err(ConfigError::CommentMarkerClash(
                markers.block_start.clone(),
                markers.block_end.clone(),
            ));
        }

        for keyword in &self.clause_keywords {
            if !is_identifier(keyword) {
                return Err(ConfigError::InvalidKeyword(keyword.clone()));
            }
        }

        let mut marker_chars = self.annotation_marker.chars();
        let valid_marker = match (marker_chars.next(), marker_chars.next()) {
            (Some(c), None) => c.is_ascii_punctuation() && !"()[]{},;\"'$_".contains(c),
            _ => false,
        };
        if !valid_marker {
            return Err(ConfigError::InvalidAnnotationMarker(
                self.annotation_marker.clone(),
            ));
        }

        Ok(())
    }

    /// Load configuration from a TOML file
    pub fn from_toml_file(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parse configuration from TOML text, filling unset fields with defaults
    pub fn from_toml_str(contents: &str) -> anyhow::Result<Self> {
        let partial: PartialConfig = toml::from_str(contents)?;
        let mut config = Self::default();
        config.apply_partial(&partial);
        Ok(config)
    }

    /// Apply a partial config, only overriding fields that are explicitly set
    fn apply_partial(&mut self, partial: &PartialConfig) {
        if let Some(v) = partial.indent_unit {
            self.indent_unit = v;
        }
        if let Some(v) = partial.indent_width {
            self.indent_width = v;
        }
        if let Some(v) = partial.tab_width {
            self.tab_width = v;
        }
        if let Some(v) = partial.continuation_mode {
            self.continuation_mode = v;
        }
        if let Some(v) = partial.increment {
            self.increment = v;
        }
        if let Some(v) = partial.paren_increment {
            self.paren_increment = v;
        }
        if let Some(v) = &partial.bracket_pairs {
            self.bracket_pairs.clone_from(v);
        }
        if let Some(v) = &partial.clause_keywords {
            self.clause_keywords.clone_from(v);
        }
        if let Some(markers) = &partial.comment_markers {
            if let Some(v) = &markers.line_start {
                self.comment_markers.line_start.clone_from(v);
            }
            if let Some(v) = &markers.block_start {
                self.comment_markers.block_start.clone_from(v);
            }
            if let Some(v) = &markers.block_end {
                self.comment_markers.block_end.clone_from(v);
            }
        }
        if let Some(v) = &partial.annotation_marker {
            self.annotation_marker.clone_from(v);
        }
    }

    /// Config files that apply to `start_path`, least specific first
    ///
    /// The home directory comes first, then every ancestor directory of the
    /// file from the root down, so nearer files override farther ones.
    #[must_use]
    pub fn discover_config_files(start_path: &Path) -> Vec<PathBuf> {
        let start_dir = if start_path.is_file() {
            start_path.parent().map(Path::to_path_buf)
        } else if start_path.is_dir() {
            Some(start_path.to_path_buf())
        } else {
            std::env::current_dir().ok()
        };

        let mut search_dirs: Vec<PathBuf> = home_dir().into_iter().collect();
        if let Some(dir) = start_dir {
            let mut ancestors: Vec<&Path> = dir.ancestors().collect();
            ancestors.reverse();
            search_dirs.extend(ancestors.into_iter().map(Path::to_path_buf));
        }

        let mut found: Vec<PathBuf> = Vec::new();
        for candidate in search_dirs
            .iter()
            .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        {
            if candidate.is_file() && !found.contains(&candidate) {
                found.push(candidate);
            }
        }
        found
    }

    /// Load and merge configuration from discovered config files
    ///
    /// Later files override earlier ones (only explicitly set values).
    /// Returns default config if no files found.
    #[must_use]
    pub fn from_discovered_files(start_path: &Path) -> Self {
        let config_files = Self::discover_config_files(start_path);

        let mut config = Self::default();
        for path in &config_files {
            debug!("reading config file {}", path.display());
            match std::fs::read_to_string(path) {
                Ok(contents) => match toml::from_str::<PartialConfig>(&contents) {
                    Ok(partial) => config.apply_partial(&partial),
                    Err(e) => warn!("failed to parse {}: {e}", path.display()),
                },
                Err(e) => warn!("failed to read {}: {e}", path.display()),
            }
        }
        config
    }
}

/// Check that `word` is a plain identifier (`[A-Za-z_$][A-Za-z0-9_$]*`)
pub(crate) fn is_identifier(word: &str) -> bool {
    let mut chars = word.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}
