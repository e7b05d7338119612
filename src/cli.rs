//! Command-line interface for sindent.
//!
//! Defines CLI arguments using clap builder API

use std::path::PathBuf;

use clap::{Arg, ArgAction, Command};

use crate::config::{ContinuationMode, IndentUnit};

/// CLI arguments parsed from command line
#[derive(Debug, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct CliArgs {
    /// Files or directories to check
    pub inputs: Vec<PathBuf>,

    /// Report problems instead of rewriting files
    pub check: bool,

    /// Output to stdout instead of in-place
    pub stdout: bool,

    /// Columns per indent level
    pub indent_width: Option<usize>,

    /// Columns a tab advances to
    pub tab_width: Option<usize>,

    /// Indent with tabs or spaces
    pub indent_unit: Option<IndentUnit>,

    /// Placement of wrapped list items
    pub continuation_mode: Option<ContinuationMode>,

    /// Clause-list increment in indent units
    pub increment: Option<usize>,

    /// Paren/bracket list increment in indent units
    pub paren_increment: Option<usize>,

    /// Config file path
    pub config: Option<PathBuf>,

    /// Recursive directory processing
    pub recursive: bool,

    /// Exclude patterns for files/directories (glob patterns)
    pub exclude: Vec<String>,

    /// Extra source file extensions (in addition to defaults)
    pub extensions: Vec<String>,

    /// Number of parallel jobs (0 = auto, 1 = sequential)
    pub jobs: Option<usize>,

    /// Enable debug output
    pub debug: bool,

    /// Silent mode (no output)
    pub silent: bool,
}

/// Build the clap Command for parsing CLI arguments
#[must_use]
pub fn build_cli() -> Command {
    Command::new("sindent")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Structural indentation checker and fixer for brace-delimited sources")
        .arg(
            Arg::new("inputs")
                .help("Files or directories to process (`-` or none reads stdin)")
                .value_name("FILE")
                .num_args(1..)
                .required(false)
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("check")
                .long("check")
                .help("Report indentation problems instead of fixing them")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("stdout")
                .short('s')
                .long("stdout")
                .help("Write fixed output to stdout instead of modifying files in-place")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("indent-width")
                .short('i')
                .long("indent-width")
                .help("Columns per indent level [default: 4]")
                .value_name("NUM")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("tab-width")
                .long("tab-width")
                .help("Columns a tab advances to [default: 4]")
                .value_name("NUM")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("tabs")
                .long("tabs")
                .help("Indent with tabs (remainder filled with spaces)")
                .action(ArgAction::SetTrue)
                .conflicts_with("spaces"),
        )
        .arg(
            Arg::new("spaces")
                .long("spaces")
                .help("Indent with spaces")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("continuation")
                .long("continuation")
                .help("Placement of wrapped list items [default: align]")
                .value_name("MODE")
                .value_parser(["align", "increment"]),
        )
        .arg(
            Arg::new("increment")
                .long("increment")
                .help("Indent units for clause-list items in increment mode [default: 1]")
                .value_name("NUM")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("paren-increment")
                .long("paren-increment")
                .help("Indent units for items of wrapped paren/bracket lists [default: 2]")
                .value_name("NUM")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("Path to configuration file (overrides auto-discovery)")
                .value_name("FILE")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("recursive")
                .short('r')
                .long("recursive")
                .help("Recursively process directories")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("exclude")
                .short('e')
                .long("exclude")
                .help("Exclude files/directories matching pattern (glob syntax, can be repeated)")
                .value_name("PATTERN")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("extension")
                .short('x')
                .long("extension")
                .help("Additional source file extension (can be repeated, e.g., -x groovy)")
                .value_name("EXT")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("jobs")
                .short('j')
                .long("jobs")
                .help("Number of parallel jobs (0=auto, 1=sequential)")
                .value_name("NUM")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("debug")
                .short('D')
                .long("debug")
                .help("Enable debug logging (config discovery, per-file analysis)")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("silent")
                .short('S')
                .long("silent")
                .help("Silent mode (no progress output, for editor integration)")
                .action(ArgAction::SetTrue),
        )
}

/// Parse CLI arguments from command line
#[must_use]
pub fn parse_args() -> CliArgs {
    args_from_matches(&build_cli().get_matches())
}

/// Parse CLI arguments from an iterator (for testing)
#[must_use]
pub fn parse_args_from<I, T>(args: I) -> CliArgs
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    args_from_matches(&build_cli().get_matches_from(args))
}

/// Convert clap `ArgMatches` to `CliArgs`
fn args_from_matches(matches: &clap::ArgMatches) -> CliArgs {
    let indent_unit = if matches.get_flag("tabs") {
        Some(IndentUnit::Tabs)
    } else if matches.get_flag("spaces") {
        Some(IndentUnit::Spaces)
    } else {
        None
    };
    let continuation_mode =
        matches
            .get_one::<String>("continuation")
            .map(|mode| match mode.as_str() {
                "increment" => ContinuationMode::Increment,
                _ => ContinuationMode::Align,
            });

    CliArgs {
        inputs: matches
            .get_many::<PathBuf>("inputs")
            .map(|vals| vals.cloned().collect())
            .unwrap_or_default(),
        check: matches.get_flag("check"),
        stdout: matches.get_flag("stdout"),
        indent_width: matches.get_one::<usize>("indent-width").copied(),
        tab_width: matches.get_one::<usize>("tab-width").copied(),
        indent_unit,
        continuation_mode,
        increment: matches.get_one::<usize>("increment").copied(),
        paren_increment: matches.get_one::<usize>("paren-increment").copied(),
        config: matches.get_one::<PathBuf>("config").cloned(),
        recursive: matches.get_flag("recursive"),
        exclude: matches
            .get_many::<String>("exclude")
            .map(|vals| vals.cloned().collect())
            .unwrap_or_default(),
        extensions: matches
            .get_many::<String>("extension")
            .map(|vals| vals.cloned().collect())
            .unwrap_or_default(),
        jobs: matches.get_one::<usize>("jobs").copied(),
        debug: matches.get_flag("debug"),
        silent: matches.get_flag("silent"),
    }
}
