//! sindent - structural indentation checker and fixer

#![warn(clippy::all)]
#![warn(clippy::pedantic)]

use std::fmt::Write as _;
use std::fs::File;
use std::io::{self, BufReader, Cursor, IsTerminal, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::atomic::{AtomicUsize, Ordering};

use glob::Pattern;
use log::{debug, error, info, warn, LevelFilter};
use rayon::prelude::*;
use sindent::process::{check, format_file, CheckReport};
use sindent::{find_directive, parse_args, CliArgs, Config, Result, RuleTable};
use walkdir::WalkDir;

/// Source file extensions processed by default
const SOURCE_EXTENSIONS: &[&str] = &["java", "JAVA"];

/// Default maximum file size in bytes (100 MB)
/// Files larger than this are skipped to prevent memory exhaustion
const DEFAULT_MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;

/// What happened to one input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Conforming,
    NonConforming,
    Skipped,
}

fn main() -> ExitCode {
    let args = parse_args();
    init_logging(&args);

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            error!("{e:#}");
            ExitCode::from(2)
        }
    }
}

/// Route `log` output to stderr; `-D` forces debug level, otherwise `RUST_LOG` or warn
fn init_logging(args: &CliArgs) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if args.debug {
        builder.filter_level(LevelFilter::Debug);
    } else if args.silent {
        builder.filter_level(LevelFilter::Error);
    }
    builder.format_timestamp(None).init();
}

/// Returns whether every input conformed (check mode) or was processed (fix mode)
fn run(args: &CliArgs) -> Result<bool> {
    let use_stdin =
        args.inputs.is_empty() || (args.inputs.len() == 1 && args.inputs[0].as_os_str() == "-");

    if args.inputs.is_empty() && io::stdin().is_terminal() {
        print_usage();
        return Ok(true);
    }

    if use_stdin {
        let config = build_config(args, None)?;
        return process_stdin(&config, args).map(|outcome| outcome != Outcome::NonConforming);
    }

    // An explicit config file applies to every input; otherwise each file discovers its own
    let base_config = match args.config {
        Some(_) => Some(build_config(args, None)?),
        None => None,
    };

    if let Some(jobs) = args.jobs {
        if jobs > 0 {
            if let Err(e) = rayon::ThreadPoolBuilder::new()
                .num_threads(jobs)
                .build_global()
            {
                warn!("failed to configure thread pool: {e}");
            }
        }
    }

    let files = collect_files(args);
    if files.is_empty() {
        if !args.silent {
            eprintln!("No source files found.");
        }
        return Ok(true);
    }

    let use_sequential = args.stdout || args.jobs == Some(1);
    let all_ok = if use_sequential {
        process_files_sequential(&files, base_config.as_ref(), args)
    } else {
        process_files_parallel(&files, base_config.as_ref(), args)
    };
    Ok(all_ok)
}

/// Build configuration from CLI args and config files
///
/// If `for_path` is provided and no explicit config file is specified,
/// config files are discovered from its parent directories.
fn build_config(args: &CliArgs, for_path: Option<&Path>) -> Result<Config> {
    let mut config = if let Some(config_path) = &args.config {
        debug!("using explicit config file {}", config_path.display());
        Config::from_toml_file(config_path)?
    } else {
        let start = match for_path {
            Some(path) => path.to_path_buf(),
            None => std::env::current_dir().unwrap_or_default(),
        };
        let discovered = Config::discover_config_files(&start);
        if discovered.is_empty() {
            debug!("no config files discovered for {}", start.display());
        } else {
            for f in &discovered {
                debug!("discovered config file {}", f.display());
            }
        }
        Config::from_discovered_files(&start)
    };

    apply_cli_overrides(&mut config, args);
    debug!("configuration: {config:?}");

    config.validate()?;
    Ok(config)
}

/// Layout options given on the command line win over config files
fn apply_cli_overrides(config: &mut Config, args: &CliArgs) {
    if let Some(unit) = args.indent_unit {
        config.indent_unit = unit;
    }
    if let Some(width) = args.indent_width {
        config.indent_width = width;
    }
    if let Some(width) = args.tab_width {
        config.tab_width = width;
    }
    if let Some(mode) = args.continuation_mode {
        config.continuation_mode = mode;
    }
    if let Some(increment) = args.increment {
        config.increment = increment;
    }
    if let Some(increment) = args.paren_increment {
        config.paren_increment = increment;
    }
}

/// Collect all files to process, handling directories and recursive flag
fn collect_files(args: &CliArgs) -> Vec<PathBuf> {
    let exclude_patterns: Vec<Pattern> = args
        .exclude
        .iter()
        .filter_map(|p| match Pattern::new(p) {
            Ok(pattern) => Some(pattern),
            Err(e) => {
                warn!("ignoring exclude pattern {p:?}: {e}");
                None
            }
        })
        .collect();

    let mut files = Vec::new();

    for input in &args.inputs {
        if input.is_file() {
            if !is_excluded(input, &exclude_patterns) {
                files.push(input.clone());
            }
        } else if input.is_dir() {
            let max_depth = if args.recursive { 256 } else { 1 };
            // WalkDir reports symlink loops as errors, which are skipped
            for entry in WalkDir::new(input)
                .follow_links(true)
                .max_depth(max_depth)
                .into_iter()
                .filter_map(std::result::Result::ok)
            {
                let path = entry.path();
                if path.is_file()
                    && is_source_file(path, &args.extensions)
                    && !is_excluded(path, &exclude_patterns)
                {
                    files.push(path.to_path_buf());
                }
            }
        } else {
            warn!("{} is neither a file nor a directory", input.display());
        }
    }

    files
}

/// Check if a path matches any exclusion pattern
fn is_excluded(path: &Path, patterns: &[Pattern]) -> bool {
    if patterns.is_empty() {
        return false;
    }

    let path_str = path.to_string_lossy();
    patterns.iter().any(|pattern| {
        pattern.matches(&path_str)
            || path
                .file_name()
                .is_some_and(|name| pattern.matches(&name.to_string_lossy()))
            || path.components().any(|component| match component {
                std::path::Component::Normal(c) => pattern.matches(&c.to_string_lossy()),
                _ => false,
            })
    })
}

/// Check the extension against the defaults and any `-x` extras (with or without a dot)
fn is_source_file(path: &Path, extra_extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SOURCE_EXTENSIONS.contains(&ext)
                || extra_extensions
                    .iter()
                    .any(|extra| extra.strip_prefix('.').unwrap_or(extra) == ext)
        })
}

fn config_for(path: &Path, base_config: Option<&Config>, args: &CliArgs) -> Result<Config> {
    match base_config {
        Some(config) => Ok(config.clone()),
        None => build_config(args, Some(path)),
    }
}

/// Process files one after another (stdout output or `--jobs 1`)
fn process_files_sequential(
    files: &[PathBuf],
    base_config: Option<&Config>,
    args: &CliArgs,
) -> bool {
    let mut all_ok = true;
    for path in files {
        let result = config_for(path, base_config, args)
            .and_then(|config| process_single_file(path, &config, args));
        match result {
            Ok(Outcome::NonConforming) => all_ok = false,
            Ok(_) => {}
            Err(e) => {
                all_ok = false;
                error!("{}: {e:#}", path.display());
            }
        }
    }
    all_ok
}

/// Process files in parallel using Rayon
fn process_files_parallel(
    files: &[PathBuf],
    base_config: Option<&Config>,
    args: &CliArgs,
) -> bool {
    let success_count = AtomicUsize::new(0);
    let failing_count = AtomicUsize::new(0);
    let error_count = AtomicUsize::new(0);

    files.par_iter().for_each(|path| {
        let result = config_for(path, base_config, args)
            .and_then(|config| process_single_file(path, &config, args));
        match result {
            Ok(Outcome::NonConforming) => {
                failing_count.fetch_add(1, Ordering::Relaxed);
            }
            Ok(_) => {
                success_count.fetch_add(1, Ordering::Relaxed);
            }
            Err(e) => {
                error_count.fetch_add(1, Ordering::Relaxed);
                error!("{}: {e:#}", path.display());
            }
        }
    });

    let success = success_count.load(Ordering::Relaxed);
    let failing = failing_count.load(Ordering::Relaxed);
    let errors = error_count.load(Ordering::Relaxed);

    if !args.silent {
        let verb = if args.check { "Checked" } else { "Fixed" };
        eprintln!(
            "{verb} {} files: {failing} non-conforming, {errors} errors.",
            success + failing + errors
        );
    }
    failing == 0 && errors == 0
}

/// Apply the first in-file directive to a per-input copy of the config
fn apply_directive_overrides(
    config: &mut Config,
    contents: &[u8],
    source_name: &str,
) -> Result<()> {
    let text = std::str::from_utf8(contents)?;
    let rules = RuleTable::from_config(config)?;
    if let Some(overrides) = find_directive(text, &rules) {
        debug!("{source_name}: directive overrides {overrides:?}");
        overrides.apply(config);
        config.validate()?;
    }
    Ok(())
}

/// Render diagnostics as `name:line:col: severity: message` lines
fn render_report(source_name: &str, report: &CheckReport) -> String {
    let mut rendered = String::new();
    for diagnostic in &report.diagnostics {
        let _ = writeln!(rendered, "{source_name}:{diagnostic}");
    }
    rendered
}

/// Check or fix one input held in memory
fn process_contents(
    contents: &[u8],
    config: &Config,
    args: &CliArgs,
    source_name: &str,
) -> Result<(Outcome, Option<Vec<u8>>)> {
    let mut file_config = config.clone();
    apply_directive_overrides(&mut file_config, contents, source_name)?;

    if args.check {
        let text = std::str::from_utf8(contents)?;
        let report = check(text, &file_config)?;
        debug!(
            "{source_name}: {} errors, {} warnings",
            report.errors().count(),
            report.warnings().count()
        );
        if !args.silent {
            io::stdout()
                .lock()
                .write_all(render_report(source_name, &report).as_bytes())?;
        }
        let outcome = if report.conforms {
            Outcome::Conforming
        } else {
            Outcome::NonConforming
        };
        return Ok((outcome, None));
    }

    let mut output = Vec::new();
    let reader = BufReader::new(Cursor::new(contents));
    let report = format_file(reader, &mut output, &file_config)?;
    for warning in report.warnings() {
        warn!("{source_name}:{warning}");
    }
    Ok((Outcome::Conforming, Some(output)))
}

/// Process a single file
fn process_single_file(path: &Path, config: &Config, args: &CliArgs) -> Result<Outcome> {
    let file_size = std::fs::metadata(path)?.len();
    if file_size > DEFAULT_MAX_FILE_SIZE {
        if !args.silent {
            eprintln!(
                "Skipping {} ({} MB exceeds limit of {} MB)",
                path.display(),
                file_size / (1024 * 1024),
                DEFAULT_MAX_FILE_SIZE / (1024 * 1024)
            );
        }
        return Ok(Outcome::Skipped);
    }

    let mut file_contents = Vec::new();
    File::open(path)?.read_to_end(&mut file_contents)?;
    info!("processing {}", path.display());

    let source_name = path.display().to_string();
    let (outcome, output) = process_contents(&file_contents, config, args, &source_name)?;

    if let Some(output) = output {
        if args.stdout {
            io::stdout().write_all(&output)?;
        } else if output == file_contents {
            debug!("{source_name}: already conforming");
        } else {
            std::fs::write(path, &output)?;
        }
    }

    Ok(outcome)
}

/// Process input from stdin; fixed output always goes to stdout
fn process_stdin(config: &Config, args: &CliArgs) -> Result<Outcome> {
    let mut stdin_contents = Vec::new();
    io::stdin().read_to_end(&mut stdin_contents)?;

    #[allow(clippy::cast_possible_truncation)]
    let stdin_size = stdin_contents.len() as u64;
    if stdin_size > DEFAULT_MAX_FILE_SIZE {
        anyhow::bail!(
            "stdin input too large ({} MB exceeds limit of {} MB)",
            stdin_size / (1024 * 1024),
            DEFAULT_MAX_FILE_SIZE / (1024 * 1024)
        );
    }

    let (outcome, output) = process_contents(&stdin_contents, config, args, "<stdin>")?;
    if let Some(output) = output {
        io::stdout().write_all(&output)?;
    }
    Ok(outcome)
}

fn print_usage() {
    println!(
        "sindent v{} - structural indentation checker and fixer",
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("Usage:");
    println!("  sindent [OPTIONS] <FILE>...");
    println!("  sindent [OPTIONS] -r <DIRECTORY>");
    println!("  sindent [OPTIONS] -              # Read from stdin");
    println!();
    println!("Examples:");
    println!("  sindent --check src/Main.java    # Report misindented lines, exit 1 if any");
    println!("  sindent -r src/                  # Fix every .java file in place");
    println!("  sindent --stdout Main.java       # Print the fixed file");
    println!("  sindent --continuation increment --increment 1 Main.java");
    println!();
    println!("Run `sindent --help` for all options.");
    println!();
    println!("Config file auto-discovery:");
    println!("  Searches for sindent.toml and .sindent.toml in parent directories");
    println!("  starting from the file being processed, plus the home directory.");
    println!("  Closer files override farther ones; CLI options and in-file");
    println!("  `// sindent: ...` directives override both.");
}

#[cfg(test)]
mod tests {
    use super::*;
    use sindent::parse_args_from;

    #[test]
    fn test_is_source_file() {
        assert!(is_source_file(Path::new("src/Main.java"), &[]));
        assert!(!is_source_file(Path::new("build.gradle"), &[]));
        assert!(is_source_file(
            Path::new("build.gradle"),
            &[".gradle".to_string()]
        ));
        assert!(!is_source_file(Path::new("README"), &["java".to_string()]));
    }

    #[test]
    fn test_is_excluded() {
        let patterns = vec![
            Pattern::new("generated").unwrap(),
            Pattern::new("*Test.java").unwrap(),
        ];
        assert!(is_excluded(Path::new("src/generated/A.java"), &patterns));
        assert!(is_excluded(Path::new("src/FooTest.java"), &patterns));
        assert!(!is_excluded(Path::new("src/Foo.java"), &patterns));
        assert!(!is_excluded(Path::new("src/Foo.java"), &[]));
    }

    #[test]
    fn test_cli_overrides_config() {
        let args =
            parse_args_from(vec!["sindent", "-i", "2", "--tabs", "--paren-increment", "1"]);
        let mut config = Config::default();
        apply_cli_overrides(&mut config, &args);
        assert_eq!(config.indent_width, 2);
        assert_eq!(config.indent_unit, sindent::config::IndentUnit::Tabs);
        assert_eq!(config.paren_increment, 1);
        assert_eq!(config.tab_width, 4);
    }

    #[test]
    fn test_directive_applies_per_input() {
        let mut config = Config::default();
        apply_directive_overrides(&mut config, b"// sindent: -i 3\nclass A {}\n", "t").unwrap();
        assert_eq!(config.indent_width, 3);
    }

    #[test]
    fn test_invalid_directive_value_is_an_error() {
        let mut config = Config::default();
        let result = apply_directive_overrides(&mut config, b"// sindent: -i 0\n", "t");
        assert!(result.is_err());
    }

    #[test]
    fn test_check_mode_reports_and_fails() {
        let args = parse_args_from(vec!["sindent", "--check", "-S"]);
        let input = b"class A {\n  int x;\n}\n";
        let (outcome, output) =
            process_contents(input, &Config::default(), &args, "A.java").unwrap();
        assert_eq!(outcome, Outcome::NonConforming);
        assert!(output.is_none());
    }

    #[test]
    fn test_fix_mode_rewrites() {
        let args = parse_args_from(vec!["sindent", "-S"]);
        let input = b"class A {\n  int x;\n}\n";
        let (outcome, output) =
            process_contents(input, &Config::default(), &args, "A.java").unwrap();
        assert_eq!(outcome, Outcome::Conforming);
        assert_eq!(output.unwrap(), b"class A {\n    int x;\n}\n");
    }

    #[test]
    fn test_render_report() {
        let report = check("class A {\n  int x;\n}\n", &Config::default()).unwrap();
        assert_eq!(
            render_report("A.java", &report),
            "A.java:2:3: error: expected indentation of 4, found 2\n"
        );
    }
}
