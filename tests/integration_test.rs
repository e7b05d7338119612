//! Integration tests for sindent
//!
//! These tests verify that the tokenizer, classifier, indenter and pipeline
//! work together on small but complete sources.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]

use sindent::parser::{classify, split_lines};
use sindent::process::analyze;
use sindent::{
    check, find_directive, fix, parse_directive, Config, ConfigError, ContinuationMode,
    DiagnosticKind, IndentUnit, RuleTable, Severity,
};

fn expected_indents(source: &str, config: &Config) -> Vec<Option<usize>> {
    check(source, config).unwrap().expected_indents
}

// ============================================================================
// Declaration headers
// ============================================================================

const HEADER: &str = "@Annotation
class MyClass
    implements interfaceX,
               interfaceY
    extends Y {
";

#[test]
fn test_header_align_mode() {
    assert_eq!(
        expected_indents(HEADER, &Config::default()),
        vec![Some(0), Some(0), Some(4), Some(15), Some(4)]
    );
}

#[test]
fn test_header_increment_mode() {
    let config = Config {
        continuation_mode: ContinuationMode::Increment,
        ..Default::default()
    };
    assert_eq!(
        expected_indents(HEADER, &config),
        vec![Some(0), Some(0), Some(4), Some(4), Some(4)]
    );
}

#[test]
fn test_header_increment_of_two_units() {
    let config = Config {
        continuation_mode: ContinuationMode::Increment,
        increment: 2,
        ..Default::default()
    };
    assert_eq!(
        expected_indents(HEADER, &config),
        vec![Some(0), Some(0), Some(4), Some(8), Some(4)]
    );
}

#[test]
fn test_header_only_reports_open_brace() {
    // The class body is never closed: a warning, not a failure
    let report = check(HEADER, &Config::default()).unwrap();
    assert!(report.conforms);
    assert_eq!(report.diagnostics.len(), 1);
    assert_eq!(report.diagnostics[0].kind, DiagnosticKind::UnterminatedStructure);
    assert_eq!(report.diagnostics[0].severity, Severity::Warning);
    assert_eq!(report.diagnostics[0].line, 5);
}

// ============================================================================
// Methods
// ============================================================================

#[test]
fn test_wrapped_parameters_and_throws() {
    let source = "class A {
    public int test(
            int a,
            int b
    )
        throws AnException,
               AnotherException
    {
        run();
    }
}
";
    assert_eq!(
        expected_indents(source, &Config::default()),
        vec![
            Some(0),
            Some(4),
            Some(12),
            Some(12),
            Some(4),
            Some(8),
            Some(15),
            Some(4),
            Some(8),
            Some(4),
            Some(0)
        ]
    );
    assert!(check(source, &Config::default()).unwrap().conforms);
}

#[test]
fn test_paren_increment_of_one_unit() {
    let config = Config {
        paren_increment: 1,
        ..Default::default()
    };
    let fixed = fix("void f(\nint a,\nint b) {\n}\n", &config).unwrap();
    assert_eq!(fixed, "void f(\n    int a,\n    int b) {\n}\n");
}

#[test]
fn test_call_arguments_align_under_first_argument() {
    let fixed = fix(
        "class A {\nvoid f() {\nresult = compute(first,\nsecond);\n}\n}\n",
        &Config::default(),
    )
    .unwrap();
    assert_eq!(
        fixed,
        "class A {\n    void f() {\n        result = compute(first,\n                         second);\n    }\n}\n"
    );
}

#[test]
fn test_wrapped_statement_is_continuation() {
    let rules = RuleTable::default();
    let analysis = analyze("class A {\n    int x =\n        1;\n}\n", &rules);
    let continuation: Vec<bool> = analysis.lines.iter().map(|l| l.is_continuation).collect();
    assert_eq!(continuation, vec![false, false, true, false]);
}

#[test]
fn test_enum_constants_stay_at_body_level() {
    let source = "enum E {\n    A,\n    B,\n    C\n}\n";
    assert_eq!(fix(source, &Config::default()).unwrap(), source);
    assert!(check(source, &Config::default()).unwrap().conforms);
}

#[test]
fn test_array_initializer_items_align() {
    let source = "class A {\n    int[] a = {\n        1,\n        2\n    };\n}\n";
    assert_eq!(
        expected_indents(source, &Config::default()),
        vec![Some(0), Some(4), Some(8), Some(8), Some(4), Some(0)]
    );
    assert_eq!(fix(source, &Config::default()).unwrap(), source);
}

#[test]
fn test_generic_bound_wraps_as_statement() {
    let source = "class A {\n    List<? extends Foo> list =\n        new ArrayList<>();\n}\n";
    assert_eq!(
        expected_indents(source, &Config::default()),
        vec![Some(0), Some(4), Some(8), Some(0)]
    );
}

// ============================================================================
// Comments and literals
// ============================================================================

#[test]
fn test_text_block_contents_are_literal() {
    let source = "class A {
    void f() {
        String s = \"\"\"
            { ( [
          }
            \"\"\";
        int y;
    }
}
";
    let report = check(source, &Config::default()).unwrap();
    assert!(report.diagnostics.is_empty(), "{:?}", report.diagnostics);
    assert_eq!(
        report.expected_indents,
        vec![
            Some(0),
            Some(4),
            Some(8),
            None,
            None,
            None,
            Some(8),
            Some(4),
            Some(0)
        ]
    );
    assert_eq!(fix(source, &Config::default()).unwrap(), source);
}

#[test]
fn test_unterminated_text_block() {
    let report = check("class A {\n    String s = \"\"\"\n}\n", &Config::default()).unwrap();
    let lex: Vec<_> = report
        .diagnostics
        .iter()
        .filter(|d| d.kind == DiagnosticKind::Lex)
        .map(|d| (d.line, d.column))
        .collect();
    assert_eq!(lex, vec![(2, 16)]);
}

#[test]
fn test_unterminated_block_comment() {
    let source = "class A {\n    int x;\n    /* open\n  * star\nfree\n";
    let report = check(source, &Config::default()).unwrap();

    assert_eq!(
        report.expected_indents,
        vec![Some(0), Some(4), Some(4), None, None]
    );
    let lex: Vec<_> = report
        .diagnostics
        .iter()
        .filter(|d| d.kind == DiagnosticKind::Lex)
        .collect();
    assert_eq!(lex.len(), 1);
    assert_eq!((lex[0].line, lex[0].column), (3, 5));
    assert!(report.errors().next().is_none());
}

#[test]
fn test_comment_contents_are_not_structural() {
    let source = "class A {\n    // }\n    /* ( [\n     */\n    int x;\n}\n";
    let report = check(source, &Config::default()).unwrap();
    assert!(report.diagnostics.is_empty(), "{:?}", report.diagnostics);
}

#[test]
fn test_free_form_comment_body_is_exempt() {
    let source = "class A {\n    /*\n  free form\n     * star\n     */\n}\n";
    assert_eq!(
        expected_indents(source, &Config::default()),
        vec![Some(0), Some(4), None, Some(5), Some(5), Some(0)]
    );
}

#[test]
fn test_strings_do_not_open_contexts() {
    let source = "class A {\n    String s = \"{ ( [\";\n    char c = '}';\n}\n";
    let report = check(source, &Config::default()).unwrap();
    assert!(report.diagnostics.is_empty(), "{:?}", report.diagnostics);
}

// ============================================================================
// Structure problems
// ============================================================================

#[test]
fn test_bracket_kind_mismatch_is_reported() {
    let source = "void f() {\n    call(a, b];\n}\n";
    let report = check(source, &Config::default()).unwrap();
    let structural: Vec<_> = report
        .diagnostics
        .iter()
        .filter(|d| d.kind == DiagnosticKind::StructuralMismatch)
        .map(|d| d.line)
        .collect();
    // `]` has no opener; `}` then closes over the still open `(`
    assert_eq!(structural, vec![2, 3]);
    assert!(report.conforms);
    assert_eq!(report.expected_indents, vec![Some(0), Some(4), Some(0)]);
}

#[test]
fn test_unterminated_structure_position() {
    let report = check("class A {\n    void f() {\n    }\n", &Config::default()).unwrap();
    let open: Vec<_> = report
        .diagnostics
        .iter()
        .filter(|d| d.kind == DiagnosticKind::UnterminatedStructure)
        .map(|d| (d.line, d.column))
        .collect();
    assert_eq!(open, vec![(1, 9)]);
}

// ============================================================================
// Rendering and configuration
// ============================================================================

#[test]
fn test_diagnostic_rendering() {
    let report = check("class A {\n  int x;\n}\n", &Config::default()).unwrap();
    let rendered: Vec<String> = report.diagnostics.iter().map(ToString::to_string).collect();
    assert_eq!(rendered, vec!["2:3: error: expected indentation of 4, found 2"]);
}

#[test]
fn test_tabs_rendering() {
    let config = Config {
        indent_unit: IndentUnit::Tabs,
        tab_width: 4,
        ..Default::default()
    };
    let fixed = fix(
        "class A {\n    void f() {\n        x();\n    }\n}\n",
        &config,
    )
    .unwrap();
    assert_eq!(fixed, "class A {\n\tvoid f() {\n\t\tx();\n\t}\n}\n");
}

#[test]
fn test_tab_width_measures_actual_indent() {
    let config = Config {
        tab_width: 8,
        ..Default::default()
    };
    let report = check("class A {\n\tint x;\n}\n", &config).unwrap();
    assert_eq!(report.diagnostics[0].actual_indent, Some(8));
    assert_eq!(report.diagnostics[0].expected_indent, Some(4));
}

#[test]
fn test_invalid_config_is_rejected_before_analysis() {
    let config = Config {
        bracket_pairs: vec![("<".to_string(), ">".to_string())],
        ..Default::default()
    };
    assert!(matches!(
        check("class A {}\n", &config),
        Err(ConfigError::UnknownBracketPair { .. })
    ));
}

#[test]
fn test_comment_marker_with_newline_is_rejected() {
    let mut config = Config::default();
    config.comment_markers.block_end = "*\n".to_string();
    assert!(matches!(
        check("class A {\n/* x *\nint y;\n}\n", &config),
        Err(ConfigError::WhitespaceInCommentMarker { name: "block_end", .. })
    ));
}

#[test]
fn test_custom_comment_markers() {
    let mut config = Config::default();
    config.comment_markers.line_start = "#".to_string();
    let report = check("class A {\n    # }\n}\n", &config).unwrap();
    assert!(report.diagnostics.is_empty(), "{:?}", report.diagnostics);
}

#[test]
fn test_directive_overrides_config() {
    let source = "// sindent: --indent-width 2\nclass A {\n  int x;\n}\n";
    let overrides = find_directive(source, &RuleTable::default()).unwrap();
    let mut config = Config::default();
    overrides.apply(&mut config);
    assert!(check(source, &config).unwrap().conforms);
    assert!(!check(source, &Config::default()).unwrap().conforms);
}

#[test]
fn test_parse_directive_tabs() {
    let overrides = parse_directive("// sindent: --tabs --tab-width 2", "//").unwrap();
    assert_eq!(overrides.indent_unit, Some(IndentUnit::Tabs));
    assert_eq!(overrides.tab_width, Some(2));
}

#[test]
fn test_discovered_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("src");
    std::fs::create_dir(&nested).unwrap();
    std::fs::write(
        dir.path().join("sindent.toml"),
        "indent_width = 2\ncontinuation_mode = \"increment\"\n",
    )
    .unwrap();
    std::fs::write(nested.join(".sindent.toml"), "increment = 3\n").unwrap();
    let file = nested.join("A.java");
    std::fs::write(&file, "class A {}\n").unwrap();

    let config = Config::from_discovered_files(&file);
    assert_eq!(config.indent_width, 2);
    assert_eq!(config.continuation_mode, ContinuationMode::Increment);
    assert_eq!(config.increment, 3);
}

#[test]
fn test_explicit_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("custom.toml");
    std::fs::write(&path, "indent_unit = \"tabs\"\ntab_width = 2\n").unwrap();
    let config = Config::from_toml_file(&path).unwrap();
    assert_eq!(config.indent_unit, IndentUnit::Tabs);
    assert_eq!(config.tab_width, 2);
    assert_eq!(config.indent_width, 4);
}

// ============================================================================
// Lower layers
// ============================================================================

#[test]
fn test_classified_lines_follow_physical_lines() {
    let rules = RuleTable::default();
    let source = "a {\n\n  /* x\n  */ b;\n}";
    let classified = classify(source, &rules);
    let numbers: Vec<usize> = classified.lines.iter().map(|l| l.line).collect();
    let physical: Vec<usize> = split_lines(source).map(|l| l.number).collect();
    assert!(numbers.iter().all(|n| physical.contains(n)));
    assert_eq!(physical, vec![1, 2, 3, 4, 5]);
    assert!(classified.lex_errors.is_empty());
}
