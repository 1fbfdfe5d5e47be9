use std::path::PathBuf;

use indentphp::{dump_tokens, format, format_bytes, indent_file, FormatError, FormatOptions};

/// Each input must format to its expected file, and the expected file must
/// already be in canonical form.
macro_rules! fixture_test {
    ($name:ident, $file:expr) => {
        #[test]
        fn $name() {
            let input = include_str!(concat!("fixtures/input/", $file));
            let expected = include_str!(concat!("fixtures/expected/", $file));
            let output = format(input).unwrap_or_else(|e| panic!("{}: {e}", $file));
            assert_eq!(output, expected, "{} did not format as expected", $file);
            let again = format(expected).unwrap_or_else(|e| panic!("{}: {e}", $file));
            assert_eq!(again, expected, "{} is not stable", $file);
        }
    };
}

fixture_test!(test_function, "001-function.php");
fixture_test!(test_html, "002-html.php");
fixture_test!(test_class, "003-class.php");
fixture_test!(test_nested_if, "004-nested-if.php");

#[test]
fn test_latin1_html_bytes_pass_through() {
    let input = include_bytes!("fixtures/input/006-latin1.php");
    let expected = include_bytes!("fixtures/expected/006-latin1.php");
    let options = FormatOptions::default();
    assert_eq!(format_bytes(input, &options).unwrap(), expected);
    assert_eq!(format_bytes(expected, &options).unwrap(), expected);
}

fn scratch_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("indentphp-{}-{name}", std::process::id()))
}

fn fixture_path(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(relative)
}

#[test]
fn test_unsupported_statement_reports_line() {
    let input = include_str!("fixtures/input/005-unsupported.php");
    match format(input) {
        Err(FormatError::Syntax(err)) => {
            assert_eq!(err.line(), 3);
            assert_eq!(err.to_string(), "line 3: expected '}', found variable");
        }
        other => panic!("expected a syntax error, got {other:?}"),
    }
}

#[test]
fn test_indent_file_writes_output() {
    let output = scratch_path("001.php");
    indent_file(
        fixture_path("input/001-function.php"),
        &output,
        &FormatOptions::default(),
    )
    .unwrap();
    let written = std::fs::read_to_string(&output).unwrap();
    std::fs::remove_file(&output).unwrap();
    assert_eq!(written, include_str!("fixtures/expected/001-function.php"));
}

#[test]
fn test_indent_file_leaves_output_on_syntax_error() {
    let output = scratch_path("005.php");
    std::fs::write(&output, "untouched").unwrap();
    let result = indent_file(
        fixture_path("input/005-unsupported.php"),
        &output,
        &FormatOptions::default(),
    );
    let contents = std::fs::read_to_string(&output).unwrap();
    std::fs::remove_file(&output).unwrap();
    assert!(matches!(result, Err(FormatError::Syntax(_))));
    assert_eq!(contents, "untouched");
}

#[test]
fn test_indent_file_empty_input_gives_empty_output() {
    let input = scratch_path("empty-in.php");
    let output = scratch_path("empty-out.php");
    std::fs::write(&input, "").unwrap();
    indent_file(&input, &output, &FormatOptions::default()).unwrap();
    let written = std::fs::read_to_string(&output).unwrap();
    std::fs::remove_file(&input).unwrap();
    std::fs::remove_file(&output).unwrap();
    assert_eq!(written, "");
}

#[test]
fn test_indent_file_missing_input() {
    let missing = scratch_path("does-not-exist.php");
    let err = indent_file(&missing, scratch_path("never.php"), &FormatOptions::default())
        .unwrap_err();
    match err {
        FormatError::Io { path, .. } => assert_eq!(path, missing),
        other => panic!("expected an I/O error, got {other:?}"),
    }
}

#[test]
fn test_short_tag_normalized() {
    let output = format("<? ; ?>").unwrap();
    assert!(output.contains("<?php"));
    assert!(!output.replace("<?php", "").contains("<?"));
}

#[test]
fn test_dump_tokens_snapshot() {
    insta::assert_snapshot!("dump_tokens", dump_tokens("<?php\n$a = 'x'\r\n"));
}

#[test]
fn test_indent_file_keeps_latin1_bytes() {
    let output = scratch_path("006.php");
    indent_file(
        fixture_path("input/006-latin1.php"),
        &output,
        &FormatOptions::default(),
    )
    .unwrap();
    let written = std::fs::read(&output).unwrap();
    std::fs::remove_file(&output).unwrap();
    assert_eq!(written, include_bytes!("fixtures/expected/006-latin1.php"));
}

#[test]
fn test_long_sign_chain_formats() {
    let source = format!("<?php function f($a = {}1) {{}}", "-".repeat(2001));
    let out = format(&source).unwrap();
    assert!(out.contains("function f($a = -1)\n"), "{out}");
}

#[test]
fn test_runaway_nesting_is_a_syntax_error() {
    let source = format!("<?php {}{}", "{".repeat(1000), "}".repeat(1000));
    match format(&source) {
        Err(FormatError::Syntax(err)) => {
            assert_eq!(err.to_string(), "line 1: nesting deeper than 128 levels");
        }
        other => panic!("expected a syntax error, got {other:?}"),
    }
}
