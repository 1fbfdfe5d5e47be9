use indentphp_ast::*;
use indentphp_parser::{parse, ParseError};

fn parse_ok(source: &str) -> File {
    let result = parse(source);
    match result.file {
        Ok(file) => file,
        Err(err) => panic!("Expected {source:?} to parse, got: {err}"),
    }
}

fn parse_err(source: &str) -> ParseError {
    match parse(source).file {
        Ok(file) => panic!("Expected a syntax error, got {file:#?}"),
        Err(err) => err,
    }
}

fn to_json(file: &File) -> serde_json::Value {
    serde_json::to_value(file).unwrap()
}

fn only_script(file: &File) -> &Script {
    match &file.parts[..] {
        [FilePart::Script(script)] => script,
        other => panic!("Expected a single script, got {other:#?}"),
    }
}

// =============================================================================
// File structure
// =============================================================================

#[test]
fn test_empty_file() {
    let file = parse_ok("");
    assert!(file.parts.is_empty());
}

#[test]
fn test_html_only() {
    let file = parse_ok("<html>\n</html>\n");
    let json = to_json(&file);
    assert_eq!(json["parts"][0]["Html"], "<html>\n</html>\n");
}

#[test]
fn test_html_and_scripts_interleave() {
    let file = parse_ok("<a><?php ; ?><b><? ; ?>\n");
    let kinds: Vec<_> = file
        .parts
        .iter()
        .map(|part| match part {
            FilePart::Html(text) => format!("html:{text}"),
            FilePart::Script(script) => format!("script:{:?}", script.open_tag),
        })
        .collect();
    assert_eq!(
        kinds,
        vec!["html:<a>", "script:Long", "html:<b>", "script:Short", "html:\n"]
    );
}

#[test]
fn test_short_tag_needs_no_whitespace() {
    let file = parse_ok("<?;?>");
    assert_eq!(only_script(&file).stmts.len(), 1);
}

#[test]
fn test_long_tag_needs_whitespace() {
    let err = parse_err("<?php;?>");
    assert_eq!(err.line(), 1);
    assert_eq!(err.to_string(), "line 1: expected whitespace, found ';'");
}

#[test]
fn test_script_may_run_to_end_of_file() {
    let file = parse_ok("<p>\n<?php\nfunction foo(){\n}\n");
    assert_eq!(file.parts.len(), 2);
    let FilePart::Script(script) = &file.parts[1] else {
        panic!("expected script");
    };
    assert!(!script.closed);
}

#[test]
fn test_empty_script() {
    let file = parse_ok("<?php ?>");
    let script = only_script(&file);
    assert!(script.stmts.is_empty());
    assert!(script.closed);
}

// =============================================================================
// Statements
// =============================================================================

#[test]
fn test_statement_kinds() {
    let file = parse_ok("<?php\n;\nreturn ;\n{ ; }\nif ($a) ;\n?>");
    let kinds: Vec<_> = only_script(&file)
        .stmts
        .iter()
        .map(|stmt| match stmt.kind {
            StmtKind::Nop => "nop",
            StmtKind::Return => "return",
            StmtKind::Block(_) => "block",
            StmtKind::If(_) => "if",
            StmtKind::Function(_) => "function",
            StmtKind::Class(_) => "class",
        })
        .collect();
    assert_eq!(kinds, vec!["nop", "return", "block", "if"]);
}

#[test]
fn test_keywords_are_case_insensitive() {
    let file = parse_ok("<?php IF ($a) RETURN; ELSE Return;");
    let StmtKind::If(ref stmt) = only_script(&file).stmts[0].kind else {
        panic!("expected if");
    };
    assert!(stmt.else_branch.is_some());
}

#[test]
fn test_statement_spans_and_lines() {
    let file = parse_ok("<?php\n\nreturn;\n");
    let stmt = &only_script(&file).stmts[0];
    assert_eq!(stmt.span.line, 3);
    assert_eq!(stmt.span.text("<?php\n\nreturn;\n"), "return;");
}

#[test]
fn test_function_with_defaults_serializes() {
    let file = parse_ok("<?php function f($a = array(1 => -2), $b = PHP_EOL) {}");
    let json = to_json(&file);
    let params = &json["parts"][0]["Script"]["stmts"][0]["kind"]["Function"]["params"];
    assert_eq!(params[0]["name"], "$a");
    let element = &params[0]["default"]["kind"]["Array"][0];
    assert_eq!(element["key"]["kind"]["Literal"], "1");
    assert_eq!(element["value"]["negated"], true);
    assert_eq!(params[1]["default"]["kind"]["Constant"], "PHP_EOL");
}

#[test]
fn test_class_with_all_member_kinds() {
    let source = "<?php\nfinal class Foo extends Bar implements Baz {\n    const A = 1;\n    private $x = Foo::A;\n    public function &get(array $opts) { return; }\n}\n";
    let file = parse_ok(source);
    let StmtKind::Class(ref class) = only_script(&file).stmts[0].kind else {
        panic!("expected class");
    };
    assert_eq!(class.name, "Foo");
    assert_eq!(class.modifier, Some(ClassModifier::Final));
    assert_eq!(class.members.len(), 3);
    let ClassMemberKind::Method(ref method) = class.members[2].kind else {
        panic!("expected method");
    };
    assert!(method.by_ref);
    assert_eq!(method.name, "get");
    assert_eq!(method.body.as_ref().map(Vec::len), Some(1));
}

// =============================================================================
// Syntax errors
// =============================================================================

#[test]
fn test_missing_closing_brace_reports_end_of_file() {
    let err = parse_err("<?php\nfunction foo(){\n");
    assert_eq!(err.to_string(), "line 3: expected '}', found end of file");
}

#[test]
fn test_unsupported_statement_line() {
    let err = parse_err("<?php\n;\n\n$x = 1;\n?>");
    assert_eq!(err.line(), 4);
    assert!(matches!(err, ParseError::Unexpected { .. }));
}

#[test]
fn test_stray_closing_brace() {
    let err = parse_err("<?php\n}\n");
    assert_eq!(err.to_string(), "line 2: unexpected '}'");
}

#[test]
fn test_else_without_if() {
    let err = parse_err("<?php else ;");
    assert_eq!(err.to_string(), "line 1: unexpected 'else'");
}

#[test]
fn test_reference_marker_must_touch_name() {
    let err = parse_err("<?php function f(& $a) {}");
    assert_eq!(err.to_string(), "line 1: expected variable, found space");
}

#[test]
fn test_lexer_errors_are_reported_alongside() {
    let result = parse("<?php @;");
    assert!(result.file.is_ok());
    assert_eq!(result.lexer_errors.len(), 1);
    assert_eq!(result.lexer_errors[0].line, 1);
}

// =============================================================================
// Nesting limits
// =============================================================================

#[test]
fn test_long_negation_chain_in_default() {
    let source = format!("<?php function f($a = {}1) {{}}", "-".repeat(2000));
    let file = parse_ok(&source);
    let StmtKind::Function(func) = &only_script(&file).stmts[0].kind else {
        panic!("expected a function");
    };
    let default = func.params[0].default.as_ref().unwrap();
    assert!(!default.negated);
    assert!(matches!(default.kind, ScalarKind::Literal(ref t) if t == "1"));
}

#[test]
fn test_blocks_nest_up_to_limit() {
    let source = format!("<?php\n{}{}", "{\n".repeat(128), "}\n".repeat(128));
    let file = parse_ok(&source);
    assert_eq!(only_script(&file).stmts.len(), 1);
}

#[test]
fn test_deeper_blocks_report_line() {
    let source = format!("<?php\n{}{}", "{\n".repeat(129), "}\n".repeat(129));
    let err = parse_err(&source);
    assert_eq!(err.to_string(), "line 130: nesting deeper than 128 levels");
}

#[test]
fn test_runaway_nesting_is_an_error() {
    let source = format!("<?php {}{}", "{".repeat(1000), "}".repeat(1000));
    assert!(matches!(parse_err(&source), ParseError::TooDeep { .. }));

    let source = format!("<?php {} ;", "if ($a) ".repeat(1000));
    assert!(matches!(parse_err(&source), ParseError::TooDeep { .. }));
}

// =============================================================================
// Reserved words
// =============================================================================

#[test]
fn test_reserved_words_are_not_constant_names() {
    // Reserved words match in any case, so they cannot name a class constant
    // or stand alone as a constant value.
    let err = parse_err("<?php function f($a = Foo::CLASS) {}");
    assert_eq!(err.to_string(), "line 1: expected identifier, found 'class'");

    let err = parse_err("<?php function f($a = Empty) {}");
    assert_eq!(err.to_string(), "line 1: expected static value, found 'empty'");

    let file = parse_ok("<?php function f($a = Foo::KLASS) {}");
    assert_eq!(only_script(&file).stmts.len(), 1);
}
