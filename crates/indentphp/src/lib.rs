//! # indentphp
//!
//! Reformats PHP embedded in HTML into one canonical layout: braces on their
//! own lines, one indent unit per nesting level, normalized spacing inside
//! expressions and declarations. HTML outside the PHP tags passes through
//! untouched.
//!
//! Only a small subset of PHP is understood (declarations, blocks, `if`/`else`,
//! `return;` and a handful of expressions). Anything else is a syntax error
//! and produces no output.
//!
//! ```
//! let out = indentphp::format("<?php\nfunction foo(){\n}\n").unwrap();
//! assert_eq!(out, "<?php\nfunction foo()\n{\n}\n?>\n");
//! ```

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use indentphp_ast::File;
use indentphp_lexer::{Lexer, TokenKind};
use indentphp_parser::ParseError;
use indentphp_printer::{print_file, IndentContext};
use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum FormatError {
    #[error("input is empty")]
    #[diagnostic(code(indentphp::empty_input))]
    EmptyInput,

    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(#[from] ParseError),

    #[error("cannot access {}", path.display())]
    #[diagnostic(code(indentphp::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot serialize the syntax tree")]
    #[diagnostic(code(indentphp::serialize))]
    Serialize(#[from] serde_json::Error),
}

impl FormatError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        FormatError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Layout settings for one formatting run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOptions {
    /// Emitted once per nesting level.
    pub indent: String,
}

impl FormatOptions {
    pub fn spaces(width: usize) -> Self {
        Self {
            indent: " ".repeat(width),
        }
    }

    pub fn tabs() -> Self {
        Self {
            indent: "\t".to_string(),
        }
    }
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            indent: IndentContext::DEFAULT_UNIT.to_string(),
        }
    }
}

/// How the bytes of a file were turned into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceEncoding {
    Utf8,
    /// Fallback for bytes that are not UTF-8: each byte is read as the char
    /// with the same value, so every byte survives [`encode`] unchanged.
    Latin1,
}

/// Decode file contents, falling back to [`SourceEncoding::Latin1`] when the
/// bytes are not valid UTF-8.
pub fn decode(bytes: &[u8]) -> (String, SourceEncoding) {
    match std::str::from_utf8(bytes) {
        Ok(text) => (text.to_string(), SourceEncoding::Utf8),
        Err(err) => {
            tracing::debug!(
                valid_up_to = err.valid_up_to(),
                "input is not UTF-8, reading it as Latin-1"
            );
            let text = bytes.iter().copied().map(char::from).collect();
            (text, SourceEncoding::Latin1)
        }
    }
}

/// Turn formatted text back into bytes in the encoding it was decoded from.
pub fn encode(text: &str, encoding: SourceEncoding) -> Vec<u8> {
    match encoding {
        SourceEncoding::Utf8 => text.as_bytes().to_vec(),
        // Output only holds source text and ASCII, so every char fits a byte.
        SourceEncoding::Latin1 => text
            .chars()
            .map(|c| u8::try_from(c).unwrap_or(b'?'))
            .collect(),
    }
}

/// Format a whole file's text.
///
/// Every call builds its own scanner, parser and indent context, so calls
/// are independent of each other.
pub fn format_source(source: &str, options: &FormatOptions) -> Result<String, FormatError> {
    if source.is_empty() {
        return Err(FormatError::EmptyInput);
    }
    let file = parse_source(source)?;
    let mut ctx = IndentContext::with_unit(options.indent.as_str());
    let out = print_file(&file, &mut ctx);
    tracing::debug!(
        input_bytes = source.len(),
        output_bytes = out.len(),
        "formatted source"
    );
    Ok(out)
}

/// [`format_source`] with the default four-space indent.
pub fn format(source: &str) -> Result<String, FormatError> {
    format_source(source, &FormatOptions::default())
}

/// Format raw file contents. Bytes outside the PHP tags come back exactly
/// as they went in, whatever their encoding.
pub fn format_bytes(bytes: &[u8], options: &FormatOptions) -> Result<Vec<u8>, FormatError> {
    let (source, encoding) = decode(bytes);
    let formatted = format_source(&source, options)?;
    Ok(encode(&formatted, encoding))
}

/// Format `input` into `output`.
///
/// An empty input produces an empty output file. On a syntax error nothing is
/// written and `output` is left as it was.
pub fn indent_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    options: &FormatOptions,
) -> Result<(), FormatError> {
    let input = input.as_ref();
    let bytes = std::fs::read(input).map_err(|e| FormatError::io(input, e))?;
    write_formatted(&bytes, output.as_ref(), options)
}

/// [`indent_file`] for contents that have already been read.
pub fn write_formatted(
    bytes: &[u8],
    output: &Path,
    options: &FormatOptions,
) -> Result<(), FormatError> {
    let formatted = if bytes.is_empty() {
        Vec::new()
    } else {
        format_bytes(bytes, options)?
    };

    std::fs::write(output, formatted).map_err(|e| FormatError::io(output, e))?;
    tracing::debug!(output = %output.display(), "wrote formatted file");
    Ok(())
}

/// The raw token stream, one `LINE KIND "LITERAL"` line per token. The parser
/// is not run.
pub fn dump_tokens(source: &str) -> String {
    let mut lexer = Lexer::new(source);
    let mut out = String::new();
    loop {
        let token = lexer.next_token();
        if token.kind == TokenKind::Eof {
            break;
        }
        let text = lexer.token_text(&token);
        // Writing to a String cannot fail.
        let _ = writeln!(out, "{} {:?} {:?}", token.line(), token.kind, text);
    }
    out
}

/// The parsed tree as pretty-printed JSON.
pub fn dump_ast(source: &str) -> Result<String, FormatError> {
    let file = parse_source(source)?;
    Ok(serde_json::to_string_pretty(&file)?)
}

fn parse_source(source: &str) -> Result<File, ParseError> {
    let result = indentphp_parser::parse(source);
    if !result.lexer_errors.is_empty() {
        tracing::debug!(
            skipped = result.lexer_errors.len(),
            "scanner skipped unrecognised characters"
        );
    }
    result.file
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_constructors() {
        assert_eq!(FormatOptions::default().indent, "    ");
        assert_eq!(FormatOptions::spaces(2).indent, "  ");
        assert_eq!(FormatOptions::tabs().indent, "\t");
    }

    #[test]
    fn test_empty_input_rejected() {
        assert!(matches!(format(""), Err(FormatError::EmptyInput)));
    }

    #[test]
    fn test_syntax_error_is_transparent() {
        let err = format("<?php\n{\n").unwrap_err();
        assert_eq!(err.to_string(), "line 3: expected '}', found end of file");
        assert_eq!(
            err.code().map(|c| c.to_string()).as_deref(),
            Some("indentphp::syntax")
        );
    }

    #[test]
    fn test_two_space_indent() {
        let out = format_source("<?php { ; }", &FormatOptions::spaces(2)).unwrap();
        assert_eq!(out, "<?php\n{\n  ;\n}\n?>\n");
    }

    #[test]
    fn test_dump_tokens_lines() {
        let dump = dump_tokens("a\n<?php $x;");
        assert_eq!(
            dump,
            "1 HtmlChar \"a\"\n\
             1 HtmlChar \"\\n\"\n\
             2 OpenTag \"<?php\"\n\
             2 Space \" \"\n\
             2 Variable \"$x\"\n\
             2 Semicolon \";\"\n"
        );
    }

    #[test]
    fn test_dump_ast_is_json() {
        let json = dump_ast("<?php return;").unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(
            value["parts"][0]["Script"]["stmts"][0]["kind"],
            serde_json::Value::String("Return".to_string())
        );
    }

    #[test]
    fn test_utf8_decodes_as_is() {
        let (text, encoding) = decode("<p>café</p>".as_bytes());
        assert_eq!(text, "<p>café</p>");
        assert_eq!(encoding, SourceEncoding::Utf8);
    }

    #[test]
    fn test_latin1_bytes_round_trip() {
        let bytes: Vec<u8> = (0..=255).collect();
        let (text, encoding) = decode(&bytes);
        assert_eq!(encoding, SourceEncoding::Latin1);
        assert_eq!(text.chars().count(), 256);
        assert_eq!(encode(&text, encoding), bytes);
    }

    #[test]
    fn test_format_bytes_keeps_html_bytes() {
        let out = format_bytes(b"<p>caf\xe9</p>\n<?php ; ?>\n", &FormatOptions::default()).unwrap();
        assert_eq!(out, b"<p>caf\xe9</p>\n<?php\n;\n?>\n");
    }

    #[test]
    fn test_dump_ast_reports_syntax_errors() {
        assert!(matches!(dump_ast("<?php }"), Err(FormatError::Syntax(_))));
    }
}
