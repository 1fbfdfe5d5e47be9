pub mod diagnostics;
pub mod expr;
pub mod parser;
pub mod stmt;

pub use diagnostics::ParseError;
use indentphp_ast::File;
use indentphp_lexer::LexerError;

pub struct ParseResult {
    /// The tree, or the first token the grammar could not reduce.
    pub file: Result<File, ParseError>,
    /// Characters the scanner skipped. Reported even when parsing succeeds.
    pub lexer_errors: Vec<LexerError>,
}

pub fn parse(source: &str) -> ParseResult {
    let mut parser = parser::Parser::new(source);
    let file = parser.parse_file();
    match &file {
        Ok(file) => tracing::debug!(parts = file.parts.len(), "parsed file"),
        Err(err) => tracing::warn!(line = err.line(), "syntax error: {err}"),
    }
    ParseResult {
        file,
        lexer_errors: parser.into_lexer_errors(),
    }
}
