use indentphp_ast::*;
use indentphp_lexer::{Lexer, LexerError, Token, TokenKind};

use crate::diagnostics::ParseError;
use crate::stmt;

pub type PResult<T> = Result<T, ParseError>;

/// Deepest nesting of statements, expressions and array literals accepted.
/// Anything deeper is reported instead of exhausting the stack.
pub const MAX_DEPTH: u32 = 128;

pub struct Parser<'src> {
    lexer: Lexer<'src>,
    current: Token,
    source: &'src str,
    /// End offset of the last consumed non-whitespace token.
    last_end: u32,
    /// Nesting depth (0 = top-level statement list)
    pub depth: u32,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str) -> Self {
        let mut lexer = Lexer::new(source);
        let current = lexer.next_token();
        Self {
            lexer,
            current,
            source,
            last_end: 0,
            depth: 0,
        }
    }

    // =========================================================================
    // Token navigation
    // =========================================================================

    /// Get the current token kind without consuming it.
    pub fn current_kind(&self) -> TokenKind {
        self.current.kind
    }

    /// Get the current token's span.
    pub fn current_span(&self) -> Span {
        self.current.span
    }

    /// Get the source text of an already consumed token.
    pub fn text(&self, token: &Token) -> &'src str {
        token.span.text(self.source)
    }

    /// Advance to the next token, returning the consumed token.
    pub fn advance(&mut self) -> Token {
        let prev = std::mem::replace(&mut self.current, self.lexer.next_token());
        if !prev.kind.is_whitespace() {
            self.last_end = prev.span.end;
        }
        prev
    }

    /// Check if the current token matches the given kind.
    pub fn check(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }

    /// If the current token matches `kind`, consume and return it. Otherwise return None.
    pub fn eat(&mut self, kind: TokenKind) -> Option<Token> {
        if self.check(kind) {
            Some(self.advance())
        } else {
            None
        }
    }

    /// Expect the current token to be `kind` and consume it.
    pub fn expect(&mut self, kind: TokenKind) -> PResult<Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.expected(&kind.to_string()))
        }
    }

    /// Span from `start` to the end of the most recently consumed
    /// non-whitespace token.
    pub fn end_span(&self, start: Span) -> Span {
        Span::new(start.start, self.last_end.max(start.start), start.line)
    }

    /// Enter one nesting level.
    pub fn enter(&mut self) -> PResult<()> {
        if self.depth >= MAX_DEPTH {
            return Err(ParseError::TooDeep {
                limit: MAX_DEPTH,
                span: self.current_span(),
            });
        }
        self.depth += 1;
        Ok(())
    }

    pub fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    // =========================================================================
    // Whitespace
    // =========================================================================

    /// `opt_whitespace`: consume any run of spaces, tabs and newlines.
    pub fn skip_whitespace(&mut self) {
        while self.current_kind().is_whitespace() {
            self.advance();
        }
    }

    /// `whitespace`: like [`skip_whitespace`](Self::skip_whitespace) but at
    /// least one whitespace token is required.
    pub fn expect_whitespace(&mut self) -> PResult<()> {
        if !self.current_kind().is_whitespace() {
            return Err(self.expected("whitespace"));
        }
        self.skip_whitespace();
        Ok(())
    }

    // =========================================================================
    // Error handling
    // =========================================================================

    pub fn expected(&self, what: &str) -> ParseError {
        ParseError::Expected {
            expected: what.to_string(),
            found: self.current_kind(),
            span: self.current_span(),
        }
    }

    pub fn unexpected(&self) -> ParseError {
        ParseError::Unexpected {
            found: self.current_kind(),
            span: self.current_span(),
        }
    }

    pub fn into_lexer_errors(self) -> Vec<LexerError> {
        self.lexer.errors
    }

    // =========================================================================
    // Top-level parsing
    // =========================================================================

    /// `file`: HTML runs and scripts in source order, optionally ending in a
    /// script that is never closed.
    pub fn parse_file(&mut self) -> PResult<File> {
        let start = self.current_span();
        let mut parts = Vec::new();

        loop {
            match self.current_kind() {
                TokenKind::HtmlChar => parts.push(FilePart::Html(self.parse_html())),
                TokenKind::OpenTag | TokenKind::ShortOpenTag => {
                    let script = self.parse_script()?;
                    let closed = script.closed;
                    parts.push(FilePart::Script(script));
                    if !closed {
                        break;
                    }
                }
                TokenKind::Eof => break,
                _ => return Err(self.unexpected()),
            }
        }

        let span = Span::new(start.start, self.source.len() as u32, start.line);
        Ok(File { parts, span })
    }

    /// Coalesce adjacent HTML characters into one passthrough run.
    fn parse_html(&mut self) -> String {
        let mut html = String::new();
        while self.check(TokenKind::HtmlChar) {
            let token = self.advance();
            html.push_str(self.text(&token));
        }
        html
    }

    /// `script`: `<?php` whitespace statements `?>`, or the short form with
    /// optional whitespace. The closing tag may be missing at end of file.
    fn parse_script(&mut self) -> PResult<Script> {
        let tag = self.advance();
        let open_tag = if tag.kind == TokenKind::OpenTag {
            self.expect_whitespace()?;
            OpenTag::Long
        } else {
            self.skip_whitespace();
            OpenTag::Short
        };

        let stmts = stmt::parse_statement_list(self)?;

        let closed = match self.current_kind() {
            TokenKind::CloseTag => {
                self.advance();
                true
            }
            TokenKind::Eof => false,
            _ => return Err(self.unexpected()),
        };

        Ok(Script {
            stmts,
            open_tag,
            closed,
            span: self.end_span(tag.span),
        })
    }
}
