use indentphp_ast::Span;
use logos::Logos;
use thiserror::Error;

use crate::token::{resolve_keyword, TokenKind};

/// A character the scanner could not place in any token. It has been
/// skipped; scanning carried on after it.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("line {line}: {message}")]
pub struct LexerError {
    pub message: String,
    pub line: u32,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn eof(offset: u32, line: u32) -> Self {
        Self {
            kind: TokenKind::Eof,
            span: Span::new(offset, offset, line),
        }
    }

    /// Source line the token starts on (1-based).
    pub fn line(&self) -> u32 {
        self.span.line
    }
}

/// Which token grammar is active at the current scan position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexerMode {
    /// Outside PHP tags: every character is an [`TokenKind::HtmlChar`].
    Html,
    /// Between an open tag and `?>`.
    Php,
}

/// Dual-mode scanner. Starts in HTML mode, enters PHP mode at `<?php` or
/// `<?` and returns to HTML mode at `?>`.
///
/// The scanner never fails: unrecognised characters are skipped and
/// recorded in [`Lexer::errors`].
pub struct Lexer<'src> {
    source: &'src str,
    mode: LexerMode,
    pos: usize,
    line: u32,
    peeked: Option<Token>,
    pub errors: Vec<LexerError>,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            mode: LexerMode::Html,
            pos: 0,
            line: 1,
            peeked: None,
            errors: Vec::new(),
        }
    }

    /// Mode the next unscanned character will be read in.
    pub fn mode(&self) -> LexerMode {
        self.mode
    }

    pub fn peek(&mut self) -> &Token {
        let token = match self.peeked.take() {
            Some(token) => token,
            None => self.read_next_token(),
        };
        self.peeked.insert(token)
    }

    pub fn next_token(&mut self) -> Token {
        if let Some(token) = self.peeked.take() {
            return token;
        }
        self.read_next_token()
    }

    /// Get the text slice corresponding to a token
    pub fn token_text(&self, token: &Token) -> &'src str {
        token.span.text(self.source)
    }

    fn read_next_token(&mut self) -> Token {
        if self.pos >= self.source.len() {
            return Token::eof(self.source.len() as u32, self.line);
        }

        match self.mode {
            LexerMode::Html => self.lex_html(),
            LexerMode::Php => self.lex_php(),
        }
    }

    fn lex_html(&mut self) -> Token {
        let remaining = &self.source[self.pos..];

        // `<?php` must be tried before `<?`
        if remaining.starts_with("<?php") {
            self.mode = LexerMode::Php;
            return self.emit(TokenKind::OpenTag, "<?php".len());
        }
        if remaining.starts_with("<?") {
            self.mode = LexerMode::Php;
            return self.emit(TokenKind::ShortOpenTag, "<?".len());
        }

        let width = remaining.chars().next().map_or(1, char::len_utf8);
        self.emit(TokenKind::HtmlChar, width)
    }

    fn lex_php(&mut self) -> Token {
        loop {
            let remaining = &self.source[self.pos..];
            let mut inner = TokenKind::lexer(remaining);

            match inner.next() {
                Some(Ok(kind)) => {
                    let len = inner.span().end;
                    let kind = match kind {
                        TokenKind::CloseTag => {
                            self.mode = LexerMode::Html;
                            TokenKind::CloseTag
                        }
                        TokenKind::Identifier => {
                            resolve_keyword(&remaining[..len]).unwrap_or(TokenKind::Identifier)
                        }
                        _ => kind,
                    };
                    return self.emit(kind, len);
                }
                Some(Err(())) => {
                    // Skip one character and try again on unrecognized input.
                    // Line breaks always lex, so the line count is unaffected.
                    let bad = remaining.chars().next().unwrap_or('\u{FFFD}');
                    let start = self.pos as u32;
                    self.pos += bad.len_utf8();
                    let error = LexerError {
                        message: format!("unexpected character {bad:?} in PHP code"),
                        line: self.line,
                        span: Span::new(start, self.pos as u32, self.line),
                    };
                    tracing::warn!(line = error.line, "skipping {bad:?}: not part of any token");
                    self.errors.push(error);
                    if self.pos >= self.source.len() {
                        return Token::eof(self.source.len() as u32, self.line);
                    }
                }
                None => return Token::eof(self.source.len() as u32, self.line),
            }
        }
    }

    /// Produce a token of `len` bytes at the current position and advance
    /// past it, counting any newlines it spans.
    fn emit(&mut self, kind: TokenKind, len: usize) -> Token {
        let start = self.pos;
        let end = start + len;
        let span = Span::new(start as u32, end as u32, self.line);
        self.line += count_newlines(&self.source[start..end]);
        self.pos = end;
        Token::new(kind, span)
    }
}

/// Number of line breaks in `text`, with `\r\n` counting once.
fn count_newlines(text: &str) -> u32 {
    let bytes = text.as_bytes();
    let mut count = 0;
    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'\n' => count += 1,
            b'\r' if bytes.get(i + 1) != Some(&b'\n') => count += 1,
            _ => {}
        }
    }
    count
}
