use indentphp_ast::Span;
use indentphp_lexer::TokenKind;
use miette::{Diagnostic, LabeledSpan};
use thiserror::Error;

/// A token the grammar cannot reduce. Parsing of the file stops at the
/// first one.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("line {}: expected {expected}, found {found}", .span.line)]
    Expected {
        expected: String,
        found: TokenKind,
        span: Span,
    },

    #[error("line {}: unexpected {found}", .span.line)]
    Unexpected { found: TokenKind, span: Span },

    #[error("line {}: nesting deeper than {limit} levels", .span.line)]
    TooDeep { limit: u32, span: Span },
}

impl ParseError {
    pub fn span(&self) -> Span {
        match self {
            ParseError::Expected { span, .. }
            | ParseError::Unexpected { span, .. }
            | ParseError::TooDeep { span, .. } => *span,
        }
    }

    /// Line of the offending token.
    pub fn line(&self) -> u32 {
        self.span().line
    }
}

impl Diagnostic for ParseError {
    fn code<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        Some(Box::new("indentphp::syntax"))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        match self {
            ParseError::Expected { .. } => None,
            ParseError::TooDeep { .. } => Some(Box::new(
                "flatten the nested blocks, conditions or arrays",
            )),
            ParseError::Unexpected { .. } => Some(Box::new(
                "only declarations, blocks, if/else, `return;` and `;` are understood",
            )),
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let label = match self {
            ParseError::Expected { expected, .. } => format!("expected {expected}"),
            ParseError::Unexpected { .. } => "not allowed here".to_string(),
            ParseError::TooDeep { .. } => "nested too deeply".to_string(),
        };
        Some(Box::new(std::iter::once(LabeledSpan::at(
            self.span().range(),
            label,
        ))))
    }
}
