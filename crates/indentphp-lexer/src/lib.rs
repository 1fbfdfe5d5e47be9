pub mod lexer;
pub mod token;

pub use lexer::{Lexer, LexerError, LexerMode, Token};
pub use token::TokenKind;
