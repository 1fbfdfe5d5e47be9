pub mod ast;
pub mod span;

pub use ast::*;
pub use span::Span;
