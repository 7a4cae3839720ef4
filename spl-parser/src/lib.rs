// SPL Parser Library
// Hand-written lexer and recursive-descent parser for SPL pseudocode

pub mod ast;
pub mod error;
pub mod lexer;
pub mod line_context;
pub mod parser;
pub mod token;

#[cfg(test)]
#[path = "tests/mod.rs"]
mod tests;

pub use ast::*;
pub use error::*;
pub use lexer::{tokenize, Lexer};
pub use parser::{parse, Parser};
pub use token::{Span, Token, TokenKind};

// Main parsing functions
pub fn parse_program(source: &str) -> Result<Program, SyntaxError> {
    let tokens = tokenize(source)?;
    Ok(parse(tokens)?)
}

// Version and metadata
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
