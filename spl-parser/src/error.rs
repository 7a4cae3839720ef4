// SPL Parser Error Handling
// Lexing and parsing failures with miette diagnostics

use crate::token::Span;
use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

/// Failure while splitting source text into tokens
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum LexError {
    #[error("Unexpected character '{character}' on line {line}")]
    #[diagnostic(
        code(spl::lex::unexpected_character),
        help("SPL accepts letters, digits, quotes, ( ) [ ] , + - * / % = ! < > & | and whitespace")
    )]
    UnexpectedCharacter {
        character: char,
        line: usize,
        #[label("not valid here")]
        span: SourceSpan,
    },

    #[error("Unterminated string literal starting on line {line}")]
    #[diagnostic(
        code(spl::lex::unterminated_string),
        help("Close the string with the same quote character it was opened with")
    )]
    UnterminatedString {
        line: usize,
        #[label("string starts here")]
        span: SourceSpan,
    },

    #[error("String literal on line {line} contains a line break")]
    #[diagnostic(
        code(spl::lex::newline_in_string),
        help("Strings must open and close on the same line")
    )]
    NewlineInString {
        line: usize,
        #[label("string starts here")]
        span: SourceSpan,
    },
}

impl LexError {
    pub fn line(&self) -> usize {
        match self {
            LexError::UnexpectedCharacter { line, .. }
            | LexError::UnterminatedString { line, .. }
            | LexError::NewlineInString { line, .. } => *line,
        }
    }
}

/// Failure while building the AST from tokens
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Expected {expected}, found {found} on line {line}")]
    #[diagnostic(code(spl::parse::unexpected_token), help("Expected {expected}"))]
    UnexpectedToken {
        expected: String,
        found: String,
        line: usize,
        #[label("found {found}")]
        span: Option<SourceSpan>,
    },

    #[error("Invalid number '{text}' on line {line}")]
    #[diagnostic(code(spl::parse::invalid_number))]
    InvalidNumber {
        text: String,
        line: usize,
        #[label("not a number")]
        span: SourceSpan,
    },
}

impl ParseError {
    pub fn unexpected(expected: impl Into<String>, found: impl Into<String>, line: usize) -> Self {
        ParseError::UnexpectedToken {
            expected: expected.into(),
            found: found.into(),
            line,
            span: None,
        }
    }

    pub fn unexpected_at(
        expected: impl Into<String>,
        found: impl Into<String>,
        line: usize,
        span: Span,
    ) -> Self {
        ParseError::UnexpectedToken {
            expected: expected.into(),
            found: found.into(),
            line,
            span: Some(span.into()),
        }
    }

    pub fn line(&self) -> usize {
        match self {
            ParseError::UnexpectedToken { line, .. } | ParseError::InvalidNumber { line, .. } => {
                *line
            }
        }
    }
}

/// Either stage of turning text into an AST
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum SyntaxError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] ParseError),
}

pub type LexResult<T> = Result<T, LexError>;

/// Result type for parsing operations
pub type ParseResult<T> = Result<T, ParseError>;
