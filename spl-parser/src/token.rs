// SPL Tokens
// Flat token model produced by the lexer and consumed by the parser

use std::fmt;

/// Byte range of a token in the original source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Span> for miette::SourceSpan {
    fn from(span: Span) -> Self {
        miette::SourceSpan::new(span.start.into(), span.len())
    }
}

/// Lexical category of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Keyword,
    Identifier,
    Number,
    String,
    Boolean,
    Delimiter,
    Operator,
    ComparisonOperator,
    LogicalOperator,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Keyword => "keyword",
            TokenKind::Identifier => "identifier",
            TokenKind::Number => "number",
            TokenKind::String => "string",
            TokenKind::Boolean => "boolean",
            TokenKind::Delimiter => "delimiter",
            TokenKind::Operator => "operator",
            TokenKind::ComparisonOperator => "comparison operator",
            TokenKind::LogicalOperator => "logical operator",
        };
        f.write_str(name)
    }
}

/// A single lexical unit.
///
/// Keyword, boolean and logical-operator text is canonical lowercase; identifier
/// text keeps the case it was written in; string text excludes the quotes.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: usize,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, line: usize, span: Span) -> Self {
        Self {
            kind,
            text: text.into(),
            line,
            span,
        }
    }

    pub fn is_keyword(&self, keyword: &str) -> bool {
        self.kind == TokenKind::Keyword && self.text == keyword
    }

    pub fn is_delimiter(&self, delimiter: &str) -> bool {
        self.kind == TokenKind::Delimiter && self.text == delimiter
    }

    pub fn is_logical(&self, operator: &str) -> bool {
        self.kind == TokenKind::LogicalOperator && self.text == operator
    }

    /// Case-insensitive match against an identifier used as a contextual word
    pub fn is_word(&self, word: &str) -> bool {
        self.kind == TokenKind::Identifier && self.text.eq_ignore_ascii_case(word)
    }

    /// Human-readable rendering used in parse errors
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::String => format!("string \"{}\"", self.text),
            TokenKind::Number | TokenKind::Boolean => format!("{} {}", self.kind, self.text),
            _ => format!("{} '{}'", self.kind, self.text),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>4}  {:<20} {}", self.line, self.kind.to_string(), self.text)
    }
}
