// SPL Parser
// Hand-written recursive descent over the lexer's token sequence

use crate::ast::*;
use crate::error::{ParseError, ParseResult};
use crate::token::{Token, TokenKind};
use tracing::debug;

mod arrays;
mod conditions;
mod control_flow;
mod expressions;
mod functions;
mod statements;

/// Build the AST for a token sequence
pub fn parse(tokens: Vec<Token>) -> ParseResult<Program> {
    let program = Parser::new(tokens).parse_program()?;
    debug!(statements = program.statements.len(), "parsed SPL program");
    Ok(program)
}

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    pub fn parse_program(&mut self) -> ParseResult<Program> {
        let line = self.tokens.first().map_or(1, |token| token.line);
        let mut statements = Vec::new();
        while !self.at_end() {
            statements.push(self.parse_statement()?);
        }
        Ok(Program { statements, line })
    }

    /// Statements up to (not including) the first token `is_terminator` accepts
    pub(crate) fn parse_block(
        &mut self,
        closing: &str,
        is_terminator: impl Fn(&Parser) -> bool,
    ) -> ParseResult<Vec<Statement>> {
        let mut statements = Vec::new();
        loop {
            if self.at_end() {
                return Err(self.unexpected(closing));
            }
            if is_terminator(self) {
                return Ok(statements);
            }
            statements.push(self.parse_statement()?);
        }
    }

    // Cursor

    pub(crate) fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    pub(crate) fn current(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    pub(crate) fn peek_at(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.pos + offset)
    }

    pub(crate) fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    pub(crate) fn restore(&mut self, position: usize) {
        self.pos = position;
    }

    /// Line of the current token, or of the last token at end of input
    pub(crate) fn line(&self) -> usize {
        self.current()
            .or_else(|| self.tokens.last())
            .map_or(1, |token| token.line)
    }

    // Predicates

    pub(crate) fn check_keyword(&self, keyword: &str) -> bool {
        self.current().is_some_and(|token| token.is_keyword(keyword))
    }

    pub(crate) fn check_delimiter(&self, delimiter: &str) -> bool {
        self.current()
            .is_some_and(|token| token.is_delimiter(delimiter))
    }

    /// `END` followed by one of `closers`
    pub(crate) fn at_end_of(&self, closers: &[&str]) -> bool {
        self.check_keyword("end")
            && self
                .peek_at(1)
                .is_some_and(|next| closers.iter().any(|closer| next.is_keyword(closer)))
    }

    // Consumers

    pub(crate) fn eat_keyword(&mut self, keyword: &str) -> bool {
        if self.check_keyword(keyword) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    pub(crate) fn eat_delimiter(&mut self, delimiter: &str) -> bool {
        if self.check_delimiter(delimiter) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Consume a contextual word such as `position` or `index` when it is used
    /// as a marker rather than as a variable name
    pub(crate) fn eat_marker_word(&mut self, word: &str) -> bool {
        let is_marker = self.current().is_some_and(|token| token.is_word(word))
            && self.peek_at(1).is_some_and(starts_expression);
        if is_marker {
            self.pos += 1;
        }
        is_marker
    }

    /// Consume a required keyword, returning its line
    pub(crate) fn expect_keyword(&mut self, keyword: &str) -> ParseResult<usize> {
        match self.current() {
            Some(token) if token.is_keyword(keyword) => {
                let line = token.line;
                self.pos += 1;
                Ok(line)
            }
            _ => Err(self.unexpected(format!("'{}'", keyword.to_uppercase()))),
        }
    }

    pub(crate) fn expect_delimiter(&mut self, delimiter: &str) -> ParseResult<usize> {
        match self.current() {
            Some(token) if token.is_delimiter(delimiter) => {
                let line = token.line;
                self.pos += 1;
                Ok(line)
            }
            _ => Err(self.unexpected(format!("'{delimiter}'"))),
        }
    }

    pub(crate) fn expect_identifier(&mut self, what: &str) -> ParseResult<String> {
        match self.current() {
            Some(token) if token.kind == TokenKind::Identifier => {
                let name = token.text.clone();
                self.pos += 1;
                Ok(name)
            }
            _ => Err(self.unexpected(what)),
        }
    }

    /// Closing `END <closer>`, accepting any of the listed closers
    pub(crate) fn expect_end(&mut self, closers: &[&str]) -> ParseResult<()> {
        if self.at_end_of(closers) {
            self.pos += 2;
            return Ok(());
        }
        Err(self.unexpected(format!("'END {}'", closers[0].to_uppercase())))
    }

    pub(crate) fn unexpected(&self, expected: impl Into<String>) -> ParseError {
        match self.current() {
            Some(token) => {
                ParseError::unexpected_at(expected, token.describe(), token.line, token.span)
            }
            None => ParseError::unexpected(expected, "end of input", self.line()),
        }
    }
}

/// Tokens that can begin an expression
pub(crate) fn starts_expression(token: &Token) -> bool {
    match token.kind {
        TokenKind::Number | TokenKind::String | TokenKind::Boolean | TokenKind::Identifier => true,
        TokenKind::Delimiter => token.text == "(",
        TokenKind::Operator => token.text == "-",
        TokenKind::Keyword => matches!(
            token.text.as_str(),
            "length" | "substring" | "element" | "character" | "call"
        ),
        TokenKind::ComparisonOperator | TokenKind::LogicalOperator => false,
    }
}
