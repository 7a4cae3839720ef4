// Expression parsing module
// Arithmetic is a flat left fold: `2 + 3 * 4` groups as `(2 + 3) * 4`

use super::Parser;
use crate::ast::*;
use crate::error::{ParseError, ParseResult};
use crate::token::TokenKind;

impl Parser {
    /// `primary (op primary)*` with `op` one of `+ - * / %`
    pub(crate) fn parse_expression(&mut self) -> ParseResult<Expression> {
        let mut left = self.parse_primary()?;

        while let Some(operator) = self.current_arithmetic_operator() {
            let line = self.line();
            self.advance();
            let right = self.parse_primary()?;
            left = Expression::new(
                ExpressionKind::Binary(BinaryExpression {
                    left: Box::new(left),
                    operator,
                    right: Box::new(right),
                    grouped: false,
                    line,
                }),
                line,
            );
        }

        Ok(left)
    }

    fn current_arithmetic_operator(&self) -> Option<BinaryOperator> {
        let token = self.current()?;
        if token.kind != TokenKind::Operator {
            return None;
        }
        BinaryOperator::from_arithmetic(&token.text)
    }

    pub(crate) fn parse_primary(&mut self) -> ParseResult<Expression> {
        let Some(token) = self.current() else {
            return Err(self.unexpected("an expression"));
        };
        let line = token.line;

        match token.kind {
            TokenKind::Number => {
                let text = token.text.clone();
                let span = token.span;
                let value = text.parse::<f64>().map_err(|_| ParseError::InvalidNumber {
                    text: text.clone(),
                    line,
                    span: span.into(),
                })?;
                self.advance();
                Ok(Expression::number(value, line))
            }
            TokenKind::String => {
                let value = token.text.clone();
                self.advance();
                Ok(Expression::new(
                    ExpressionKind::String(StringLiteral { value, line }),
                    line,
                ))
            }
            TokenKind::Boolean => {
                let value = token.text == "true";
                self.advance();
                Ok(Expression::new(
                    ExpressionKind::Boolean(BooleanLiteral { value, line }),
                    line,
                ))
            }
            TokenKind::Identifier => self.parse_identifier_primary(),
            TokenKind::Delimiter if token.text == "(" => self.parse_parenthesized(),
            TokenKind::Operator if token.text == "-" => {
                self.advance();
                let operand = self.parse_primary()?;
                Ok(Expression::new(
                    ExpressionKind::Unary(UnaryExpression {
                        operator: UnaryOperator::Minus,
                        operand: Box::new(operand),
                        line,
                    }),
                    line,
                ))
            }
            TokenKind::Keyword => match token.text.as_str() {
                "length" => self.parse_length(),
                "substring" => self.parse_substring(),
                "element" => self.parse_indexing(IndexKind::Element),
                "character" => self.parse_indexing(IndexKind::Character),
                "call" => {
                    let call = self.parse_call_keyword()?;
                    Ok(Expression::new(ExpressionKind::FunctionCall(call), line))
                }
                _ => Err(self.unexpected("an expression")),
            },
            _ => Err(self.unexpected("an expression")),
        }
    }

    /// A variable, `name[index]` or `name(args)`
    fn parse_identifier_primary(&mut self) -> ParseResult<Expression> {
        let line = self.line();

        if self.peek_at(1).is_some_and(|next| next.is_delimiter("(")) {
            let call = self.parse_call_parenthesized()?;
            return Ok(Expression::new(ExpressionKind::FunctionCall(call), line));
        }

        let name = self.expect_identifier("an identifier")?;
        if !self.eat_delimiter("[") {
            return Ok(Expression::identifier(name, line));
        }

        let index = self.parse_expression()?;
        self.expect_delimiter("]")?;
        Ok(Expression::new(
            ExpressionKind::Index(IndexExpression {
                kind: IndexKind::Element,
                target: Box::new(Expression::identifier(name, line)),
                index: Box::new(index),
                line,
            }),
            line,
        ))
    }

    fn parse_parenthesized(&mut self) -> ParseResult<Expression> {
        self.expect_delimiter("(")?;
        let mut inner = self.parse_expression()?;
        self.expect_delimiter(")")?;
        if let ExpressionKind::Binary(binary) = &mut inner.kind {
            binary.grouped = true;
        }
        Ok(inner)
    }

    /// `LENGTH OF primary`
    fn parse_length(&mut self) -> ParseResult<Expression> {
        let line = self.expect_keyword("length")?;
        self.expect_keyword("of")?;
        let target = self.parse_primary()?;
        Ok(Expression::new(
            ExpressionKind::Length(LengthExpression {
                target: Box::new(target),
                line,
            }),
            line,
        ))
    }

    /// `SUBSTRING OF primary FROM start TO end`
    fn parse_substring(&mut self) -> ParseResult<Expression> {
        let line = self.expect_keyword("substring")?;
        self.expect_keyword("of")?;
        let target = self.parse_primary()?;
        self.expect_keyword("from")?;
        let start = self.parse_expression()?;
        self.expect_keyword("to")?;
        let end = self.parse_expression()?;
        Ok(Expression::new(
            ExpressionKind::Substring(SubstringExpression {
                target: Box::new(target),
                start: Box::new(start),
                end: Box::new(end),
                line,
            }),
            line,
        ))
    }

    /// `ELEMENT|CHARACTER [AT] [INDEX] i OF primary`
    fn parse_indexing(&mut self, kind: IndexKind) -> ParseResult<Expression> {
        let line = self.expect_keyword(kind.as_str())?;
        self.eat_keyword("at");
        self.eat_marker_word("index");
        let index = self.parse_expression()?;
        self.expect_keyword("of")?;
        let target = self.parse_primary()?;
        Ok(Expression::new(
            ExpressionKind::Index(IndexExpression {
                kind,
                target: Box::new(target),
                index: Box::new(index),
                line,
            }),
            line,
        ))
    }
}
