// Condition parsing module
// Boolean structure over comparisons, including the worded `IS ...` forms

use super::Parser;
use crate::ast::*;
use crate::error::ParseResult;
use crate::token::TokenKind;

impl Parser {
    /// `cond ((AND | OR) cond)*`, folded left without precedence between AND and OR
    pub(crate) fn parse_condition(&mut self) -> ParseResult<Expression> {
        let mut left = self.parse_condition_operand()?;

        while let Some(operator) = self.current_logical_operator() {
            let line = self.line();
            self.advance();
            let right = self.parse_condition_operand()?;
            left = binary(left, operator, right, line);
        }

        Ok(left)
    }

    fn current_logical_operator(&self) -> Option<BinaryOperator> {
        let token = self.current()?;
        if token.kind != TokenKind::LogicalOperator {
            return None;
        }
        match token.text.as_str() {
            "and" | "&&" => Some(BinaryOperator::And),
            "or" | "||" => Some(BinaryOperator::Or),
            _ => None,
        }
    }

    fn parse_condition_operand(&mut self) -> ParseResult<Expression> {
        let line = self.line();

        if self.current().is_some_and(|t| t.is_logical("not") || t.is_logical("!")) {
            self.advance();
            let operand = self.parse_condition_operand()?;
            return Ok(Expression::new(
                ExpressionKind::Unary(UnaryExpression {
                    operator: UnaryOperator::Not,
                    operand: Box::new(operand),
                    line,
                }),
                line,
            ));
        }

        if self.check_delimiter("(") {
            if let Some(grouped) = self.try_grouped_condition() {
                return Ok(grouped);
            }
        }

        self.parse_comparison()
    }

    /// `( cond )` as a whole condition. Backtracks when the parentheses turn out
    /// to open an arithmetic operand, as in `(a + b) > c`.
    fn try_grouped_condition(&mut self) -> Option<Expression> {
        let start = self.position();
        self.advance();

        let parsed = self.parse_condition().ok().filter(|_| self.eat_delimiter(")"));
        let continues_as_operand = self.current().is_some_and(|next| {
            matches!(
                next.kind,
                TokenKind::Operator | TokenKind::ComparisonOperator
            ) || next.is_keyword("is")
        });

        match parsed {
            Some(mut condition) if !continues_as_operand => {
                if let ExpressionKind::Binary(binary) = &mut condition.kind {
                    binary.grouped = true;
                }
                Some(condition)
            }
            _ => {
                self.restore(start);
                None
            }
        }
    }

    /// `expr <cmp> expr`, `expr IS [NOT] ... expr`, or a bare truthy `expr`
    fn parse_comparison(&mut self) -> ParseResult<Expression> {
        let left = self.parse_expression()?;
        let line = left.line;

        if let Some(operator) = self
            .current()
            .filter(|token| token.kind == TokenKind::ComparisonOperator)
            .and_then(|token| BinaryOperator::from_comparison(&token.text))
        {
            self.advance();
            let right = self.parse_expression()?;
            return Ok(binary(left, operator, right, line));
        }

        if self.eat_keyword("is") {
            let negated = self.current().is_some_and(|t| t.is_logical("not"));
            if negated {
                self.advance();
            }
            let mut operator = self.parse_worded_comparison()?;
            if negated {
                // every comparison operator has a negation
                operator = operator.negated_comparison().unwrap_or(operator);
            }
            let right = self.parse_expression()?;
            return Ok(binary(left, operator, right, line));
        }

        Ok(left)
    }

    /// The operator words between `IS [NOT]` and the right operand
    fn parse_worded_comparison(&mut self) -> ParseResult<BinaryOperator> {
        if self.eat_keyword("greater") {
            self.expect_keyword("than")?;
            return Ok(if self.eat_or_equal_to()? {
                BinaryOperator::GreaterEqual
            } else {
                BinaryOperator::Greater
            });
        }

        if self.eat_keyword("less") {
            self.expect_keyword("than")?;
            return Ok(if self.eat_or_equal_to()? {
                BinaryOperator::LessEqual
            } else {
                BinaryOperator::Less
            });
        }

        if self.eat_keyword("equal") {
            self.expect_keyword("to")?;
        }
        Ok(BinaryOperator::Equal)
    }

    /// `OR EQUAL TO`, only when `or` is directly followed by `equal`
    fn eat_or_equal_to(&mut self) -> ParseResult<bool> {
        let is_or_equal = self.current().is_some_and(|t| t.is_logical("or"))
            && self.peek_at(1).is_some_and(|t| t.is_keyword("equal"));
        if !is_or_equal {
            return Ok(false);
        }
        self.advance();
        self.advance();
        self.expect_keyword("to")?;
        Ok(true)
    }
}

fn binary(left: Expression, operator: BinaryOperator, right: Expression, line: usize) -> Expression {
    Expression::new(
        ExpressionKind::Binary(BinaryExpression {
            left: Box::new(left),
            operator,
            right: Box::new(right),
            grouped: false,
            line,
        }),
        line,
    )
}
