// Statement parsing module
// Keyword-keyed dispatch plus SET, PRINT and RETURN

use super::{starts_expression, Parser};
use crate::ast::*;
use crate::error::ParseResult;
use crate::token::TokenKind;
use tracing::trace;

impl Parser {
    /// Parse one statement, dispatching on the lowercase keyword at the cursor
    pub(crate) fn parse_statement(&mut self) -> ParseResult<Statement> {
        let Some(token) = self.current() else {
            return Err(self.unexpected("a statement"));
        };
        let line = token.line;
        trace!(line, token = %token.text, "parse_statement");

        let kind = match (token.kind, token.text.as_str()) {
            (TokenKind::Keyword, "set") => {
                StatementKind::VariableDeclaration(self.parse_variable_declaration()?)
            }
            (TokenKind::Keyword, "set_array") => {
                StatementKind::ArraySetValue(self.parse_array_set_value()?)
            }
            (TokenKind::Keyword, "print") => StatementKind::Print(self.parse_print()?),
            (TokenKind::Keyword, "if") => StatementKind::If(self.parse_if()?),
            (TokenKind::Keyword, "while") => StatementKind::WhileLoop(self.parse_while()?),
            (TokenKind::Keyword, "loop") | (TokenKind::Keyword, "for loop") => {
                self.parse_loop()?
            }
            (TokenKind::Keyword, "for") => StatementKind::ForLoop(self.parse_for_each()?),
            (TokenKind::Keyword, "function") => {
                StatementKind::FunctionDeclaration(self.parse_function_declaration()?)
            }
            (TokenKind::Keyword, "return") => StatementKind::Return(self.parse_return()?),
            (TokenKind::Keyword, "call") => StatementKind::FunctionCall(self.parse_call_keyword()?),
            (TokenKind::Identifier, _) if self.peek_at(1).is_some_and(|t| t.is_delimiter("(")) => {
                StatementKind::FunctionCall(self.parse_call_parenthesized()?)
            }
            (TokenKind::Keyword, "create") => {
                StatementKind::ArrayCreation(self.parse_array_creation()?)
            }
            (TokenKind::Keyword, "insert") => {
                StatementKind::ArrayInsertion(self.parse_array_insertion()?)
            }
            (TokenKind::Keyword, "remove") => StatementKind::Remove(self.parse_remove()?),
            (TokenKind::Keyword, "swap") => StatementKind::Swap(self.parse_swap()?),
            _ => return Err(self.unexpected("a statement")),
        };

        Ok(Statement { kind, line })
    }

    /// `SET name TO [type] value` or `SET name AS type`
    fn parse_variable_declaration(&mut self) -> ParseResult<VariableDeclaration> {
        let line = self.expect_keyword("set")?;
        let name = self.expect_identifier("a variable name after SET")?;

        if self.eat_keyword("as") {
            let declared_type = self.parse_type_name()?;
            return Ok(VariableDeclaration {
                name,
                declared_type: Some(declared_type),
                value: None,
                line,
            });
        }

        self.expect_keyword("to")?;
        let declared_type = self.eat_type_name();
        let value = self.parse_expression()?;

        Ok(VariableDeclaration {
            name,
            declared_type,
            value: Some(value),
            line,
        })
    }

    fn parse_print(&mut self) -> ParseResult<PrintStatement> {
        let line = self.expect_keyword("print")?;
        let value = self.parse_expression()?;
        Ok(PrintStatement { value, line })
    }

    /// `RETURN [value]`; the value is omitted when the next token cannot start one
    fn parse_return(&mut self) -> ParseResult<ReturnStatement> {
        let line = self.expect_keyword("return")?;
        let value = if self.current().is_some_and(starts_expression) {
            Some(self.parse_expression()?)
        } else {
            None
        };
        Ok(ReturnStatement { value, line })
    }

    pub(crate) fn parse_type_name(&mut self) -> ParseResult<TypeName> {
        match self.eat_type_name() {
            Some(type_name) => Ok(type_name),
            None => Err(self.unexpected("a type (NUMBER, STRING or BOOLEAN)")),
        }
    }

    pub(crate) fn eat_type_name(&mut self) -> Option<TypeName> {
        let token = self.current()?;
        if token.kind != TokenKind::Keyword {
            return None;
        }
        let type_name = TypeName::from_keyword(&token.text)?;
        self.advance();
        Some(type_name)
    }
}
