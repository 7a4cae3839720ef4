// Function parsing module
// Declarations and both call spellings

use super::Parser;
use crate::ast::*;
use crate::error::ParseResult;

impl Parser {
    /// `FUNCTION name [WITH a, b | (a, b)] ... END FUNCTION`
    pub(crate) fn parse_function_declaration(&mut self) -> ParseResult<FunctionDeclaration> {
        let line = self.expect_keyword("function")?;
        let name = self.expect_identifier("a function name after FUNCTION")?;

        let params = if self.eat_delimiter("(") {
            let params = self.parse_parameter_list()?;
            self.expect_delimiter(")")?;
            params
        } else if self.eat_keyword("with") {
            let parenthesized = self.eat_delimiter("(");
            let params = self.parse_parameter_list()?;
            if parenthesized {
                self.expect_delimiter(")")?;
            }
            params
        } else {
            Vec::new()
        };

        let body = self.parse_block("'END FUNCTION'", |parser| {
            parser.at_end_of(&["function"])
        })?;
        self.expect_end(&["function"])?;

        Ok(FunctionDeclaration {
            name,
            params,
            body,
            line,
        })
    }

    fn parse_parameter_list(&mut self) -> ParseResult<Vec<String>> {
        let mut params = Vec::new();
        if self.check_delimiter(")") {
            return Ok(params);
        }
        loop {
            params.push(self.expect_identifier("a parameter name")?);
            if !self.eat_delimiter(",") {
                return Ok(params);
            }
        }
    }

    /// `CALL name [WITH a, b]`, also accepting `CALL name(a, b)`
    pub(crate) fn parse_call_keyword(&mut self) -> ParseResult<FunctionCall> {
        let line = self.expect_keyword("call")?;
        let name = self.expect_identifier("a function name after CALL")?;

        let arguments = if self.eat_delimiter("(") {
            self.parse_argument_list()?
        } else if self.eat_keyword("with") {
            self.parse_bare_arguments()?
        } else {
            Vec::new()
        };

        Ok(FunctionCall {
            name,
            arguments,
            line,
        })
    }

    /// `name(a, b)`
    pub(crate) fn parse_call_parenthesized(&mut self) -> ParseResult<FunctionCall> {
        let line = self.line();
        let name = self.expect_identifier("a function name")?;
        self.expect_delimiter("(")?;
        let arguments = self.parse_argument_list()?;
        Ok(FunctionCall {
            name,
            arguments,
            line,
        })
    }

    /// Arguments after an opening `(`, consuming the closing `)`
    fn parse_argument_list(&mut self) -> ParseResult<Vec<Expression>> {
        if self.eat_delimiter(")") {
            return Ok(Vec::new());
        }
        let arguments = self.parse_bare_arguments()?;
        self.expect_delimiter(")")?;
        Ok(arguments)
    }

    fn parse_bare_arguments(&mut self) -> ParseResult<Vec<Expression>> {
        let mut arguments = vec![self.parse_expression()?];
        while self.eat_delimiter(",") {
            arguments.push(self.parse_expression()?);
        }
        Ok(arguments)
    }
}
