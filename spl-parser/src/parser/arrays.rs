// Array statement parsing module

use super::Parser;
use crate::ast::*;
use crate::error::ParseResult;

impl Parser {
    /// `SET a[i] TO v` or `SET ELEMENT [AT] [INDEX] i OF a TO v`
    pub(crate) fn parse_array_set_value(&mut self) -> ParseResult<ArraySetValue> {
        let line = self.expect_keyword("set_array")?;

        let (array, index) = if self.eat_keyword("element") || self.eat_keyword("character") {
            self.eat_keyword("at");
            self.eat_marker_word("index");
            let index = self.parse_expression()?;
            self.expect_keyword("of")?;
            let array = self.expect_identifier("an array name after OF")?;
            (array, index)
        } else {
            let array = self.expect_identifier("an array name after SET")?;
            self.expect_delimiter("[")?;
            let index = self.parse_expression()?;
            self.expect_delimiter("]")?;
            (array, index)
        };

        self.expect_keyword("to")?;
        let value = self.parse_expression()?;

        Ok(ArraySetValue {
            array,
            index,
            value,
            line,
        })
    }

    /// `CREATE [type] ARRAY AS name [WITH [a, b, ...]]`
    pub(crate) fn parse_array_creation(&mut self) -> ParseResult<ArrayCreation> {
        let line = self.expect_keyword("create")?;
        let element_type = self.eat_type_name();
        self.expect_keyword("array")?;
        self.expect_keyword("as")?;
        let name = self.expect_identifier("an array name after AS")?;

        let mut elements = Vec::new();
        if self.eat_keyword("with") {
            let bracketed = self.eat_delimiter("[");
            let closed_empty = bracketed && self.eat_delimiter("]");
            if !closed_empty {
                elements.push(self.parse_expression()?);
                while self.eat_delimiter(",") {
                    elements.push(self.parse_expression()?);
                }
                if bracketed {
                    self.expect_delimiter("]")?;
                }
            }
        }

        Ok(ArrayCreation {
            name,
            element_type,
            elements,
            line,
        })
    }

    /// `INSERT v TO a [AT [POSITION] p]`
    pub(crate) fn parse_array_insertion(&mut self) -> ParseResult<ArrayInsertion> {
        let line = self.expect_keyword("insert")?;
        let value = self.parse_expression()?;
        self.expect_keyword("to")?;
        let array = self.expect_identifier("an array name after TO")?;

        let position = if self.eat_keyword("at") {
            self.eat_marker_word("position");
            Some(self.parse_expression()?)
        } else {
            None
        };

        Ok(ArrayInsertion {
            array,
            value,
            position,
            line,
        })
    }

    /// `REMOVE FROM a AT [POSITION] p`
    pub(crate) fn parse_remove(&mut self) -> ParseResult<RemoveOperation> {
        let line = self.expect_keyword("remove")?;
        self.expect_keyword("from")?;
        let array = self.expect_identifier("an array name after FROM")?;
        self.expect_keyword("at")?;
        self.eat_marker_word("position");
        let position = self.parse_expression()?;

        Ok(RemoveOperation {
            array,
            position,
            line,
        })
    }

    /// `SWAP a AT [POSITION] i WITH [POSITION] j`
    pub(crate) fn parse_swap(&mut self) -> ParseResult<SwapOperation> {
        let line = self.expect_keyword("swap")?;
        let array = self.expect_identifier("an array name after SWAP")?;
        self.expect_keyword("at")?;
        self.eat_marker_word("position");
        let first = self.parse_expression()?;
        self.expect_keyword("with")?;
        self.eat_marker_word("position");
        let second = self.parse_expression()?;

        Ok(SwapOperation {
            array,
            first,
            second,
            line,
        })
    }
}
