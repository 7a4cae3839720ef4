// Control flow parsing module
// IF / OTHERWISE IF chains and the four loop forms

use super::Parser;
use crate::ast::*;
use crate::error::ParseResult;

impl Parser {
    /// `IF cond [THEN] ... [OTHERWISE IF ...]* [OTHERWISE ...] END IF`
    pub(crate) fn parse_if(&mut self) -> ParseResult<IfStatement> {
        let line = self.expect_keyword("if")?;
        let condition = self.parse_condition()?;
        self.eat_keyword("then");

        let consequent = self.parse_block("'END IF'", Self::at_branch_boundary)?;
        let alternate = self.parse_alternate()?;
        self.expect_end(&["if"])?;

        Ok(IfStatement {
            condition,
            consequent,
            alternate,
            line,
        })
    }

    /// Every link of an otherwise-if chain shares the single `END IF` of its root
    fn parse_alternate(&mut self) -> ParseResult<Option<Alternate>> {
        if self.check_keyword("otherwiseif") {
            let line = self.expect_keyword("otherwiseif")?;
            let condition = self.parse_condition()?;
            self.eat_keyword("then");
            let consequent = self.parse_block("'END IF'", Self::at_branch_boundary)?;
            let alternate = self.parse_alternate()?;
            return Ok(Some(Alternate::OtherwiseIf(Box::new(OtherwiseIfStatement {
                condition,
                consequent,
                alternate,
                line,
            }))));
        }

        if self.eat_keyword("otherwise") {
            let body = self.parse_block("'END IF'", |parser| parser.at_end_of(&["if"]))?;
            return Ok(Some(Alternate::Otherwise(body)));
        }

        Ok(None)
    }

    fn at_branch_boundary(&self) -> bool {
        self.check_keyword("otherwise")
            || self.check_keyword("otherwiseif")
            || self.at_end_of(&["if"])
    }

    /// `WHILE cond [DO] ... END WHILE`
    pub(crate) fn parse_while(&mut self) -> ParseResult<WhileLoop> {
        let line = self.expect_keyword("while")?;
        let condition = self.parse_condition()?;
        self.eat_keyword("do");
        let body = self.parse_block("'END WHILE'", |parser| parser.at_end_of(&["while"]))?;
        self.expect_end(&["while"])?;
        Ok(WhileLoop {
            condition,
            body,
            line,
        })
    }

    /// Loops entered with `LOOP` or `FOR LOOP`, told apart by the next keyword
    pub(crate) fn parse_loop(&mut self) -> ParseResult<StatementKind> {
        let line = self.line();
        if !(self.eat_keyword("loop") || self.eat_keyword("for loop")) {
            return Err(self.unexpected("'LOOP'"));
        }
        let closers: &[&str] = &["loop", "for loop"];

        if self.eat_keyword("until") {
            let condition = self.parse_condition()?;
            self.eat_keyword("do");
            let body = self.parse_loop_body(closers)?;
            return Ok(StatementKind::LoopUntil(LoopUntil {
                condition,
                body,
                line,
            }));
        }

        if self.eat_keyword("while") {
            let condition = self.parse_condition()?;
            self.eat_keyword("do");
            let body = self.parse_loop_body(closers)?;
            return Ok(StatementKind::WhileLoop(WhileLoop {
                condition,
                body,
                line,
            }));
        }

        self.eat_keyword("each");
        let variable = self.expect_identifier("UNTIL, WHILE or a loop variable after LOOP")?;

        if self.eat_keyword("from") {
            let start = self.parse_expression()?;
            self.eat_keyword("up");
            self.expect_keyword("to")?;
            let end = self.parse_expression()?;
            self.eat_keyword("do");
            let body = self.parse_loop_body(closers)?;
            return Ok(StatementKind::LoopFromTo(LoopFromTo {
                variable,
                start,
                end,
                body,
                line,
            }));
        }

        if self.eat_keyword("in") {
            let array = self.expect_identifier("an array name after IN")?;
            self.eat_keyword("do");
            let body = self.parse_loop_body(closers)?;
            return Ok(StatementKind::ForLoop(ForLoop {
                iterator: variable,
                array,
                body,
                line,
            }));
        }

        Err(self.unexpected("FROM or IN after the loop variable"))
    }

    /// `FOR [EACH] item IN items ... END FOR`
    pub(crate) fn parse_for_each(&mut self) -> ParseResult<ForLoop> {
        let line = self.expect_keyword("for")?;
        self.eat_keyword("each");
        let iterator = self.expect_identifier("a loop variable after FOR EACH")?;
        self.expect_keyword("in")?;
        let array = self.expect_identifier("an array name after IN")?;
        self.eat_keyword("do");
        let body = self.parse_loop_body(&["for"])?;
        Ok(ForLoop {
            iterator,
            array,
            body,
            line,
        })
    }

    fn parse_loop_body(&mut self, closers: &[&str]) -> ParseResult<Vec<Statement>> {
        let closing = format!("'END {}'", closers[0].to_uppercase());
        let body = self.parse_block(&closing, |parser| parser.at_end_of(closers))?;
        self.expect_end(closers)?;
        Ok(body)
    }
}
