// Source emission
// Renders IR as JavaScript source text

use crate::error::{EmitError, EmitResult};
use crate::ir::{
    format_number, Call, ComparisonOp, Condition, Expr, Literal, LogicalOp, Program, Statement,
};
use indexmap::IndexSet;
use tracing::debug;

/// A consumer of IR that produces program text in some target language
pub trait SourceEmitter {
    fn emit(&mut self, program: &Program) -> EmitResult<String>;
}

/// Emits plain JavaScript runnable under node or a browser console.
///
/// Every name a body assigns is declared once with a `let` line at the top of
/// that body, so names first assigned inside a branch stay visible after it.
#[derive(Debug, Clone)]
pub struct JavaScriptEmitter {
    indent: String,
    output: String,
    depth: usize,
}

impl Default for JavaScriptEmitter {
    fn default() -> Self {
        Self::new()
    }
}

impl JavaScriptEmitter {
    pub fn new() -> Self {
        Self::with_indent("    ")
    }

    pub fn with_indent(indent: impl Into<String>) -> Self {
        Self {
            indent: indent.into(),
            output: String::new(),
            depth: 0,
        }
    }

    fn line(&mut self, text: &str) {
        for _ in 0..self.depth {
            self.output.push_str(&self.indent);
        }
        self.output.push_str(text);
        self.output.push('\n');
    }

    /// A program or function body, headed by its `let` line
    fn body(
        &mut self,
        statements: &[Statement],
        params: &[String],
        in_function: bool,
    ) -> EmitResult<()> {
        let mut names = IndexSet::new();
        collect_assigned(statements, &mut names);
        names.retain(|name: &String| !params.contains(name));
        if !names.is_empty() {
            let declared: Vec<&str> = names.iter().map(String::as_str).collect();
            self.line(&format!("let {};", declared.join(", ")));
        }
        self.block(statements, in_function)
    }

    fn block(&mut self, statements: &[Statement], in_function: bool) -> EmitResult<()> {
        for statement in statements {
            self.statement(statement, in_function)?;
        }
        Ok(())
    }

    fn nested(&mut self, statements: &[Statement], in_function: bool) -> EmitResult<()> {
        self.depth += 1;
        let result = self.block(statements, in_function);
        self.depth -= 1;
        result
    }

    fn statement(&mut self, statement: &Statement, in_function: bool) -> EmitResult<()> {
        match statement {
            Statement::Set { name, value, .. } => match value {
                Some(value) => self.line(&format!("{name} = {};", expression(value))),
                None => self.line(&format!("{name} = undefined;")),
            },
            Statement::SetElement {
                array,
                index,
                value,
                ..
            } => self.line(&format!(
                "{array}[{}] = {};",
                expression(index),
                expression(value)
            )),
            Statement::Print { value, .. } => {
                self.line(&format!("console.log({});", expression(value)))
            }
            Statement::If {
                condition,
                consequent,
                alternate,
                ..
            } => {
                self.if_chain("if", condition, consequent, alternate, in_function)?;
                self.line("}");
            }
            Statement::While {
                condition, body, ..
            } => {
                self.line(&format!("while ({}) {{", self::condition(condition)));
                self.nested(body, in_function)?;
                self.line("}");
            }
            Statement::LoopUntil {
                condition, body, ..
            } => {
                self.line(&format!("while (!({})) {{", self::condition(condition)));
                self.nested(body, in_function)?;
                self.line("}");
            }
            Statement::ForEach {
                iterator,
                array,
                body,
                ..
            } => {
                self.line(&format!("for (const {iterator} of {array}) {{"));
                self.nested(body, in_function)?;
                self.line("}");
            }
            Statement::LoopFromTo {
                variable,
                start,
                end,
                body,
                ..
            } => {
                self.line(&format!(
                    "for ({variable} = {}; {variable} <= {}; {variable}++) {{",
                    expression(start),
                    expression(end)
                ));
                self.nested(body, in_function)?;
                self.line("}");
            }
            Statement::FunctionDeclaration {
                name, params, body, ..
            } => {
                self.line(&format!("function {name}({}) {{", params.join(", ")));
                self.depth += 1;
                let result = self.body(body, params, true);
                self.depth -= 1;
                result?;
                self.line("}");
            }
            Statement::Call(call) => self.line(&format!("{};", call_expression(call))),
            Statement::Return { line, value } => {
                if !in_function {
                    return Err(EmitError::ReturnOutsideFunction { line: *line });
                }
                match value {
                    Some(value) => self.line(&format!("return {};", expression(value))),
                    None => self.line("return;"),
                }
            }
            Statement::CreateArray { name, elements, .. } => {
                let elements: Vec<String> = elements.iter().map(expression).collect();
                self.line(&format!("{name} = [{}];", elements.join(", ")));
            }
            Statement::Insert {
                array,
                value,
                position,
                ..
            } => match position {
                Some(position) => self.line(&format!(
                    "{array}.splice({}, 0, {});",
                    expression(position),
                    expression(value)
                )),
                None => self.line(&format!("{array}.push({});", expression(value))),
            },
            Statement::Remove {
                array, position, ..
            } => self.line(&format!("{array}.splice({}, 1);", expression(position))),
            Statement::Swap {
                array,
                first,
                second,
                ..
            } => {
                let (first, second) = (expression(first), expression(second));
                self.line(&format!(
                    "[{array}[{first}], {array}[{second}]] = [{array}[{second}], {array}[{first}]];"
                ));
            }
        }
        Ok(())
    }

    /// Opens `keyword (cond) {` and renders the chain, leaving the final `}` to the caller
    fn if_chain(
        &mut self,
        keyword: &str,
        condition: &Condition,
        consequent: &[Statement],
        alternate: &[Statement],
        in_function: bool,
    ) -> EmitResult<()> {
        self.line(&format!("{keyword} ({}) {{", self::condition(condition)));
        self.nested(consequent, in_function)?;

        match alternate {
            [] => Ok(()),
            [Statement::If {
                condition,
                consequent,
                alternate,
                chained: true,
                ..
            }] => self.if_chain("} else if", condition, consequent, alternate, in_function),
            otherwise => {
                self.line("} else {");
                self.nested(otherwise, in_function)
            }
        }
    }
}

impl SourceEmitter for JavaScriptEmitter {
    fn emit(&mut self, program: &Program) -> EmitResult<String> {
        self.output.clear();
        self.depth = 0;
        self.body(&program.statements, &[], false)?;
        debug!(bytes = self.output.len(), "emitted JavaScript");
        Ok(std::mem::take(&mut self.output))
    }
}

/// Names assigned anywhere in `statements`, outside nested function bodies
fn collect_assigned(statements: &[Statement], names: &mut IndexSet<String>) {
    for statement in statements {
        match statement {
            Statement::Set { name, .. } | Statement::CreateArray { name, .. } => {
                names.insert(name.clone());
            }
            Statement::LoopFromTo { variable, body, .. } => {
                names.insert(variable.clone());
                collect_assigned(body, names);
            }
            Statement::If {
                consequent,
                alternate,
                ..
            } => {
                collect_assigned(consequent, names);
                collect_assigned(alternate, names);
            }
            Statement::While { body, .. }
            | Statement::LoopUntil { body, .. }
            | Statement::ForEach { body, .. } => collect_assigned(body, names),
            _ => {}
        }
    }
}

fn literal(literal: &Literal) -> String {
    match literal {
        Literal::Number(value) => format_number(*value),
        Literal::String(value) => {
            let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
            format!("\"{escaped}\"")
        }
        Literal::Boolean(value) => value.to_string(),
    }
}

/// Arithmetic chains are flattened so JavaScript precedence applies; only
/// source-grouped operations keep their parentheses
pub fn expression(expr: &Expr) -> String {
    match expr {
        Expr::Literal(value) => literal(value),
        Expr::Variable(name) => name.clone(),
        Expr::Binary {
            left,
            op,
            right,
            grouped,
        } => {
            let text = format!("{} {} {}", expression(left), op.symbol(), expression(right));
            if *grouped {
                format!("({text})")
            } else {
                text
            }
        }
        Expr::Negate(operand) => format!("-{}", operand_expression(operand)),
        Expr::Substring { target, start, end } => format!(
            "{}.substring({}, {})",
            operand_expression(target),
            expression(start),
            expression(end)
        ),
        Expr::Length(target) => format!("{}.length", operand_expression(target)),
        Expr::Index { target, index, .. } => {
            format!("{}[{}]", operand_expression(target), expression(index))
        }
        Expr::Call(call) => call_expression(call),
    }
}

/// An expression used as the receiver of a member access or unary operator
fn operand_expression(expr: &Expr) -> String {
    match expr {
        Expr::Binary { grouped: false, .. } => format!("({})", expression(expr)),
        _ => expression(expr),
    }
}

fn call_expression(call: &Call) -> String {
    let args: Vec<String> = call.args.iter().map(expression).collect();
    format!("{}({})", call.name, args.join(", "))
}

pub fn condition(condition: &Condition) -> String {
    match condition {
        Condition::Compare { left, op, right } => {
            let symbol = match op {
                ComparisonOp::Equal => "===",
                ComparisonOp::NotEqual => "!==",
                other => other.symbol(),
            };
            format!("{} {symbol} {}", expression(left), expression(right))
        }
        Condition::Logical {
            left,
            op,
            right,
            grouped,
        } => {
            let symbol = match op {
                LogicalOp::And => "&&",
                LogicalOp::Or => "||",
            };
            let text = format!("{} {symbol} {}", self::condition(left), self::condition(right));
            if *grouped {
                format!("({text})")
            } else {
                text
            }
        }
        Condition::Not(inner) => format!("!({})", self::condition(inner)),
        Condition::Truthy(expr) => expression(expr),
    }
}
