// AST to IR transformation
// Collapses literal wrappers and separates conditions from value expressions

use crate::error::{TransformError, TransformResult};
use crate::ir::{self, ArithmeticOp, ComparisonOp, Condition, Expr, Literal, LogicalOp};
use spl_parser::ast::{self, Alternate, BinaryOperator, ExpressionKind, StatementKind, UnaryOperator};
use tracing::debug;

/// Build the IR for a parsed program
pub fn transform(program: &ast::Program) -> TransformResult<ir::Program> {
    let statements = block(&program.statements)?;
    debug!(statements = statements.len(), "transformed SPL program to IR");
    Ok(ir::Program { statements })
}

fn block(statements: &[ast::Statement]) -> TransformResult<Vec<ir::Statement>> {
    statements.iter().map(statement).collect()
}

fn statement(statement: &ast::Statement) -> TransformResult<ir::Statement> {
    let line = statement.line;
    let transformed = match &statement.kind {
        StatementKind::VariableDeclaration(declaration) => ir::Statement::Set {
            line,
            name: declaration.name.clone(),
            declared_type: declaration.declared_type,
            value: declaration.value.as_ref().map(expression).transpose()?,
        },
        StatementKind::Print(print) => ir::Statement::Print {
            line,
            value: expression(&print.value)?,
        },
        StatementKind::If(if_statement) => ir::Statement::If {
            line,
            condition: condition(&if_statement.condition)?,
            consequent: block(&if_statement.consequent)?,
            alternate: alternate(if_statement.alternate.as_ref())?,
            chained: false,
        },
        StatementKind::WhileLoop(while_loop) => ir::Statement::While {
            line,
            condition: condition(&while_loop.condition)?,
            body: block(&while_loop.body)?,
        },
        StatementKind::LoopUntil(loop_until) => ir::Statement::LoopUntil {
            line,
            condition: condition(&loop_until.condition)?,
            body: block(&loop_until.body)?,
        },
        StatementKind::ForLoop(for_loop) => ir::Statement::ForEach {
            line,
            iterator: for_loop.iterator.clone(),
            array: for_loop.array.clone(),
            body: block(&for_loop.body)?,
        },
        StatementKind::LoopFromTo(counted) => ir::Statement::LoopFromTo {
            line,
            variable: counted.variable.clone(),
            start: expression(&counted.start)?,
            end: expression(&counted.end)?,
            body: block(&counted.body)?,
        },
        StatementKind::FunctionDeclaration(function) => ir::Statement::FunctionDeclaration {
            line,
            name: function.name.clone(),
            params: function.params.clone(),
            body: block(&function.body)?,
        },
        StatementKind::FunctionCall(call_statement) => ir::Statement::Call(call(call_statement)?),
        StatementKind::Return(return_statement) => ir::Statement::Return {
            line,
            value: return_statement.value.as_ref().map(expression).transpose()?,
        },
        StatementKind::ArrayCreation(creation) => ir::Statement::CreateArray {
            line,
            name: creation.name.clone(),
            element_type: creation.element_type,
            elements: creation
                .elements
                .iter()
                .map(expression)
                .collect::<TransformResult<_>>()?,
        },
        StatementKind::ArrayInsertion(insertion) => ir::Statement::Insert {
            line,
            array: insertion.array.clone(),
            value: expression(&insertion.value)?,
            position: insertion.position.as_ref().map(expression).transpose()?,
        },
        StatementKind::ArraySetValue(set) => ir::Statement::SetElement {
            line,
            array: set.array.clone(),
            index: expression(&set.index)?,
            value: expression(&set.value)?,
        },
        StatementKind::Remove(remove) => ir::Statement::Remove {
            line,
            array: remove.array.clone(),
            position: expression(&remove.position)?,
        },
        StatementKind::Swap(swap) => ir::Statement::Swap {
            line,
            array: swap.array.clone(),
            first: expression(&swap.first)?,
            second: expression(&swap.second)?,
        },
    };
    Ok(transformed)
}

/// An otherwise-if link becomes a single chained `If` in the alternate
fn alternate(branch: Option<&Alternate>) -> TransformResult<Vec<ir::Statement>> {
    match branch {
        None => Ok(Vec::new()),
        Some(Alternate::Otherwise(body)) => block(body),
        Some(Alternate::OtherwiseIf(link)) => Ok(vec![ir::Statement::If {
            line: link.line,
            condition: condition(&link.condition)?,
            consequent: block(&link.consequent)?,
            alternate: alternate(link.alternate.as_ref())?,
            chained: true,
        }]),
    }
}

fn call(call: &ast::FunctionCall) -> TransformResult<ir::Call> {
    Ok(ir::Call {
        name: call.name.clone(),
        args: call
            .arguments
            .iter()
            .map(expression)
            .collect::<TransformResult<_>>()?,
        line: call.line,
    })
}

/// Transform an expression in value position
pub fn expression(expression: &ast::Expression) -> TransformResult<Expr> {
    let line = expression.line;
    let transformed = match &expression.kind {
        ExpressionKind::Number(number) => Expr::Literal(Literal::Number(number.value)),
        ExpressionKind::String(string) => Expr::Literal(Literal::String(string.value.clone())),
        ExpressionKind::Boolean(boolean) => Expr::Literal(Literal::Boolean(boolean.value)),
        ExpressionKind::Identifier(identifier) => Expr::Variable(identifier.name.clone()),
        ExpressionKind::Binary(binary) => {
            let op = arithmetic_operator(binary.operator).ok_or_else(|| {
                TransformError::ConditionInValuePosition {
                    line,
                    operator: binary.operator.symbol().to_string(),
                }
            })?;
            Expr::Binary {
                left: Box::new(self::expression(&binary.left)?),
                op,
                right: Box::new(self::expression(&binary.right)?),
                grouped: binary.grouped,
            }
        }
        ExpressionKind::Unary(unary) => match unary.operator {
            UnaryOperator::Minus => Expr::Negate(Box::new(self::expression(&unary.operand)?)),
            UnaryOperator::Not => return Err(TransformError::NotInValuePosition { line }),
        },
        ExpressionKind::Substring(substring) => Expr::Substring {
            target: Box::new(self::expression(&substring.target)?),
            start: Box::new(self::expression(&substring.start)?),
            end: Box::new(self::expression(&substring.end)?),
        },
        ExpressionKind::Length(length) => {
            Expr::Length(Box::new(self::expression(&length.target)?))
        }
        ExpressionKind::Index(index) => Expr::Index {
            kind: index.kind,
            target: Box::new(self::expression(&index.target)?),
            index: Box::new(self::expression(&index.index)?),
        },
        ExpressionKind::FunctionCall(function_call) => Expr::Call(call(function_call)?),
    };
    Ok(transformed)
}

/// Transform an expression in condition position
pub fn condition(expression: &ast::Expression) -> TransformResult<Condition> {
    match &expression.kind {
        ExpressionKind::Binary(binary) if binary.operator.is_comparison() => {
            Ok(Condition::Compare {
                left: self::expression(&binary.left)?,
                op: comparison_operator(binary.operator),
                right: self::expression(&binary.right)?,
            })
        }
        ExpressionKind::Binary(binary) if binary.operator.is_logical() => {
            Ok(Condition::Logical {
                left: Box::new(condition(&binary.left)?),
                op: if binary.operator == BinaryOperator::And {
                    LogicalOp::And
                } else {
                    LogicalOp::Or
                },
                right: Box::new(condition(&binary.right)?),
                grouped: binary.grouped,
            })
        }
        ExpressionKind::Unary(unary) if unary.operator == UnaryOperator::Not => {
            Ok(Condition::Not(Box::new(condition(&unary.operand)?)))
        }
        _ => Ok(Condition::Truthy(self::expression(expression)?)),
    }
}

fn arithmetic_operator(operator: BinaryOperator) -> Option<ArithmeticOp> {
    match operator {
        BinaryOperator::Add => Some(ArithmeticOp::Add),
        BinaryOperator::Subtract => Some(ArithmeticOp::Subtract),
        BinaryOperator::Multiply => Some(ArithmeticOp::Multiply),
        BinaryOperator::Divide => Some(ArithmeticOp::Divide),
        BinaryOperator::Modulo => Some(ArithmeticOp::Modulo),
        _ => None,
    }
}

/// Only called on operators that pass `is_comparison`
fn comparison_operator(operator: BinaryOperator) -> ComparisonOp {
    match operator {
        BinaryOperator::NotEqual => ComparisonOp::NotEqual,
        BinaryOperator::Less => ComparisonOp::Less,
        BinaryOperator::LessEqual => ComparisonOp::LessEqual,
        BinaryOperator::Greater => ComparisonOp::Greater,
        BinaryOperator::GreaterEqual => ComparisonOp::GreaterEqual,
        _ => ComparisonOp::Equal,
    }
}
