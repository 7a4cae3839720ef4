//! Expression and condition evaluation over the IR
//!
//! The evaluator walks an [`Expr`] tree exactly as it was parsed: arithmetic
//! chains are left-nested with no precedence applied, so `2 + 3 * 4` is
//! `(2 + 3) * 4` unless the source grouped it otherwise.
//!
//! Variable reads and function calls go through [`EvalContext`], which lets
//! the trace interpreter run callee bodies inline (recording their frames)
//! while a plain [`Environment`](crate::Environment) can evaluate
//! call-free expressions on its own.

use crate::error::{EvalResult, InterpretError};
use crate::operations;
use crate::value::Value;
use spl_ir::{Call, Condition, Expr, LogicalOp};

/// What evaluation needs from its surroundings
pub trait EvalContext {
    /// Read a variable; `line` is the statement doing the reading
    fn lookup(&self, name: &str, line: usize) -> EvalResult<Value>;

    /// Run a function and produce its return value
    fn call(&mut self, call: &Call) -> Result<Value, InterpretError>;
}

/// Evaluate `expr` as part of the statement on `line`
pub fn evaluate<C: EvalContext + ?Sized>(
    expr: &Expr,
    line: usize,
    ctx: &mut C,
) -> EvalResult<Value> {
    match expr {
        Expr::Literal(literal) => Ok(Value::from(literal)),
        Expr::Variable(name) => ctx.lookup(name, line),
        Expr::Binary {
            left, op, right, ..
        } => {
            let left = evaluate(left, line, ctx)?;
            let right = evaluate(right, line, ctx)?;
            operations::arithmetic(*op, &left, &right, line)
        }
        Expr::Negate(operand) => operations::negate(&evaluate(operand, line, ctx)?, line),
        Expr::Substring { target, start, end } => {
            let label = operations::target_label(target);
            let target = evaluate(target, line, ctx)?;
            let start = evaluate(start, line, ctx)?;
            let end = evaluate(end, line, ctx)?;
            Ok(operations::substring(&label, &target, &start, &end, line)?)
        }
        Expr::Length(target) => {
            let label = operations::target_label(target);
            operations::length(&label, &evaluate(target, line, ctx)?, line)
        }
        Expr::Index { target, index, .. } => {
            let label = operations::target_label(target);
            let target = evaluate(target, line, ctx)?;
            let index = evaluate(index, line, ctx)?;
            Ok(operations::index(&label, &target, &index, line)?)
        }
        Expr::Call(call) => Ok(ctx.call(call)?),
    }
}

/// `and`/`or` short-circuit: the right side is not evaluated, and so cannot
/// fail or call anything, once the left side decides the result.
pub fn evaluate_condition<C: EvalContext + ?Sized>(
    condition: &Condition,
    line: usize,
    ctx: &mut C,
) -> EvalResult<bool> {
    match condition {
        Condition::Compare { left, op, right } => {
            let left = evaluate(left, line, ctx)?;
            let right = evaluate(right, line, ctx)?;
            operations::compare(*op, &left, &right, line)
        }
        Condition::Logical {
            left, op, right, ..
        } => {
            let left = evaluate_condition(left, line, ctx)?;
            match (op, left) {
                (LogicalOp::And, false) => Ok(false),
                (LogicalOp::Or, true) => Ok(true),
                _ => evaluate_condition(right, line, ctx),
            }
        }
        Condition::Not(inner) => Ok(!evaluate_condition(inner, line, ctx)?),
        Condition::Truthy(expr) => Ok(evaluate(expr, line, ctx)?.is_truthy()),
    }
}
