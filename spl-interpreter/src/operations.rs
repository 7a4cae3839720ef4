//! Value-level operations shared by the evaluator and the trace interpreter
//!
//! Every operation takes the line of the statement being executed so its
//! errors can point back at the source. Reads into strings and arrays also
//! take a label naming the target, usually the variable it was read from.

use crate::error::{EvalError, EvalResult, InterpretError, InterpretResult};
use crate::value::{format_number, Value};
use spl_ir::{ArithmeticOp, ComparisonOp, Expr};
use std::cmp::Ordering;

pub fn arithmetic(
    op: ArithmeticOp,
    left: &Value,
    right: &Value,
    line: usize,
) -> EvalResult<Value> {
    let numbers = left.as_number().zip(right.as_number());

    if op == ArithmeticOp::Add {
        return match numbers {
            Some((a, b)) => Ok(Value::Number(a + b)),
            None if matches!(left, Value::String(_)) || matches!(right, Value::String(_)) => {
                Ok(Value::String(format!("{left}{right}")))
            }
            None => Err(invalid_operands(op.symbol(), left, right, line)),
        };
    }

    let (a, b) = numbers.ok_or_else(|| invalid_operands(op.symbol(), left, right, line))?;
    let result = match op {
        ArithmeticOp::Subtract => a - b,
        ArithmeticOp::Multiply => a * b,
        ArithmeticOp::Divide | ArithmeticOp::Modulo if b == 0.0 => {
            return Err(EvalError::DivisionByZero {
                operator: op.symbol(),
                left: format_number(a),
                line,
            });
        }
        ArithmeticOp::Divide => a / b,
        ArithmeticOp::Modulo => a % b,
        ArithmeticOp::Add => a + b,
    };
    Ok(Value::Number(result))
}

pub fn negate(value: &Value, line: usize) -> EvalResult<Value> {
    value
        .as_number()
        .map(|n| Value::Number(-n))
        .ok_or_else(|| EvalError::InvalidOperand {
            operator: "-",
            found: value.describe(),
            line,
        })
}

/// Equality is numeric when both sides read as numbers and structural otherwise;
/// ordering needs two numbers or two strings
pub fn compare(op: ComparisonOp, left: &Value, right: &Value, line: usize) -> EvalResult<bool> {
    match op {
        ComparisonOp::Equal => Ok(loosely_equal(left, right)),
        ComparisonOp::NotEqual => Ok(!loosely_equal(left, right)),
        _ => {
            let ordering = order(left, right)
                .ok_or_else(|| invalid_operands(op.symbol(), left, right, line))?;
            Ok(match op {
                ComparisonOp::Less => ordering == Ordering::Less,
                ComparisonOp::LessEqual => ordering != Ordering::Greater,
                ComparisonOp::Greater => ordering == Ordering::Greater,
                _ => ordering != Ordering::Less,
            })
        }
    }
}

fn loosely_equal(left: &Value, right: &Value) -> bool {
    match (left.as_number(), right.as_number()) {
        (Some(a), Some(b)) => a == b,
        _ => left == right,
    }
}

fn order(left: &Value, right: &Value) -> Option<Ordering> {
    if let (Some(a), Some(b)) = (left.as_number(), right.as_number()) {
        return a.partial_cmp(&b);
    }
    match (left, right) {
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

fn invalid_operands(operator: &'static str, left: &Value, right: &Value, line: usize) -> EvalError {
    EvalError::InvalidOperands {
        operator,
        left: left.describe(),
        right: right.describe(),
        line,
    }
}

/// How a read target is named in frames and errors: the variable name, or
/// the expression text when the target is not a plain variable
pub fn target_label(target: &Expr) -> String {
    match target.as_variable() {
        Some(name) => name.to_string(),
        None => target.to_string(),
    }
}

pub fn length(label: &str, target: &Value, line: usize) -> EvalResult<Value> {
    match target {
        Value::String(s) => Ok(Value::Number(s.chars().count() as f64)),
        Value::Array(items) => Ok(Value::Number(items.len() as f64)),
        other => Err(EvalError::InvalidLengthTarget {
            target: label.to_string(),
            found: other.type_name(),
            line,
        }),
    }
}

/// Characters `start..end` of `target`. `end` past the string is clamped;
/// a negative start or a start after the end is an error.
pub fn substring(
    label: &str,
    target: &Value,
    start: &Value,
    end: &Value,
    line: usize,
) -> InterpretResult<Value> {
    let Value::String(text) = target else {
        return Err(EvalError::InvalidSubstringTarget {
            target: label.to_string(),
            found: target.type_name(),
            line,
        }
        .into());
    };
    let start = substring_bound(label, start, line)?.trunc();
    let end = substring_bound(label, end, line)?.trunc();

    if start < 0.0 {
        return Err(InterpretError::SubstringStartNegative {
            target: label.to_string(),
            start,
            end,
            line,
        });
    }
    if start > end {
        return Err(InterpretError::SubstringStartAfterEnd {
            target: label.to_string(),
            start,
            end,
            line,
        });
    }

    let slice: String = text
        .chars()
        .skip(start as usize)
        .take((end - start) as usize)
        .collect();
    Ok(Value::String(slice))
}

fn substring_bound(label: &str, value: &Value, line: usize) -> InterpretResult<f64> {
    value
        .as_number()
        .ok_or_else(|| InterpretError::SubstringIndexNotNumeric {
            target: label.to_string(),
            value: value.describe(),
            line,
        })
}

/// Element of an array or character of a string.
///
/// Reading exactly one past the end yields `Undefined`; anything further out
/// is an error.
pub fn index(
    label: &str,
    target: &Value,
    index: &Value,
    line: usize,
) -> InterpretResult<Value> {
    let length = match target {
        Value::String(s) => s.chars().count(),
        Value::Array(items) => items.len(),
        other => {
            return Err(EvalError::InvalidIndexTarget {
                target: label.to_string(),
                found: other.type_name(),
                line,
            }
            .into());
        }
    };

    let position = whole_number(index).ok_or_else(|| InterpretError::InvalidIndex {
        target: label.to_string(),
        found: target.type_name(),
        value: index.describe(),
        line,
    })?;
    if position < 0 || position as usize > length {
        return Err(InterpretError::IndexOutOfBounds {
            target: label.to_string(),
            found: target.type_name(),
            index: position,
            length,
            line,
        });
    }

    let position = position as usize;
    Ok(match target {
        Value::String(s) => s
            .chars()
            .nth(position)
            .map_or(Value::Undefined, |c| Value::String(c.to_string())),
        Value::Array(items) => items.get(position).cloned().unwrap_or(Value::Undefined),
        _ => Value::Undefined,
    })
}

/// Integral numeric reading of a value
pub fn whole_number(value: &Value) -> Option<i64> {
    value
        .as_number()
        .filter(|n| n.fract() == 0.0)
        .map(|n| n as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn n(value: f64) -> Value {
        Value::Number(value)
    }

    fn s(value: &str) -> Value {
        Value::from(value)
    }

    #[test]
    fn test_addition_prefers_numbers_then_concatenates() {
        assert_eq!(arithmetic(ArithmeticOp::Add, &n(2.0), &s("3"), 1), Ok(n(5.0)));
        assert_eq!(arithmetic(ArithmeticOp::Add, &s("a"), &n(1.0), 1), Ok(s("a1")));
        assert!(matches!(
            arithmetic(ArithmeticOp::Add, &n(1.0), &Value::Boolean(true), 4),
            Err(EvalError::InvalidOperands {
                operator: "+",
                line: 4,
                ..
            })
        ));
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(
            arithmetic(ArithmeticOp::Modulo, &n(7.0), &n(0.0), 3),
            Err(EvalError::DivisionByZero {
                operator: "%",
                left: "7".into(),
                line: 3,
            })
        );
        assert_eq!(arithmetic(ArithmeticOp::Divide, &n(7.0), &n(2.0), 1), Ok(n(3.5)));
    }

    #[test]
    fn test_comparisons_coerce_numeric_strings() {
        assert_eq!(compare(ComparisonOp::Equal, &s("10"), &n(10.0), 1), Ok(true));
        assert_eq!(compare(ComparisonOp::Greater, &s("9"), &n(10.0), 1), Ok(false));
        assert_eq!(compare(ComparisonOp::Less, &s("apple"), &s("banana"), 1), Ok(true));
        assert_eq!(compare(ComparisonOp::NotEqual, &s("a"), &n(1.0), 1), Ok(true));
        assert!(compare(ComparisonOp::Less, &s("a"), &n(1.0), 1).is_err());
    }

    #[test]
    fn test_substring_bounds() {
        assert_eq!(substring("t", &s("hello"), &n(1.0), &n(3.0), 1), Ok(s("el")));
        assert_eq!(substring("t", &s("hello"), &n(2.0), &n(2.0), 1), Ok(s("")));
        assert_eq!(substring("t", &s("hello"), &n(0.0), &n(5.0), 1), Ok(s("hello")));
        assert_eq!(substring("t", &s("hello"), &n(3.0), &n(99.0), 1), Ok(s("lo")));

        let error = substring("t", &s("hello"), &n(5.0), &n(2.0), 7).unwrap_err();
        assert_eq!(
            error.to_string(),
            "Substring start index 5 is greater than end index 2 in substring of 't' (line 7)"
        );
        assert!(matches!(
            substring("t", &s("hello"), &n(-1.0), &n(2.0), 1),
            Err(InterpretError::SubstringStartNegative { .. })
        ));
        assert!(matches!(
            substring("t", &s("hello"), &s("x"), &n(2.0), 1),
            Err(InterpretError::SubstringIndexNotNumeric { .. })
        ));
    }

    #[test]
    fn test_index_one_past_end_is_undefined() {
        let array = Value::Array(vec![n(1.0), n(2.0)]);
        assert_eq!(index("a", &array, &n(1.0), 1), Ok(n(2.0)));
        assert_eq!(index("a", &array, &n(2.0), 1), Ok(Value::Undefined));
        assert_eq!(
            index("a", &array, &n(3.0), 5),
            Err(InterpretError::IndexOutOfBounds {
                target: "a".into(),
                found: "array",
                index: 3,
                length: 2,
                line: 5,
            })
        );
        assert_eq!(index("w", &s("abc"), &n(0.0), 1), Ok(s("a")));
    }

    #[test]
    fn test_length_targets() {
        assert_eq!(length("s", &s("héllo"), 1), Ok(n(5.0)));
        assert_eq!(
            length("n", &n(3.0), 2),
            Err(EvalError::InvalidLengthTarget {
                target: "n".into(),
                found: "number",
                line: 2,
            })
        );
    }
}
