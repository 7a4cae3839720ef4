//! Runtime value representation for the SPL trace interpreter.
//!
//! Values coerce on read: a string that looks like a number takes part in
//! arithmetic and comparison as that number, whatever it was declared as.

use serde::{Serialize, Serializer};
use spl_ir::{Literal, TypeName};
use std::fmt;

/// Runtime values in the SPL interpreter
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    String(String),
    Boolean(bool),
    Array(Vec<Value>),
    /// Declared without a value, or read one past the end of a sequence
    Undefined,
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Boolean(_) => "boolean",
            Value::Array(_) => "array",
            Value::Undefined => "undefined",
        }
    }

    /// Truthiness of a bare value used as a condition
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            Value::Boolean(b) => *b,
            Value::Array(_) => true,
            Value::Undefined => false,
        }
    }

    /// Numeric reading of this value: numbers as-is, and non-empty strings
    /// whose trimmed text parses as a finite number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return None;
                }
                trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
            }
            _ => None,
        }
    }

    pub fn matches_type(&self, expected: TypeName) -> bool {
        matches!(
            (self, expected),
            (Value::Number(_), TypeName::Number)
                | (Value::String(_), TypeName::String)
                | (Value::Boolean(_), TypeName::Boolean)
        )
    }

    /// Rendering used in frame descriptions: strings keep their quotes
    pub fn describe(&self) -> String {
        match self {
            Value::String(s) => format!("\"{s}\""),
            Value::Array(items) => {
                let items: Vec<String> = items.iter().map(Value::describe).collect();
                format!("[{}]", items.join(", "))
            }
            other => other.to_string(),
        }
    }
}

/// Whole numbers print without a fractional part
pub fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::String(s) => f.write_str(s),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Array(items) => {
                let items: Vec<String> = items.iter().map(Value::to_string).collect();
                write!(f, "[{}]", items.join(", "))
            }
            Value::Undefined => f.write_str("undefined"),
        }
    }
}

impl From<&Literal> for Value {
    fn from(literal: &Literal) -> Self {
        match literal {
            Literal::Number(n) => Value::Number(*n),
            Literal::String(s) => Value::String(s.clone()),
            Literal::Boolean(b) => Value::Boolean(*b),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

/// Integral numbers serialise as JSON integers and `Undefined` as `null`
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Number(n) if n.is_finite() && n.fract() == 0.0 && n.abs() < 9.0e15 => {
                serializer.serialize_i64(*n as i64)
            }
            Value::Number(n) => serializer.serialize_f64(*n),
            Value::String(s) => serializer.serialize_str(s),
            Value::Boolean(b) => serializer.serialize_bool(*b),
            Value::Array(items) => serializer.collect_seq(items),
            Value::Undefined => serializer.serialize_none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_numeric_strings_coerce_on_read() {
        assert_eq!(Value::from(" 42 ").as_number(), Some(42.0));
        assert_eq!(Value::from("3.5").as_number(), Some(3.5));
        assert_eq!(Value::from("").as_number(), None);
        assert_eq!(Value::from("abc").as_number(), None);
        assert_eq!(Value::from("inf").as_number(), None);
        assert_eq!(Value::Boolean(true).as_number(), None);
    }

    #[test]
    fn test_truthiness() {
        assert!(Value::Number(2.0).is_truthy());
        assert!(!Value::Number(0.0).is_truthy());
        assert!(!Value::from("").is_truthy());
        assert!(Value::Array(vec![]).is_truthy());
        assert!(!Value::Undefined.is_truthy());
    }

    #[test]
    fn test_display_and_describe() {
        let array = Value::Array(vec![Value::Number(1.0), Value::from("a"), Value::Number(2.5)]);
        assert_eq!(array.to_string(), "[1, a, 2.5]");
        assert_eq!(array.describe(), "[1, \"a\", 2.5]");
        assert_eq!(Value::Number(-3.0).to_string(), "-3");
    }

    #[test]
    fn test_json_shape() {
        let array = Value::Array(vec![
            Value::Number(1.0),
            Value::Number(1.5),
            Value::Boolean(false),
            Value::Undefined,
        ]);
        assert_eq!(serde_json::to_string(&array).unwrap(), "[1,1.5,false,null]");
    }
}
