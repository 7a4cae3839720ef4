//! Action frames: the ordered record of every observable execution step.
//!
//! A frame serialises flat, as `{line, operation, ...fields, description, timestamp}`,
//! with camelCase field names. The `operation` tags and field names are read by
//! visualisation front ends and must stay stable.

use crate::value::Value;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionFrame {
    /// `None` for synthetic closing frames (`endif`, `loop_end`)
    pub line: Option<usize>,
    #[serde(flatten)]
    pub action: Action,
    pub description: String,
    pub timestamp: u64,
}

impl ActionFrame {
    pub fn operation(&self) -> &'static str {
        self.action.operation()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(
    tag = "operation",
    rename_all = "snake_case",
    rename_all_fields = "camelCase"
)]
pub enum Action {
    Set {
        var_name: String,
        #[serde(rename = "type")]
        value_type: String,
        value: FrameValue,
    },
    SetArray {
        var_name: String,
        index: usize,
        value: Value,
    },
    If {
        condition: String,
        result: bool,
    },
    #[serde(rename = "endif")]
    EndIf,
    While {
        condition: String,
    },
    LoopFromTo {
        var_name: String,
        start: Value,
        end: Value,
    },
    For {
        var_name: String,
        array_name: String,
    },
    LoopEnd,
    Print {
        is_literal: bool,
        var_name: Option<String>,
        literal: Value,
    },
    Define {
        name: String,
        params: Vec<String>,
    },
    FunctionCall {
        name: String,
        args: Vec<Value>,
    },
    Return {
        value: Value,
    },
    Create {
        var_name: String,
        element_type: Option<String>,
        value: Value,
    },
    Add {
        var_name: String,
        value: Value,
        position: usize,
    },
    Remove {
        var_name: String,
        position: usize,
        value: Value,
    },
    Swap {
        var_name: String,
        first: usize,
        second: usize,
    },
}

impl Action {
    /// The serialised `operation` tag
    pub fn operation(&self) -> &'static str {
        match self {
            Action::Set { .. } => "set",
            Action::SetArray { .. } => "set_array",
            Action::If { .. } => "if",
            Action::EndIf => "endif",
            Action::While { .. } => "while",
            Action::LoopFromTo { .. } => "loop_from_to",
            Action::For { .. } => "for",
            Action::LoopEnd => "loop_end",
            Action::Print { .. } => "print",
            Action::Define { .. } => "define",
            Action::FunctionCall { .. } => "function_call",
            Action::Return { .. } => "return",
            Action::Create { .. } => "create",
            Action::Add { .. } => "add",
            Action::Remove { .. } => "remove",
            Action::Swap { .. } => "swap",
        }
    }
}

/// The `value` of a `set` frame: a plain value, or a record of how it was read
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FrameValue {
    Value(Value),
    Descriptor(Descriptor),
}

impl FrameValue {
    /// The value that was stored
    pub fn result(&self) -> &Value {
        match self {
            FrameValue::Value(value) => value,
            FrameValue::Descriptor(descriptor) => descriptor.result(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "operation", rename_all = "lowercase")]
pub enum Descriptor {
    Get {
        target: String,
        index: Value,
        result: Value,
    },
    Substring {
        target: String,
        start: Value,
        end: Value,
        result: Value,
    },
    Length {
        target: String,
        result: Value,
    },
}

impl Descriptor {
    pub fn result(&self) -> &Value {
        match self {
            Descriptor::Get { result, .. }
            | Descriptor::Substring { result, .. }
            | Descriptor::Length { result, .. } => result,
        }
    }
}
