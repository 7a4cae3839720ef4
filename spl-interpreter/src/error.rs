//! Error types for evaluation, trace interpretation and the whole pipeline
//!
//! Every message is shown to end users as-is, so each one names the variable,
//! value, index or bound involved.

use miette::Diagnostic;
use spl_ir::{EmitError, TransformError, TypeName};
use spl_parser::{LexError, ParseError};
use thiserror::Error;

/// Failures while computing the value of an expression or condition
#[derive(Debug, Error, Diagnostic, Clone, PartialEq)]
pub enum EvalError {
    #[error("Variable '{name}' is not declared (line {line})")]
    #[diagnostic(
        code(spl::eval::undeclared_variable),
        help("Give the variable a value with SET before reading it")
    )]
    UndeclaredVariable { name: String, line: usize },

    #[error(
        "Cannot take the length of '{target}', a {found}; LENGTH OF needs a string or an array (line {line})"
    )]
    #[diagnostic(code(spl::eval::invalid_length_target))]
    InvalidLengthTarget {
        target: String,
        found: &'static str,
        line: usize,
    },

    #[error(
        "Cannot index into '{target}', a {found}; only strings and arrays have elements (line {line})"
    )]
    #[diagnostic(code(spl::eval::invalid_index_target))]
    InvalidIndexTarget {
        target: String,
        found: &'static str,
        line: usize,
    },

    #[error("Cannot take a substring of '{target}', a {found} (line {line})")]
    #[diagnostic(code(spl::eval::invalid_substring_target))]
    InvalidSubstringTarget {
        target: String,
        found: &'static str,
        line: usize,
    },

    #[error("Operator '{operator}' cannot be applied to {left} and {right} (line {line})")]
    #[diagnostic(code(spl::eval::invalid_operands))]
    InvalidOperands {
        operator: &'static str,
        left: String,
        right: String,
        line: usize,
    },

    #[error("Operator '{operator}' cannot be applied to {found} (line {line})")]
    #[diagnostic(code(spl::eval::invalid_operand))]
    InvalidOperand {
        operator: &'static str,
        found: String,
        line: usize,
    },

    #[error("Division by zero: {left} {operator} 0 (line {line})")]
    #[diagnostic(code(spl::eval::division_by_zero))]
    DivisionByZero {
        operator: &'static str,
        left: String,
        line: usize,
    },

    /// A statement-level failure raised while evaluating, such as a function call
    #[error(transparent)]
    #[diagnostic(code(spl::eval::runtime))]
    Runtime(Box<InterpretError>),
}

pub type EvalResult<T> = Result<T, EvalError>;

/// Failures while executing statements and producing frames
#[derive(Debug, Error, Diagnostic, Clone, PartialEq)]
pub enum InterpretError {
    #[error(
        "Substring start index {start} of '{target}' cannot be negative (end index {end}, line {line})"
    )]
    #[diagnostic(code(spl::interpret::substring_start_negative))]
    SubstringStartNegative {
        target: String,
        start: f64,
        end: f64,
        line: usize,
    },

    #[error(
        "Substring start index {start} is greater than end index {end} in substring of '{target}' (line {line})"
    )]
    #[diagnostic(
        code(spl::interpret::substring_start_after_end),
        help("SUBSTRING OF text FROM start TO end needs start <= end")
    )]
    SubstringStartAfterEnd {
        target: String,
        start: f64,
        end: f64,
        line: usize,
    },

    #[error("Substring index {value} for '{target}' is not a number (line {line})")]
    #[diagnostic(code(spl::interpret::substring_index_not_numeric))]
    SubstringIndexNotNumeric {
        target: String,
        value: String,
        line: usize,
    },

    #[error("Index {index} is out of bounds for {found} '{target}' of length {length} (line {line})")]
    #[diagnostic(code(spl::interpret::index_out_of_bounds))]
    IndexOutOfBounds {
        target: String,
        found: &'static str,
        index: i64,
        length: usize,
        line: usize,
    },

    #[error("Index {value} into {found} '{target}' is not a whole number (line {line})")]
    #[diagnostic(code(spl::interpret::invalid_index))]
    InvalidIndex {
        target: String,
        found: &'static str,
        value: String,
        line: usize,
    },

    #[error(
        "Cannot {operation} at position {position} of array '{array}' with length {length} (line {line})"
    )]
    #[diagnostic(code(spl::interpret::position_out_of_bounds))]
    PositionOutOfBounds {
        operation: &'static str,
        array: String,
        position: i64,
        length: usize,
        line: usize,
    },

    #[error("Position {value} for {operation} on array '{array}' is not a whole number (line {line})")]
    #[diagnostic(code(spl::interpret::invalid_position))]
    InvalidPosition {
        operation: &'static str,
        array: String,
        value: String,
        line: usize,
    },

    #[error("Array '{array}' is not initialized (line {line})")]
    #[diagnostic(
        code(spl::interpret::array_not_initialized),
        help("Create it first with CREATE ARRAY AS {array}")
    )]
    ArrayNotInitialized { array: String, line: usize },

    #[error("'{name}' holds a {found}, not an array (line {line})")]
    #[diagnostic(code(spl::interpret::not_an_array))]
    NotAnArray {
        name: String,
        found: &'static str,
        line: usize,
    },

    #[error("Array '{array}' holds {expected} values and cannot store the {found} {value} (line {line})")]
    #[diagnostic(code(spl::interpret::element_type_mismatch))]
    ElementTypeMismatch {
        array: String,
        expected: TypeName,
        found: &'static str,
        value: String,
        line: usize,
    },

    #[error("Variable '{name}' is declared as {expected} but was given the {found} {value} (line {line})")]
    #[diagnostic(code(spl::interpret::declared_type_mismatch))]
    DeclaredTypeMismatch {
        name: String,
        expected: TypeName,
        found: &'static str,
        value: String,
        line: usize,
    },

    #[error(
        "Function '{function}' expects {expected} argument(s) but was called with {found} on line {line}"
    )]
    #[diagnostic(
        code(spl::interpret::argument_count),
        help("'{function}' is declared on line {declared_line}")
    )]
    ArgumentCount {
        function: String,
        expected: usize,
        found: usize,
        line: usize,
        declared_line: usize,
    },

    #[error("Function '{name}' is not defined (called on line {line})")]
    #[diagnostic(
        code(spl::interpret::unknown_function),
        help("Declare it with FUNCTION {name} ... END FUNCTION before calling it")
    )]
    UnknownFunction { name: String, line: usize },

    #[error("Function '{function}' did not return a value (called on line {line})")]
    #[diagnostic(code(spl::interpret::no_return_value))]
    NoReturnValue { function: String, line: usize },

    #[error("RETURN on line {line} is outside any function")]
    #[diagnostic(code(spl::interpret::return_outside_function))]
    ReturnOutsideFunction { line: usize },

    #[error("Cannot print an undefined value on line {line}")]
    #[diagnostic(
        code(spl::interpret::unprintable_value),
        help("Give the variable a value with SET before printing it")
    )]
    UnprintableValue { line: usize },

    #[error("PRINT on line {line} cannot evaluate '{operand}' inline")]
    #[diagnostic(
        code(spl::interpret::unsupported_print_operand),
        help("SET the result to a variable first, then PRINT the variable")
    )]
    UnsupportedPrintOperand { operand: String, line: usize },

    #[error("Call to '{function}' on line {line} exceeds the maximum call depth of {limit}")]
    #[diagnostic(code(spl::interpret::call_depth_exceeded))]
    CallDepthExceeded {
        function: String,
        limit: usize,
        line: usize,
    },

    #[error("Execution exceeded the limit of {limit} frames")]
    #[diagnostic(
        code(spl::interpret::frame_limit_exceeded),
        help("The program may contain a loop that never ends")
    )]
    FrameLimitExceeded { limit: usize },

    #[error("Loop {bound} {value} for '{variable}' is not a number (line {line})")]
    #[diagnostic(code(spl::interpret::range_bound_not_numeric))]
    RangeBoundNotNumeric {
        variable: String,
        bound: &'static str,
        value: String,
        line: usize,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Eval(EvalError),
}

impl From<EvalError> for InterpretError {
    /// Statement failures that travelled through an expression come back out unwrapped
    fn from(error: EvalError) -> Self {
        match error {
            EvalError::Runtime(inner) => *inner,
            other => InterpretError::Eval(other),
        }
    }
}

impl From<InterpretError> for EvalError {
    fn from(error: InterpretError) -> Self {
        match error {
            InterpretError::Eval(inner) => inner,
            other => EvalError::Runtime(Box::new(other)),
        }
    }
}

pub type InterpretResult<T> = Result<T, InterpretError>;

/// Any failure of the text-to-output pipeline
#[derive(Debug, Error, Diagnostic, Clone, PartialEq)]
pub enum CompileError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Transform(#[from] TransformError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Emit(#[from] EmitError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Interpret(#[from] InterpretError),
}

impl From<spl_parser::SyntaxError> for CompileError {
    fn from(error: spl_parser::SyntaxError) -> Self {
        match error {
            spl_parser::SyntaxError::Lex(error) => CompileError::Lex(error),
            spl_parser::SyntaxError::Parse(error) => CompileError::Parse(error),
        }
    }
}
