// SPL IR Error Handling

use miette::Diagnostic;
use thiserror::Error;

/// An AST shape the transformer has no IR for.
///
/// The parser never produces these; reaching one means the two have drifted.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum TransformError {
    #[error("Condition operator '{operator}' used as a value on line {line}")]
    #[diagnostic(
        code(spl::transform::condition_in_value_position),
        help("Comparisons and AND/OR may only appear in IF, WHILE and LOOP conditions")
    )]
    ConditionInValuePosition { line: usize, operator: String },

    #[error("NOT used as a value on line {line}")]
    #[diagnostic(
        code(spl::transform::not_in_value_position),
        help("NOT may only appear in IF, WHILE and LOOP conditions")
    )]
    NotInValuePosition { line: usize },
}

#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum EmitError {
    #[error("RETURN on line {line} is outside any function")]
    #[diagnostic(
        code(spl::emit::return_outside_function),
        help("Move the RETURN inside a FUNCTION ... END FUNCTION block")
    )]
    ReturnOutsideFunction { line: usize },
}

pub type TransformResult<T> = Result<T, TransformError>;
pub type EmitResult<T> = Result<T, EmitError>;
