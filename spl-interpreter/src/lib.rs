//! SPL trace interpreter
//!
//! Runs SPL pseudocode and records every observable step as an action
//! frame, for step-by-step algorithm visualisation:
//!
//! ```text
//! source → tokens → AST → IR → TraceInterpreter → Vec<ActionFrame>
//! ```
//!
//! [`compile_to_trace`] runs the whole pipeline. [`compile_to_source`] shares
//! the front half and hands the IR to the JavaScript emitter instead.

pub mod environment;
pub mod error;
pub mod evaluator;
pub mod frame;
pub mod interpreter;
pub mod operations;
pub mod options;
pub mod test_harness;
pub mod value;

#[cfg(test)]
#[path = "tests/mod.rs"]
pub mod tests;

pub use environment::{Environment, FunctionDef};
pub use error::{
    CompileError, EvalError, EvalResult, InterpretError, InterpretResult,
};
pub use evaluator::{evaluate, evaluate_condition, EvalContext};
pub use frame::{Action, ActionFrame, Descriptor, FrameValue};
pub use interpreter::TraceInterpreter;
pub use options::TraceOptions;
pub use test_harness::{TestHarnessError, TraceSession};
pub use value::Value;

use spl_ir::{JavaScriptEmitter, SourceEmitter};

/// Lower SPL source text to IR
pub fn compile_to_ir(source: &str) -> Result<spl_ir::Program, CompileError> {
    let tokens = spl_parser::tokenize(source)?;
    let ast = spl_parser::parse(tokens)?;
    Ok(spl_ir::transform(&ast)?)
}

/// Run SPL source text and return its action frames, with default options
pub fn compile_to_trace(source: &str) -> Result<Vec<ActionFrame>, CompileError> {
    compile_to_trace_with(source, &TraceOptions::default())
}

pub fn compile_to_trace_with(
    source: &str,
    options: &TraceOptions,
) -> Result<Vec<ActionFrame>, CompileError> {
    let program = compile_to_ir(source)?;
    let frames = TraceInterpreter::new(options.clone()).run(&program)?;
    Ok(frames)
}

/// Translate SPL source text to JavaScript
pub fn compile_to_source(source: &str) -> Result<String, CompileError> {
    let program = compile_to_ir(source)?;
    Ok(JavaScriptEmitter::new().emit(&program)?)
}

// Version and metadata
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
