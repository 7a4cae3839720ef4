// SPL IR Library
// Normalised intermediate representation, the AST lowering pass and source emitters

pub mod emit;
pub mod error;
pub mod ir;
pub mod transform;

#[cfg(test)]
#[path = "tests/mod.rs"]
mod tests;

pub use emit::{JavaScriptEmitter, SourceEmitter};
pub use error::{EmitError, EmitResult, TransformError, TransformResult};
pub use ir::*;
pub use transform::transform;
