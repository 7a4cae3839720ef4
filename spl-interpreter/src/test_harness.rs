//! Trace session for exercising the SPL pipeline in tests
//!
//! A [`TraceSession`] runs source text through the whole pipeline with
//! timestamps off, keeps the resulting frames, and offers assertions over
//! their operations, descriptions and printed output.

use crate::{compile_to_trace_with, Action, ActionFrame, CompileError, TraceOptions, Value};
use miette::Diagnostic;
use thiserror::Error;

/// Errors that can occur during test harness operations
#[derive(Debug, Error, Diagnostic)]
pub enum TestHarnessError {
    #[error("Compile error: {source}")]
    Compile {
        #[from]
        source: CompileError,
    },

    #[error("Expected compilation to fail, but it produced {frames} frames")]
    UnexpectedSuccess { frames: usize },

    #[error("Assertion failed: expected {expected}, but got {actual}")]
    AssertionFailed { expected: String, actual: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

/// Runs SPL programs and inspects their traces
#[derive(Debug)]
pub struct TraceSession {
    options: TraceOptions,
    frames: Vec<ActionFrame>,
}

impl Default for TraceSession {
    fn default() -> Self {
        Self::new()
    }
}

impl TraceSession {
    /// A session whose traces are byte-for-byte reproducible
    pub fn new() -> Self {
        Self::with_options(TraceOptions::deterministic())
    }

    pub fn with_options(options: TraceOptions) -> Self {
        Self {
            options,
            frames: Vec::new(),
        }
    }

    /// Run `source`, replacing the frames of any earlier run
    pub fn run(&mut self, source: &str) -> Result<&[ActionFrame], TestHarnessError> {
        self.frames = compile_to_trace_with(source, &self.options)?;
        Ok(&self.frames)
    }

    pub fn frames(&self) -> &[ActionFrame] {
        &self.frames
    }

    pub fn operations(&self) -> Vec<&'static str> {
        self.frames.iter().map(ActionFrame::operation).collect()
    }

    pub fn descriptions(&self) -> Vec<&str> {
        self.frames
            .iter()
            .map(|frame| frame.description.as_str())
            .collect()
    }

    /// Values recorded by `print` frames, in order
    pub fn printed(&self) -> Vec<&Value> {
        self.frames
            .iter()
            .filter_map(|frame| match &frame.action {
                Action::Print { literal, .. } => Some(literal),
                _ => None,
            })
            .collect()
    }

    pub fn to_json(&self) -> Result<String, TestHarnessError> {
        serde_json::to_string(&self.frames).map_err(|err| TestHarnessError::Serialization {
            message: err.to_string(),
        })
    }

    pub fn assert_operations(
        &mut self,
        source: &str,
        expected: &[&str],
    ) -> Result<(), TestHarnessError> {
        self.run(source)?;
        let actual = self.operations();
        if actual != expected {
            return Err(TestHarnessError::AssertionFailed {
                expected: format!("{expected:?}"),
                actual: format!("{actual:?}"),
            });
        }
        Ok(())
    }

    /// Compare printed output, rendered the way a console would show it
    pub fn assert_printed(
        &mut self,
        source: &str,
        expected: &[&str],
    ) -> Result<(), TestHarnessError> {
        self.run(source)?;
        let actual: Vec<String> = self.printed().iter().map(|v| v.to_string()).collect();
        if actual != expected {
            return Err(TestHarnessError::AssertionFailed {
                expected: format!("{expected:?}"),
                actual: format!("{actual:?}"),
            });
        }
        Ok(())
    }

    /// Expect `source` to fail with a message containing every fragment
    pub fn assert_error_contains(
        &self,
        source: &str,
        fragments: &[&str],
    ) -> Result<CompileError, TestHarnessError> {
        let error = match compile_to_trace_with(source, &self.options) {
            Ok(frames) => {
                return Err(TestHarnessError::UnexpectedSuccess {
                    frames: frames.len(),
                });
            }
            Err(error) => error,
        };

        let message = error.to_string();
        if let Some(missing) = fragments.iter().find(|f| !message.contains(**f)) {
            return Err(TestHarnessError::AssertionFailed {
                expected: format!("an error mentioning {missing:?}"),
                actual: message,
            });
        }
        Ok(error)
    }
}
