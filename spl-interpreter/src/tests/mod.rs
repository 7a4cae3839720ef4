//! Trace interpreter tests
//!
//! Programs run through the full pipeline with timestamps off, and the
//! assertions look at the recorded frames and the final environment.

mod test_arrays;
mod test_control_flow;
mod test_statements;
