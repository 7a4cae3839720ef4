//! Per-run limits and output settings for the trace interpreter

use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceOptions {
    /// Deepest allowed nesting of function calls
    pub max_call_depth: usize,
    /// Abort once this many frames have been recorded; `None` is unlimited
    pub max_frames: Option<usize>,
    /// When false every frame carries timestamp 0
    pub timestamps: bool,
}

impl Default for TraceOptions {
    fn default() -> Self {
        Self {
            max_call_depth: 100,
            max_frames: None,
            timestamps: true,
        }
    }
}

impl TraceOptions {
    /// Options that make two runs of the same program produce identical frames
    pub fn deterministic() -> Self {
        Self {
            timestamps: false,
            ..Self::default()
        }
    }

    pub fn with_max_frames(mut self, limit: usize) -> Self {
        self.max_frames = Some(limit);
        self
    }

    pub fn with_max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = depth;
        self
    }

    /// Milliseconds since the Unix epoch, or 0 when timestamps are off
    pub(crate) fn timestamp(&self) -> u64 {
        if !self.timestamps {
            return 0;
        }
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis() as u64)
            .unwrap_or(0)
    }
}
