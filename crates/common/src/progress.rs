//! Progress reporting contract for long-running operations.
//!
//! Engines report step counts and status text through a [`ProgressSink`];
//! the sink is fire-and-forget and never queried, so it can never influence
//! the correctness of an operation. Hosts plug in whatever presentation
//! surface they have (a terminal bar, a window, nothing at all).

/// Receiver for progress updates from an engine.
///
/// All methods are infallible and may be called in any order, though the
/// usual sequence is `set_max`, then interleaved `set_status`/`increment`
/// calls, then `complete`.
pub trait ProgressSink {
    /// Announce the total number of steps the operation expects to take.
    fn set_max(&mut self, max: u64);

    /// Record one completed step.
    fn increment(&mut self);

    /// Update the human-readable status line.
    fn set_status(&mut self, text: &str);

    /// Mark the operation finished with a final status line.
    fn complete(&mut self, text: &str);
}

/// A sink that discards everything. Useful for tests and headless runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProgress;

impl ProgressSink for NoopProgress {
    fn set_max(&mut self, _max: u64) {}
    fn increment(&mut self) {}
    fn set_status(&mut self, _text: &str) {}
    fn complete(&mut self, _text: &str) {}
}

/// A sink that forwards status changes to the tracing subscriber.
///
/// Increments are counted but not logged individually; per-step logging at
/// keyframe granularity would swamp the output.
#[derive(Debug, Default)]
pub struct TracingProgress {
    max: u64,
    current: u64,
}

impl TracingProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Steps recorded so far.
    pub fn current(&self) -> u64 {
        self.current
    }

    /// Announced total, if any.
    pub fn max(&self) -> u64 {
        self.max
    }
}

impl ProgressSink for TracingProgress {
    fn set_max(&mut self, max: u64) {
        self.max = max;
        self.current = 0;
    }

    fn increment(&mut self) {
        self.current += 1;
    }

    fn set_status(&mut self, text: &str) {
        tracing::debug!(step = self.current, total = self.max, "{text}");
    }

    fn complete(&mut self, text: &str) {
        tracing::info!(steps = self.current, total = self.max, "{text}");
    }
}
