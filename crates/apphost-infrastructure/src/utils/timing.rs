//! Timing instrumentation helpers

use std::time::{Duration, Instant};

/// Tracks the elapsed time of an operation
///
/// The host uses one per startup stage:
///
/// ```ignore
/// let timer = TimedOperation::start();
/// self.discover_plugins();
/// debug!(elapsed_ms = timer.elapsed_ms(), "Plugins discovered");
/// ```
pub struct TimedOperation {
    start: Instant,
}

impl TimedOperation {
    /// Start a new timed operation
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Elapsed time in milliseconds, saturating
    pub fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.start.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    /// Elapsed time as Duration
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}
