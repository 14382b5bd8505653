//! Motion events and edge detection
//!
//! The debouncing policy lives here as plain data-in/data-out logic so it
//! is testable without hardware or threads: one event per HIGH episode,
//! and an episode only ends when the line returns LOW.

use std::time::Instant;

/// A single detected motion episode
///
/// Consumed once by the orchestrator loop; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotionEvent {
    /// When the rising edge was observed
    pub at: Instant,
}

impl MotionEvent {
    /// Create an event stamped with the current time
    pub fn now() -> Self {
        Self {
            at: Instant::now(),
        }
    }
}

/// Rising-edge detector with episode debouncing
///
/// Feed one level sample per poll tick. A sustained HIGH yields exactly
/// one event; the next event requires the line to return LOW first.
///
/// The detector starts from LOW, so callers that may arm against an
/// already-HIGH line should prime it with one discarded sample.
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeDetector {
    level: bool,
}

impl EdgeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process one level sample, returning an event on a rising edge
    pub fn sample(&mut self, level: bool) -> Option<MotionEvent> {
        let rising = level && !self.level;
        self.level = level;
        rising.then(MotionEvent::now)
    }

    /// The last level fed in
    pub fn level(&self) -> bool {
        self.level
    }
}
