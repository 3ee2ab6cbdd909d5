//! Elapsed timer driven by a boolean condition.

use crate::time::{Millis, TimeInstant};

/// Measures how long a condition has been continuously true.
///
/// Call [`update`](ElapsedTimer::update) once per cycle with the current
/// reading of the condition. While the condition holds the timer runs and
/// [`elapsed`](ElapsedTimer::elapsed) grows; the first false reading stops it
/// and clears the elapsed time.
#[derive(Debug, Clone, Copy)]
pub struct ElapsedTimer<I: TimeInstant> {
    started_at: Option<I>,
    elapsed: Millis,
}

impl<I: TimeInstant> ElapsedTimer<I> {
    /// Creates a stopped timer.
    pub const fn new() -> Self {
        Self {
            started_at: None,
            elapsed: Millis::ZERO,
        }
    }

    /// Advances the timer with this cycle's condition value.
    pub fn update(&mut self, now: I, condition: bool) {
        if !condition {
            self.reset();
            return;
        }

        match self.started_at {
            None => {
                self.started_at = Some(now);
                self.elapsed = Millis::ZERO;
            }
            Some(started_at) => {
                self.elapsed = now.duration_since(started_at);
            }
        }
    }

    /// Stops the timer and clears the elapsed time.
    pub fn reset(&mut self) {
        self.started_at = None;
        self.elapsed = Millis::ZERO;
    }

    /// Returns true while the timer is running.
    pub fn is_on(&self) -> bool {
        self.started_at.is_some()
    }

    /// Time since the condition became true, zero while stopped.
    pub fn elapsed(&self) -> Millis {
        self.elapsed
    }

    /// Returns true once the timer has been running for at least `threshold`.
    pub fn has_reached(&self, threshold: Millis) -> bool {
        self.is_on() && self.elapsed >= threshold
    }
}

impl<I: TimeInstant> Default for ElapsedTimer<I> {
    fn default() -> Self {
        Self::new()
    }
}
