//! Lightweight wall-clock timing utilities.
//!
//! Used by the mapping driver to report how much time went into hull
//! sampling versus exact equilibrium solves. Purely informational.

use std::time::Instant;

/// A simple timer that measures elapsed time.
pub struct Timer {
    label: &'static str,
    start: Instant,
}

impl Timer {
    /// Create and start a new timer with the given label.
    pub fn start(label: &'static str) -> Self {
        Self {
            label,
            start: Instant::now(),
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Stop the timer and return elapsed time in seconds.
    pub fn stop(self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

/// Accumulating timer for tracking total time across multiple calls.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AccumulatingTimer {
    total_s: f64,
    count: u64,
}

impl AccumulatingTimer {
    /// Create a new accumulating timer.
    pub const fn new() -> Self {
        Self {
            total_s: 0.0,
            count: 0,
        }
    }

    /// Record a timing measurement.
    pub fn record(&mut self, duration_s: f64) {
        self.total_s += duration_s.max(0.0);
        self.count += 1;
    }

    /// Fold another timer's totals into this one.
    pub fn absorb(&mut self, other: &AccumulatingTimer) {
        self.total_s += other.total_s;
        self.count += other.count;
    }

    /// Get total time spent (in seconds).
    pub fn total_seconds(&self) -> f64 {
        self.total_s
    }

    /// Get number of calls.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Get average time per call (in seconds).
    pub fn average_seconds(&self) -> f64 {
        if self.count > 0 {
            self.total_s / self.count as f64
        } else {
            0.0
        }
    }

    /// Reset the timer.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
