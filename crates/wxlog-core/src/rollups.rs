//! Sliding-window aggregation over time-ordered samples

use chrono::{NaiveDateTime, TimeDelta};
use std::collections::VecDeque;

/// Mean over a trailing time window `(t - window, t]`.
///
/// Samples must be pushed in non-decreasing time order. Each push evicts
/// samples that fell out of the window, so a full pass is O(n).
#[derive(Debug, Clone)]
pub struct TrailingMean {
    window: TimeDelta,
    samples: VecDeque<(NaiveDateTime, f64)>,
    sum: f64,
}

impl TrailingMean {
    pub fn new(window: TimeDelta) -> Self {
        Self {
            window,
            samples: VecDeque::new(),
            sum: 0.0,
        }
    }

    /// Seven days
    pub fn weekly() -> Self {
        Self::new(TimeDelta::days(7))
    }

    /// Advance the window to `at`, adding `value` if present, and return
    /// the mean of what remains. `None` when the window holds no samples.
    pub fn push(&mut self, at: NaiveDateTime, value: Option<f64>) -> Option<f64> {
        if let Some(v) = value {
            self.samples.push_back((at, v));
            self.sum += v;
        }

        let cutoff = at - self.window;
        while let Some(&(t, v)) = self.samples.front() {
            if t > cutoff {
                break;
            }
            self.samples.pop_front();
            self.sum -= v;
        }
        if self.samples.is_empty() {
            self.sum = 0.0;
        }

        self.mean()
    }

    pub fn mean(&self) -> Option<f64> {
        if self.samples.is_empty() {
            return None;
        }
        Some(self.sum / self.samples.len() as f64)
    }

    pub fn count(&self) -> usize {
        self.samples.len()
    }
}
