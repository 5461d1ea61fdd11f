#![forbid(unsafe_code)]

//! Release-velocity estimation from a position sample stream.
//!
//! Gesture layers often report velocity directly; when they don't, a
//! [`VelocityTracker`] estimates it from timestamped positions. The estimate
//! is the least-squares slope per axis over samples within the last 100 ms
//! of the newest sample, which smooths jitter without lagging a flick.
//!
//! Timestamps are caller-supplied monotonic offsets. A sample older than the
//! previous one resets the history.

use std::collections::VecDeque;
use std::time::Duration;

use crate::geometry::Vector2;

/// Samples kept in the ring buffer.
const HISTORY_SIZE: usize = 20;

/// Only samples this close to the newest contribute.
const HORIZON: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy)]
struct Sample {
    time: Duration,
    position: Vector2,
}

/// Ring buffer of recent positions with a least-squares velocity estimate.
#[derive(Debug, Clone, Default)]
pub struct VelocityTracker {
    samples: VecDeque<Sample>,
}

impl VelocityTracker {
    #[must_use]
    pub fn new() -> Self {
        Self {
            samples: VecDeque::with_capacity(HISTORY_SIZE),
        }
    }

    /// Record a position at `time`.
    pub fn add_sample(&mut self, time: Duration, position: Vector2) {
        if self.samples.back().is_some_and(|last| time < last.time) {
            self.samples.clear();
        }
        if self.samples.len() == HISTORY_SIZE {
            self.samples.pop_front();
        }
        self.samples.push_back(Sample { time, position });
    }

    pub fn reset(&mut self) {
        self.samples.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Estimated velocity in points/second. Zero with fewer than two usable
    /// samples or when all usable samples share a timestamp.
    #[must_use]
    pub fn velocity(&self) -> Vector2 {
        let Some(newest) = self.samples.back() else {
            return Vector2::ZERO;
        };
        let window: Vec<(f64, Vector2)> = self
            .samples
            .iter()
            .filter(|s| newest.time - s.time <= HORIZON)
            .map(|s| (s.time.as_secs_f64() - newest.time.as_secs_f64(), s.position))
            .collect();
        if window.len() < 2 {
            return Vector2::ZERO;
        }

        let n = window.len() as f64;
        let mean_t = window.iter().map(|(t, _)| t).sum::<f64>() / n;
        let mean_x = window.iter().map(|(_, p)| p.x).sum::<f64>() / n;
        let mean_y = window.iter().map(|(_, p)| p.y).sum::<f64>() / n;

        let mut var_t = 0.0;
        let mut cov_x = 0.0;
        let mut cov_y = 0.0;
        for (t, p) in &window {
            let dt = t - mean_t;
            var_t += dt * dt;
            cov_x += dt * (p.x - mean_x);
            cov_y += dt * (p.y - mean_y);
        }
        if var_t <= f64::EPSILON * f64::EPSILON {
            return Vector2::ZERO;
        }
        Vector2::new(cov_x / var_t, cov_y / var_t)
    }
}
