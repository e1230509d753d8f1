//! Stationary gate and frame throttle.

use std::time::{Duration, Instant};

use contracts::MotionVector;

/// Treats tiny filtered vectors as "not moving"
#[derive(Debug, Clone, Copy)]
pub struct NoiseGate {
    threshold: f32,
}

impl NoiseGate {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold: threshold.abs(),
        }
    }

    /// True when both axes are under the threshold
    pub fn is_stationary(&self, v: MotionVector) -> bool {
        v.x.abs() < self.threshold && v.y.abs() < self.threshold
    }
}

/// Admits at most one update per frame interval
#[derive(Debug, Clone)]
pub struct FrameThrottle {
    interval: Duration,
    last: Option<Instant>,
}

impl FrameThrottle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    /// Claim the slot for `now` if the interval has elapsed
    pub fn admit(&mut self, now: Instant) -> bool {
        match self.last {
            Some(last) if now.saturating_duration_since(last) < self.interval => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}
