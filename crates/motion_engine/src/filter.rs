//! Exponential low-pass motion filter.

use contracts::{MotionSample, MotionVector};

/// One-pole EMA filter over the x/y axes
///
/// State persists across mode switches and is only cleared by creating a new
/// filter or calling `reset`.
#[derive(Debug, Clone)]
pub struct MotionFilter {
    alpha: f32,
    state: MotionVector,
    updates: u64,
}

impl MotionFilter {
    pub const DEFAULT_ALPHA: f32 = 0.18;

    /// `alpha` is clamped to (0, 1]; non-finite values use the default.
    pub fn new(alpha: f32) -> Self {
        let alpha = if alpha.is_finite() && alpha > 0.0 {
            alpha.min(1.0)
        } else {
            Self::DEFAULT_ALPHA
        };
        Self {
            alpha,
            state: MotionVector::ZERO,
            updates: 0,
        }
    }

    /// Feed a raw sample
    ///
    /// Returns None, leaving state untouched, for payloads without two finite axes.
    pub fn update(&mut self, sample: &MotionSample) -> Option<MotionVector> {
        let (x, y) = sample.xy()?;
        self.update_xy(x, y)
    }

    pub fn update_xy(&mut self, x: f32, y: f32) -> Option<MotionVector> {
        if !x.is_finite() || !y.is_finite() {
            return None;
        }
        self.state.x += self.alpha * (x - self.state.x);
        self.state.y += self.alpha * (y - self.state.y);
        self.updates += 1;
        Some(self.state)
    }

    pub fn current(&self) -> MotionVector {
        self.state
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Accepted samples since creation or reset
    pub fn updates(&self) -> u64 {
        self.updates
    }

    pub fn reset(&mut self) {
        self.state = MotionVector::ZERO;
        self.updates = 0;
    }
}

impl Default for MotionFilter {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ALPHA)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::SensorKind;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_first_update() {
        let mut filter = MotionFilter::default();
        let out = filter.update_xy(1.0, -2.0).unwrap();
        assert!((out.x - 0.18).abs() < 1e-6);
        assert!((out.y + 0.36).abs() < 1e-6);
    }

    #[test]
    fn test_converges_to_constant_input() {
        let mut filter = MotionFilter::default();
        for _ in 0..200 {
            filter.update_xy(0.5, 0.25);
        }
        let out = filter.current();
        assert!((out.x - 0.5).abs() < 1e-4);
        assert!((out.y - 0.25).abs() < 1e-4);
    }

    #[test]
    fn test_short_and_non_finite_payloads_ignored() {
        let mut filter = MotionFilter::default();
        filter.update_xy(1.0, 1.0);
        let before = filter.current();

        let short = MotionSample {
            kind: SensorKind::Accelerometer,
            timestamp: 0.0,
            values: vec![3.0],
        };
        assert_eq!(filter.update(&short), None);
        assert_eq!(filter.update_xy(f32::NAN, 0.0), None);
        assert_eq!(filter.update_xy(0.0, f32::INFINITY), None);

        assert_eq!(filter.current(), before);
        assert_eq!(filter.updates(), 1);
    }

    #[test]
    fn test_outlier_step_is_bounded() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut filter = MotionFilter::default();

        for _ in 0..500 {
            let prev = filter.current();
            let outlier = rng.random_range(-50.0f32..50.0);
            let next = filter.update_xy(outlier, -outlier).unwrap();

            let bound = filter.alpha() * (outlier - prev.x).abs() + 1e-4;
            assert!((next.x - prev.x).abs() <= bound);
            assert!(next.x.is_finite() && next.y.is_finite());
        }
    }

    #[test]
    fn test_invalid_alpha_uses_default() {
        assert_eq!(MotionFilter::new(f32::NAN).alpha(), MotionFilter::DEFAULT_ALPHA);
        assert_eq!(MotionFilter::new(0.0).alpha(), MotionFilter::DEFAULT_ALPHA);
        assert_eq!(MotionFilter::new(4.0).alpha(), 1.0);
    }
}
