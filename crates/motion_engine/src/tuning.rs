//! Motion tuning constants

use serde::{Deserialize, Serialize};

/// Tunables for the sample-to-surface path
///
/// Defaults are the reference constants; override only for experiments.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionTuning {
    /// EMA smoothing factor
    pub alpha: f32,
    /// Both filtered axes under this count as stationary
    pub noise_threshold: f32,
    /// Minimum spacing between forwarded updates (ms)
    pub frame_interval_ms: u64,
    /// Pixels per unit of filtered acceleration at full intensity
    pub pixel_scale: f32,
    /// Horizon vertical shift gain over `pixel_scale`
    pub horizon_shift_gain: f32,
    /// Horizon tilt (degrees) per unit of filtered x at full intensity
    pub horizon_tilt_gain: f32,
}

impl Default for MotionTuning {
    fn default() -> Self {
        Self {
            alpha: 0.18,
            noise_threshold: 0.03,
            frame_interval_ms: 16,
            pixel_scale: 38.0,
            horizon_shift_gain: 1.3,
            horizon_tilt_gain: 18.0,
        }
    }
}
