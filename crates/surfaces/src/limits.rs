//! Motion clamps and dead zones

use serde::{Deserialize, Serialize};

/// Bounds applied by surfaces to incoming motion
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionLimits {
    /// Max |dx| and |dy| of the dot layer (px)
    pub dot_offset: f32,
    /// Max |shift| of the horizon (px)
    pub horizon_shift: f32,
    /// Max |tilt| of the horizon (degrees)
    pub horizon_tilt: f32,
    /// Offset changes under this are not redrawn (px)
    pub dead_zone_px: f32,
    /// Tilt changes under this are not redrawn (degrees)
    pub dead_zone_deg: f32,
}

impl MotionLimits {
    /// Limits for the background overlay
    pub const SERVICE: Self = Self {
        dot_offset: 60.0,
        horizon_shift: 120.0,
        horizon_tilt: 12.0,
        dead_zone_px: 0.2,
        dead_zone_deg: 0.08,
    };

    /// Tighter limits for in-app previews
    pub const PREVIEW: Self = Self {
        dot_offset: 24.0,
        horizon_shift: 48.0,
        horizon_tilt: 6.0,
        dead_zone_px: 0.2,
        dead_zone_deg: 0.08,
    };
}

impl Default for MotionLimits {
    fn default() -> Self {
        Self::SERVICE
    }
}

/// Clamp to ±limit; non-finite input becomes 0
pub(crate) fn clamp_symmetric(value: f32, limit: f32) -> f32 {
    if value.is_finite() {
        value.clamp(-limit, limit)
    } else {
        0.0
    }
}
