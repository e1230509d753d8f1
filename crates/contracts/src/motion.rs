//! MotionSample - Sensor output
//!
//! Raw acceleration readings delivered by the platform sensor callback.

use serde::{Deserialize, Serialize};

/// Kind of motion sensor a sample came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorKind {
    /// Acceleration with gravity removed (preferred)
    LinearAcceleration,
    /// Raw accelerometer including gravity
    Accelerometer,
}

/// Raw motion sample
///
/// `values` mirrors the platform payload: x, y and usually z. Payloads with
/// fewer than two values are malformed and ignored by the filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotionSample {
    /// Sensor kind
    pub kind: SensorKind,

    /// Sensor timestamp (seconds)
    pub timestamp: f64,

    /// Axis values (m/s²)
    pub values: Vec<f32>,
}

impl MotionSample {
    /// Build a two-axis sample
    pub fn planar(kind: SensorKind, timestamp: f64, x: f32, y: f32) -> Self {
        Self {
            kind,
            timestamp,
            values: vec![x, y],
        }
    }

    /// The x/y pair, if the payload carries one
    pub fn xy(&self) -> Option<(f32, f32)> {
        match self.values.as_slice() {
            [x, y, ..] => Some((*x, *y)),
            _ => None,
        }
    }
}

/// Filtered 2-axis motion vector
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MotionVector {
    pub x: f32,
    pub y: f32,
}

impl MotionVector {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}
