//! MotionSensorSource trait - Motion sensor abstraction
//!
//! Decouples the lifecycle manager from concrete sensors (platform, mock, replay).

use std::sync::Arc;

use crate::{MotionSample, SensorKind};

/// Motion sample callback type
///
/// Invoked on the sensor's own thread; receivers must funnel samples back onto
/// their execution context before touching any surface.
pub type MotionSampleCallback = Arc<dyn Fn(MotionSample) + Send + Sync>;

/// Motion sensor source trait
///
/// # Example
///
/// ```ignore
/// let sensor: Box<dyn MotionSensorSource> = pick_sensor();
/// sensor.listen(Arc::new(|sample| {
///     println!("sample at {}", sample.timestamp);
/// }));
/// // ...
/// sensor.stop();
/// ```
pub trait MotionSensorSource: Send + Sync {
    /// Human readable sensor name
    fn name(&self) -> &str;

    /// Sensor kind
    fn kind(&self) -> SensorKind;

    /// Register the sample callback
    ///
    /// Repeated calls while listening are ignored (no second callback).
    fn listen(&self, callback: MotionSampleCallback);

    /// Stop delivering samples
    ///
    /// Must be safe to call when not listening. Once it returns, the callback
    /// registered by `listen` is no longer invoked.
    fn stop(&self);

    /// Check if currently listening
    fn is_listening(&self) -> bool;
}
