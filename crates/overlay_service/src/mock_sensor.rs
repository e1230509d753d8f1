//! Mock motion sensors
//!
//! `MockMotionSensor` generates a sway signal on a background thread, for
//! development without hardware. `ManualMotionSensor` delivers samples pushed
//! by the caller, synchronously.

use std::f64::consts::TAU;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};

use contracts::{MotionSample, MotionSampleCallback, MotionSensorSource, SensorKind};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::sensors::{CallbackSlot, WorkerCell};

/// Mock sensor configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MockSensorConfig {
    /// Sample rate (Hz)
    pub frequency_hz: f64,
    /// Peak lateral acceleration (m/s²)
    pub amplitude: f64,
    /// Sway period (s)
    pub period_s: f64,
    /// Uniform noise added per axis (m/s²)
    pub jitter: f64,
    /// Noise seed; random when unset
    pub seed: Option<u64>,
}

impl Default for MockSensorConfig {
    fn default() -> Self {
        Self {
            frequency_hz: 60.0,
            amplitude: 1.2,
            period_s: 4.0,
            jitter: 0.05,
            seed: None,
        }
    }
}

/// Sway at time `t`: lateral sine plus a slower longitudinal cosine
pub fn sway(config: &MockSensorConfig, t: f64) -> (f64, f64) {
    let period = config.period_s.max(0.1);
    let phase = TAU * t / period;
    (
        config.amplitude * phase.sin(),
        0.6 * config.amplitude * (phase * 0.5).cos(),
    )
}

/// Background-thread mock sensor
pub struct MockMotionSensor {
    name: String,
    kind: SensorKind,
    config: MockSensorConfig,
    worker: WorkerCell,
}

impl MockMotionSensor {
    pub fn new(name: impl Into<String>, kind: SensorKind, config: MockSensorConfig) -> Self {
        Self {
            name: name.into(),
            kind,
            config,
            worker: WorkerCell::default(),
        }
    }

    pub fn with_defaults(kind: SensorKind) -> Self {
        Self::new("mock", kind, MockSensorConfig::default())
    }

    pub fn config(&self) -> &MockSensorConfig {
        &self.config
    }
}

impl MotionSensorSource for MockMotionSensor {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> SensorKind {
        self.kind
    }

    fn listen(&self, callback: MotionSampleCallback) {
        let config = self.config.clone();
        let kind = self.kind;
        let name = self.name.clone();
        let interval = Duration::from_secs_f64(1.0 / config.frequency_hz.clamp(1.0, 1000.0));

        self.worker.start(&self.name, callback, move |emitter| {
            let mut rng = StdRng::seed_from_u64(config.seed.unwrap_or_else(rand::random::<u64>));
            let start = Instant::now();
            let mut count: u64 = 0;
            debug!(sensor = %name, frequency_hz = config.frequency_hz, "mock sensor started");

            while emitter.is_running() {
                let t = start.elapsed().as_secs_f64();
                let (x, y) = sway(&config, t);
                let jitter = config.jitter.abs();
                let (nx, ny) = if jitter > 0.0 {
                    (
                        rng.random_range(-jitter..jitter),
                        rng.random_range(-jitter..jitter),
                    )
                } else {
                    (0.0, 0.0)
                };

                let sample = MotionSample {
                    kind,
                    timestamp: t,
                    values: vec![(x + nx) as f32, (y + ny) as f32, 0.0],
                };
                if !emitter.emit(sample) {
                    break;
                }
                count += 1;
                trace!(sensor = %name, count, timestamp = t, "mock sample sent");

                thread::sleep(interval);
            }

            debug!(sensor = %name, count, "mock sensor stopped");
        });
    }

    fn stop(&self) {
        self.worker.stop();
    }

    fn is_listening(&self) -> bool {
        self.worker.is_running()
    }
}

/// Sensor driven by explicit `push` calls
///
/// Delivery happens on the caller's thread, which makes ordering in tests
/// deterministic.
pub struct ManualMotionSensor {
    name: String,
    kind: SensorKind,
    slot: Mutex<Option<CallbackSlot>>,
    listens: AtomicU64,
}

impl ManualMotionSensor {
    pub fn new(name: impl Into<String>, kind: SensorKind) -> Self {
        Self {
            name: name.into(),
            kind,
            slot: Mutex::new(None),
            listens: AtomicU64::new(0),
        }
    }

    /// Deliver a sample; false when nobody is listening
    pub fn push(&self, sample: MotionSample) -> bool {
        let slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        slot.as_ref().is_some_and(|s| s.emit(sample))
    }

    pub fn push_xy(&self, x: f32, y: f32) -> bool {
        self.push(MotionSample::planar(self.kind, 0.0, x, y))
    }

    /// Number of times `listen` installed a callback
    pub fn listen_count(&self) -> u64 {
        self.listens.load(Ordering::Relaxed)
    }
}

impl MotionSensorSource for ManualMotionSensor {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> SensorKind {
        self.kind
    }

    fn listen(&self, callback: MotionSampleCallback) {
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        if slot.is_none() {
            *slot = Some(CallbackSlot::new(callback));
            self.listens.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn stop(&self) {
        self.slot.lock().unwrap_or_else(|e| e.into_inner()).take();
    }

    fn is_listening(&self) -> bool {
        self.slot
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .is_some_and(CallbackSlot::is_set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_mock_sensor_delivers_and_stops() {
        let sensor = MockMotionSensor::new(
            "test",
            SensorKind::LinearAcceleration,
            MockSensorConfig {
                frequency_hz: 200.0,
                seed: Some(1),
                ..Default::default()
            },
        );

        let count = Arc::new(AtomicU64::new(0));
        let seen = Arc::clone(&count);
        sensor.listen(Arc::new(move |sample: MotionSample| {
            assert_eq!(sample.values.len(), 3);
            seen.fetch_add(1, Ordering::Relaxed);
        }));
        assert!(sensor.is_listening());

        thread::sleep(Duration::from_millis(100));
        sensor.stop();
        assert!(!sensor.is_listening());

        let after_stop = count.load(Ordering::Relaxed);
        assert!(after_stop > 0);
        thread::sleep(Duration::from_millis(50));
        assert_eq!(count.load(Ordering::Relaxed), after_stop);
    }

    #[test]
    fn test_mock_listen_is_idempotent() {
        let sensor = MockMotionSensor::with_defaults(SensorKind::Accelerometer);
        let count = Arc::new(AtomicU64::new(0));

        for _ in 0..3 {
            let seen = Arc::clone(&count);
            sensor.listen(Arc::new(move |_: MotionSample| {
                seen.fetch_add(1, Ordering::Relaxed);
            }));
        }
        thread::sleep(Duration::from_millis(100));
        sensor.stop();

        // one 60 Hz stream, not three
        assert!(count.load(Ordering::Relaxed) < 12);
    }

    #[test]
    fn test_sway_bounded() {
        let config = MockSensorConfig::default();
        for i in 0..100 {
            let (x, y) = sway(&config, i as f64 * 0.1);
            assert!(x.abs() <= config.amplitude + 1e-9);
            assert!(y.abs() <= config.amplitude + 1e-9);
        }
    }

    #[test]
    fn test_manual_sensor() {
        let sensor = ManualMotionSensor::new("manual", SensorKind::Accelerometer);
        assert!(!sensor.push_xy(1.0, 1.0));

        let count = Arc::new(AtomicU64::new(0));
        let seen = Arc::clone(&count);
        sensor.listen(Arc::new(move |_: MotionSample| {
            seen.fetch_add(1, Ordering::Relaxed);
        }));
        assert!(sensor.push_xy(1.0, 1.0));
        sensor.stop();
        assert!(!sensor.push_xy(1.0, 1.0));
        assert_eq!(count.load(Ordering::Relaxed), 1);
    }
}
