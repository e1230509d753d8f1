//! # Overlay Service
//!
//! Runs the motion overlay: owns the overlay window, swaps render surfaces on
//! mode changes, and drives them from a motion sensor.
//!
//! Responsibilities:
//! - `OverlayLifecycle`: surface swaps, sensor registration, screen on/off, teardown
//! - `OverlayHandle`: async service loop (settings / samples / screen)
//! - Sensor sources: mock, manual and JSONL replay
//! - `HeadlessWindowHost`: a window host without a display
//!
//! ## Example
//!
//! ```ignore
//! let store = PreferenceStore::open("prefs.toml").await?;
//! let host = HeadlessWindowHost::new(Bounds::new(1080.0, 2400.0));
//! let sensor: Arc<dyn MotionSensorSource> =
//!     Arc::new(MockMotionSensor::with_defaults(SensorKind::LinearAcceleration));
//!
//! let handle = OverlayHandle::spawn(
//!     host,
//!     store.subscribe(),
//!     Some(sensor),
//!     Arc::new(ManualScreenState::new()),
//!     LifecycleConfig::default(),
//! );
//! // ...
//! let report = handle.stop().await?;
//! println!("{}", report.summary);
//! ```

mod error;
mod lifecycle;
mod mock_sensor;
mod replay_sensor;
mod screen;
mod sensors;
mod service;
mod window;

pub use error::{Result, ServiceError};
pub use lifecycle::{LifecycleConfig, OverlayLifecycle};
pub use mock_sensor::{sway, ManualMotionSensor, MockMotionSensor, MockSensorConfig};
pub use replay_sensor::{ReplayConfig, ReplayMotionSensor};
pub use screen::ManualScreenState;
pub use sensors::{select_sensor, SensorRegistration};
pub use service::{OverlayHandle, ServiceReport, SAMPLE_QUEUE_CAPACITY};
pub use window::{Frame, HeadlessWindowHost, WindowEvent, WindowProbe};
