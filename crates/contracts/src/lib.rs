//! # Contracts
//!
//! Frozen interface contracts shared by every overlay crate.
//! Business crates depend on this crate only; reverse dependencies are prohibited.
//!
//! ## Units
//! - Motion samples are device acceleration in m/s², two axes minimum
//! - Surface geometry is in window pixels, origin top-left
//! - Tilt angles are in degrees

#[macro_use]
mod macros;

mod canvas;
mod error;
mod geometry;
mod motion;
mod screen;
mod sensor_source;
mod settings;
mod store;
mod window;

pub use canvas::Canvas;
pub use error::*;
pub use geometry::*;
pub use motion::*;
pub use screen::{ScreenEvent, ScreenEventCallback, ScreenStateSource};
pub use sensor_source::{MotionSampleCallback, MotionSensorSource};
pub use settings::*;
pub use store::{LocalSettingsStore, SettingsStore};
pub use window::*;
