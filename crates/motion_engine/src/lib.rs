//! # Motion Engine
//!
//! Turns raw acceleration samples into surface motion commands.
//!
//! Responsibilities:
//! - EMA low-pass filtering (`MotionFilter`)
//! - Stationary noise gate and per-frame throttle
//! - Preset → render parameter tables (`mapper`)
//!
//! ## Example
//!
//! ```ignore
//! use motion_engine::{MotionEngine, MotionTuning, SurfaceKind, DotPlacement};
//!
//! let mut engine = MotionEngine::new(MotionTuning::default());
//! let kind = Some(SurfaceKind::Dots(DotPlacement::Uniform));
//! if let Ok(command) = engine.process(&sample, kind, Instant::now()) {
//!     surface.apply_motion(command);
//! }
//! ```

mod engine;
mod filter;
mod gate;
pub mod mapper;
mod tuning;

pub use engine::{EngineStats, MotionEngine};
pub use filter::MotionFilter;
pub use gate::{FrameThrottle, NoiseGate};
pub use mapper::{DotPlacement, MotionCommand, SurfaceKind, SurfaceParams};
pub use observability::DropReason;
pub use tuning::MotionTuning;
