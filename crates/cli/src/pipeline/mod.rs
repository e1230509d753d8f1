//! Overlay run orchestration module.

mod orchestrator;
mod stats;

pub use orchestrator::{Pipeline, PipelineConfig, SensorChoice};
pub use stats::RunStats;
