//! Sample pipeline: filter, stationary gate, frame throttle, mapping.

use std::time::{Duration, Instant};

use contracts::{MotionSample, MotionVector};
use observability::DropReason;
use serde::Serialize;
use tracing::instrument;

use crate::filter::MotionFilter;
use crate::gate::{FrameThrottle, NoiseGate};
use crate::mapper::{map_motion, MotionCommand, SurfaceKind};
use crate::MotionTuning;

/// Per-engine counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EngineStats {
    pub received: u64,
    pub malformed: u64,
    pub stationary: u64,
    pub throttled: u64,
    pub no_surface: u64,
    pub forwarded: u64,
}

/// Turns raw samples into surface motion commands
///
/// Lives as long as the sensor registration it serves. Mode switches pass a
/// different `SurfaceKind` but keep the filter state.
#[derive(Debug)]
pub struct MotionEngine {
    tuning: MotionTuning,
    filter: MotionFilter,
    gate: NoiseGate,
    throttle: FrameThrottle,
    stats: EngineStats,
}

impl MotionEngine {
    pub fn new(tuning: MotionTuning) -> Self {
        Self {
            filter: MotionFilter::new(tuning.alpha),
            gate: NoiseGate::new(tuning.noise_threshold),
            throttle: FrameThrottle::new(Duration::from_millis(tuning.frame_interval_ms)),
            stats: EngineStats::default(),
            tuning,
        }
    }

    /// Process one sample for the active surface kind
    ///
    /// The filter is updated for every well-formed sample, including those
    /// later dropped as stationary or throttled.
    #[instrument(
        level = "trace",
        name = "motion_engine_process",
        skip(self, sample),
        fields(timestamp = sample.timestamp)
    )]
    pub fn process(
        &mut self,
        sample: &MotionSample,
        kind: Option<SurfaceKind>,
        now: Instant,
    ) -> Result<MotionCommand, DropReason> {
        self.stats.received += 1;

        let result = self.run(sample, kind, now);
        match result {
            Ok(command) => {
                self.stats.forwarded += 1;
                let (primary, secondary) = match command {
                    MotionCommand::Dots { dx, dy } => (dx, dy),
                    MotionCommand::Horizon { shift, tilt } => (shift, tilt),
                };
                let surface = kind.map(|k| k.label()).unwrap_or("none");
                observability::record_motion_forwarded(surface, primary as f64, secondary as f64);
            }
            Err(reason) => {
                match reason {
                    DropReason::Malformed => self.stats.malformed += 1,
                    DropReason::Stationary => self.stats.stationary += 1,
                    DropReason::Throttled => self.stats.throttled += 1,
                    DropReason::NoSurface => self.stats.no_surface += 1,
                }
                observability::record_sample_dropped(reason);
            }
        }
        result
    }

    fn run(
        &mut self,
        sample: &MotionSample,
        kind: Option<SurfaceKind>,
        now: Instant,
    ) -> Result<MotionCommand, DropReason> {
        let filtered = self.filter.update(sample).ok_or(DropReason::Malformed)?;

        if self.gate.is_stationary(filtered) {
            return Err(DropReason::Stationary);
        }
        let kind = kind.ok_or(DropReason::NoSurface)?;
        if !self.throttle.admit(now) {
            return Err(DropReason::Throttled);
        }

        Ok(map_motion(kind, filtered, &self.tuning))
    }

    pub fn filtered(&self) -> MotionVector {
        self.filter.current()
    }

    pub fn stats(&self) -> EngineStats {
        self.stats
    }

    pub fn tuning(&self) -> &MotionTuning {
        &self.tuning
    }

    /// Forget the filter history and throttle slot
    pub fn reset(&mut self) {
        self.filter.reset();
        self.throttle.reset();
    }
}

impl Default for MotionEngine {
    fn default() -> Self {
        Self::new(MotionTuning::default())
    }
}
