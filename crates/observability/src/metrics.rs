//! Overlay metrics
//!
//! Thin wrappers over the `metrics` facade plus an in-memory aggregator for
//! end-of-run summaries.

use std::collections::BTreeMap;
use std::fmt;

use metrics::{
    counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram, Unit,
};

/// Why a motion sample was not forwarded to a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DropReason {
    /// Payload shorter than two axes or non-finite
    Malformed,
    /// Both filtered axes under the noise threshold
    Stationary,
    /// Inside the frame interval of the previous dispatch
    Throttled,
    /// No surface to receive it
    NoSurface,
}

impl DropReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Malformed => "malformed",
            Self::Stationary => "stationary",
            Self::Throttled => "throttled",
            Self::NoSurface => "no_surface",
        }
    }
}

/// Register units and help text with the installed recorder
pub fn describe_metrics() {
    describe_counter!(
        "motion_overlay_samples_received_total",
        Unit::Count,
        "Raw motion samples delivered by the sensor"
    );
    describe_counter!(
        "motion_overlay_samples_dropped_total",
        Unit::Count,
        "Samples that did not move a surface, by reason"
    );
    describe_counter!(
        "motion_overlay_samples_forwarded_total",
        Unit::Count,
        "Samples forwarded to a surface"
    );
    describe_histogram!(
        "motion_overlay_motion_primary",
        "Absolute dot dx (px) or horizon shift (px)"
    );
    describe_histogram!(
        "motion_overlay_motion_secondary",
        "Absolute dot dy (px) or horizon tilt (deg)"
    );
    describe_counter!("motion_overlay_redraws_total", Unit::Count, "Surface redraws");
    describe_counter!(
        "motion_overlay_surface_swaps_total",
        Unit::Count,
        "Overlay windows attached for a new mode"
    );
    describe_counter!(
        "motion_overlay_window_failures_total",
        Unit::Count,
        "Failed window attach or detach calls"
    );
    describe_counter!(
        "motion_overlay_sensor_registrations_total",
        Unit::Count,
        "Sensor listen calls"
    );
    describe_gauge!(
        "motion_overlay_sensor_registered",
        "1 while the motion sensor is registered"
    );
    describe_counter!(
        "motion_overlay_settings_applied_total",
        Unit::Count,
        "Settings snapshots applied, by mode"
    );
}

/// Record a raw sample entering the pipeline
pub fn record_sample_received(sensor_kind: &str) {
    counter!(
        "motion_overlay_samples_received_total",
        "sensor_kind" => sensor_kind.to_string()
    )
    .increment(1);
}

/// Record a sample that stopped before reaching a surface
pub fn record_sample_dropped(reason: DropReason) {
    counter!(
        "motion_overlay_samples_dropped_total",
        "reason" => reason.as_str()
    )
    .increment(1);
}

/// Record a motion update forwarded to a surface
///
/// `primary` is dx or vertical shift, `secondary` is dy or tilt.
pub fn record_motion_forwarded(surface: &'static str, primary: f64, secondary: f64) {
    counter!("motion_overlay_samples_forwarded_total", "surface" => surface).increment(1);
    histogram!("motion_overlay_motion_primary", "surface" => surface).record(primary.abs());
    histogram!("motion_overlay_motion_secondary", "surface" => surface).record(secondary.abs());
}

/// Record a surface draw pass
pub fn record_redraw(surface: &'static str) {
    counter!("motion_overlay_redraws_total", "surface" => surface).increment(1);
}

/// Record the active surface being replaced
pub fn record_surface_swap(from: &str, to: &str) {
    counter!(
        "motion_overlay_surface_swaps_total",
        "from" => from.to_string(),
        "to" => to.to_string()
    )
    .increment(1);
}

/// Record a swallowed window attach/detach failure
pub fn record_window_failure(operation: &'static str) {
    counter!("motion_overlay_window_failures_total", "operation" => operation).increment(1);
}

/// Record a sensor registration change
pub fn record_sensor_registered(registered: bool) {
    let action = if registered { "register" } else { "unregister" };
    counter!("motion_overlay_sensor_registrations_total", "action" => action).increment(1);
    gauge!("motion_overlay_sensor_registered").set(if registered { 1.0 } else { 0.0 });
}

/// Record a settings snapshot applied by the lifecycle
pub fn record_settings_applied(mode: &str) {
    counter!("motion_overlay_settings_applied_total", "mode" => mode.to_string()).increment(1);
}

/// Overlay metrics aggregator
///
/// Aggregates in memory for the run summary.
#[derive(Debug, Clone, Default)]
pub struct OverlayMetricsAggregator {
    pub samples_received: u64,
    pub samples_forwarded: u64,
    pub dropped: BTreeMap<DropReason, u64>,
    pub redraws: u64,
    pub surface_swaps: u64,
    pub window_failures: u64,
    pub sensor_registrations: u64,
    pub settings_applied: u64,

    /// |dx| of dot updates (px)
    pub dot_dx: RunningStats,
    /// |dy| of dot updates (px)
    pub dot_dy: RunningStats,
    /// |shift| of horizon updates (px)
    pub horizon_shift: RunningStats,
    /// |tilt| of horizon updates (degrees)
    pub horizon_tilt: RunningStats,
}

impl OverlayMetricsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_sample(&mut self) {
        self.samples_received += 1;
    }

    pub fn on_dropped(&mut self, reason: DropReason) {
        *self.dropped.entry(reason).or_insert(0) += 1;
    }

    pub fn on_dots(&mut self, dx: f64, dy: f64) {
        self.samples_forwarded += 1;
        self.dot_dx.push(dx.abs());
        self.dot_dy.push(dy.abs());
    }

    pub fn on_horizon(&mut self, shift: f64, tilt: f64) {
        self.samples_forwarded += 1;
        self.horizon_shift.push(shift.abs());
        self.horizon_tilt.push(tilt.abs());
    }

    pub fn on_redraw(&mut self) {
        self.redraws += 1;
    }

    pub fn on_surface_swap(&mut self) {
        self.surface_swaps += 1;
    }

    pub fn on_window_failure(&mut self) {
        self.window_failures += 1;
    }

    pub fn on_sensor_registered(&mut self) {
        self.sensor_registrations += 1;
    }

    pub fn on_settings_applied(&mut self) {
        self.settings_applied += 1;
    }

    pub fn dropped_count(&self, reason: DropReason) -> u64 {
        self.dropped.get(&reason).copied().unwrap_or(0)
    }

    /// Generate summary report
    pub fn summary(&self) -> OverlayMetricsSummary {
        OverlayMetricsSummary {
            samples_received: self.samples_received,
            samples_forwarded: self.samples_forwarded,
            forward_rate: if self.samples_received > 0 {
                self.samples_forwarded as f64 / self.samples_received as f64 * 100.0
            } else {
                0.0
            },
            dropped: self
                .dropped
                .iter()
                .map(|(reason, count)| (reason.as_str(), *count))
                .collect(),
            redraws: self.redraws,
            surface_swaps: self.surface_swaps,
            window_failures: self.window_failures,
            sensor_registrations: self.sensor_registrations,
            settings_applied: self.settings_applied,
            dot_dx: StatsSummary::from(&self.dot_dx),
            dot_dy: StatsSummary::from(&self.dot_dy),
            horizon_shift: StatsSummary::from(&self.horizon_shift),
            horizon_tilt: StatsSummary::from(&self.horizon_tilt),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Metrics summary
#[derive(Debug, Clone, Default)]
pub struct OverlayMetricsSummary {
    pub samples_received: u64,
    pub samples_forwarded: u64,
    pub forward_rate: f64,
    pub dropped: BTreeMap<&'static str, u64>,
    pub redraws: u64,
    pub surface_swaps: u64,
    pub window_failures: u64,
    pub sensor_registrations: u64,
    pub settings_applied: u64,
    pub dot_dx: StatsSummary,
    pub dot_dy: StatsSummary,
    pub horizon_shift: StatsSummary,
    pub horizon_tilt: StatsSummary,
}

impl fmt::Display for OverlayMetricsSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Overlay Run Summary ===")?;
        writeln!(f, "Samples received: {}", self.samples_received)?;
        writeln!(
            f,
            "Samples forwarded: {} ({:.2}%)",
            self.samples_forwarded, self.forward_rate
        )?;
        if !self.dropped.is_empty() {
            writeln!(f, "Dropped samples:")?;
            for (reason, count) in &self.dropped {
                writeln!(f, "  {}: {}", reason, count)?;
            }
        }
        writeln!(f, "Redraws: {}", self.redraws)?;
        writeln!(f, "Surface swaps: {}", self.surface_swaps)?;
        writeln!(f, "Window failures: {}", self.window_failures)?;
        writeln!(f, "Sensor registrations: {}", self.sensor_registrations)?;
        writeln!(f, "Settings applied: {}", self.settings_applied)?;
        writeln!(f, "Dot |dx| (px): {}", self.dot_dx)?;
        writeln!(f, "Dot |dy| (px): {}", self.dot_dy)?;
        writeln!(f, "Horizon |shift| (px): {}", self.horizon_shift)?;
        writeln!(f, "Horizon |tilt| (deg): {}", self.horizon_tilt)?;
        Ok(())
    }
}

/// Stats summary
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.3}, max={:.3}, mean={:.3}, std={:.3} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// Online statistics (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            self.m2 += delta * (value - self.mean);
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// Sample variance
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}
