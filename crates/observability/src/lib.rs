//! # Observability
//!
//! Log setup and overlay metrics.
//!
//! - `tracing` output as JSON, pretty or compact text; `RUST_LOG` wins over the
//!   configured level
//! - Optional Prometheus endpoint on the loopback interface
//! - Metric recorders and the end-of-run `OverlayMetricsAggregator`
//!
//! ```ignore
//! let config = ObservabilityConfig::for_verbosity(1, false, LogFormat::Compact);
//! observability::init_with_config(config)?;
//! ```

pub mod metrics;

use std::net::{Ipv4Addr, SocketAddr};

use anyhow::{Context, Result};
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub use crate::metrics::{
    describe_metrics, record_motion_forwarded, record_redraw, record_sample_dropped,
    record_sample_received, record_sensor_registered, record_settings_applied,
    record_surface_swap, record_window_failure, DropReason, OverlayMetricsAggregator,
    OverlayMetricsSummary, RunningStats, StatsSummary,
};

/// Initialise with defaults: JSON logs at `info`, no metrics endpoint
pub fn init() -> Result<()> {
    init_with_config(ObservabilityConfig::default())
}

#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    pub log_format: LogFormat,
    /// Prometheus port (None = no endpoint)
    pub metrics_port: Option<u16>,
    /// Filter directive used when `RUST_LOG` is unset
    pub default_log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Json,
            metrics_port: None,
            default_log_level: "info".to_string(),
        }
    }
}

impl ObservabilityConfig {
    /// Level from `-v` count and `--quiet`: warn / info / debug / trace
    pub fn for_verbosity(verbose: u8, quiet: bool, log_format: LogFormat) -> Self {
        let level = match (quiet, verbose) {
            (true, _) => "warn",
            (false, 0) => "info",
            (false, 1) => "debug",
            (false, _) => "trace",
        };
        Self {
            log_format,
            metrics_port: None,
            default_log_level: level.to_string(),
        }
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&self.default_log_level))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per event, with thread and source location
    #[default]
    Json,
    Pretty,
    Compact,
}

/// Install the global subscriber and, if a port is set, the metrics endpoint
pub fn init_with_config(config: ObservabilityConfig) -> Result<()> {
    let output = match config.log_format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_thread_names(true)
            .with_file(true)
            .with_line_number(true)
            .boxed(),
        LogFormat::Pretty => fmt::layer().pretty().boxed(),
        LogFormat::Compact => fmt::layer().compact().with_target(false).boxed(),
    };

    tracing_subscriber::registry()
        .with(output.with_filter(config.filter()))
        .try_init()
        .context("tracing subscriber already installed")?;

    if let Some(port) = config.metrics_port {
        init_metrics_only(port)?;
    }

    tracing::debug!(
        log_format = ?config.log_format,
        level = %config.default_log_level,
        "logging ready"
    );
    Ok(())
}

/// Serve Prometheus metrics on `127.0.0.1:port` without touching logging
pub fn init_metrics_only(port: u16) -> Result<()> {
    let addr = SocketAddr::from((Ipv4Addr::LOCALHOST, port));
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .with_context(|| format!("cannot serve metrics on {addr}"))?;
    describe_metrics();

    tracing::info!(%addr, "metrics endpoint listening");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ObservabilityConfig::default();
        assert_eq!(config.metrics_port, None);
        assert_eq!(config.default_log_level, "info");
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_verbosity_levels() {
        let level = |verbose: u8, quiet: bool| {
            ObservabilityConfig::for_verbosity(verbose, quiet, LogFormat::Pretty).default_log_level
        };
        assert_eq!(level(0, false), "info");
        assert_eq!(level(1, false), "debug");
        assert_eq!(level(4, false), "trace");
        assert_eq!(level(3, true), "warn");
    }

    #[test]
    fn test_describe_without_recorder_is_noop() {
        describe_metrics();
        record_redraw("dots");
    }
}
