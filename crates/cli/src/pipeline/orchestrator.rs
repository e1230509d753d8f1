//! Run orchestrator - wires the preference store, sensor, screen state and
//! headless window into one overlay service run.

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use contracts::{Bounds, MotionSensorSource, SensorKind, SettingsStore};
use overlay_service::{
    select_sensor, HeadlessWindowHost, LifecycleConfig, ManualScreenState, MockMotionSensor,
    MockSensorConfig, OverlayHandle, ReplayConfig, ReplayMotionSensor,
};
use settings_store::PreferenceStore;
use tracing::{info, warn};

use super::RunStats;

/// Where motion samples come from
#[derive(Debug, Clone)]
pub enum SensorChoice {
    /// Synthetic sway
    Mock {
        kind: SensorKind,
        config: MockSensorConfig,
    },
    /// JSONL recording
    Replay { path: PathBuf, config: ReplayConfig },
    /// No motion sensor on this device
    None,
}

/// Run configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Preference file
    pub prefs_path: PathBuf,

    /// Stop after this long (None = until shutdown)
    pub duration: Option<Duration>,

    /// Turn the simulated screen off after this long
    pub screen_off_after: Option<Duration>,

    /// Skip the run unless auto-start is enabled
    pub only_if_autostart: bool,

    pub sensor: SensorChoice,

    /// Overlay window bounds
    pub bounds: Bounds,

    /// Metrics server port (None = disabled)
    pub metrics_port: Option<u16>,

    pub lifecycle: LifecycleConfig,
}

/// Overlay run orchestrator
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Run until the duration elapses or `shutdown` resolves
    ///
    /// Returns `None` when the run was skipped because auto-start is off.
    pub async fn run<F>(self, shutdown: F) -> Result<Option<RunStats>>
    where
        F: Future<Output = ()>,
    {
        let start_time = Instant::now();
        let config = self.config;

        if let Some(port) = config.metrics_port {
            observability::init_metrics_only(port)?;
            info!("Metrics endpoint available on port {}", port);
        }

        let store = PreferenceStore::open(&config.prefs_path)
            .await
            .with_context(|| {
                format!(
                    "Failed to open preferences at {}",
                    config.prefs_path.display()
                )
            })?;
        for warning in store.load_warnings() {
            warn!(%warning, "Preference fell back to default");
        }
        if !store.migration().is_empty() {
            info!(
                keys = store.migration().migrated.len(),
                "Legacy preferences migrated"
            );
        }

        let settings = store.current();
        if config.only_if_autostart && !settings.auto_start {
            info!("Auto-start disabled, not starting overlay");
            return Ok(None);
        }
        if !store.has_completed_onboarding() {
            info!("Onboarding not completed");
        }

        let sensor = build_sensor(&config.sensor)?;
        let sensor_name = sensor.as_ref().map(|s| s.name().to_string());
        match &sensor_name {
            Some(name) => info!(sensor = %name, "Motion sensor selected"),
            None => warn!("No motion sensor available, overlay will not move"),
        }

        let host = HeadlessWindowHost::new(config.bounds);
        let probe = host.probe();
        let screen = Arc::new(ManualScreenState::new());

        info!(
            mode = %settings.selected_mode,
            width = config.bounds.width,
            height = config.bounds.height,
            "Starting overlay service"
        );
        let handle = OverlayHandle::spawn(
            host,
            store.subscribe(),
            sensor,
            screen.clone(),
            config.lifecycle,
        );

        let screen_timer = config.screen_off_after.map(|after| {
            let screen = screen.clone();
            tokio::spawn(async move {
                tokio::time::sleep(after).await;
                info!("Screen off");
                screen.turn_off();
            })
        });

        let run_for = async {
            match config.duration {
                Some(duration) => tokio::time::sleep(duration).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            _ = run_for => info!("Run duration elapsed"),
            _ = shutdown => warn!("Received shutdown signal, stopping overlay..."),
        }

        if let Some(timer) = screen_timer {
            timer.abort();
        }

        let report = handle.stop().await.context("Overlay service failed")?;

        Ok(Some(RunStats {
            duration: start_time.elapsed(),
            sensor: sensor_name,
            frames_drawn: probe.frames_drawn(),
            max_attached: probe.max_attached(),
            window_events: probe.history().len(),
            report,
        }))
    }
}

fn build_sensor(choice: &SensorChoice) -> Result<Option<Arc<dyn MotionSensorSource>>> {
    let candidates: Vec<Arc<dyn MotionSensorSource>> = match choice {
        SensorChoice::Mock { kind, config } => vec![Arc::new(MockMotionSensor::new(
            "mock-motion",
            *kind,
            config.clone(),
        ))],
        SensorChoice::Replay { path, config } => {
            let replay = ReplayMotionSensor::load(path, config.clone()).with_context(|| {
                format!("Failed to load motion recording {}", path.display())
            })?;
            info!(
                samples = replay.len(),
                duration_secs = replay.duration(),
                "Motion recording loaded"
            );
            vec![Arc::new(replay)]
        }
        SensorChoice::None => Vec::new(),
    };
    Ok(select_sensor(candidates))
}
