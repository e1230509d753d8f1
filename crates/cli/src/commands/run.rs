//! `run` command implementation.

use anyhow::Result;
use std::time::Duration;
use tracing::{info, warn};

use contracts::Bounds;
use overlay_service::{LifecycleConfig, MockSensorConfig, ReplayConfig};

use crate::cli::RunArgs;
use crate::pipeline::{Pipeline, PipelineConfig, SensorChoice};

/// Execute the `run` command
pub async fn run_overlay(args: &RunArgs) -> Result<()> {
    info!(prefs = %args.prefs.display(), "Loading preferences");

    let pipeline = Pipeline::new(build_config(args));

    info!("Starting overlay...");
    match pipeline.run(shutdown_signal()).await? {
        Some(stats) => {
            info!(
                frames_drawn = stats.frames_drawn,
                samples = stats.report.summary.samples_received,
                duration_secs = stats.duration.as_secs_f64(),
                fps = format!("{:.2}", stats.fps()),
                "Overlay run completed"
            );
            stats.print_summary();
        }
        None => println!("Auto-start is disabled; overlay not started."),
    }

    info!("Motion Overlay finished");
    Ok(())
}

fn build_config(args: &RunArgs) -> PipelineConfig {
    let sensor = if args.no_sensor {
        SensorChoice::None
    } else if let Some(path) = &args.replay {
        SensorChoice::Replay {
            path: path.clone(),
            config: ReplayConfig {
                speed_multiplier: args.replay_speed,
                loop_playback: args.replay_loop,
            },
        }
    } else {
        SensorChoice::Mock {
            kind: args.sensor.into(),
            config: MockSensorConfig {
                amplitude: args.amplitude,
                ..Default::default()
            },
        }
    };

    PipelineConfig {
        prefs_path: args.prefs.clone(),
        duration: (args.duration > 0).then(|| Duration::from_secs(args.duration)),
        screen_off_after: args.screen_off_after.map(Duration::from_secs),
        only_if_autostart: args.only_if_autostart,
        sensor,
        bounds: Bounds::new(args.width, args.height),
        metrics_port: (args.metrics_port > 0).then_some(args.metrics_port),
        lifecycle: LifecycleConfig::default(),
    }
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
