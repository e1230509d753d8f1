//! Overlay service - async event loop around the lifecycle
//!
//! Three event sources feed one sequential loop: the settings `watch` channel,
//! sensor samples and screen transitions. Settings and screen state are
//! latest-value-only `watch` channels; samples go through a bounded queue.
//! Sensor and screen callbacks arrive on foreign threads.

use std::sync::Arc;
use std::time::Instant;

use contracts::{
    MotionSample, MotionSampleCallback, MotionSensorSource, OverlayMode, OverlaySettings,
    ScreenEvent, ScreenEventCallback, ScreenStateSource, WindowHost,
};
use motion_engine::EngineStats;
use observability::OverlayMetricsSummary;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, trace};

use crate::error::{Result, ServiceError};
use crate::lifecycle::{LifecycleConfig, OverlayLifecycle};
use crate::sensors::SensorRegistration;

/// Queue capacity between sensor thread and service loop
pub const SAMPLE_QUEUE_CAPACITY: usize = 64;

/// End-of-run report
#[derive(Debug, Clone)]
pub struct ServiceReport {
    pub summary: OverlayMetricsSummary,
    pub engine: EngineStats,
    /// Mode active when the stop arrived
    pub last_mode: Option<OverlayMode>,
}

/// Handle to a running overlay service
pub struct OverlayHandle {
    shutdown_tx: Option<oneshot::Sender<()>>,
    worker: JoinHandle<ServiceReport>,
}

impl OverlayHandle {
    /// Start the service on the current tokio runtime
    ///
    /// The current value of `settings` is applied immediately.
    pub fn spawn<W>(
        window: W,
        settings: watch::Receiver<OverlaySettings>,
        sensor: Option<Arc<dyn MotionSensorSource>>,
        screen: Arc<dyn ScreenStateSource>,
        config: LifecycleConfig,
    ) -> Self
    where
        W: WindowHost + 'static,
    {
        let (samples_tx, samples_rx) = async_channel::bounded(SAMPLE_QUEUE_CAPACITY);
        // lifecycle starts with the screen on
        let (screen_tx, screen_rx) = watch::channel(ScreenEvent::On);
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let sample_callback: MotionSampleCallback = Arc::new(move |sample: MotionSample| {
            if samples_tx.try_send(sample).is_err() {
                trace!("sample queue full, dropping sample");
            }
        });
        let screen_callback: ScreenEventCallback = Arc::new(move |event: ScreenEvent| {
            screen_tx.send_replace(event);
        });

        let lifecycle = OverlayLifecycle::new(
            window,
            SensorRegistration::new(sensor),
            sample_callback,
            config,
        );

        let worker = tokio::spawn(run_service(
            lifecycle,
            settings,
            samples_rx,
            screen,
            screen_callback,
            screen_rx,
            shutdown_rx,
        ));

        Self {
            shutdown_tx: Some(shutdown_tx),
            worker,
        }
    }

    pub fn is_running(&self) -> bool {
        !self.worker.is_finished()
    }

    /// Stop the service
    ///
    /// Returns after the sensor is stopped, the screen observer removed and
    /// the surface detached.
    #[instrument(name = "overlay_handle_stop", skip(self))]
    pub async fn stop(mut self) -> Result<ServiceReport> {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        let report = self
            .worker
            .await
            .map_err(|e| ServiceError::Worker(e.to_string()))?;
        debug!("overlay service stopped");
        Ok(report)
    }
}

#[instrument(name = "overlay_service_loop", skip_all)]
async fn run_service<W: WindowHost>(
    mut lifecycle: OverlayLifecycle<W>,
    mut settings: watch::Receiver<OverlaySettings>,
    samples: async_channel::Receiver<MotionSample>,
    screen: Arc<dyn ScreenStateSource>,
    screen_callback: ScreenEventCallback,
    mut screen_state: watch::Receiver<ScreenEvent>,
    mut shutdown: oneshot::Receiver<()>,
) -> ServiceReport {
    screen.subscribe(screen_callback);
    let initial = *settings.borrow_and_update();
    lifecycle.apply_settings(initial);
    info!(mode = %initial.selected_mode, "overlay service started");

    let mut settings_open = true;
    let mut screen_open = true;
    loop {
        tokio::select! {
            biased;

            _ = &mut shutdown => {
                debug!("shutdown requested");
                break;
            }

            changed = settings.changed(), if settings_open => match changed {
                Ok(()) => {
                    let snapshot = *settings.borrow_and_update();
                    lifecycle.apply_settings(snapshot);
                }
                Err(_) => {
                    debug!("settings stream closed, keeping last settings");
                    settings_open = false;
                }
            },

            changed = screen_state.changed(), if screen_open => match changed {
                Ok(()) => {
                    let event = *screen_state.borrow_and_update();
                    lifecycle.on_screen(event);
                }
                Err(_) => {
                    debug!("screen source dropped its observer");
                    screen_open = false;
                }
            },

            Ok(sample) = samples.recv() => lifecycle.on_sample(sample, Instant::now()),
        }
    }

    let last_mode = lifecycle.active_mode();
    lifecycle.teardown();
    screen.unsubscribe();

    let report = ServiceReport {
        summary: lifecycle.metrics().summary(),
        engine: lifecycle.engine_stats(),
        last_mode,
    };
    info!(
        samples = report.summary.samples_received,
        forwarded = report.summary.samples_forwarded,
        "overlay service finished"
    );
    report
}
