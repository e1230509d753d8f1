//! Overlay lifecycle manager
//!
//! Owns the overlay window, the active render surface and the sensor
//! registration. All methods run on one execution context; the service loop
//! funnels sensor, screen and settings events here one at a time.

use std::time::Instant;

use contracts::{
    MotionSample, MotionSampleCallback, OverlayError, OverlayMode, OverlaySettings, ScreenEvent,
    WindowHost, WindowParams, WindowToken,
};
use motion_engine::{EngineStats, MotionCommand, MotionEngine, MotionTuning, SurfaceParams};
use observability::OverlayMetricsAggregator;
use serde::{Deserialize, Serialize};
use surfaces::{MotionLimits, RenderSurface};
use tracing::{debug, info, instrument, warn};

use crate::sensors::SensorRegistration;

/// Lifecycle tunables
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifecycleConfig {
    pub tuning: MotionTuning,
    pub limits: MotionLimits,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            tuning: MotionTuning::default(),
            limits: MotionLimits::SERVICE,
        }
    }
}

/// Overlay lifecycle manager
///
/// Invariant: at most one surface attached to the window. Window failures are
/// logged and swallowed; the next settings snapshot retries a failed attach.
pub struct OverlayLifecycle<W: WindowHost> {
    window: W,
    config: LifecycleConfig,
    engine: MotionEngine,
    surface: RenderSurface,
    token: Option<WindowToken>,
    active_mode: Option<OverlayMode>,
    settings: OverlaySettings,
    params: SurfaceParams,
    sensor: SensorRegistration,
    sample_callback: MotionSampleCallback,
    screen_on: bool,
    metrics: OverlayMetricsAggregator,
    torn_down: bool,
}

impl<W: WindowHost> OverlayLifecycle<W> {
    /// `sample_callback` is what the sensor gets on registration; it must only
    /// hand samples over to the lifecycle's execution context.
    pub fn new(
        window: W,
        sensor: SensorRegistration,
        sample_callback: MotionSampleCallback,
        config: LifecycleConfig,
    ) -> Self {
        let settings = OverlaySettings::default();
        Self {
            window,
            engine: MotionEngine::new(config.tuning),
            config,
            surface: RenderSurface::None,
            token: None,
            active_mode: None,
            params: SurfaceParams::from_settings(&settings),
            settings,
            sensor,
            sample_callback,
            screen_on: true,
            metrics: OverlayMetricsAggregator::new(),
            torn_down: false,
        }
    }

    /// Apply a settings snapshot
    ///
    /// Swaps the surface if the mode changed, pushes mapped parameters, then
    /// registers or unregisters the sensor.
    #[instrument(
        name = "overlay_apply_settings",
        skip(self, settings),
        fields(mode = %settings.selected_mode)
    )]
    pub fn apply_settings(&mut self, settings: OverlaySettings) {
        if self.torn_down {
            return;
        }
        self.settings = settings;
        self.params = SurfaceParams::from_settings(&settings);
        self.metrics.on_settings_applied();
        observability::record_settings_applied(settings.selected_mode.as_str());

        self.drop_stale_window();
        if self.active_mode != Some(settings.selected_mode) {
            self.switch_surface(settings.selected_mode);
        }

        let bounds = self.window.bounds();
        self.surface.set_bounds(bounds);
        self.surface.apply_params(&self.params);

        if self.token.is_some() && self.screen_on {
            self.register_sensor();
        } else {
            self.unregister_sensor();
        }

        self.render();
    }

    fn switch_surface(&mut self, mode: OverlayMode) {
        let from = self.surface.label();
        self.detach_surface();

        let kind = self.params.kind;
        self.active_mode = Some(mode);
        let Some(kind) = kind else {
            debug!("overlay disabled");
            return;
        };

        if !self.window.can_draw_overlays() {
            warn!(?mode, "overlay permission missing, skipping attach");
            self.metrics.on_window_failure();
            observability::record_window_failure("attach");
            self.active_mode = None;
            return;
        }

        let surface = RenderSurface::for_kind(Some(kind), self.config.limits);
        match self
            .window
            .attach(surface.label(), &WindowParams::fullscreen_overlay())
        {
            Ok(token) => {
                info!(?mode, token = token.0, "surface attached");
                self.surface = surface;
                self.token = Some(token);
                self.metrics.on_surface_swap();
                observability::record_surface_swap(from, kind.label());
            }
            Err(e) => {
                self.window_failure("attach", &e);
                self.active_mode = None;
            }
        }
    }

    /// Forget a window the host removed on its own, so the current mode
    /// attaches again.
    fn drop_stale_window(&mut self) {
        let Some(token) = self.token else {
            return;
        };
        if self.window.is_attached(token) {
            return;
        }
        warn!(token = token.0, "window removed by host");
        self.token = None;
        self.surface = RenderSurface::None;
        self.active_mode = None;
    }

    fn detach_surface(&mut self) {
        self.surface = RenderSurface::None;
        if let Some(token) = self.token.take() {
            match self.window.detach(token) {
                Ok(()) => debug!(token = token.0, "surface detached"),
                Err(e) => self.window_failure("detach", &e),
            }
        }
    }

    fn window_failure(&mut self, operation: &'static str, error: &OverlayError) {
        warn!(operation, error = %error, "window operation failed");
        self.metrics.on_window_failure();
        observability::record_window_failure(operation);
    }

    fn register_sensor(&mut self) {
        if self.sensor.register(&self.sample_callback) {
            self.metrics.on_sensor_registered();
        }
    }

    fn unregister_sensor(&mut self) {
        self.sensor.unregister();
    }

    /// Handle one sensor sample
    pub fn on_sample(&mut self, sample: MotionSample, now: Instant) {
        if self.torn_down || !self.sensor.is_registered() {
            return;
        }
        self.metrics.on_sample();
        observability::record_sample_received(match sample.kind {
            contracts::SensorKind::LinearAcceleration => "linear_acceleration",
            contracts::SensorKind::Accelerometer => "accelerometer",
        });

        match self.engine.process(&sample, self.surface.kind(), now) {
            Ok(command) => {
                match command {
                    MotionCommand::Dots { dx, dy } => self.metrics.on_dots(dx as f64, dy as f64),
                    MotionCommand::Horizon { shift, tilt } => {
                        self.metrics.on_horizon(shift as f64, tilt as f64)
                    }
                }
                if self.surface.apply_motion(command) {
                    self.render();
                }
            }
            Err(reason) => self.metrics.on_dropped(reason),
        }
    }

    /// Handle a screen power transition
    #[instrument(name = "overlay_screen", skip(self))]
    pub fn on_screen(&mut self, event: ScreenEvent) {
        if self.torn_down {
            return;
        }
        match event {
            ScreenEvent::Off => {
                self.screen_on = false;
                self.unregister_sensor();
            }
            ScreenEvent::On => {
                self.screen_on = true;
                if self.token.is_some() && !self.surface.is_none() {
                    self.register_sensor();
                }
            }
        }
    }

    /// Draw the surface if a change is pending
    pub fn render(&mut self) {
        let Some(token) = self.token else {
            return;
        };
        if !self.surface.needs_redraw() {
            return;
        }

        match self.window.begin_frame(token) {
            Some(canvas) => {
                self.surface.draw(canvas);
                self.metrics.on_redraw();
            }
            None => debug!(token = token.0, "window gone, frame skipped"),
        }
        self.window.end_frame(token);
    }

    /// Unregister the sensor and detach the surface
    ///
    /// Idempotent. After it returns no sample reaches a surface.
    #[instrument(name = "overlay_teardown", skip(self))]
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.unregister_sensor();
        self.detach_surface();
        self.active_mode = None;
        self.torn_down = true;
        info!("overlay torn down");
    }

    pub fn active_mode(&self) -> Option<OverlayMode> {
        self.active_mode
    }

    pub fn surface(&self) -> &RenderSurface {
        &self.surface
    }

    pub fn token(&self) -> Option<WindowToken> {
        self.token
    }

    pub fn settings(&self) -> &OverlaySettings {
        &self.settings
    }

    pub fn params(&self) -> &SurfaceParams {
        &self.params
    }

    pub fn is_sensor_registered(&self) -> bool {
        self.sensor.is_registered()
    }

    pub fn is_screen_on(&self) -> bool {
        self.screen_on
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn metrics(&self) -> &OverlayMetricsAggregator {
        &self.metrics
    }

    pub fn engine_stats(&self) -> EngineStats {
        self.engine.stats()
    }

    pub fn window(&self) -> &W {
        &self.window
    }

    pub fn window_mut(&mut self) -> &mut W {
        &mut self.window
    }
}

impl<W: WindowHost> Drop for OverlayLifecycle<W> {
    fn drop(&mut self) {
        self.teardown();
    }
}
