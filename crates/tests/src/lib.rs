//! # Integration Tests
//!
//! Cross-crate and end-to-end tests.
//!
//! Covers:
//! - Contract smoke tests
//! - Settings store -> overlay service e2e runs (headless, no display)
//! - Motion clamp and dot layout scenarios

#[cfg(test)]
mod contract_tests {
    #[test]
    fn test_contracts_compile() {
        let _ = contracts::OverlayMode::ClassicDots;
        let _ = contracts::OverlaySettings::default();
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::sync::Arc;
    use std::time::Duration;

    use contracts::{
        Bounds, IntensityPreset, MotionSensorSource, OverlayMode, ScreenStateSource, SensorKind,
        SettingsStore,
    };
    use overlay_service::{
        HeadlessWindowHost, LifecycleConfig, ManualMotionSensor, ManualScreenState,
        OverlayHandle, WindowEvent, WindowProbe,
    };
    use settings_store::PreferenceStore;
    use tokio::time::sleep;

    struct Rig {
        store: PreferenceStore,
        probe: WindowProbe,
        sensor: Arc<ManualMotionSensor>,
        screen: Arc<ManualScreenState>,
        handle: OverlayHandle,
    }

    fn start(store: PreferenceStore) -> Rig {
        let host = HeadlessWindowHost::new(Bounds::new(1080.0, 2400.0));
        let probe = host.probe();
        let sensor = Arc::new(ManualMotionSensor::new(
            "linear",
            SensorKind::LinearAcceleration,
        ));
        let screen = Arc::new(ManualScreenState::new());
        let handle = OverlayHandle::spawn(
            host,
            store.subscribe(),
            Some(sensor.clone() as Arc<dyn MotionSensorSource>),
            screen.clone(),
            LifecycleConfig::default(),
        );
        Rig {
            store,
            probe,
            sensor,
            screen,
            handle,
        }
    }

    async fn settle() {
        sleep(Duration::from_millis(40)).await;
    }

    fn labels(history: &[WindowEvent]) -> Vec<String> {
        history
            .iter()
            .map(|e| match e {
                WindowEvent::Attached { label, .. } => format!("+{}", label),
                WindowEvent::Detached { label, .. } => format!("-{}", label),
                other => format!("{:?}", other),
            })
            .collect()
    }

    /// Store -> service -> headless window: mode switches detach before attach
    #[tokio::test]
    async fn test_e2e_mode_switch_sequencing() {
        let rig = start(PreferenceStore::in_memory());
        settle().await;

        rig.store.set_mode(OverlayMode::Horizon).await.unwrap();
        settle().await;
        rig.store.set_mode(OverlayMode::EdgeDots).await.unwrap();
        settle().await;

        assert_eq!(
            labels(&rig.probe.history()),
            vec!["+dots", "-dots", "+horizon", "-horizon", "+dots"]
        );
        assert_eq!(rig.probe.max_attached(), 1);
        assert!(rig.sensor.is_listening());

        let report = rig.handle.stop().await.unwrap();
        assert_eq!(report.last_mode, Some(OverlayMode::EdgeDots));
        assert_eq!(report.summary.surface_swaps, 3);
    }

    /// After stop nothing is left attached or registered
    #[tokio::test]
    async fn test_e2e_stop_releases_everything() {
        let rig = start(PreferenceStore::in_memory());
        settle().await;
        assert!(rig.sensor.is_listening());

        rig.handle.stop().await.unwrap();

        assert!(!rig.sensor.is_listening());
        assert!(!rig.sensor.push_xy(1.0, 1.0));
        assert!(!rig.screen.is_subscribed());
        assert_eq!(rig.probe.attached_count(), 0);
    }

    /// A burst of writes converges on the last value
    #[tokio::test]
    async fn test_e2e_latest_settings_win() {
        let rig = start(PreferenceStore::in_memory());
        settle().await;

        rig.store.set_mode(OverlayMode::Horizon).await.unwrap();
        rig.store.set_mode(OverlayMode::Disabled).await.unwrap();
        rig.store.set_mode(OverlayMode::EdgeDots).await.unwrap();
        rig.store.set_intensity(IntensityPreset::High).await.unwrap();
        settle().await;

        assert_eq!(rig.probe.attached(), vec!["dots".to_string()]);
        assert_eq!(rig.probe.max_attached(), 1);

        let report = rig.handle.stop().await.unwrap();
        assert_eq!(report.last_mode, Some(OverlayMode::EdgeDots));
        // initial snapshot plus at most one per write
        assert!(report.summary.settings_applied <= 5);
    }

    /// Disabled mode releases the window and the sensor
    #[tokio::test]
    async fn test_e2e_disabled_releases_sensor() {
        let rig = start(PreferenceStore::in_memory());
        settle().await;

        rig.store.set_mode(OverlayMode::Disabled).await.unwrap();
        settle().await;

        assert_eq!(rig.probe.attached_count(), 0);
        assert!(!rig.sensor.is_listening());

        rig.store.set_mode(OverlayMode::ClassicDots).await.unwrap();
        settle().await;
        assert_eq!(rig.probe.attached_count(), 1);
        assert!(rig.sensor.is_listening());

        rig.handle.stop().await.unwrap();
    }

    /// Screen off stops the sensor, screen on restarts it
    #[tokio::test]
    async fn test_e2e_screen_cycle() {
        let rig = start(PreferenceStore::in_memory());
        settle().await;

        rig.screen.turn_off();
        settle().await;
        assert!(!rig.sensor.is_listening());
        assert_eq!(rig.probe.attached_count(), 1);

        rig.screen.turn_on();
        settle().await;
        assert!(rig.sensor.is_listening());
        assert_eq!(rig.sensor.listen_count(), 2);

        rig.handle.stop().await.unwrap();
    }

    /// Revoking the overlay permission mid-run, then switching modes
    #[tokio::test]
    async fn test_e2e_permission_revoked_then_granted() {
        let rig = start(PreferenceStore::in_memory());
        settle().await;

        rig.probe.revoke_permission();
        rig.store.set_mode(OverlayMode::Horizon).await.unwrap();
        settle().await;
        assert_eq!(rig.probe.attached_count(), 0);
        assert!(!rig.sensor.is_listening());

        rig.probe.grant_permission();
        rig.store.set_mode(OverlayMode::ClassicDots).await.unwrap();
        settle().await;
        assert_eq!(rig.probe.attached(), vec!["dots".to_string()]);
        assert!(rig.sensor.is_listening());

        rig.handle.stop().await.unwrap();
    }

    /// Samples from the sensor move the overlay
    #[tokio::test]
    async fn test_e2e_samples_redraw() {
        let rig = start(PreferenceStore::in_memory());
        settle().await;
        let frames = rig.probe.frames_drawn();

        for _ in 0..10 {
            rig.sensor.push_xy(-1.5, 0.8);
            sleep(Duration::from_millis(20)).await;
        }
        settle().await;

        assert!(rig.probe.frames_drawn() > frames);
        let report = rig.handle.stop().await.unwrap();
        assert_eq!(report.engine.received, 10);
        assert!(report.summary.dot_dx.max <= 60.0);
    }
}

#[cfg(test)]
mod settings_tests {
    use contracts::{
        DensityPreset, IntensityPreset, OpacityPreset, OverlayMode, SettingsStore,
    };
    use settings_store::{intensity_from_legacy, PreferenceStore};
    use tempfile::TempDir;

    #[test]
    fn test_legacy_intensity_anchors() {
        assert_eq!(intensity_from_legacy(7.5), IntensityPreset::High);
        assert_eq!(intensity_from_legacy(3.4), IntensityPreset::Low);
        assert_eq!(intensity_from_legacy(5.0), IntensityPreset::Normal);
    }

    /// Legacy file is migrated once and rewritten in the preset shape
    #[tokio::test]
    async fn test_legacy_file_migrates_on_open() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("overlay.toml");
        std::fs::write(
            &path,
            "selected_mode = \"horizon\"\nintensity = 8.2\nopacity = 0.35\ndot_count = 20\n",
        )
        .unwrap();

        let store = PreferenceStore::open(&path).await.unwrap();
        let settings = store.current();
        assert_eq!(settings.selected_mode, OverlayMode::Horizon);
        assert_eq!(settings.intensity, IntensityPreset::High);
        assert_eq!(settings.opacity, OpacityPreset::Visible);
        assert_eq!(settings.density, DensityPreset::Light);
        assert_eq!(store.migration().migrated.len(), 3);

        let persisted = std::fs::read_to_string(&path).unwrap();
        assert!(persisted.contains("intensity_level"));
        assert!(!persisted.contains("dot_count"));

        drop(store);
        let reopened = PreferenceStore::open(&path).await.unwrap();
        assert!(reopened.migration().is_empty());
        assert_eq!(reopened.current(), settings);
    }
}

#[cfg(test)]
mod motion_tests {
    use contracts::{Bounds, DensityPreset, IntensityPreset, MotionVector, OverlayMode, OverlaySettings};
    use motion_engine::mapper::map_motion;
    use motion_engine::{MotionCommand, MotionTuning, SurfaceKind, SurfaceParams};
    use surfaces::{DotSurface, MotionLimits, Surface};

    fn dots(settings: &OverlaySettings) -> DotSurface {
        let mut surface = DotSurface::with_seed(MotionLimits::SERVICE, 11);
        surface.set_bounds(Bounds::new(1000.0, 1000.0));
        surface.apply_params(&SurfaceParams::from_settings(settings));
        surface
    }

    /// High intensity: offsets grow with the input, then hold at the clamp
    #[test]
    fn test_high_intensity_clamp_engages() {
        let settings = OverlaySettings {
            intensity: IntensityPreset::High,
            ..Default::default()
        };
        let tuning = MotionTuning::default();
        let kind = SurfaceKind::for_mode(OverlayMode::ClassicDots).unwrap();
        let mut surface = dots(&settings);

        let mut previous = 0.0f32;
        for magnitude in [0.1f32, 0.5, 1.0, 1.5, 2.0, 5.0, 10.0] {
            let MotionCommand::Dots { dx, dy } =
                map_motion(kind, MotionVector::new(magnitude, magnitude), &tuning)
            else {
                panic!("dots surface expects a dots command");
            };
            surface.set_motion(dx, dy);
            let (ox, oy) = surface.offset();

            let expected = (magnitude * 38.0 * 0.9).min(60.0);
            assert!((ox + expected).abs() < 1e-3, "dx {} at {}", ox, magnitude);
            assert!((oy - expected).abs() < 1e-3, "dy {} at {}", oy, magnitude);
            assert!(oy >= previous);
            previous = oy;
        }
        assert_eq!(surface.offset(), (-60.0, 60.0));
    }

    #[test]
    fn test_light_density_layout() {
        let settings = OverlaySettings {
            density: DensityPreset::Light,
            ..Default::default()
        };
        let mut surface = dots(&settings);
        let mut canvas = surfaces::RecordingCanvas::new();
        surface.draw(&mut canvas);

        assert_eq!(surface.dots().len(), 24);
        for dot in surface.dots() {
            assert!((0.0..1000.0).contains(&dot.x));
            assert!((0.0..1000.0).contains(&dot.y));
        }
    }
}
