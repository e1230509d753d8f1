//! `render` command implementation.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use contracts::{Bounds, MotionVector, OverlayMode, OverlaySettings};
use motion_engine::mapper::map_motion;
use motion_engine::{MotionCommand, MotionTuning, SurfaceKind, SurfaceParams};
use settings_store::PreferenceLoader;
use surfaces::{DotSurface, DrawOp, MotionLimits, RecordingCanvas, RenderSurface};

use crate::cli::RenderArgs;
use crate::error::CliError;

/// One rendered frame
#[derive(Debug, Serialize)]
struct RenderedFrame {
    mode: OverlayMode,
    bounds: Bounds,
    params: SurfaceParams,
    #[serde(skip_serializing_if = "Option::is_none")]
    motion: Option<MotionCommand>,
    ops: Vec<DrawOp>,
}

/// Execute the `render` command
pub fn run_render(args: &RenderArgs) -> Result<()> {
    let mut settings = match &args.prefs {
        Some(path) => {
            if !path.exists() {
                return Err(CliError::prefs_not_found(path.display().to_string()).into());
            }
            PreferenceLoader::load_from_path(path)
                .with_context(|| format!("Failed to load preferences from {}", path.display()))?
                .settings
        }
        None => OverlaySettings::default(),
    };

    if let Some(mode) = &args.mode {
        settings.selected_mode = mode
            .parse()
            .map_err(|e: contracts::ParsePresetError| {
                CliError::invalid_value("mode", mode, e.to_string())
            })?;
    }

    let limits = if args.service_limits {
        MotionLimits::SERVICE
    } else {
        MotionLimits::PREVIEW
    };
    let frame = render_frame(
        &settings,
        Bounds::new(args.width, args.height),
        MotionVector::new(args.x, args.y),
        limits,
        args.seed,
    );
    info!(
        mode = %frame.mode,
        ops = frame.ops.len(),
        "Frame rendered"
    );

    let json = if args.pretty {
        serde_json::to_string_pretty(&frame)
    } else {
        serde_json::to_string(&frame)
    }
    .context("Failed to serialize frame")?;
    println!("{}", json);
    Ok(())
}

fn render_frame(
    settings: &OverlaySettings,
    bounds: Bounds,
    vector: MotionVector,
    limits: MotionLimits,
    seed: u64,
) -> RenderedFrame {
    let params = SurfaceParams::from_settings(settings);
    let mut surface = match params.kind {
        Some(SurfaceKind::Dots(placement)) => {
            let mut dots = DotSurface::with_seed(limits, seed);
            dots.set_placement(placement);
            RenderSurface::Dots(dots)
        }
        other => RenderSurface::for_kind(other, limits),
    };
    surface.set_bounds(bounds);
    surface.apply_params(&params);

    let motion = params
        .kind
        .map(|kind| map_motion(kind, vector, &MotionTuning::default()));
    if let Some(command) = motion {
        surface.apply_motion(command);
    }

    let mut canvas = RecordingCanvas::new();
    surface.draw(&mut canvas);

    RenderedFrame {
        mode: settings.selected_mode,
        bounds,
        params,
        motion,
        ops: canvas.take(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::DensityPreset;

    fn settings(mode: OverlayMode) -> OverlaySettings {
        OverlaySettings {
            selected_mode: mode,
            density: DensityPreset::Light,
            ..Default::default()
        }
    }

    fn circles(ops: &[DrawOp]) -> usize {
        ops.iter()
            .filter(|op| matches!(op, DrawOp::FillCircle { .. }))
            .count()
    }

    #[test]
    fn test_classic_frame_has_one_circle_per_dot() {
        let frame = render_frame(
            &settings(OverlayMode::ClassicDots),
            Bounds::new(1000.0, 1000.0),
            MotionVector::new(0.0, 0.0),
            MotionLimits::PREVIEW,
            7,
        );
        assert_eq!(circles(&frame.ops), 24);
    }

    #[test]
    fn test_preview_limits_clamp_dots() {
        let frame = render_frame(
            &settings(OverlayMode::ClassicDots),
            Bounds::new(1000.0, 1000.0),
            MotionVector::new(-5.0, 5.0),
            MotionLimits::PREVIEW,
            7,
        );
        let translate = frame.ops.iter().find_map(|op| match op {
            DrawOp::Translate { dx, dy } => Some((*dx, *dy)),
            _ => None,
        });
        let (dx, dy) = translate.unwrap();
        assert!(dx.abs() <= MotionLimits::PREVIEW.dot_offset + 1e-3);
        assert!(dy.abs() <= MotionLimits::PREVIEW.dot_offset + 1e-3);
    }

    #[test]
    fn test_horizon_frame_draws_line() {
        let frame = render_frame(
            &settings(OverlayMode::Horizon),
            Bounds::new(1000.0, 1000.0),
            MotionVector::new(0.2, 0.1),
            MotionLimits::PREVIEW,
            0,
        );
        assert!(frame
            .ops
            .iter()
            .any(|op| matches!(op, DrawOp::StrokeLine { .. })));
        assert!(matches!(frame.motion, Some(MotionCommand::Horizon { .. })));
    }

    #[test]
    fn test_disabled_frame_is_empty() {
        let frame = render_frame(
            &settings(OverlayMode::Disabled),
            Bounds::new(1000.0, 1000.0),
            MotionVector::new(1.0, 1.0),
            MotionLimits::PREVIEW,
            0,
        );
        assert!(frame.ops.is_empty());
        assert!(frame.motion.is_none());
    }

    #[test]
    fn test_same_seed_same_frame() {
        let render = || {
            render_frame(
                &settings(OverlayMode::EdgeDots),
                Bounds::new(800.0, 600.0),
                MotionVector::new(0.0, 0.0),
                MotionLimits::PREVIEW,
                42,
            )
            .ops
        };
        assert_eq!(render(), render());
    }
}
