//! Mode / parameter mapper
//!
//! Pure tables from discrete presets to continuous render parameters, and the
//! filtered-motion to pixel-delta mapping per surface kind. Everything here is
//! total: out-of-range or non-finite input is clamped or replaced, never
//! reported.

use contracts::{
    DensityPreset, DotColor, IntensityPreset, MotionVector, OpacityPreset, OverlayMode,
    OverlaySettings, Rgba, SizePreset,
};
use serde::Serialize;

use crate::MotionTuning;

pub const INTENSITY_RANGE: (f32, f32) = (0.0, 10.0);
pub const OPACITY_RANGE: (f32, f32) = (0.0, 1.0);
pub const DENSITY_RANGE: (u32, u32) = (10, 100);
pub const SIZE_RANGE: (f32, f32) = (0.5, 2.0);

/// Intensity preset → scalar 0-10
pub fn intensity_scalar(preset: IntensityPreset) -> f32 {
    match preset {
        IntensityPreset::Low => 3.0,
        IntensityPreset::Normal => 6.0,
        IntensityPreset::High => 9.0,
    }
}

/// Opacity preset → alpha 0-1
pub fn opacity_alpha(preset: OpacityPreset) -> f32 {
    match preset {
        OpacityPreset::Subtle => 0.14,
        OpacityPreset::Balanced => 0.24,
        OpacityPreset::Visible => 0.38,
    }
}

/// Density preset → dot count
pub fn dot_count(preset: DensityPreset) -> u32 {
    match preset {
        DensityPreset::Light => 24,
        DensityPreset::Standard => 48,
        DensityPreset::Dense => 80,
    }
}

/// Size preset → radius multiplier
pub fn size_multiplier(preset: SizePreset) -> f32 {
    match preset {
        SizePreset::Small => 0.75,
        SizePreset::Medium => 1.0,
        SizePreset::Large => 1.35,
    }
}

/// Dot color → opaque RGBA
pub fn color_rgba(color: DotColor) -> Rgba {
    match color {
        DotColor::White => Rgba::opaque(255, 255, 255),
        DotColor::Black => Rgba::opaque(0, 0, 0),
        DotColor::Gray => Rgba::opaque(158, 158, 158),
        DotColor::Blue => Rgba::opaque(100, 181, 246),
        DotColor::Amber => Rgba::opaque(255, 193, 7),
    }
}

fn clamp_or(value: f32, (min, max): (f32, f32), fallback: f32) -> f32 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        fallback
    }
}

pub fn clamp_intensity(value: f32) -> f32 {
    clamp_or(value, INTENSITY_RANGE, intensity_scalar(IntensityPreset::default()))
}

pub fn clamp_opacity(value: f32) -> f32 {
    clamp_or(value, OPACITY_RANGE, opacity_alpha(OpacityPreset::default()))
}

pub fn clamp_size(value: f32) -> f32 {
    clamp_or(value, SIZE_RANGE, size_multiplier(SizePreset::default()))
}

pub fn clamp_density(value: u32) -> u32 {
    value.clamp(DENSITY_RANGE.0, DENSITY_RANGE.1)
}

/// Intensity as a 0-1 motion scale
pub fn intensity_scale(intensity: f32) -> f32 {
    clamp_intensity(intensity) / INTENSITY_RANGE.1
}

/// How dots are spread over the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DotPlacement {
    /// Uniform over the whole bounds
    Uniform,
    /// Confined to the left/right side bands
    Edge,
}

/// Which surface a mode renders with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceKind {
    Dots(DotPlacement),
    Horizon,
}

impl SurfaceKind {
    /// None for `Disabled`
    pub fn for_mode(mode: OverlayMode) -> Option<Self> {
        match mode {
            OverlayMode::ClassicDots => Some(Self::Dots(DotPlacement::Uniform)),
            OverlayMode::EdgeDots => Some(Self::Dots(DotPlacement::Edge)),
            OverlayMode::Horizon => Some(Self::Horizon),
            OverlayMode::Disabled => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Dots(_) => "dots",
            Self::Horizon => "horizon",
        }
    }
}

/// Render parameters derived from one settings snapshot
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SurfaceParams {
    pub kind: Option<SurfaceKind>,
    pub intensity: f32,
    pub opacity: f32,
    pub color: Rgba,
    pub density: u32,
    pub size: f32,
}

impl SurfaceParams {
    pub fn from_settings(settings: &OverlaySettings) -> Self {
        Self {
            kind: SurfaceKind::for_mode(settings.selected_mode),
            intensity: intensity_scalar(settings.intensity),
            opacity: opacity_alpha(settings.opacity),
            color: color_rgba(settings.color),
            density: dot_count(settings.density),
            size: size_multiplier(settings.size),
        }
    }
}

/// Pixel-space motion for the active surface, before intensity scaling
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "surface", rename_all = "snake_case")]
pub enum MotionCommand {
    /// Dots move against the x acceleration and with y
    Dots { dx: f32, dy: f32 },
    /// Vertical shift (px) and tilt (degrees)
    Horizon { shift: f32, tilt: f32 },
}

/// Map a filtered vector onto the surface's motion entry point
pub fn map_motion(kind: SurfaceKind, v: MotionVector, tuning: &MotionTuning) -> MotionCommand {
    match kind {
        SurfaceKind::Dots(_) => MotionCommand::Dots {
            dx: -v.x * tuning.pixel_scale,
            dy: v.y * tuning.pixel_scale,
        },
        SurfaceKind::Horizon => MotionCommand::Horizon {
            shift: v.y * tuning.pixel_scale * tuning.horizon_shift_gain,
            tilt: v.x * tuning.horizon_tilt_gain,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_preserve_order() {
        let intensities: Vec<f32> = IntensityPreset::ALL.iter().map(|p| intensity_scalar(*p)).collect();
        assert_eq!(intensities, vec![3.0, 6.0, 9.0]);

        let opacities: Vec<f32> = OpacityPreset::ALL.iter().map(|p| opacity_alpha(*p)).collect();
        assert!(opacities.windows(2).all(|w| w[0] < w[1]));

        let counts: Vec<u32> = DensityPreset::ALL.iter().map(|p| dot_count(*p)).collect();
        assert_eq!(counts, vec![24, 48, 80]);

        let sizes: Vec<f32> = SizePreset::ALL.iter().map(|p| size_multiplier(*p)).collect();
        assert_eq!(sizes, vec![0.75, 1.0, 1.35]);
    }

    #[test]
    fn test_clamps() {
        assert_eq!(clamp_intensity(42.0), 10.0);
        assert_eq!(clamp_intensity(f32::NAN), 6.0);
        assert_eq!(clamp_opacity(-1.0), 0.0);
        assert_eq!(clamp_density(3), 10);
        assert_eq!(clamp_density(500), 100);
        assert_eq!(clamp_size(f32::INFINITY), 1.0);
        assert_eq!(intensity_scale(9.0), 0.9);
    }

    #[test]
    fn test_surface_kind_for_mode() {
        assert_eq!(SurfaceKind::for_mode(OverlayMode::Disabled), None);
        assert_eq!(
            SurfaceKind::for_mode(OverlayMode::EdgeDots),
            Some(SurfaceKind::Dots(DotPlacement::Edge))
        );
    }

    #[test]
    fn test_params_from_default_settings() {
        let params = SurfaceParams::from_settings(&OverlaySettings::default());
        assert_eq!(params.kind, Some(SurfaceKind::Dots(DotPlacement::Uniform)));
        assert_eq!(params.intensity, 6.0);
        assert_eq!(params.opacity, 0.14);
        assert_eq!(params.density, 48);
        assert_eq!(params.color, Rgba::opaque(255, 255, 255));
    }

    #[test]
    fn test_map_motion() {
        let tuning = MotionTuning::default();
        let v = MotionVector::new(0.1, 0.1);

        match map_motion(SurfaceKind::Dots(DotPlacement::Uniform), v, &tuning) {
            MotionCommand::Dots { dx, dy } => {
                assert!((dx + 3.8).abs() < 1e-4);
                assert!((dy - 3.8).abs() < 1e-4);
            }
            other => panic!("unexpected {other:?}"),
        }

        match map_motion(SurfaceKind::Horizon, v, &tuning) {
            MotionCommand::Horizon { shift, tilt } => {
                assert!((shift - 4.94).abs() < 1e-4);
                assert!((tilt - 1.8).abs() < 1e-4);
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
