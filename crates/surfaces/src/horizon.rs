//! Horizon surface
//!
//! One horizontal line across the full width, shifted vertically and rotated
//! about its own center.

use contracts::{Bounds, Canvas, Rgba};
use motion_engine::mapper::{clamp_intensity, clamp_opacity, color_rgba, intensity_scale};
use motion_engine::SurfaceParams;

use crate::limits::clamp_symmetric;
use crate::surface::{Surface, SurfaceState};
use crate::MotionLimits;

pub const STROKE_WIDTH: f32 = 4.0;

#[derive(Debug)]
pub struct HorizonSurface {
    limits: MotionLimits,
    bounds: Bounds,
    opacity: f32,
    intensity: f32,
    color: Rgba,
    shift: f32,
    tilt: f32,
    dirty: bool,
    drawn: bool,
    invalidations: u64,
}

impl HorizonSurface {
    pub fn new(limits: MotionLimits) -> Self {
        let defaults = SurfaceParams::from_settings(&Default::default());
        Self {
            limits,
            bounds: Bounds::default(),
            opacity: defaults.opacity,
            intensity: defaults.intensity,
            color: color_rgba(Default::default()),
            shift: 0.0,
            tilt: 0.0,
            dirty: false,
            drawn: false,
            invalidations: 0,
        }
    }

    pub fn apply_params(&mut self, params: &SurfaceParams) -> bool {
        let mut changed = self.set_opacity(params.opacity);
        changed |= self.set_intensity(params.intensity);
        changed |= self.set_color(params.color);
        changed
    }

    /// Shift (px) and tilt (degrees), unscaled
    ///
    /// Both are scaled by intensity and clamped independently; the update is
    /// dropped when neither moves past its dead zone.
    pub fn set_motion(&mut self, shift: f32, tilt: f32) -> bool {
        let scale = intensity_scale(self.intensity);
        let shift = clamp_symmetric(shift * scale, self.limits.horizon_shift);
        let tilt = clamp_symmetric(tilt * scale, self.limits.horizon_tilt);

        if (shift - self.shift).abs() < self.limits.dead_zone_px
            && (tilt - self.tilt).abs() < self.limits.dead_zone_deg
        {
            return false;
        }

        self.shift = shift;
        self.tilt = tilt;
        self.invalidate();
        true
    }

    pub fn shift(&self) -> f32 {
        self.shift
    }

    pub fn tilt(&self) -> f32 {
        self.tilt
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    fn invalidate(&mut self) {
        self.dirty = true;
        self.invalidations += 1;
    }
}

impl Surface for HorizonSurface {
    fn set_bounds(&mut self, bounds: Bounds) -> bool {
        if self.bounds == bounds {
            return false;
        }
        self.bounds = bounds;
        self.invalidate();
        true
    }

    fn set_opacity(&mut self, opacity: f32) -> bool {
        let opacity = clamp_opacity(opacity);
        if self.opacity == opacity {
            return false;
        }
        self.opacity = opacity;
        self.invalidate();
        true
    }

    fn set_intensity(&mut self, intensity: f32) -> bool {
        let intensity = clamp_intensity(intensity);
        if self.intensity == intensity {
            return false;
        }
        self.intensity = intensity;
        self.invalidate();
        true
    }

    fn set_color(&mut self, color: Rgba) -> bool {
        if self.color == color {
            return false;
        }
        self.color = color;
        self.invalidate();
        true
    }

    fn draw(&mut self, canvas: &mut dyn Canvas) {
        if self.bounds.is_empty() {
            return;
        }

        let (center_x, center_y) = self.bounds.center();
        let center_y = center_y + self.shift;

        canvas.save();
        canvas.rotate(self.tilt, center_x, center_y);
        canvas.stroke_line(
            (0.0, center_y),
            (self.bounds.width, center_y),
            STROKE_WIDTH,
            self.color.with_opacity(self.opacity),
        );
        canvas.restore();

        self.dirty = false;
        self.drawn = true;
        observability::record_redraw("horizon");
    }

    fn needs_redraw(&self) -> bool {
        self.dirty
    }

    fn invalidations(&self) -> u64 {
        self.invalidations
    }

    fn state(&self) -> SurfaceState {
        if self.bounds.is_empty() {
            SurfaceState::Idle
        } else if self.drawn {
            SurfaceState::Rendering
        } else {
            SurfaceState::Configured
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DrawOp, RecordingCanvas};

    fn horizon(intensity: f32) -> HorizonSurface {
        let mut surface = HorizonSurface::new(MotionLimits::SERVICE);
        surface.set_bounds(Bounds::new(1080.0, 2400.0));
        surface.set_intensity(intensity);
        surface
    }

    #[test]
    fn test_clamps_independently() {
        let mut surface = horizon(10.0);
        surface.set_motion(500.0, 1.0);
        assert_eq!(surface.shift(), 120.0);
        assert_eq!(surface.tilt(), 1.0);

        surface.set_motion(-3.0, -90.0);
        assert_eq!(surface.shift(), -3.0);
        assert_eq!(surface.tilt(), -12.0);
    }

    #[test]
    fn test_dead_zone_needs_both_axes_quiet() {
        let mut surface = horizon(10.0);
        assert!(surface.set_motion(10.0, 2.0));

        assert!(!surface.set_motion(10.1, 2.05));
        // tilt alone past its dead zone
        assert!(surface.set_motion(10.1, 2.1));
    }

    #[test]
    fn test_intensity_scales_motion() {
        let mut surface = horizon(6.0);
        surface.set_motion(10.0, 5.0);
        assert!((surface.shift() - 6.0).abs() < 1e-5);
        assert!((surface.tilt() - 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_draw_rotates_about_shifted_center() {
        let mut surface = horizon(10.0);
        surface.set_motion(20.0, -4.0);

        let mut canvas = RecordingCanvas::new();
        surface.draw(&mut canvas);

        assert_eq!(
            canvas.ops()[1],
            DrawOp::Rotate {
                degrees: -4.0,
                pivot_x: 540.0,
                pivot_y: 1220.0
            }
        );
        match &canvas.ops()[2] {
            DrawOp::StrokeLine { from, to, width, .. } => {
                assert_eq!(*from, (0.0, 1220.0));
                assert_eq!(*to, (1080.0, 1220.0));
                assert_eq!(*width, STROKE_WIDTH);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(canvas.is_balanced());
    }

    #[test]
    fn test_opacity_idempotent() {
        let mut surface = horizon(6.0);
        let before = surface.invalidations();
        assert!(!surface.set_opacity(0.14));
        assert_eq!(surface.invalidations(), before);
    }
}
