//! Dot surface
//!
//! A layer of translucent dots translated as a whole by the current motion
//! offset. The dot list is regenerated lazily on the next draw pass after
//! bounds, density, size or placement change.

use contracts::{Bounds, Canvas, Dot, Rgba};
use motion_engine::mapper::{
    clamp_density, clamp_intensity, clamp_opacity, clamp_size, color_rgba, intensity_scale,
};
use motion_engine::{DotPlacement, SurfaceParams};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::trace;

use crate::limits::clamp_symmetric;
use crate::surface::{Surface, SurfaceState};
use crate::MotionLimits;

/// Side band width as a fraction of the surface width
pub const EDGE_BAND_FRACTION: f32 = 0.2;
/// Radius range at size multiplier 1.0 (px)
pub const BASE_RADIUS: (f32, f32) = (6.0, 12.0);

/// Width of each side band for edge placement
pub fn edge_band_width(width: f32) -> f32 {
    width * EDGE_BAND_FRACTION
}

/// Generate a fresh dot list
///
/// `count` is clamped to the density range. Empty bounds yield no dots.
pub fn generate_dots<R: Rng>(
    rng: &mut R,
    bounds: Bounds,
    count: u32,
    placement: DotPlacement,
    size: f32,
) -> Vec<Dot> {
    if bounds.is_empty() {
        return Vec::new();
    }

    let count = clamp_density(count);
    let size = clamp_size(size);
    let band = edge_band_width(bounds.width);
    let (min_r, max_r) = (BASE_RADIUS.0 * size, BASE_RADIUS.1 * size);

    (0..count)
        .map(|_| {
            let x = match placement {
                DotPlacement::Uniform => rng.random_range(0.0..bounds.width),
                DotPlacement::Edge if rng.random_bool(0.5) => rng.random_range(0.0..band),
                DotPlacement::Edge => rng.random_range(bounds.width - band..bounds.width),
            };
            Dot {
                x,
                y: rng.random_range(0.0..bounds.height),
                radius: rng.random_range(min_r..max_r),
            }
        })
        .collect()
}

/// Dot render surface
#[derive(Debug)]
pub struct DotSurface {
    limits: MotionLimits,
    bounds: Bounds,
    placement: DotPlacement,
    density: u32,
    size: f32,
    opacity: f32,
    intensity: f32,
    color: Rgba,
    offset: (f32, f32),
    dots: Vec<Dot>,
    stale: bool,
    dirty: bool,
    drawn: bool,
    invalidations: u64,
    generations: u64,
    rng: StdRng,
}

impl DotSurface {
    pub fn new(limits: MotionLimits) -> Self {
        Self::with_rng(limits, StdRng::seed_from_u64(rand::random()))
    }

    /// Surface whose generations are reproducible
    pub fn with_seed(limits: MotionLimits, seed: u64) -> Self {
        Self::with_rng(limits, StdRng::seed_from_u64(seed))
    }

    fn with_rng(limits: MotionLimits, rng: StdRng) -> Self {
        let defaults = SurfaceParams::from_settings(&Default::default());
        Self {
            limits,
            bounds: Bounds::default(),
            placement: DotPlacement::Uniform,
            density: defaults.density,
            size: defaults.size,
            opacity: defaults.opacity,
            intensity: defaults.intensity,
            color: color_rgba(Default::default()),
            offset: (0.0, 0.0),
            dots: Vec::new(),
            stale: true,
            dirty: false,
            drawn: false,
            invalidations: 0,
            generations: 0,
            rng,
        }
    }

    /// Regenerate immediately with new layout inputs
    pub fn regenerate(&mut self, bounds: Bounds, count: u32, placement: DotPlacement) {
        self.bounds = bounds;
        self.density = clamp_density(count);
        self.placement = placement;
        self.rebuild();
        self.invalidate();
    }

    pub fn set_placement(&mut self, placement: DotPlacement) -> bool {
        if self.placement == placement {
            return false;
        }
        self.placement = placement;
        self.mark_stale();
        true
    }

    pub fn set_density(&mut self, count: u32) -> bool {
        let count = clamp_density(count);
        if self.density == count {
            return false;
        }
        self.density = count;
        self.mark_stale();
        true
    }

    pub fn set_size(&mut self, size: f32) -> bool {
        let size = clamp_size(size);
        if self.size == size {
            return false;
        }
        self.size = size;
        self.mark_stale();
        true
    }

    /// Apply one snapshot of mapped parameters
    pub fn apply_params(&mut self, params: &SurfaceParams) -> bool {
        let mut changed = false;
        if let Some(motion_engine::SurfaceKind::Dots(placement)) = params.kind {
            changed |= self.set_placement(placement);
        }
        changed |= self.set_density(params.density);
        changed |= self.set_size(params.size);
        changed |= self.set_opacity(params.opacity);
        changed |= self.set_intensity(params.intensity);
        changed |= self.set_color(params.color);
        changed
    }

    /// Move the layer
    ///
    /// `dx`/`dy` are unscaled pixel deltas; intensity scaling and the clamp are
    /// applied here. Changes under the dead zone on both axes are dropped.
    pub fn set_motion(&mut self, dx: f32, dy: f32) -> bool {
        let scale = intensity_scale(self.intensity);
        let next = (
            clamp_symmetric(dx * scale, self.limits.dot_offset),
            clamp_symmetric(dy * scale, self.limits.dot_offset),
        );

        let dead = self.limits.dead_zone_px;
        if (next.0 - self.offset.0).abs() < dead && (next.1 - self.offset.1).abs() < dead {
            return false;
        }

        self.offset = next;
        self.invalidate();
        true
    }

    pub fn offset(&self) -> (f32, f32) {
        self.offset
    }

    pub fn dots(&self) -> &[Dot] {
        &self.dots
    }

    pub fn placement(&self) -> DotPlacement {
        self.placement
    }

    pub fn density(&self) -> u32 {
        self.density
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    pub fn color(&self) -> Rgba {
        self.color
    }

    /// Dot lists built so far
    pub fn generations(&self) -> u64 {
        self.generations
    }

    pub fn is_stale(&self) -> bool {
        self.stale
    }

    fn mark_stale(&mut self) {
        self.stale = true;
        self.invalidate();
    }

    fn invalidate(&mut self) {
        self.dirty = true;
        self.invalidations += 1;
    }

    fn rebuild(&mut self) {
        let seed = self.rng.random();
        let mut rng = StdRng::seed_from_u64(seed);
        self.dots = generate_dots(
            &mut rng,
            self.bounds,
            self.density,
            self.placement,
            self.size,
        );
        self.stale = false;
        self.generations += 1;
        trace!(
            count = self.dots.len(),
            placement = ?self.placement,
            generation = self.generations,
            "dots regenerated"
        );
    }
}

impl Surface for DotSurface {
    fn set_bounds(&mut self, bounds: Bounds) -> bool {
        if self.bounds == bounds {
            return false;
        }
        self.bounds = bounds;
        self.mark_stale();
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
        if self.stale {
            self.rebuild();
        }

        let color = self.color.with_opacity(self.opacity);
        canvas.save();
        canvas.translate(self.offset.0, self.offset.1);
        for dot in &self.dots {
            canvas.fill_circle(dot.x, dot.y, dot.radius, color);
        }
        canvas.restore();

        self.dirty = false;
        self.drawn = true;
        observability::record_redraw("dots");
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

    const SQUARE: Bounds = Bounds {
        width: 1000.0,
        height: 1000.0,
    };

    fn configured(limits: MotionLimits, intensity: f32) -> DotSurface {
        let mut surface = DotSurface::with_seed(limits, 11);
        surface.set_bounds(SQUARE);
        surface.set_intensity(intensity);
        surface
    }

    #[test]
    fn test_count_matches_clamped_density() {
        let mut rng = StdRng::seed_from_u64(1);
        for requested in [0u32, 5, 10, 24, 48, 80, 100, 101, 5000] {
            let dots = generate_dots(&mut rng, SQUARE, requested, DotPlacement::Uniform, 1.0);
            assert_eq!(dots.len() as u32, requested.clamp(10, 100));
        }
    }

    #[test]
    fn test_light_density_in_bounds() {
        let mut rng = StdRng::seed_from_u64(2);
        let dots = generate_dots(&mut rng, SQUARE, 24, DotPlacement::Uniform, 1.0);
        assert_eq!(dots.len(), 24);
        for dot in &dots {
            assert!((0.0..1000.0).contains(&dot.x));
            assert!((0.0..1000.0).contains(&dot.y));
        }
    }

    #[test]
    fn test_edge_placement_stays_in_bands() {
        for seed in 0..200u64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let width = rng.random_range(50.0f32..3000.0);
            let bounds = Bounds::new(width, 900.0);
            let band = edge_band_width(width);

            for dot in generate_dots(&mut rng, bounds, 100, DotPlacement::Edge, 1.0) {
                assert!(
                    (0.0..band).contains(&dot.x) || (width - band..width).contains(&dot.x),
                    "x={} outside bands of width {}",
                    dot.x,
                    width
                );
            }
        }
    }

    #[test]
    fn test_radius_scales_with_size() {
        let mut rng = StdRng::seed_from_u64(3);
        for size in [0.75f32, 1.0, 1.35] {
            for dot in generate_dots(&mut rng, SQUARE, 100, DotPlacement::Uniform, size) {
                assert!(dot.radius >= 6.0 * size && dot.radius < 12.0 * size);
            }
        }
    }

    #[test]
    fn test_empty_bounds_generate_nothing() {
        let mut rng = StdRng::seed_from_u64(4);
        assert!(generate_dots(&mut rng, Bounds::default(), 50, DotPlacement::Edge, 1.0).is_empty());
    }

    #[test]
    fn test_non_finite_bounds_generate_nothing() {
        let mut rng = StdRng::seed_from_u64(4);
        let wide = Bounds::new(f32::INFINITY, 100.0);
        assert!(generate_dots(&mut rng, wide, 24, DotPlacement::Uniform, 1.0).is_empty());
        assert!(generate_dots(&mut rng, wide, 24, DotPlacement::Edge, 1.0).is_empty());

        let mut surface = DotSurface::with_seed(MotionLimits::SERVICE, 5);
        surface.set_bounds(Bounds::new(800.0, f32::NAN));
        let mut canvas = RecordingCanvas::new();
        surface.draw(&mut canvas);
        assert!(canvas.ops().is_empty());
    }

    #[test]
    fn test_setters_idempotent() {
        let mut surface = configured(MotionLimits::SERVICE, 6.0);
        let before = surface.invalidations();

        assert!(!surface.set_intensity(6.0));
        assert!(!surface.set_opacity(0.14));
        assert!(!surface.set_color(Rgba::opaque(255, 255, 255)));
        assert_eq!(surface.invalidations(), before);

        assert!(surface.set_opacity(0.38));
        assert_eq!(surface.invalidations(), before + 1);
    }

    #[test]
    fn test_regenerates_lazily_on_draw() {
        let mut surface = configured(MotionLimits::SERVICE, 6.0);
        assert_eq!(surface.generations(), 0);

        let mut canvas = RecordingCanvas::new();
        surface.draw(&mut canvas);
        assert_eq!(surface.generations(), 1);
        assert_eq!(canvas.circle_count(), 48);

        // motion and color don't touch the layout
        surface.set_motion(100.0, 0.0);
        surface.set_color(Rgba::opaque(0, 0, 0));
        surface.draw(&mut canvas);
        assert_eq!(surface.generations(), 1);

        surface.set_density(24);
        assert!(surface.is_stale());
        assert_eq!(surface.generations(), 1);
        canvas.clear();
        surface.draw(&mut canvas);
        assert_eq!(surface.generations(), 2);
        assert_eq!(canvas.circle_count(), 24);
    }

    #[test]
    fn test_motion_scaled_and_clamped() {
        let mut surface = configured(MotionLimits::SERVICE, 9.0);

        // filtered (0.1, 0.1) at 38 px: -3.8 / 3.8 before scaling
        assert!(surface.set_motion(-3.8, 3.8));
        let (dx, dy) = surface.offset();
        assert!((dx + 3.42).abs() < 1e-4);
        assert!((dy - 3.42).abs() < 1e-4);

        for grow in [10.0f32, 100.0, 1000.0] {
            surface.set_motion(-3.8 * grow, 3.8 * grow);
            let (dx, dy) = surface.offset();
            assert!(dx >= -60.0 && dy <= 60.0);
        }
        assert_eq!(surface.offset(), (-60.0, 60.0));
    }

    #[test]
    fn test_preview_limits() {
        let mut surface = configured(MotionLimits::PREVIEW, 10.0);
        surface.set_motion(500.0, -500.0);
        assert_eq!(surface.offset(), (24.0, -24.0));
    }

    #[test]
    fn test_dead_zone() {
        let mut surface = configured(MotionLimits::SERVICE, 10.0);
        assert!(surface.set_motion(5.0, 5.0));
        let count = surface.invalidations();

        assert!(!surface.set_motion(5.1, 4.85));
        assert_eq!(surface.offset(), (5.0, 5.0));
        assert_eq!(surface.invalidations(), count);

        assert!(surface.set_motion(5.0, 5.3));
    }

    #[test]
    fn test_draw_translates_layer() {
        let mut surface = configured(MotionLimits::SERVICE, 10.0);
        surface.set_opacity(0.24);
        surface.set_motion(7.0, -3.0);

        let mut canvas = RecordingCanvas::new();
        surface.draw(&mut canvas);

        let ops = canvas.ops();
        assert_eq!(ops[0], DrawOp::Save);
        assert_eq!(ops[1], DrawOp::Translate { dx: 7.0, dy: -3.0 });
        assert_eq!(ops.last(), Some(&DrawOp::Restore));
        match &ops[2] {
            DrawOp::FillCircle { color, .. } => assert_eq!(color.a, 61),
            other => panic!("unexpected {other:?}"),
        }
        assert!(!surface.needs_redraw());
    }

    #[test]
    fn test_no_draw_without_bounds() {
        let mut surface = DotSurface::with_seed(MotionLimits::SERVICE, 5);
        let mut canvas = RecordingCanvas::new();
        surface.draw(&mut canvas);
        assert!(canvas.ops().is_empty());
        assert_eq!(surface.state(), SurfaceState::Idle);
    }
}
