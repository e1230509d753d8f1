//! Render surface capability and the tagged surface variant.

use contracts::{Bounds, Canvas, Rgba};
use motion_engine::{MotionCommand, SurfaceKind, SurfaceParams};
use serde::Serialize;

use crate::{DotSurface, HorizonSurface, MotionLimits};

/// Surface lifecycle
///
/// No terminal state while attached; dropping the surface detaches it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceState {
    /// Bounds not known yet
    Idle,
    /// Bounds known, parameters applied, not drawn yet
    Configured,
    /// Redrawing on change
    Rendering,
}

/// Operations shared by every drawable surface
///
/// Setters return whether the value changed; an unchanged value requests no
/// redraw.
pub trait Surface {
    fn set_bounds(&mut self, bounds: Bounds) -> bool;

    fn set_opacity(&mut self, opacity: f32) -> bool;

    fn set_intensity(&mut self, intensity: f32) -> bool;

    fn set_color(&mut self, color: Rgba) -> bool;

    /// Draw pass
    fn draw(&mut self, canvas: &mut dyn Canvas);

    /// A change is waiting for the next draw pass
    fn needs_redraw(&self) -> bool;

    /// Redraw requests since creation
    fn invalidations(&self) -> u64;

    fn state(&self) -> SurfaceState;
}

/// Active surface of the overlay
#[derive(Debug)]
pub enum RenderSurface {
    Dots(DotSurface),
    Horizon(HorizonSurface),
    None,
}

impl RenderSurface {
    /// Build the surface a kind renders with
    pub fn for_kind(kind: Option<SurfaceKind>, limits: MotionLimits) -> Self {
        match kind {
            Some(SurfaceKind::Dots(placement)) => {
                let mut dots = DotSurface::new(limits);
                dots.set_placement(placement);
                Self::Dots(dots)
            }
            Some(SurfaceKind::Horizon) => Self::Horizon(HorizonSurface::new(limits)),
            None => Self::None,
        }
    }

    pub fn kind(&self) -> Option<SurfaceKind> {
        match self {
            Self::Dots(dots) => Some(SurfaceKind::Dots(dots.placement())),
            Self::Horizon(_) => Some(SurfaceKind::Horizon),
            Self::None => None,
        }
    }

    pub fn label(&self) -> &'static str {
        self.kind().map(|k| k.label()).unwrap_or("none")
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    pub fn as_surface(&self) -> Option<&dyn Surface> {
        match self {
            Self::Dots(dots) => Some(dots),
            Self::Horizon(horizon) => Some(horizon),
            Self::None => None,
        }
    }

    pub fn as_surface_mut(&mut self) -> Option<&mut dyn Surface> {
        match self {
            Self::Dots(dots) => Some(dots),
            Self::Horizon(horizon) => Some(horizon),
            Self::None => None,
        }
    }

    /// Push mapped parameters
    ///
    /// Returns true if anything changed.
    pub fn apply_params(&mut self, params: &SurfaceParams) -> bool {
        match self {
            Self::Dots(dots) => dots.apply_params(params),
            Self::Horizon(horizon) => horizon.apply_params(params),
            Self::None => false,
        }
    }

    pub fn set_bounds(&mut self, bounds: Bounds) -> bool {
        self.as_surface_mut()
            .map(|s| s.set_bounds(bounds))
            .unwrap_or(false)
    }

    /// Route a motion command to the matching entry point
    ///
    /// A command for another surface type is ignored.
    pub fn apply_motion(&mut self, command: MotionCommand) -> bool {
        match (self, command) {
            (Self::Dots(dots), MotionCommand::Dots { dx, dy }) => dots.set_motion(dx, dy),
            (Self::Horizon(horizon), MotionCommand::Horizon { shift, tilt }) => {
                horizon.set_motion(shift, tilt)
            }
            _ => false,
        }
    }

    pub fn draw(&mut self, canvas: &mut dyn Canvas) {
        if let Some(surface) = self.as_surface_mut() {
            surface.draw(canvas);
        }
    }

    pub fn needs_redraw(&self) -> bool {
        self.as_surface().is_some_and(|s| s.needs_redraw())
    }

    pub fn invalidations(&self) -> u64 {
        self.as_surface().map(|s| s.invalidations()).unwrap_or(0)
    }

    pub fn state(&self) -> Option<SurfaceState> {
        self.as_surface().map(|s| s.state())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RecordingCanvas;
    use contracts::{OverlayMode, OverlaySettings};
    use motion_engine::DotPlacement;

    #[test]
    fn test_for_kind() {
        let edge = RenderSurface::for_kind(
            Some(SurfaceKind::Dots(DotPlacement::Edge)),
            MotionLimits::SERVICE,
        );
        assert_eq!(edge.kind(), Some(SurfaceKind::Dots(DotPlacement::Edge)));
        assert_eq!(edge.label(), "dots");

        let none = RenderSurface::for_kind(None, MotionLimits::SERVICE);
        assert!(none.is_none());
        assert_eq!(none.state(), None);
    }

    #[test]
    fn test_mismatched_motion_ignored() {
        let mut horizon =
            RenderSurface::for_kind(Some(SurfaceKind::Horizon), MotionLimits::SERVICE);
        assert!(!horizon.apply_motion(MotionCommand::Dots { dx: 50.0, dy: 50.0 }));
        assert!(horizon.apply_motion(MotionCommand::Horizon {
            shift: 20.0,
            tilt: 2.0
        }));
    }

    #[test]
    fn test_state_progression() {
        let settings = OverlaySettings {
            selected_mode: OverlayMode::Horizon,
            ..Default::default()
        };
        let params = SurfaceParams::from_settings(&settings);
        let mut surface = RenderSurface::for_kind(params.kind, MotionLimits::SERVICE);
        assert_eq!(surface.state(), Some(SurfaceState::Idle));

        surface.set_bounds(Bounds::new(400.0, 800.0));
        surface.apply_params(&params);
        assert_eq!(surface.state(), Some(SurfaceState::Configured));

        let mut canvas = RecordingCanvas::new();
        surface.draw(&mut canvas);
        assert_eq!(surface.state(), Some(SurfaceState::Rendering));
        assert!(!surface.needs_redraw());
    }
}
