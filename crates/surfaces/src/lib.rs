//! # Surfaces
//!
//! Drawable overlay surfaces.
//!
//! - `DotSurface`: a translucent dot layer moved as a whole
//! - `HorizonSurface`: one shifted, tilted horizon line
//! - `RenderSurface`: the tagged variant the lifecycle owns
//! - `RecordingCanvas`: a `Canvas` that records draw ops

mod canvas;
mod dots;
mod horizon;
mod limits;
mod surface;

pub use canvas::{DrawOp, RecordingCanvas};
pub use dots::{edge_band_width, generate_dots, DotSurface, BASE_RADIUS, EDGE_BAND_FRACTION};
pub use horizon::{HorizonSurface, STROKE_WIDTH};
pub use limits::MotionLimits;
pub use surface::{RenderSurface, Surface, SurfaceState};
