//! Canvas trait - Surface draw target
//!
//! Minimal immediate-mode drawing surface supplied by the window host.

use crate::Rgba;

/// Draw target for one redraw pass
///
/// Transform calls stack between `save` and `restore`, as on a 2D canvas.
pub trait Canvas {
    /// Push the current transform
    fn save(&mut self);

    /// Pop the last pushed transform
    fn restore(&mut self);

    /// Translate subsequent drawing
    fn translate(&mut self, dx: f32, dy: f32);

    /// Rotate subsequent drawing by `degrees` about a pivot
    fn rotate(&mut self, degrees: f32, pivot_x: f32, pivot_y: f32);

    /// Fill a circle
    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Rgba);

    /// Stroke a straight line
    fn stroke_line(&mut self, from: (f32, f32), to: (f32, f32), width: f32, color: Rgba);
}
