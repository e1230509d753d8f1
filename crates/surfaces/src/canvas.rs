//! Recording canvas
//!
//! A `Canvas` that stores every call as a `DrawOp`. Used by the headless window
//! host and by `render` to dump a frame as JSON.

use contracts::{Canvas, Rgba};
use serde::Serialize;

/// One recorded canvas call
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawOp {
    Save,
    Restore,
    Translate {
        dx: f32,
        dy: f32,
    },
    Rotate {
        degrees: f32,
        pivot_x: f32,
        pivot_y: f32,
    },
    FillCircle {
        cx: f32,
        cy: f32,
        radius: f32,
        color: Rgba,
    },
    StrokeLine {
        from: (f32, f32),
        to: (f32, f32),
        width: f32,
        color: Rgba,
    },
}

/// Canvas that records instead of rasterising
#[derive(Debug, Clone, Default)]
pub struct RecordingCanvas {
    ops: Vec<DrawOp>,
    depth: usize,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Drain the recorded ops
    pub fn take(&mut self) -> Vec<DrawOp> {
        self.depth = 0;
        std::mem::take(&mut self.ops)
    }

    pub fn clear(&mut self) {
        self.ops.clear();
        self.depth = 0;
    }

    pub fn circle_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::FillCircle { .. }))
            .count()
    }

    /// True when every `save` has a matching `restore`
    pub fn is_balanced(&self) -> bool {
        self.depth == 0
    }
}

impl Canvas for RecordingCanvas {
    fn save(&mut self) {
        self.depth += 1;
        self.ops.push(DrawOp::Save);
    }

    fn restore(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.ops.push(DrawOp::Restore);
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        self.ops.push(DrawOp::Translate { dx, dy });
    }

    fn rotate(&mut self, degrees: f32, pivot_x: f32, pivot_y: f32) {
        self.ops.push(DrawOp::Rotate {
            degrees,
            pivot_x,
            pivot_y,
        });
    }

    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Rgba) {
        self.ops.push(DrawOp::FillCircle {
            cx,
            cy,
            radius,
            color,
        });
    }

    fn stroke_line(&mut self, from: (f32, f32), to: (f32, f32), width: f32, color: Rgba) {
        self.ops.push(DrawOp::StrokeLine {
            from,
            to,
            width,
            color,
        });
    }
}
