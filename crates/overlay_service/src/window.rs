//! Headless window host
//!
//! A `WindowHost` without a display. Windows record their frames into a
//! `RecordingCanvas`; a shared `WindowProbe` exposes attach/detach history and
//! lets callers revoke the overlay permission or inject failures.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use contracts::{Bounds, Canvas, OverlayError, WindowHost, WindowParams, WindowToken};
use serde::Serialize;
use surfaces::{DrawOp, RecordingCanvas};
use tracing::{debug, warn};

/// Window manager event
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum WindowEvent {
    Attached { token: u64, label: String },
    Detached { token: u64, label: String },
    AttachFailed { label: String, reason: String },
    DetachFailed { token: u64, reason: String },
    /// Removed by the host, e.g. after the permission was revoked
    ForceRemoved { token: u64, label: String },
}

/// Last completed frame of a window
#[derive(Debug, Clone, Serialize)]
pub struct Frame {
    pub token: u64,
    pub label: String,
    pub ops: Vec<DrawOp>,
}

#[derive(Debug)]
struct ProbeState {
    permission: bool,
    fail_attach: u32,
    fail_detach: u32,
    next_token: u64,
    attached: BTreeMap<u64, String>,
    history: Vec<WindowEvent>,
    max_attached: usize,
    frames_drawn: u64,
    last_frame: Option<Frame>,
}

/// Shared view into a `HeadlessWindowHost`
#[derive(Debug, Clone)]
pub struct WindowProbe(Arc<Mutex<ProbeState>>);

impl WindowProbe {
    fn lock(&self) -> MutexGuard<'_, ProbeState> {
        self.0.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn grant_permission(&self) {
        self.lock().permission = true;
    }

    /// Revoke the overlay permission; attached windows are removed
    pub fn revoke_permission(&self) {
        let mut state = self.lock();
        state.permission = false;
        let removed = std::mem::take(&mut state.attached);
        for (token, label) in removed {
            state.history.push(WindowEvent::ForceRemoved { token, label });
        }
    }

    /// Fail the next `n` attach calls
    pub fn fail_next_attach(&self, n: u32) {
        self.lock().fail_attach = n;
    }

    /// Fail the next `n` detach calls (the window is still removed)
    pub fn fail_next_detach(&self, n: u32) {
        self.lock().fail_detach = n;
    }

    pub fn history(&self) -> Vec<WindowEvent> {
        self.lock().history.clone()
    }

    /// Labels of currently attached windows
    pub fn attached(&self) -> Vec<String> {
        self.lock().attached.values().cloned().collect()
    }

    pub fn attached_count(&self) -> usize {
        self.lock().attached.len()
    }

    /// Highest number of windows attached at once
    pub fn max_attached(&self) -> usize {
        self.lock().max_attached
    }

    pub fn frames_drawn(&self) -> u64 {
        self.lock().frames_drawn
    }

    pub fn last_frame(&self) -> Option<Frame> {
        self.lock().last_frame.clone()
    }
}

/// Window host without a display
pub struct HeadlessWindowHost {
    bounds: Bounds,
    probe: WindowProbe,
    canvases: BTreeMap<u64, RecordingCanvas>,
}

impl HeadlessWindowHost {
    pub fn new(bounds: Bounds) -> Self {
        Self {
            bounds,
            probe: WindowProbe(Arc::new(Mutex::new(ProbeState {
                permission: true,
                fail_attach: 0,
                fail_detach: 0,
                next_token: 1,
                attached: BTreeMap::new(),
                history: Vec::new(),
                max_attached: 0,
                frames_drawn: 0,
                last_frame: None,
            }))),
            canvases: BTreeMap::new(),
        }
    }

    pub fn probe(&self) -> WindowProbe {
        self.probe.clone()
    }

    pub fn set_bounds(&mut self, bounds: Bounds) {
        self.bounds = bounds;
    }
}

impl WindowHost for HeadlessWindowHost {
    fn can_draw_overlays(&self) -> bool {
        self.probe.lock().permission
    }

    fn bounds(&self) -> Bounds {
        self.bounds
    }

    fn attach(&mut self, label: &str, params: &WindowParams) -> Result<WindowToken, OverlayError> {
        let mut state = self.probe.lock();

        let failure = if !state.permission {
            Some(OverlayError::PermissionDenied)
        } else if state.fail_attach > 0 {
            state.fail_attach -= 1;
            Some(OverlayError::window_attach(label, "injected failure"))
        } else {
            None
        };
        if let Some(error) = failure {
            state.history.push(WindowEvent::AttachFailed {
                label: label.to_string(),
                reason: error.to_string(),
            });
            return Err(error);
        }

        let token = state.next_token;
        state.next_token += 1;
        state.attached.insert(token, label.to_string());
        state.max_attached = state.max_attached.max(state.attached.len());
        state.history.push(WindowEvent::Attached {
            token,
            label: label.to_string(),
        });
        drop(state);

        self.canvases.insert(token, RecordingCanvas::new());
        debug!(token, label, format = ?params.format, "window attached");
        Ok(WindowToken(token))
    }

    fn detach(&mut self, token: WindowToken) -> Result<(), OverlayError> {
        self.canvases.remove(&token.0);
        let mut state = self.probe.lock();

        let Some(label) = state.attached.remove(&token.0) else {
            let error = OverlayError::window_detach(format!("#{}", token.0), "not attached");
            state.history.push(WindowEvent::DetachFailed {
                token: token.0,
                reason: error.to_string(),
            });
            return Err(error);
        };

        if state.fail_detach > 0 {
            state.fail_detach -= 1;
            let error = OverlayError::window_detach(&label, "injected failure");
            state.history.push(WindowEvent::DetachFailed {
                token: token.0,
                reason: error.to_string(),
            });
            warn!(token = token.0, "injected detach failure");
            return Err(error);
        }

        state.history.push(WindowEvent::Detached {
            token: token.0,
            label,
        });
        Ok(())
    }

    fn is_attached(&self, token: WindowToken) -> bool {
        self.probe.lock().attached.contains_key(&token.0)
    }

    fn begin_frame(&mut self, token: WindowToken) -> Option<&mut dyn Canvas> {
        if !self.is_attached(token) {
            return None;
        }
        let canvas = self.canvases.get_mut(&token.0)?;
        canvas.clear();
        Some(canvas)
    }

    fn end_frame(&mut self, token: WindowToken) {
        let Some(canvas) = self.canvases.get_mut(&token.0) else {
            return;
        };
        let ops = canvas.take();
        if ops.is_empty() {
            return;
        }

        let mut state = self.probe.lock();
        let Some(label) = state.attached.get(&token.0).cloned() else {
            return;
        };
        state.frames_drawn += 1;
        state.last_frame = Some(Frame {
            token: token.0,
            label,
            ops,
        });
    }
}
