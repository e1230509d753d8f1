//! WindowHost trait - Overlay window boundary
//!
//! The only "wire format" boundary of the overlay: a fullscreen, translucent,
//! non-interactive, always-on-top window layer.

use serde::{Deserialize, Serialize};

use crate::{Bounds, Canvas, OverlayError};

/// Handle to an attached overlay window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WindowToken(pub u64);

/// Window size request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowExtent {
    /// Fill the parent (the whole screen)
    MatchParent,
    /// Fixed pixel size
    Fixed(u32),
}

/// Window layer type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowLayer {
    /// System overlay drawn above other applications
    ApplicationOverlay,
}

/// Pixel format of the window buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PixelFormat {
    Translucent,
    Opaque,
}

/// Anchor of the window within the screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gravity {
    TopStart,
    Center,
}

/// Window layout parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowParams {
    pub width: WindowExtent,
    pub height: WindowExtent,
    pub layer: WindowLayer,
    pub focusable: bool,
    pub touchable: bool,
    pub layout_in_screen: bool,
    pub format: PixelFormat,
    pub gravity: Gravity,
}

impl WindowParams {
    /// Fixed parameters used for every overlay surface
    pub fn fullscreen_overlay() -> Self {
        Self {
            width: WindowExtent::MatchParent,
            height: WindowExtent::MatchParent,
            layer: WindowLayer::ApplicationOverlay,
            focusable: false,
            touchable: false,
            layout_in_screen: true,
            format: PixelFormat::Translucent,
            gravity: Gravity::TopStart,
        }
    }
}

/// Window host trait
///
/// Abstracts the platform window manager. Owned exclusively by the lifecycle
/// manager; every call happens on the lifecycle's execution context.
pub trait WindowHost: Send {
    /// Whether the overlay permission is currently granted
    fn can_draw_overlays(&self) -> bool;

    /// Current drawable bounds for a fullscreen window
    fn bounds(&self) -> Bounds;

    /// Attach a new overlay window
    ///
    /// # Errors
    /// `PermissionDenied` when the permission is missing, `WindowAttach` otherwise
    fn attach(&mut self, label: &str, params: &WindowParams) -> Result<WindowToken, OverlayError>;

    /// Detach an overlay window
    ///
    /// # Errors
    /// `WindowDetach` when the window is unknown or already removed
    fn detach(&mut self, token: WindowToken) -> Result<(), OverlayError>;

    /// Whether the window is still attached
    fn is_attached(&self, token: WindowToken) -> bool;

    /// Begin a redraw pass on an attached window
    ///
    /// Returns None if the window is gone.
    fn begin_frame(&mut self, token: WindowToken) -> Option<&mut dyn Canvas>;

    /// Finish the pass started by `begin_frame`
    fn end_frame(&mut self, _token: WindowToken) {}
}
