//! Layered error definitions
//!
//! Categorized by source: window / sensor / settings

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum OverlayError {
    // ===== Window Errors =====
    /// Overlay window could not be attached
    #[error("window attach error for '{surface}': {message}")]
    WindowAttach { surface: String, message: String },

    /// Overlay window could not be detached
    #[error("window detach error for '{surface}': {message}")]
    WindowDetach { surface: String, message: String },

    /// Overlay permission not granted (or revoked at runtime)
    #[error("overlay permission not granted")]
    PermissionDenied,

    // ===== Sensor Errors =====
    /// No usable motion sensor on this device
    #[error("motion sensor unavailable: {message}")]
    SensorUnavailable { message: String },

    // ===== Settings Errors =====
    /// A single persisted value could not be parsed
    #[error("settings value for '{key}' is invalid: {value}")]
    SettingsValue { key: String, value: String },

    /// The preference file could not be parsed at all
    #[error("settings parse error: {message}")]
    SettingsParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The preference file could not be written
    #[error("settings persist error at '{path}': {message}")]
    SettingsPersist { path: String, message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl OverlayError {
    /// Create window attach error
    pub fn window_attach(surface: impl Into<String>, message: impl Into<String>) -> Self {
        Self::WindowAttach {
            surface: surface.into(),
            message: message.into(),
        }
    }

    /// Create window detach error
    pub fn window_detach(surface: impl Into<String>, message: impl Into<String>) -> Self {
        Self::WindowDetach {
            surface: surface.into(),
            message: message.into(),
        }
    }

    /// Create settings value error
    pub fn settings_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::SettingsValue {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Create settings parse error
    pub fn settings_parse(message: impl Into<String>) -> Self {
        Self::SettingsParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create settings persist error
    pub fn settings_persist(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SettingsPersist {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Whether this error is a transient window condition that callers swallow
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::WindowAttach { .. } | Self::WindowDetach { .. } | Self::PermissionDenied
        )
    }
}

/// Unknown preset label
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} value '{value}'")]
pub struct ParsePresetError {
    pub kind: &'static str,
    pub value: String,
}

impl ParsePresetError {
    pub fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}
