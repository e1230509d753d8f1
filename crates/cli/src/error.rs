//! Error types for CLI operations.

use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Preference file not found
    #[error("Preference file not found: {path}")]
    PrefsNotFound { path: String },

    /// `set` was given a key it does not know
    #[error("Unknown preference key '{key}' (expected one of: {expected})")]
    UnknownKey { key: String, expected: String },

    /// `set` was given a value the key does not accept
    #[error("Invalid value '{value}' for '{key}': {message}")]
    InvalidValue {
        key: String,
        value: String,
        message: String,
    },
}

impl CliError {
    pub fn prefs_not_found(path: impl Into<String>) -> Self {
        Self::PrefsNotFound { path: path.into() }
    }

    pub fn unknown_key(key: impl Into<String>, expected: &[&str]) -> Self {
        Self::UnknownKey {
            key: key.into(),
            expected: expected.join(", "),
        }
    }

    pub fn invalid_value(
        key: impl Into<String>,
        value: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            key: key.into(),
            value: value.into(),
            message: message.into(),
        }
    }
}
