//! Static preference loading
//!
//! Parse, migrate, decode. Used by the store at open time and by the CLI
//! `validate` command, which never writes.

use std::path::Path;

use contracts::{OverlayError, OverlaySettings};
use serde::Serialize;

use crate::decode::{self, DecodeWarning};
use crate::migrate::{self, MigrationReport};
use crate::parser::{self, PreferenceFormat};
use crate::preferences::Preferences;

/// Result of loading a preference document
#[derive(Debug, Clone, Serialize)]
pub struct LoadedPreferences {
    /// Raw map after migration
    #[serde(skip)]
    pub preferences: Preferences,
    pub settings: OverlaySettings,
    pub onboarding_completed: bool,
    pub warnings: Vec<DecodeWarning>,
    pub migration: MigrationReport,
    pub unknown_keys: Vec<String>,
}

/// Preference loader
///
/// Provides static methods to load preferences from files or strings.
pub struct PreferenceLoader;

impl PreferenceLoader {
    /// Load preferences from file path
    ///
    /// Format is detected from the extension; a path without one is TOML.
    ///
    /// # Errors
    /// - File read failure
    /// - Unsupported format
    /// - Parse failure
    pub fn load_from_path(path: &Path) -> Result<LoadedPreferences, OverlayError> {
        let format = Self::detect_format(path)?;
        let content = std::fs::read_to_string(path)?;
        Self::load_from_str(&content, format)
    }

    /// Load preferences from string
    ///
    /// Malformed values never fail the load, they are reported as warnings.
    pub fn load_from_str(
        content: &str,
        format: PreferenceFormat,
    ) -> Result<LoadedPreferences, OverlayError> {
        let preferences = parser::parse(content, format)?;
        Ok(Self::from_preferences(preferences))
    }

    /// Migrate and decode an already-parsed map
    pub fn from_preferences(mut preferences: Preferences) -> LoadedPreferences {
        let migration = migrate::migrate(&mut preferences);
        let (settings, onboarding_completed, warnings) = decode::decode(&preferences);
        let unknown_keys = preferences
            .unknown_keys()
            .into_iter()
            .map(str::to_string)
            .collect();

        LoadedPreferences {
            preferences,
            settings,
            onboarding_completed,
            warnings,
            migration,
            unknown_keys,
        }
    }

    /// Infer preference format from file extension
    pub fn detect_format(path: &Path) -> Result<PreferenceFormat, OverlayError> {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return Ok(PreferenceFormat::default());
        };

        PreferenceFormat::from_extension(ext).ok_or_else(|| {
            OverlayError::settings_parse(format!("unsupported preference format: .{ext}"))
        })
    }
}
