//! Preference decoding
//!
//! Each field decodes independently: a malformed value falls back to that
//! field's default and leaves the rest of the snapshot intact.

use std::fmt;
use std::str::FromStr;

use contracts::OverlaySettings;
use serde::Serialize;

use crate::preferences::{keys, PrefValue, Preferences};

/// A field that fell back to its default during decoding
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodeWarning {
    /// Persisted key
    pub key: String,
    /// Offending persisted value
    pub value: String,
    /// Value used instead
    pub fallback: String,
}

impl fmt::Display for DecodeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}' has invalid value {}, using '{}'",
            self.key, self.value, self.fallback
        )
    }
}

/// Decode a settings snapshot and the onboarding flag
pub fn decode(prefs: &Preferences) -> (OverlaySettings, bool, Vec<DecodeWarning>) {
    let mut warnings = Vec::new();

    let settings = OverlaySettings {
        selected_mode: decode_preset(prefs, keys::SELECTED_MODE, &mut warnings),
        intensity: decode_preset(prefs, keys::INTENSITY_LEVEL, &mut warnings),
        opacity: decode_preset(prefs, keys::OPACITY_LEVEL, &mut warnings),
        density: decode_preset(prefs, keys::DOT_DENSITY, &mut warnings),
        size: decode_preset(prefs, keys::DOT_SIZE, &mut warnings),
        color: decode_preset(prefs, keys::DOT_COLOR, &mut warnings),
        auto_start: decode_flag(prefs, keys::AUTO_START_OVERLAY, &mut warnings),
        premium: decode_flag(prefs, keys::IS_PREMIUM, &mut warnings),
    };
    let onboarding = decode_flag(prefs, keys::ONBOARDING_COMPLETED, &mut warnings);

    (settings, onboarding, warnings)
}

/// Decode only the settings snapshot
pub fn decode_settings(prefs: &Preferences) -> OverlaySettings {
    decode(prefs).0
}

fn decode_preset<T>(prefs: &Preferences, key: &str, warnings: &mut Vec<DecodeWarning>) -> T
where
    T: FromStr + Default + fmt::Display,
{
    let Some(value) = prefs.get(key) else {
        return T::default();
    };

    match value.as_str().map(str::parse::<T>) {
        Some(Ok(parsed)) => parsed,
        _ => fallback(key, value, warnings),
    }
}

fn decode_flag(prefs: &Preferences, key: &str, warnings: &mut Vec<DecodeWarning>) -> bool {
    match prefs.get(key) {
        None => false,
        Some(value) => match value.as_bool() {
            Some(flag) => flag,
            None => fallback(key, value, warnings),
        },
    }
}

fn fallback<T: Default + fmt::Display>(
    key: &str,
    value: &PrefValue,
    warnings: &mut Vec<DecodeWarning>,
) -> T {
    let default = T::default();
    tracing::warn!(key, value = %value, fallback = %default, "malformed preference, using default");
    warnings.push(DecodeWarning {
        key: key.to_string(),
        value: value.to_string(),
        fallback: default.to_string(),
    });
    default
}
