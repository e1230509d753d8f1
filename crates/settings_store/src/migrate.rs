//! Legacy preference migration
//!
//! Older versions persisted continuous values (`intensity` 0-10, `opacity`
//! 0-1, `dot_count` 10-100). They are bucketed into the nearest preset once, at
//! load time, and the legacy keys are removed.

use contracts::{DensityPreset, IntensityPreset, OpacityPreset};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::preferences::{keys, PrefValue, Preferences};

/// Legacy intensity at or above this maps to `high`
pub const INTENSITY_HIGH_THRESHOLD: f64 = 7.5;
/// Legacy intensity below this maps to `low`
pub const INTENSITY_LOW_THRESHOLD: f64 = 3.5;

/// Midpoints between the opacity preset alphas (0.14 / 0.24 / 0.38)
const OPACITY_MIDPOINTS: (f64, f64) = (0.19, 0.31);
/// Midpoints between the density preset counts (24 / 48 / 80)
const DOT_COUNT_MIDPOINTS: (f64, f64) = (36.0, 64.0);

const LEGACY_INTENSITY_DEFAULT: f64 = 5.0;
const LEGACY_OPACITY_DEFAULT: f64 = 0.16;
const LEGACY_DOT_COUNT_DEFAULT: f64 = 40.0;

/// One legacy key rewritten to a preset key
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MigratedKey {
    pub legacy_key: &'static str,
    pub legacy_value: String,
    pub key: &'static str,
    /// Preset written, None if the current key already existed
    pub preset: Option<String>,
}

/// Outcome of a migration pass
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MigrationReport {
    pub migrated: Vec<MigratedKey>,
}

impl MigrationReport {
    pub fn is_empty(&self) -> bool {
        self.migrated.is_empty()
    }
}

/// Map a legacy continuous intensity (0-10) to a preset
pub fn intensity_from_legacy(value: f64) -> IntensityPreset {
    let value = sanitize(value, LEGACY_INTENSITY_DEFAULT, 0.0, 10.0);
    if value >= INTENSITY_HIGH_THRESHOLD {
        IntensityPreset::High
    } else if value < INTENSITY_LOW_THRESHOLD {
        IntensityPreset::Low
    } else {
        IntensityPreset::Normal
    }
}

/// Map a legacy alpha (0-1) to the nearest opacity preset
pub fn opacity_from_legacy(value: f64) -> OpacityPreset {
    let value = sanitize(value, LEGACY_OPACITY_DEFAULT, 0.0, 1.0);
    if value < OPACITY_MIDPOINTS.0 {
        OpacityPreset::Subtle
    } else if value < OPACITY_MIDPOINTS.1 {
        OpacityPreset::Balanced
    } else {
        OpacityPreset::Visible
    }
}

/// Map a legacy dot count (10-100) to the nearest density preset
pub fn density_from_legacy(value: f64) -> DensityPreset {
    let value = sanitize(value, LEGACY_DOT_COUNT_DEFAULT, 10.0, 100.0);
    if value < DOT_COUNT_MIDPOINTS.0 {
        DensityPreset::Light
    } else if value < DOT_COUNT_MIDPOINTS.1 {
        DensityPreset::Standard
    } else {
        DensityPreset::Dense
    }
}

fn sanitize(value: f64, default: f64, min: f64, max: f64) -> f64 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        default
    }
}

/// Rewrite legacy keys in place
pub fn migrate(prefs: &mut Preferences) -> MigrationReport {
    let mut report = MigrationReport::default();

    migrate_key(
        prefs,
        keys::legacy::INTENSITY,
        keys::INTENSITY_LEVEL,
        |v| intensity_from_legacy(v).to_string(),
        &mut report,
    );
    migrate_key(
        prefs,
        keys::legacy::OPACITY,
        keys::OPACITY_LEVEL,
        |v| opacity_from_legacy(v).to_string(),
        &mut report,
    );
    migrate_key(
        prefs,
        keys::legacy::DOT_COUNT,
        keys::DOT_DENSITY,
        |v| density_from_legacy(v).to_string(),
        &mut report,
    );

    if !report.is_empty() {
        info!(keys = report.migrated.len(), "migrated legacy preferences");
    }
    report
}

fn migrate_key(
    prefs: &mut Preferences,
    legacy_key: &'static str,
    key: &'static str,
    bucket: impl Fn(f64) -> String,
    report: &mut MigrationReport,
) {
    let Some(legacy) = prefs.remove(legacy_key) else {
        return;
    };

    let preset = if prefs.contains(key) {
        debug!(legacy_key, key, "current key present, dropping legacy value");
        None
    } else {
        match legacy.as_f64() {
            Some(value) => {
                let label = bucket(value);
                prefs.set(key, PrefValue::Text(label.clone()));
                Some(label)
            }
            None => {
                warn!(legacy_key, value = %legacy, "unreadable legacy value dropped");
                None
            }
        }
    };

    report.migrated.push(MigratedKey {
        legacy_key,
        legacy_value: legacy.to_string(),
        key,
        preset,
    });
}
