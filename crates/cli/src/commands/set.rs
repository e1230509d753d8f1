//! `set` command implementation.

use std::str::FromStr;

use anyhow::{Context, Result};
use tracing::info;

use contracts::{
    DensityPreset, DotColor, IntensityPreset, OpacityPreset, OverlayMode, SettingsStore,
    SizePreset,
};
use settings_store::PreferenceStore;

use crate::cli::SetArgs;
use crate::error::CliError;

const KEYS: &[&str] = &[
    "mode",
    "intensity",
    "opacity",
    "density",
    "size",
    "color",
    "auto-start",
    "premium",
    "onboarding",
];

/// A parsed `set` request
#[derive(Debug, Clone, Copy, PartialEq)]
enum Assignment {
    Mode(OverlayMode),
    Intensity(IntensityPreset),
    Opacity(OpacityPreset),
    Density(DensityPreset),
    Size(SizePreset),
    Color(DotColor),
    AutoStart(bool),
    Premium(bool),
    Onboarding(bool),
}

impl Assignment {
    fn parse(key: &str, value: &str) -> Result<Self, CliError> {
        let key = key.trim().to_ascii_lowercase().replace('_', "-");
        let assignment = match key.as_str() {
            "mode" | "selected-mode" => Self::Mode(preset(&key, value)?),
            "intensity" | "intensity-level" => Self::Intensity(preset(&key, value)?),
            "opacity" | "opacity-level" => Self::Opacity(preset(&key, value)?),
            "density" | "dot-density" => Self::Density(preset(&key, value)?),
            "size" | "dot-size" => Self::Size(preset(&key, value)?),
            "color" | "dot-color" => Self::Color(preset(&key, value)?),
            "auto-start" | "auto-start-overlay" => Self::AutoStart(flag(&key, value)?),
            "premium" | "is-premium" => Self::Premium(flag(&key, value)?),
            "onboarding" | "onboarding-completed" => Self::Onboarding(flag(&key, value)?),
            _ => return Err(CliError::unknown_key(key, KEYS)),
        };
        Ok(assignment)
    }

    async fn apply(self, store: &PreferenceStore) -> Result<(), contracts::OverlayError> {
        match self {
            Self::Mode(v) => store.set_mode(v).await,
            Self::Intensity(v) => store.set_intensity(v).await,
            Self::Opacity(v) => store.set_opacity(v).await,
            Self::Density(v) => store.set_density(v).await,
            Self::Size(v) => store.set_size(v).await,
            Self::Color(v) => store.set_color(v).await,
            Self::AutoStart(v) => store.set_auto_start(v).await,
            Self::Premium(v) => store.set_premium(v).await,
            Self::Onboarding(v) => store.set_onboarding_completed(v).await,
        }
    }
}

fn preset<T>(key: &str, value: &str) -> Result<T, CliError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e: T::Err| CliError::invalid_value(key, value, e.to_string()))
}

fn flag(key: &str, value: &str) -> Result<bool, CliError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        _ => Err(CliError::invalid_value(key, value, "expected true or false")),
    }
}

/// Execute the `set` command
pub async fn run_set(args: &SetArgs) -> Result<()> {
    let assignment = Assignment::parse(&args.key, &args.value)?;

    let store = PreferenceStore::open(&args.prefs)
        .await
        .with_context(|| format!("Failed to open preferences at {}", args.prefs.display()))?;
    assignment
        .apply(&store)
        .await
        .with_context(|| format!("Failed to write {}", args.key))?;

    info!(key = %args.key, value = %args.value, "Preference written");
    println!("{} = {}", args.key, args.value);
    Ok(())
}
