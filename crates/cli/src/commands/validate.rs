//! `validate` command implementation.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use contracts::OverlaySettings;
use settings_store::{LoadedPreferences, PreferenceLoader};

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    prefs_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    warnings: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    legacy_keys: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    settings: Option<OverlaySettings>,
}

impl ValidationResult {
    fn invalid(prefs_path: String, error: String) -> Self {
        Self {
            valid: false,
            prefs_path,
            error: Some(error),
            warnings: Vec::new(),
            legacy_keys: Vec::new(),
            settings: None,
        }
    }
}

/// Execute the `validate` command
///
/// Fallbacks and legacy keys are warnings; only an unreadable file is invalid.
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(prefs = %args.prefs.display(), "Validating preferences");

    let result = validate_prefs(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Preference validation failed")
    }
}

fn validate_prefs(args: &ValidateArgs) -> ValidationResult {
    let prefs_path = args.prefs.display().to_string();

    if !args.prefs.exists() {
        return ValidationResult::invalid(
            prefs_path,
            format!("File not found: {}", args.prefs.display()),
        );
    }

    match PreferenceLoader::load_from_path(&args.prefs) {
        Ok(loaded) => summarize(prefs_path, &loaded),
        Err(e) => ValidationResult::invalid(prefs_path, e.to_string()),
    }
}

fn summarize(prefs_path: String, loaded: &LoadedPreferences) -> ValidationResult {
    let mut warnings: Vec<String> = loaded.warnings.iter().map(ToString::to_string).collect();
    for key in &loaded.unknown_keys {
        warnings.push(format!("Unknown key '{}' is ignored", key));
    }

    let legacy_keys = loaded
        .migration
        .migrated
        .iter()
        .map(|m| match &m.preset {
            Some(preset) => format!(
                "{} = {} -> {} = {}",
                m.legacy_key, m.legacy_value, m.key, preset
            ),
            None => format!("{} = {} (dropped, {} already set)", m.legacy_key, m.legacy_value, m.key),
        })
        .collect();

    ValidationResult {
        valid: true,
        prefs_path,
        error: None,
        warnings,
        legacy_keys,
        settings: Some(loaded.settings),
    }
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Preferences are valid: {}", result.prefs_path);

        if let Some(ref settings) = result.settings {
            println!("\n  Mode: {}", settings.selected_mode);
            println!("  Intensity: {}", settings.intensity);
            println!("  Opacity: {}", settings.opacity);
            println!("  Density: {}", settings.density);
            println!("  Size: {}", settings.size);
            println!("  Color: {}", settings.color);
        }

        if !result.legacy_keys.is_empty() {
            println!("\n↻ Legacy keys (migrated on next open):");
            for key in &result.legacy_keys {
                println!("  - {}", key);
            }
        }

        if !result.warnings.is_empty() {
            println!("\n⚠ Warnings:");
            for warning in &result.warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Preferences are invalid: {}", result.prefs_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{IntensityPreset, OverlayMode};
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    fn write_prefs(content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn args(path: PathBuf) -> ValidateArgs {
        ValidateArgs {
            prefs: path,
            json: true,
        }
    }

    #[test]
    fn test_missing_file_is_invalid() {
        let result = validate_prefs(&args(PathBuf::from("/nonexistent/overlay.toml")));
        assert!(!result.valid);
        assert!(result.error.unwrap().contains("not found"));
    }

    #[test]
    fn test_fallbacks_are_warnings() {
        let file = write_prefs("selected_mode = \"SPARKLES\"\nintensity_level = \"high\"\n");
        let result = validate_prefs(&args(file.path().to_path_buf()));

        assert!(result.valid);
        assert_eq!(result.warnings.len(), 1);
        let settings = result.settings.unwrap();
        assert_eq!(settings.selected_mode, OverlayMode::ClassicDots);
        assert_eq!(settings.intensity, IntensityPreset::High);
    }

    #[test]
    fn test_legacy_keys_reported() {
        let file = write_prefs("intensity = 8.0\n");
        let result = validate_prefs(&args(file.path().to_path_buf()));

        assert!(result.valid);
        assert_eq!(result.legacy_keys.len(), 1);
        assert!(result.legacy_keys[0].contains("intensity_level = high"));
    }

    #[test]
    fn test_unparsable_file_is_invalid() {
        let file = write_prefs("selected_mode = [unclosed");
        let result = validate_prefs(&args(file.path().to_path_buf()));
        assert!(!result.valid);
    }
}
