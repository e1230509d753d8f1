//! Preference file parsing
//!
//! TOML (default) and JSON are supported.

use contracts::OverlayError;

use crate::preferences::Preferences;

/// Preference file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PreferenceFormat {
    /// TOML format (default)
    #[default]
    Toml,
    /// JSON format
    Json,
}

impl PreferenceFormat {
    /// Infer format from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Parse TOML preferences
pub fn parse_toml(content: &str) -> Result<Preferences, OverlayError> {
    toml::from_str(content).map_err(|e| OverlayError::SettingsParse {
        message: format!("TOML parse error: {e}"),
        source: Some(Box::new(e)),
    })
}

/// Parse JSON preferences
pub fn parse_json(content: &str) -> Result<Preferences, OverlayError> {
    serde_json::from_str(content).map_err(|e| OverlayError::SettingsParse {
        message: format!("JSON parse error: {e}"),
        source: Some(Box::new(e)),
    })
}

/// Parse preferences by format
pub fn parse(content: &str, format: PreferenceFormat) -> Result<Preferences, OverlayError> {
    match format {
        PreferenceFormat::Toml => parse_toml(content),
        PreferenceFormat::Json => parse_json(content),
    }
}

/// Serialize preferences by format
pub fn serialize(prefs: &Preferences, format: PreferenceFormat) -> Result<String, OverlayError> {
    match format {
        PreferenceFormat::Toml => toml::to_string_pretty(prefs)
            .map_err(|e| OverlayError::settings_parse(format!("TOML serialize error: {e}"))),
        PreferenceFormat::Json => serde_json::to_string_pretty(prefs)
            .map_err(|e| OverlayError::settings_parse(format!("JSON serialize error: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preferences::PrefValue;

    #[test]
    fn test_parse_toml_mixed_types() {
        let content = r#"
selected_mode = "HORIZON"
intensity = 7.5
dot_count = 40
auto_start_overlay = true
"#;
        let prefs = parse_toml(content).unwrap();
        assert_eq!(
            prefs.get("selected_mode"),
            Some(&PrefValue::Text("HORIZON".to_string()))
        );
        assert_eq!(prefs.get("intensity"), Some(&PrefValue::Float(7.5)));
        assert_eq!(prefs.get("dot_count"), Some(&PrefValue::Int(40)));
        assert_eq!(prefs.get("auto_start_overlay"), Some(&PrefValue::Bool(true)));
    }

    #[test]
    fn test_parse_json_minimal() {
        let prefs = parse_json(r#"{ "dot_size": "large", "is_premium": false }"#).unwrap();
        assert_eq!(prefs.len(), 2);
    }

    #[test]
    fn test_parse_toml_syntax_error() {
        let err = parse_toml("invalid toml [[[").unwrap_err();
        assert!(matches!(err, OverlayError::SettingsParse { .. }));
    }

    #[test]
    fn test_serialize_toml_reparses() {
        let prefs = parse_toml("dot_color = \"amber\"\nintensity = 3\n").unwrap();
        let text = serialize(&prefs, PreferenceFormat::Toml).unwrap();
        assert_eq!(parse_toml(&text).unwrap(), prefs);
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            PreferenceFormat::from_extension("TOML"),
            Some(PreferenceFormat::Toml)
        );
        assert_eq!(
            PreferenceFormat::from_extension("json"),
            Some(PreferenceFormat::Json)
        );
        assert_eq!(PreferenceFormat::from_extension("yaml"), None);
    }
}
