//! OverlaySettings - Settings store output
//!
//! Immutable value snapshot replaced wholesale on every upstream change.

use serde::{Deserialize, Serialize};

define_preset!(
    /// Visual mode drawn by the overlay
    OverlayMode {
        /// Dots spread uniformly over the screen
        ClassicDots => "CLASSIC_DOTS",
        /// Dots confined to bands near the left and right edges
        EdgeDots => "EDGE_DOTS",
        /// A single tilting horizon line
        Horizon => "HORIZON",
        /// No overlay drawn, sensor released
        Disabled => "DISABLED",
    }
    default = ClassicDots
);

impl OverlayMode {
    /// Whether this mode draws dots
    pub fn is_dots(&self) -> bool {
        matches!(self, Self::ClassicDots | Self::EdgeDots)
    }
}

define_preset!(
    /// Motion intensity level
    IntensityPreset {
        Low => "low",
        Normal => "normal",
        High => "high",
    }
    default = Normal
);

define_preset!(
    /// Overlay opacity level
    OpacityPreset {
        Subtle => "subtle",
        Balanced => "balanced",
        Visible => "visible",
    }
    default = Subtle
);

define_preset!(
    /// Number of dots drawn
    DensityPreset {
        Light => "light",
        Standard => "standard",
        Dense => "dense",
    }
    default = Standard
);

define_preset!(
    /// Dot radius multiplier
    SizePreset {
        Small => "small",
        Medium => "medium",
        Large => "large",
    }
    default = Medium
);

define_preset!(
    /// Dot and line color
    DotColor {
        White => "white",
        Black => "black",
        Gray => "gray",
        Blue => "blue",
        Amber => "amber",
    }
    default = White
);

/// Overlay settings snapshot
///
/// Produced by the settings store, consumed read-only by the lifecycle manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OverlaySettings {
    /// Selected visual mode
    pub selected_mode: OverlayMode,

    /// Intensity level
    pub intensity: IntensityPreset,

    /// Opacity level
    pub opacity: OpacityPreset,

    /// Dot density
    pub density: DensityPreset,

    /// Dot size
    pub size: SizePreset,

    /// Dot color
    pub color: DotColor,

    /// Start the overlay automatically
    pub auto_start: bool,

    /// Premium features unlocked
    pub premium: bool,
}

/// Lower-case a label and unify separators for lenient matching.
pub(crate) fn normalize_label(s: &str) -> String {
    s.trim()
        .chars()
        .map(|c| match c {
            '-' | ' ' => '_',
            c => c.to_ascii_lowercase(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parse_lenient() {
        assert_eq!("CLASSIC_DOTS".parse::<OverlayMode>(), Ok(OverlayMode::ClassicDots));
        assert_eq!("edge-dots".parse::<OverlayMode>(), Ok(OverlayMode::EdgeDots));
        assert_eq!(" horizon ".parse::<OverlayMode>(), Ok(OverlayMode::Horizon));
        assert!("sparkles".parse::<OverlayMode>().is_err());
    }

    #[test]
    fn test_preset_labels_round_trip() {
        for preset in IntensityPreset::ALL {
            assert_eq!(preset.as_str().parse::<IntensityPreset>(), Ok(*preset));
        }
        for color in DotColor::ALL {
            assert_eq!(color.to_string().parse::<DotColor>(), Ok(*color));
        }
    }

    #[test]
    fn test_parse_error_names_kind() {
        let err = "loud".parse::<IntensityPreset>().unwrap_err();
        assert_eq!(err.kind, "IntensityPreset");
        assert!(err.to_string().contains("loud"));
    }

    #[test]
    fn test_defaults() {
        let settings = OverlaySettings::default();
        assert_eq!(settings.selected_mode, OverlayMode::ClassicDots);
        assert_eq!(settings.intensity, IntensityPreset::Normal);
        assert_eq!(settings.density, DensityPreset::Standard);
        assert!(!settings.auto_start);
    }

    #[test]
    fn test_serde_uses_labels() {
        let json = serde_json::to_string(&OverlayMode::EdgeDots).unwrap();
        assert_eq!(json, "\"EDGE_DOTS\"");
        let preset: SizePreset = serde_json::from_str("\"large\"").unwrap();
        assert_eq!(preset, SizePreset::Large);
    }
}
