//! Preset enum macro
//!
//! Every discrete setting is a small closed set with a persisted label.
//! The macro generates the enum plus label parsing and printing.

/// Define a preset enum with persisted labels.
///
/// # Usage
/// ```ignore
/// define_preset!(
///     /// Intensity level
///     IntensityPreset {
///         Low => "low",
///         Normal => "normal",
///         High => "high",
///     }
///     default = Normal
/// );
/// ```
macro_rules! define_preset {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $label:literal ),+ $(,)?
        }
        default = $default:ident
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
            serde::Serialize, serde::Deserialize,
        )]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            /// All values in ascending order
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Persisted label
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::$default
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::ParsePresetError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = $crate::settings::normalize_label(s);
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| $crate::settings::normalize_label(v.as_str()) == wanted)
                    .ok_or_else(|| $crate::ParsePresetError::new(stringify!($name), s))
            }
        }
    };
}
