//! Raw persisted key-value preferences

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Persisted keys
pub mod keys {
    pub const SELECTED_MODE: &str = "selected_mode";
    pub const INTENSITY_LEVEL: &str = "intensity_level";
    pub const OPACITY_LEVEL: &str = "opacity_level";
    pub const DOT_DENSITY: &str = "dot_density";
    pub const DOT_SIZE: &str = "dot_size";
    pub const DOT_COLOR: &str = "dot_color";
    pub const AUTO_START_OVERLAY: &str = "auto_start_overlay";
    pub const IS_PREMIUM: &str = "is_premium";
    pub const ONBOARDING_COMPLETED: &str = "onboarding_completed";

    /// Continuous-value keys written by older versions
    pub mod legacy {
        pub const INTENSITY: &str = "intensity";
        pub const OPACITY: &str = "opacity";
        pub const DOT_COUNT: &str = "dot_count";
    }

    /// Every key the current schema reads
    pub const ALL: &[&str] = &[
        SELECTED_MODE,
        INTENSITY_LEVEL,
        OPACITY_LEVEL,
        DOT_DENSITY,
        DOT_SIZE,
        DOT_COLOR,
        AUTO_START_OVERLAY,
        IS_PREMIUM,
        ONBOARDING_COMPLETED,
    ];
}

/// A single persisted value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrefValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl PrefValue {
    /// Numeric view (ints widen, numeric text parses)
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            Self::Text(s) => s.trim().parse().ok(),
            Self::Bool(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for PrefValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(v) => write!(f, "{v:?}"),
        }
    }
}

impl From<bool> for PrefValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for PrefValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

/// Flat key-value preference table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Preferences(BTreeMap<String, PrefValue>);

impl Preferences {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&PrefValue> {
        self.0.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Insert a value, returning true if the stored value changed
    pub fn set(&mut self, key: &str, value: PrefValue) -> bool {
        if self.0.get(key) == Some(&value) {
            return false;
        }
        self.0.insert(key.to_string(), value);
        true
    }

    pub fn remove(&mut self, key: &str) -> Option<PrefValue> {
        self.0.remove(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PrefValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Keys neither the current schema nor the migration knows
    pub fn unknown_keys(&self) -> Vec<&str> {
        self.0
            .keys()
            .map(String::as_str)
            .filter(|k| {
                !keys::ALL.contains(k)
                    && ![
                        keys::legacy::INTENSITY,
                        keys::legacy::OPACITY,
                        keys::legacy::DOT_COUNT,
                    ]
                    .contains(k)
            })
            .collect()
    }
}
