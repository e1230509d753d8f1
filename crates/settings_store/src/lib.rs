//! # Settings Store
//!
//! Persisted overlay preferences.
//!
//! Responsibilities:
//! - Parse TOML/JSON preference files
//! - Migrate legacy continuous values into presets
//! - Decode a typed `OverlaySettings` snapshot, field by field
//! - Persist writes and publish snapshots to observers
//!
//! # Example
//!
//! ```no_run
//! use contracts::{OverlayMode, SettingsStore};
//! use settings_store::PreferenceStore;
//!
//! # async fn demo() -> Result<(), contracts::OverlayError> {
//! let store = PreferenceStore::open("prefs.toml").await?;
//! let mut updates = store.subscribe();
//! store.set_mode(OverlayMode::Horizon).await?;
//! assert_eq!(updates.borrow_and_update().selected_mode, OverlayMode::Horizon);
//! # Ok(())
//! # }
//! ```

mod decode;
mod loader;
mod migrate;
mod parser;
mod preferences;
mod store;

pub use decode::{decode, decode_settings, DecodeWarning};
pub use loader::{LoadedPreferences, PreferenceLoader};
pub use migrate::{
    density_from_legacy, intensity_from_legacy, migrate, opacity_from_legacy, MigratedKey,
    MigrationReport, INTENSITY_HIGH_THRESHOLD, INTENSITY_LOW_THRESHOLD,
};
pub use parser::PreferenceFormat;
pub use preferences::{keys, PrefValue, Preferences};
pub use store::PreferenceStore;
