//! PreferenceStore - persisted, observable settings
//!
//! One file, one key per setting. Every successful write re-decodes the map
//! and publishes the snapshot on a `watch` channel, so observers only ever see
//! the latest value.

use std::path::{Path, PathBuf};

use contracts::{
    DensityPreset, DotColor, IntensityPreset, OpacityPreset, OverlayError, OverlayMode,
    OverlaySettings, SettingsStore, SizePreset,
};
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, instrument, warn};

use crate::decode::{self, DecodeWarning};
use crate::loader::{LoadedPreferences, PreferenceLoader};
use crate::migrate::MigrationReport;
use crate::parser::{self, PreferenceFormat};
use crate::preferences::{keys, PrefValue, Preferences};

/// File-backed settings store
pub struct PreferenceStore {
    path: Option<PathBuf>,
    format: PreferenceFormat,
    prefs: Mutex<Preferences>,
    settings_tx: watch::Sender<OverlaySettings>,
    onboarding_tx: watch::Sender<bool>,
    load_warnings: Vec<DecodeWarning>,
    migration: MigrationReport,
}

impl PreferenceStore {
    /// Open a store backed by `path`
    ///
    /// A missing file yields an empty store. Legacy keys are migrated and the
    /// migrated map is written back once.
    #[instrument(name = "preference_store_open", skip_all, fields(path = %path.as_ref().display()))]
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, OverlayError> {
        let path = path.as_ref().to_path_buf();
        let format = PreferenceLoader::detect_format(&path)?;

        let loaded = match tokio::fs::read_to_string(&path).await {
            Ok(content) => PreferenceLoader::load_from_str(&content, format)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("preference file missing, starting empty");
                PreferenceLoader::from_preferences(Preferences::new())
            }
            Err(e) => return Err(e.into()),
        };

        let store = Self::build(Some(path), format, loaded);
        if !store.migration.is_empty() {
            let prefs = store.prefs.lock().await;
            store.persist(&prefs).await?;
        }

        info!(
            warnings = store.load_warnings.len(),
            migrated = store.migration.migrated.len(),
            "preferences loaded"
        );
        Ok(store)
    }

    /// Store without persistence
    pub fn in_memory() -> Self {
        Self::from_preferences(Preferences::new())
    }

    /// In-memory store seeded from a raw map
    pub fn from_preferences(prefs: Preferences) -> Self {
        Self::build(
            None,
            PreferenceFormat::default(),
            PreferenceLoader::from_preferences(prefs),
        )
    }

    fn build(path: Option<PathBuf>, format: PreferenceFormat, loaded: LoadedPreferences) -> Self {
        let (settings_tx, _) = watch::channel(loaded.settings);
        let (onboarding_tx, _) = watch::channel(loaded.onboarding_completed);

        Self {
            path,
            format,
            prefs: Mutex::new(loaded.preferences),
            settings_tx,
            onboarding_tx,
            load_warnings: loaded.warnings,
            migration: loaded.migration,
        }
    }

    /// Observe settings snapshots
    ///
    /// The receiver starts with the current snapshot marked as seen.
    pub fn subscribe(&self) -> watch::Receiver<OverlaySettings> {
        self.settings_tx.subscribe()
    }

    /// Observe the onboarding flag
    pub fn subscribe_onboarding(&self) -> watch::Receiver<bool> {
        self.onboarding_tx.subscribe()
    }

    /// Fields that fell back to defaults when the store was opened
    pub fn load_warnings(&self) -> &[DecodeWarning] {
        &self.load_warnings
    }

    /// Legacy keys rewritten when the store was opened
    pub fn migration(&self) -> &MigrationReport {
        &self.migration
    }

    /// Backing file, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Copy of the raw map
    pub async fn preferences(&self) -> Preferences {
        self.prefs.lock().await.clone()
    }

    /// Write one key, persist, publish
    ///
    /// Writing the value already stored is a no-op and publishes nothing. On a
    /// persistence failure the in-memory map is rolled back.
    #[instrument(name = "preference_write", skip(self, value), fields(value = %value))]
    pub async fn write_key(&self, key: &'static str, value: PrefValue) -> Result<(), OverlayError> {
        let mut prefs = self.prefs.lock().await;
        let previous = prefs.get(key).cloned();
        if !prefs.set(key, value) {
            debug!("value unchanged");
            return Ok(());
        }

        if let Err(e) = self.persist(&prefs).await {
            warn!(error = %e, "persist failed, rolling back");
            match previous {
                Some(old) => prefs.set(key, old),
                None => prefs.remove(key).is_some(),
            };
            return Err(e);
        }

        let (settings, onboarding, _) = decode::decode(&prefs);
        drop(prefs);
        self.publish(settings, onboarding);
        Ok(())
    }

    fn publish(&self, settings: OverlaySettings, onboarding: bool) {
        self.settings_tx.send_if_modified(|current| {
            if *current == settings {
                return false;
            }
            *current = settings;
            true
        });
        self.onboarding_tx.send_if_modified(|current| {
            if *current == onboarding {
                return false;
            }
            *current = onboarding;
            true
        });
    }

    async fn persist(&self, prefs: &Preferences) -> Result<(), OverlayError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let content = parser::serialize(prefs, self.format)?;
        let path_label = path.display().to_string();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| OverlayError::settings_persist(&path_label, e.to_string()))?;
        }

        let tmp = path.with_extension("tmp");
        tokio::fs::write(&tmp, content)
            .await
            .map_err(|e| OverlayError::settings_persist(&path_label, e.to_string()))?;
        tokio::fs::rename(&tmp, path)
            .await
            .map_err(|e| OverlayError::settings_persist(&path_label, e.to_string()))?;
        Ok(())
    }

    fn text(value: impl ToString) -> PrefValue {
        PrefValue::Text(value.to_string())
    }
}

impl SettingsStore for PreferenceStore {
    fn current(&self) -> OverlaySettings {
        *self.settings_tx.borrow()
    }

    fn has_completed_onboarding(&self) -> bool {
        *self.onboarding_tx.borrow()
    }

    async fn set_mode(&self, mode: OverlayMode) -> Result<(), OverlayError> {
        self.write_key(keys::SELECTED_MODE, Self::text(mode)).await
    }

    async fn set_intensity(&self, intensity: IntensityPreset) -> Result<(), OverlayError> {
        self.write_key(keys::INTENSITY_LEVEL, Self::text(intensity)).await
    }

    async fn set_opacity(&self, opacity: OpacityPreset) -> Result<(), OverlayError> {
        self.write_key(keys::OPACITY_LEVEL, Self::text(opacity)).await
    }

    async fn set_density(&self, density: DensityPreset) -> Result<(), OverlayError> {
        self.write_key(keys::DOT_DENSITY, Self::text(density)).await
    }

    async fn set_size(&self, size: SizePreset) -> Result<(), OverlayError> {
        self.write_key(keys::DOT_SIZE, Self::text(size)).await
    }

    async fn set_color(&self, color: DotColor) -> Result<(), OverlayError> {
        self.write_key(keys::DOT_COLOR, Self::text(color)).await
    }

    async fn set_auto_start(&self, enabled: bool) -> Result<(), OverlayError> {
        self.write_key(keys::AUTO_START_OVERLAY, enabled.into()).await
    }

    async fn set_premium(&self, unlocked: bool) -> Result<(), OverlayError> {
        self.write_key(keys::IS_PREMIUM, unlocked.into()).await
    }

    async fn set_onboarding_completed(&self, completed: bool) -> Result<(), OverlayError> {
        self.write_key(keys::ONBOARDING_COMPLETED, completed.into()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_is_default() {
        let dir = TempDir::new().unwrap();
        let store = PreferenceStore::open(dir.path().join("prefs.toml"))
            .await
            .unwrap();
        assert_eq!(store.current(), OverlaySettings::default());
        assert!(!store.has_completed_onboarding());
        assert!(store.load_warnings().is_empty());
    }

    #[tokio::test]
    async fn test_write_persists_and_reloads() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prefs.toml");

        let store = PreferenceStore::open(&path).await.unwrap();
        store.set_mode(OverlayMode::Horizon).await.unwrap();
        store.set_color(DotColor::Gray).await.unwrap();
        store.set_intensity(IntensityPreset::High).await.unwrap();
        store.set_auto_start(true).await.unwrap();
        store.set_onboarding_completed(true).await.unwrap();
        drop(store);

        let reopened = PreferenceStore::open(&path).await.unwrap();
        let settings = reopened.current();
        assert_eq!(settings.selected_mode, OverlayMode::Horizon);
        assert_eq!(settings.color, DotColor::Gray);
        assert_eq!(settings.intensity, IntensityPreset::High);
        assert!(settings.auto_start);
        assert!(reopened.has_completed_onboarding());
        assert!(!dir.path().join("prefs.tmp").exists());
    }

    #[tokio::test]
    async fn test_subscribe_sees_latest_only() {
        let store = PreferenceStore::in_memory();
        let mut rx = store.subscribe();

        store.set_intensity(IntensityPreset::Low).await.unwrap();
        store.set_intensity(IntensityPreset::High).await.unwrap();

        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().intensity, IntensityPreset::High);
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_unchanged_write_does_not_publish() {
        let store = PreferenceStore::in_memory();
        store.set_size(SizePreset::Large).await.unwrap();
        let mut rx = store.subscribe();

        store.set_size(SizePreset::Large).await.unwrap();
        assert!(!rx.has_changed().unwrap());

        // onboarding lives on its own channel
        store.set_onboarding_completed(true).await.unwrap();
        assert!(!rx.has_changed().unwrap());
        let _ = rx.borrow_and_update();
    }

    #[tokio::test]
    async fn test_open_migrates_legacy_once() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, r#"{"intensity": 3.4, "opacity": 0.4}"#).unwrap();

        let store = PreferenceStore::open(&path).await.unwrap();
        assert_eq!(store.current().intensity, IntensityPreset::Low);
        assert_eq!(store.current().opacity, OpacityPreset::Visible);
        assert_eq!(store.migration().migrated.len(), 2);
        drop(store);

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(!raw.contains("\"intensity\""));
        assert!(raw.contains("intensity_level"));

        let reopened = PreferenceStore::open(&path).await.unwrap();
        assert!(reopened.migration().is_empty());
        assert_eq!(reopened.current().intensity, IntensityPreset::Low);
    }

    #[tokio::test]
    async fn test_malformed_value_is_warned_not_fatal() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prefs.toml");
        std::fs::write(&path, "selected_mode = \"PLASMA\"\ndot_size = \"large\"\n").unwrap();

        let store = PreferenceStore::open(&path).await.unwrap();
        assert_eq!(store.current().selected_mode, OverlayMode::ClassicDots);
        assert_eq!(store.current().size, SizePreset::Large);
        assert_eq!(store.load_warnings().len(), 1);
    }

    #[tokio::test]
    async fn test_persist_failure_rolls_back() {
        let dir = TempDir::new().unwrap();
        // a directory where the file should be makes rename fail
        let path = dir.path().join("prefs.toml");
        std::fs::create_dir(&path).unwrap();
        let store = PreferenceStore::build(
            Some(path),
            PreferenceFormat::Toml,
            PreferenceLoader::from_preferences(Preferences::new()),
        );

        let result = store.set_mode(OverlayMode::Disabled).await;
        assert!(matches!(result, Err(OverlayError::SettingsPersist { .. })));
        assert_eq!(store.current().selected_mode, OverlayMode::ClassicDots);
        assert!(!store.preferences().await.contains(keys::SELECTED_MODE));
    }
}
