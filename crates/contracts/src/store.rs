//! SettingsStore trait - Persisted preference interface
//!
//! Typed setters, each an independent persisted key.

use crate::{
    DensityPreset, DotColor, IntensityPreset, OpacityPreset, OverlayError, OverlayMode,
    OverlaySettings, SizePreset,
};

/// Settings store trait
///
/// Setters persist one key and publish a fresh `OverlaySettings` snapshot.
#[trait_variant::make(SettingsStore: Send)]
pub trait LocalSettingsStore {
    /// Latest decoded snapshot
    fn current(&self) -> OverlaySettings;

    /// Whether onboarding has been completed
    fn has_completed_onboarding(&self) -> bool;

    async fn set_mode(&self, mode: OverlayMode) -> Result<(), OverlayError>;

    async fn set_intensity(&self, intensity: IntensityPreset) -> Result<(), OverlayError>;

    async fn set_opacity(&self, opacity: OpacityPreset) -> Result<(), OverlayError>;

    async fn set_density(&self, density: DensityPreset) -> Result<(), OverlayError>;

    async fn set_size(&self, size: SizePreset) -> Result<(), OverlayError>;

    async fn set_color(&self, color: DotColor) -> Result<(), OverlayError>;

    async fn set_auto_start(&self, enabled: bool) -> Result<(), OverlayError>;

    async fn set_premium(&self, unlocked: bool) -> Result<(), OverlayError>;

    async fn set_onboarding_completed(&self, completed: bool) -> Result<(), OverlayError>;
}
