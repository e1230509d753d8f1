//! `info` command implementation.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use contracts::OverlaySettings;
use motion_engine::{MotionTuning, SurfaceParams};
use settings_store::PreferenceLoader;
use surfaces::MotionLimits;

use crate::cli::InfoArgs;
use crate::error::CliError;

/// Settings info for JSON output
#[derive(Serialize)]
struct SettingsInfo {
    settings: OverlaySettings,
    onboarding_completed: bool,
    surface: &'static str,
    params: SurfaceParams,
    #[serde(skip_serializing_if = "Option::is_none")]
    tuning: Option<TuningInfo>,
}

#[derive(Serialize)]
struct TuningInfo {
    motion: MotionTuning,
    service_limits: MotionLimits,
    preview_limits: MotionLimits,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(prefs = %args.prefs.display(), "Loading preference info");

    if !args.prefs.exists() {
        return Err(CliError::prefs_not_found(args.prefs.display().to_string()).into());
    }

    let loaded = PreferenceLoader::load_from_path(&args.prefs)
        .with_context(|| format!("Failed to load preferences from {}", args.prefs.display()))?;

    let params = SurfaceParams::from_settings(&loaded.settings);
    let info = SettingsInfo {
        settings: loaded.settings,
        onboarding_completed: loaded.onboarding_completed,
        surface: params.kind.map_or("none", |k| k.label()),
        params,
        tuning: args.tuning.then(|| TuningInfo {
            motion: MotionTuning::default(),
            service_limits: MotionLimits::SERVICE,
            preview_limits: MotionLimits::PREVIEW,
        }),
    };

    if args.json {
        let json = serde_json::to_string_pretty(&info).context("Failed to serialize settings info")?;
        println!("{}", json);
    } else {
        print_settings_info(&info);
    }

    Ok(())
}

fn print_settings_info(info: &SettingsInfo) {
    let s = &info.settings;
    let p = &info.params;

    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║                 Motion Overlay Preferences                   ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    println!("⚙️  Settings");
    println!("   ├─ Mode: {}", s.selected_mode);
    println!("   ├─ Intensity: {}", s.intensity);
    println!("   ├─ Opacity: {}", s.opacity);
    println!("   ├─ Density: {}", s.density);
    println!("   ├─ Size: {}", s.size);
    println!("   ├─ Color: {}", s.color);
    println!("   ├─ Auto-start: {}", s.auto_start);
    println!("   ├─ Premium: {}", s.premium);
    println!("   └─ Onboarding completed: {}", info.onboarding_completed);

    println!("\n🎨 Surface ({})", info.surface);
    println!("   ├─ Intensity scalar: {}", p.intensity);
    println!("   ├─ Opacity: {:.2}", p.opacity);
    println!(
        "   ├─ Color: rgb({}, {}, {})",
        p.color.r, p.color.g, p.color.b
    );
    println!("   ├─ Dot count: {}", p.density);
    println!("   └─ Size multiplier: {}", p.size);

    if let Some(ref tuning) = info.tuning {
        let m = &tuning.motion;
        println!("\n📐 Motion Tuning");
        println!("   ├─ Smoothing α: {}", m.alpha);
        println!("   ├─ Noise threshold: {}", m.noise_threshold);
        println!("   ├─ Frame interval: {} ms", m.frame_interval_ms);
        println!("   ├─ Pixel scale: {}", m.pixel_scale);
        println!(
            "   ├─ Service clamps: ±{} px dots, ±{} px / ±{}° horizon",
            tuning.service_limits.dot_offset,
            tuning.service_limits.horizon_shift,
            tuning.service_limits.horizon_tilt
        );
        println!(
            "   └─ Preview clamps: ±{} px dots, ±{} px / ±{}° horizon",
            tuning.preview_limits.dot_offset,
            tuning.preview_limits.horizon_shift,
            tuning.preview_limits.horizon_tilt
        );
    }

    println!();
}
