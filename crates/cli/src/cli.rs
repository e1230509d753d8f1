//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Motion Overlay - motion anticipation cues drawn over other applications
#[derive(Parser, Debug)]
#[command(
    name = "motion-overlay",
    author,
    version,
    about = "Motion anticipation overlay",
    long_about = "Draws motion anticipation cues (dots or a horizon line) driven by \n\
                  acceleration readings, to reduce motion discomfort for passengers.\n\n\
                  Runs headless against a mock or recorded motion sensor."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "MOTION_OVERLAY_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "MOTION_OVERLAY_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the overlay service
    Run(RunArgs),

    /// Render a single frame and print its draw operations
    Render(RenderArgs),

    /// Validate a preference file
    Validate(ValidateArgs),

    /// Display decoded settings and render parameters
    Info(InfoArgs),

    /// Write one preference
    Set(SetArgs),
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Preference file (TOML or JSON), created on first write
    #[arg(
        short,
        long,
        default_value = "overlay.toml",
        env = "MOTION_OVERLAY_PREFS"
    )]
    pub prefs: PathBuf,

    /// Stop after this many seconds (0 = until Ctrl+C)
    #[arg(long, default_value = "0", env = "MOTION_OVERLAY_DURATION")]
    pub duration: u64,

    /// Simulate the screen turning off after this many seconds
    #[arg(long)]
    pub screen_off_after: Option<u64>,

    /// Exit immediately unless auto-start is enabled
    #[arg(long)]
    pub only_if_autostart: bool,

    /// Replay a JSONL motion recording instead of the mock sensor
    #[arg(long, env = "MOTION_OVERLAY_REPLAY")]
    pub replay: Option<PathBuf>,

    /// Replay speed multiplier
    #[arg(long, default_value = "1.0")]
    pub replay_speed: f64,

    /// Loop the replay
    #[arg(long)]
    pub replay_loop: bool,

    /// Sensor kind for the mock sensor
    #[arg(long, value_enum, default_value = "linear-acceleration")]
    pub sensor: SensorArg,

    /// Run without any motion sensor
    #[arg(long, conflicts_with = "replay")]
    pub no_sensor: bool,

    /// Mock sway amplitude (m/s²)
    #[arg(long, default_value = "1.2")]
    pub amplitude: f64,

    /// Overlay width in pixels
    #[arg(long, default_value = "1080")]
    pub width: f32,

    /// Overlay height in pixels
    #[arg(long, default_value = "2400")]
    pub height: f32,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "MOTION_OVERLAY_METRICS_PORT")]
    pub metrics_port: u16,
}

/// Arguments for the `render` command
#[derive(Parser, Debug)]
pub struct RenderArgs {
    /// Preference file; defaults are used when omitted
    #[arg(short, long, env = "MOTION_OVERLAY_PREFS")]
    pub prefs: Option<PathBuf>,

    /// Override the configured mode
    #[arg(long)]
    pub mode: Option<String>,

    /// Filtered x acceleration
    #[arg(long, default_value = "0.0", allow_hyphen_values = true)]
    pub x: f32,

    /// Filtered y acceleration
    #[arg(long, default_value = "0.0", allow_hyphen_values = true)]
    pub y: f32,

    #[arg(long, default_value = "1080")]
    pub width: f32,

    #[arg(long, default_value = "2400")]
    pub height: f32,

    /// Seed for dot placement
    #[arg(long, default_value = "0")]
    pub seed: u64,

    /// Use the service clamps instead of the preview clamps
    #[arg(long)]
    pub service_limits: bool,

    /// Pretty-print the JSON
    #[arg(long)]
    pub pretty: bool,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Preference file to validate
    #[arg(short, long, default_value = "overlay.toml")]
    pub prefs: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Preference file
    #[arg(short, long, default_value = "overlay.toml", env = "MOTION_OVERLAY_PREFS")]
    pub prefs: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Show the motion tuning constants
    #[arg(long)]
    pub tuning: bool,
}

/// Arguments for the `set` command
#[derive(Parser, Debug)]
pub struct SetArgs {
    /// Preference file
    #[arg(short, long, default_value = "overlay.toml", env = "MOTION_OVERLAY_PREFS")]
    pub prefs: PathBuf,

    /// Key (mode, intensity, opacity, density, size, color, auto-start, premium, onboarding)
    pub key: String,

    /// New value
    pub value: String,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}

/// Motion sensor kind
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum SensorArg {
    LinearAcceleration,
    Accelerometer,
}

impl From<SensorArg> for contracts::SensorKind {
    fn from(arg: SensorArg) -> Self {
        match arg {
            SensorArg::LinearAcceleration => Self::LinearAcceleration,
            SensorArg::Accelerometer => Self::Accelerometer,
        }
    }
}
