//! # Motion Overlay CLI
//!
//! Entry point for the motion overlay.
//!
//! Provides:
//! - Headless overlay runs against mock or recorded motion
//! - Single-frame rendering for inspection
//! - Preference validation, inspection and editing

mod cli;
mod commands;
mod error;
mod pipeline;

use anyhow::Result;
use clap::Parser;
use observability::ObservabilityConfig;
use tracing::info;

use cli::{Cli, Commands};
use commands::{run_info, run_overlay, run_render, run_set, run_validate};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    init_logging(&cli)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Motion Overlay CLI starting"
    );

    let result = match &cli.command {
        Commands::Run(args) => run_overlay(args).await,
        Commands::Render(args) => run_render(args),
        Commands::Validate(args) => run_validate(args),
        Commands::Info(args) => run_info(args),
        Commands::Set(args) => run_set(args).await,
    };

    if let Err(ref e) = result {
        tracing::error!(error = %e, "Command failed");
    }

    result
}

/// Initialize logging based on CLI options
fn init_logging(cli: &Cli) -> Result<()> {
    observability::init_with_config(ObservabilityConfig::for_verbosity(
        cli.verbose,
        cli.quiet,
        cli.log_format.into(),
    ))
}
