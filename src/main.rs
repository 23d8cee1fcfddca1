//! ClipPlan CLI
//!
//! Plans size-targeted ffmpeg clips from saved ffprobe output.
//!
//! # Usage
//!
//! ```bash
//! clipplan plan --probe movie.json --input movie.mkv --start 00:01:30 --end 00:02:41
//! clipplan inspect --probe movie.json
//! ```

use anyhow::Result;
use clap::Parser;
use tracing::info;

use clipplan_cli::adapters::TracingLogAdapter;
use clipplan_cli::app::DefaultAppContainer;
use clipplan_cli::cli::{commands, Cli, Commands};
use clipplan_cli::config_initialization::initialize_configuration_hierarchy;

/// Main entry point for the ClipPlan CLI application
fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    let config = initialize_configuration_hierarchy(&cli)?;

    // Initialize logging
    TracingLogAdapter::new(config.logging.level.clone(), config.logging.format).init();

    info!("Starting ClipPlan");

    let container = DefaultAppContainer::from_config(&config);

    // Execute the requested command
    match cli.command {
        Commands::Plan(args) => {
            info!("Executing plan command");
            commands::plan(args, &container)?;
        }
        Commands::Inspect(args) => {
            info!("Executing inspect command");
            commands::inspect(args, &container)?;
        }
    }

    info!("ClipPlan completed successfully");
    Ok(())
}
