//! CLI module for ClipPlan
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod args;
pub mod commands;

pub use args::{InspectArgs, PlanArgs};

/// ClipPlan size-targeted clip planner
///
/// Reads saved ffprobe output and prints the ffmpeg commands that cut, encode,
/// and fit a clip into a size budget. Commands are printed, never run.
#[derive(Parser, Debug)]
#[command(name = "clipplan")]
#[command(about = "ClipPlan - plan size-targeted ffmpeg clips")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Logging level or filter directive (overrides CLIPPLAN_LOG_LEVEL)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format: pretty, compact, json
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Configuration file (default: clipplan.toml or config/clipplan.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Plan a clip and print the ffmpeg commands
    Plan(args::PlanArgs),
    /// Inspect saved probe output
    Inspect(args::InspectArgs),
}
