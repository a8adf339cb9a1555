//! CLI parse: clap types for the surface runtime. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Surface CLI - inspect runtime configuration and replay lifecycle scenarios
#[derive(Parser)]
#[command(name = "surface")]
#[command(about = "Lifecycle and weak-reference registry core for native UI surfaces")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Disable logging entirely
    #[arg(long, short)]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show resolved feature flags and build info
    Flags {
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Replay a lifecycle scenario against in-memory surfaces
    Simulate {
        /// Scenario file (TOML)
        scenario: PathBuf,
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}
