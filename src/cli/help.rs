//! CLI help and command-name contract for logging.

use crate::cli::parse::Commands;

/// Command name used in log fields (e.g. "flags", "simulate").
pub fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Flags { .. } => "flags",
        Commands::Simulate { .. } => "simulate",
    }
}
