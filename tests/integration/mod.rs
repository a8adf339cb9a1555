//! Integration tests for the surface lifecycle runtime

mod cli_commands;
mod concurrency;
mod forced_restart;
mod test_utils;
