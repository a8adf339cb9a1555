//! Merge rules: defaults, override order, conflict handling.

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

use crate::memory::TRIM_MEMORY_RUNNING_LOW;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("deploy_type", "development")?
        .set_default("memory.trim_threshold", i64::from(TRIM_MEMORY_RUNNING_LOW))?
        .set_default("logging.level", "info")?
        .set_default("logging.format", "text")
}
