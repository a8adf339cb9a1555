//! Configuration System
//!
//! Layered runtime configuration: defaults, the user-level config file, the
//! workspace config files and `SURFACE_*` environment variables, merged in
//! that order. Application properties are kept in their own
//! `properties.toml` so that their dotted, mixed-case keys survive verbatim.

use crate::error::RuntimeError;
use crate::logging::LoggingConfig;
use crate::memory::MemoryConfig;
use crate::properties::{BuildInfo, DeployType, MapPropertyStore};
use serde::{Deserialize, Serialize};
use std::path::Path;

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Memory pressure settings
    #[serde(default)]
    pub memory: MemoryConfig,

    /// Application properties consumed through the property store
    #[serde(default)]
    pub properties: MapPropertyStore,

    /// Runtime build stamp
    #[serde(default)]
    pub build: BuildInfo,

    /// Deployment flavour used when no `ti.deploytype` property is set
    #[serde(default)]
    pub deploy_type: DeployType,
}

/// Configuration validation errors
#[derive(Debug, Clone)]
pub enum ValidationError {
    Logging(String),
    Memory(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Logging(msg) => write!(f, "Logging: {}", msg),
            ValidationError::Memory(msg) => write!(f, "Memory: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

const LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

impl RuntimeConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            errors.push(ValidationError::Logging(format!(
                "Unknown log level '{}'",
                self.logging.level
            )));
        }
        if self.logging.format != "text" && self.logging.format != "json" {
            errors.push(ValidationError::Logging(format!(
                "Unknown log format '{}' (must be 'json' or 'text')",
                self.logging.format
            )));
        }
        if self.memory.trim_threshold < 0 {
            errors.push(ValidationError::Memory(format!(
                "Trim threshold must not be negative, got {}",
                self.memory.trim_threshold
            )));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validate, folding every failure into one error.
    pub fn validated(self) -> Result<Self, RuntimeError> {
        self.validate().map_err(|errors| {
            let error_msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            RuntimeError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                error_msgs.join("\n")
            ))
        })?;
        Ok(self)
    }

    /// Load layered configuration for `workspace_root` and validate it.
    pub fn load_validated(workspace_root: &Path) -> Result<Self, RuntimeError> {
        ConfigLoader::load(workspace_root)?.validated()
    }
}
