//! Error types for the surface lifecycle runtime.
//!
//! The lifecycle core itself never fails: absence is reported as `None` and a
//! lost ownership claim as `false`. These errors cover the ambient surfaces
//! around it (configuration, logging setup, scenario scripts).

use thiserror::Error;

/// Runtime-level errors
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Scenario error: {0}")]
    ScenarioError(String),

    #[error("Unknown surface: {0}")]
    UnknownSurface(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<config::ConfigError> for RuntimeError {
    fn from(err: config::ConfigError) -> Self {
        RuntimeError::ConfigError(err.to_string())
    }
}

impl From<toml::de::Error> for RuntimeError {
    fn from(err: toml::de::Error) -> Self {
        RuntimeError::ScenarioError(err.to_string())
    }
}
