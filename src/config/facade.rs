//! Config loader facade: assembles the layered sources.

use super::merge::merge_policy;
use super::sources::{environment, global_file, workspace_file};
use super::RuntimeConfig;
use crate::error::RuntimeError;
use crate::properties::MapPropertyStore;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Loads [`RuntimeConfig`] from files and environment.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load layered configuration for `workspace_root`.
    ///
    /// Precedence (highest last): defaults, global file, workspace files,
    /// environment variables, then `config/properties.toml` for properties.
    pub fn load(workspace_root: &Path) -> Result<RuntimeConfig, RuntimeError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = workspace_file::add_to_builder(builder, workspace_root)?;
        let builder = environment::add_to_builder(builder);

        let mut config: RuntimeConfig = builder.build()?.try_deserialize()?;

        let properties_path = workspace_file::properties_path(workspace_root);
        if properties_path.exists() {
            let properties = Self::load_properties(&properties_path)?;
            debug!(
                path = %properties_path.display(),
                count = properties.len(),
                "Loaded application properties"
            );
            config.properties.extend(properties);
        }
        Ok(config)
    }

    /// Load a single TOML file, bypassing the layered sources.
    pub fn load_from_file(path: &Path) -> Result<RuntimeConfig, RuntimeError> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| {
            RuntimeError::ConfigError(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    /// Load an application properties file.
    pub fn load_properties(path: &Path) -> Result<MapPropertyStore, RuntimeError> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| {
            RuntimeError::ConfigError(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    /// User-level config file location, if `HOME` is set.
    pub fn global_config_path() -> Option<PathBuf> {
        global_file::global_config_path()
    }
}
