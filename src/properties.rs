//! Runtime properties and feature flags.
//!
//! The property store itself is an external collaborator (the host reads it
//! from the packaged application). This module defines the narrow read-only
//! interface the core consumes and resolves the typed flags derived from it.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

pub const PROPERTY_DEBUG: &str = "ti.android.debug";
pub const PROPERTY_USE_LEGACY_WINDOW: &str = "ti.android.useLegacyWindow";
pub const PROPERTY_FASTDEV: &str = "ti.android.fastdev";
pub const PROPERTY_ENABLE_COVERAGE: &str = "ti.android.enablecoverage";
pub const PROPERTY_DEFAULT_UNIT: &str = "ti.ui.defaultunit";
pub const PROPERTY_THREAD_STACK_SIZE: &str = "ti.android.threadstacksize";
pub const PROPERTY_COMPILE_JS: &str = "ti.android.compilejs";
pub const PROPERTY_DEPLOY_TYPE: &str = "ti.deploytype";

pub const DEFAULT_THREAD_STACK_SIZE: i64 = 16 * 1024;
pub const SYSTEM_UNIT: &str = "system";
const VALID_UNITS: [&str; 7] = ["system", "px", "dp", "dip", "mm", "cm", "in"];

/// Read-only key/value property source.
pub trait PropertyStore: Send + Sync {
    fn get_string(&self, key: &str) -> Option<String>;

    fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.get_string(key).as_deref().map(str::trim) {
            Some("true") | Some("1") | Some("yes") => true,
            Some("false") | Some("0") | Some("no") => false,
            _ => default,
        }
    }

    fn get_int(&self, key: &str, default: i64) -> i64 {
        self.get_string(key)
            .and_then(|value| value.trim().parse().ok())
            .unwrap_or(default)
    }

    fn get_string_or(&self, key: &str, default: &str) -> String {
        self.get_string(key).unwrap_or_else(|| default.to_string())
    }
}

/// Property value as written in configuration files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Bool(v) => write!(f, "{}", v),
            PropertyValue::Int(v) => write!(f, "{}", v),
            PropertyValue::Text(v) => f.write_str(v),
        }
    }
}

/// In-memory property store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MapPropertyStore {
    values: HashMap<String, PropertyValue>,
}

impl MapPropertyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: PropertyValue) {
        self.values.insert(key.into(), value);
    }

    pub fn with(mut self, key: impl Into<String>, value: PropertyValue) -> Self {
        self.set(key, value);
        self
    }

    /// Overlay `other` on top of this store; its values win.
    pub fn extend(&mut self, other: MapPropertyStore) {
        self.values.extend(other.values);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl PropertyStore for MapPropertyStore {
    fn get_string(&self, key: &str) -> Option<String> {
        self.values.get(key).map(ToString::to_string)
    }
}

/// Deployment flavour of the packaged application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DeployType {
    Development,
    Test,
    Production,
    Other(String),
}

impl DeployType {
    pub fn parse(value: &str) -> Self {
        match value {
            "development" => DeployType::Development,
            "test" => DeployType::Test,
            "production" => DeployType::Production,
            other => DeployType::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            DeployType::Development => "development",
            DeployType::Test => "test",
            DeployType::Production => "production",
            DeployType::Other(name) => name,
        }
    }
}

impl From<String> for DeployType {
    fn from(value: String) -> Self {
        DeployType::parse(&value)
    }
}

impl From<DeployType> for String {
    fn from(value: DeployType) -> Self {
        value.as_str().to_string()
    }
}

impl Default for DeployType {
    fn default() -> Self {
        DeployType::Development
    }
}

/// Flags resolved once from the property store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureFlags {
    pub debug: bool,
    pub legacy_window: bool,
    pub fast_dev: bool,
    pub coverage: bool,
    pub compile_js: bool,
    pub default_unit: String,
    pub thread_stack_size: i64,
    pub deploy_type: DeployType,
}

impl FeatureFlags {
    /// Resolve flags for an application packaged as `deploy_type`.
    ///
    /// Fast dev and coverage are gated on the packaged deploy type. An
    /// explicit `ti.deploytype` property only changes the reported one.
    pub fn resolve(store: &dyn PropertyStore, deploy_type: DeployType) -> Self {
        let development = deploy_type == DeployType::Development;
        // Fast dev only exists in development, where it defaults on.
        let fast_dev = development && store.get_bool(PROPERTY_FASTDEV, true);
        let coverage = deploy_type != DeployType::Production
            && store.get_bool(PROPERTY_ENABLE_COVERAGE, false);

        let reported = match store.get_string(PROPERTY_DEPLOY_TYPE) {
            Some(value) if value != "unknown" => DeployType::parse(&value),
            _ => deploy_type,
        };

        Self {
            debug: store.get_bool(PROPERTY_DEBUG, false),
            legacy_window: store.get_bool(PROPERTY_USE_LEGACY_WINDOW, false),
            fast_dev,
            coverage,
            compile_js: store.get_bool(PROPERTY_COMPILE_JS, false),
            default_unit: resolve_default_unit(store),
            thread_stack_size: store.get_int(PROPERTY_THREAD_STACK_SIZE, DEFAULT_THREAD_STACK_SIZE),
            deploy_type: reported,
        }
    }
}

fn resolve_default_unit(store: &dyn PropertyStore) -> String {
    let unit = store.get_string_or(PROPERTY_DEFAULT_UNIT, SYSTEM_UNIT);
    if VALID_UNITS.contains(&unit.as_str()) {
        unit
    } else {
        SYSTEM_UNIT.to_string()
    }
}

/// Version stamp of the runtime build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildInfo {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default = "not_available")]
    pub timestamp: String,
    #[serde(default = "not_available")]
    pub hash: String,
}

fn default_version() -> String {
    "1.0".to_string()
}

fn not_available() -> String {
    "N/A".to_string()
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self {
            version: default_version(),
            timestamp: not_available(),
            hash: not_available(),
        }
    }
}

impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} {})", self.version, self.timestamp, self.hash)
    }
}
