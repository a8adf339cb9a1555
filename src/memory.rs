//! Memory pressure controller
//!
//! Maps host low-memory and trim notifications onto a single `evict_all()`
//! call on an externally owned bounded cache. The eviction policy itself
//! lives in the cache.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// Host trim level at which the process is considered to be running low.
pub const TRIM_MEMORY_RUNNING_LOW: i32 = 10;

/// Externally owned cache that can drop everything it holds.
pub trait BoundedCache: Send + Sync {
    fn evict_all(&self);
}

/// Memory pressure settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Trim levels at or above this value evict the cache
    #[serde(default = "default_trim_threshold")]
    pub trim_threshold: i32,
}

fn default_trim_threshold() -> i32 {
    TRIM_MEMORY_RUNNING_LOW
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            trim_threshold: default_trim_threshold(),
        }
    }
}

pub struct MemoryPressureController {
    threshold: i32,
    cache: Option<Arc<dyn BoundedCache>>,
}

impl MemoryPressureController {
    pub fn new(config: &MemoryConfig) -> Self {
        Self {
            threshold: config.trim_threshold,
            cache: None,
        }
    }

    pub fn with_cache(mut self, cache: Arc<dyn BoundedCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn threshold(&self) -> i32 {
        self.threshold
    }

    /// Low memory is the most severe signal and always evicts.
    pub fn on_low_memory(&self) -> bool {
        info!("Low memory, evicting shared cache");
        self.evict()
    }

    /// Evict when `level` reaches the threshold. Returns whether eviction ran.
    pub fn on_trim(&self, level: i32) -> bool {
        if level >= self.threshold {
            info!(level, threshold = self.threshold, "Trim level crossed threshold");
            self.evict()
        } else {
            debug!(level, threshold = self.threshold, "Trim level below threshold");
            false
        }
    }

    fn evict(&self) -> bool {
        match &self.cache {
            Some(cache) => {
                cache.evict_all();
                true
            }
            None => false,
        }
    }
}
