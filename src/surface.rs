//! Native UI surfaces as seen by the lifecycle core.
//!
//! Surfaces are owned by the host toolkit. The core only ever stores
//! [`WeakHandle<dyn Surface>`](crate::handle::WeakHandle) and queries liveness
//! through it.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Role a surface plays in the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceKind {
    /// The primary surface created for the process.
    Root,
    /// A launch/splash surface that precedes the root.
    Launch,
    Standard,
}

/// A unit of native screen real estate managed by the host OS.
pub trait Surface: Send + Sync {
    /// Stable label used in logs and diagnostics.
    fn label(&self) -> &str;

    fn kind(&self) -> SurfaceKind {
        SurfaceKind::Standard
    }

    /// True once the host has started tearing this surface down.
    fn is_finishing(&self) -> bool;

    /// Ask the host to terminate this surface. May synchronously call back
    /// into the core (for example to remove other stack entries).
    fn finish(&self);

    /// Ask a root surface to recreate itself after `delay`. Non-root surfaces
    /// ignore the request.
    fn request_restart(&self, _delay: Duration) {}
}

/// Shared, strong reference to a surface.
pub type SurfaceRef = Arc<dyn Surface>;
