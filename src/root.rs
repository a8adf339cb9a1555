//! Root Context Gate
//!
//! Holds the application's root surface and the readiness latch that
//! subsystems starting before any surface exists can block on.

use crate::handle::WeakHandle;
use crate::latch::ReadyLatch;
use crate::surface::{Surface, SurfaceRef};
use parking_lot::RwLock;
use std::time::Duration;
use tracing::{debug, info};

#[derive(Default)]
pub struct RootGate {
    root: RwLock<Option<WeakHandle<dyn Surface>>>,
    ready: ReadyLatch,
}

impl RootGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign the root surface and release the readiness latch.
    ///
    /// A second assignment replaces the handle but does not release again.
    /// Returns `true` for the call that released the latch.
    pub fn set_root(&self, surface: &SurfaceRef) -> bool {
        *self.root.write() = Some(WeakHandle::new(surface));
        let released = self.ready.release();
        if released {
            info!(surface = surface.label(), "Root surface registered, readiness released");
        } else {
            debug!(surface = surface.label(), "Root surface re-assigned");
        }
        released
    }

    /// Block until a root has been assigned, then return it.
    ///
    /// Returns `None` only if the root was reclaimed after the release.
    pub fn await_root(&self) -> Option<SurfaceRef> {
        self.ready.wait();
        self.root()
    }

    /// [`await_root`](Self::await_root) bounded by `timeout`.
    pub fn await_root_timeout(&self, timeout: Duration) -> Option<SurfaceRef> {
        if self.ready.wait_timeout(timeout) {
            self.root()
        } else {
            None
        }
    }

    pub async fn await_root_async(&self) -> Option<SurfaceRef> {
        self.ready.wait_async().await;
        self.root()
    }

    /// The root surface if it is still alive. Never blocks.
    pub fn root_if_available(&self) -> Option<SurfaceRef> {
        self.root()
    }

    /// True when the root is alive and not finishing.
    pub fn is_root_available(&self) -> bool {
        self.root().is_some_and(|root| !root.is_finishing())
    }

    pub fn is_ready(&self) -> bool {
        self.ready.is_released()
    }

    fn root(&self) -> Option<SurfaceRef> {
        self.root.read().as_ref().and_then(WeakHandle::get)
    }
}
