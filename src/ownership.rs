//! Current-surface ownership handoff.
//!
//! Only the surface that currently holds "current" status (or anyone, when
//! nothing holds it) may name its successor. A surface that already lost
//! focus cannot clobber the newer claim while it is being torn down.

use crate::handle::WeakHandle;
use crate::surface::{Surface, SurfaceRef};
use parking_lot::Mutex;
use tracing::debug;

#[derive(Default)]
pub struct CurrentOwnership {
    current: Mutex<Option<WeakHandle<dyn Surface>>>,
}

impl CurrentOwnership {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand current status from `caller` to `successor`.
    ///
    /// Accepted when nothing is current (never set, or reclaimed) or when
    /// `caller` is the current holder. A rejected claim changes nothing and
    /// is not an error; the return value only reports what happened.
    pub fn claim(&self, caller: &SurfaceRef, successor: &SurfaceRef) -> bool {
        let accepted = {
            let mut current = self.current.lock();
            let accepted = match current.as_ref() {
                Some(holder) if holder.is_alive() => holder.refers_to(caller),
                _ => true,
            };
            if accepted {
                *current = Some(WeakHandle::new(successor));
            }
            accepted
        };
        if !accepted {
            debug!(
                caller = caller.label(),
                successor = successor.label(),
                "Ownership claim rejected, caller is no longer current"
            );
        }
        accepted
    }

    /// The current holder, if still alive.
    pub fn current(&self) -> Option<SurfaceRef> {
        self.current.lock().as_ref().and_then(WeakHandle::get)
    }

    pub fn clear(&self) {
        *self.current.lock() = None;
    }
}
