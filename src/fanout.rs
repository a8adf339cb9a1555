//! Application event fan-out
//!
//! Delivers a named event to every live member of a weak listener set. The
//! set never keeps a listener alive; dead entries are skipped during delivery
//! and compacted on the next add/remove pass.

use crate::handle::WeakHandle;
use parking_lot::RwLock;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, trace};

/// Event payload handed to listeners.
pub type EventPayload = Map<String, Value>;

/// Receiver of application-level events.
pub trait AppEventListener: Send + Sync {
    /// Handle `event`. Returns whether the listener handled it.
    fn notify(&self, event: &str, payload: &EventPayload) -> bool;
}

/// Unordered weak listener set.
pub struct EventFanout<L: ?Sized = dyn AppEventListener> {
    listeners: RwLock<Vec<WeakHandle<L>>>,
}

impl<L: ?Sized> Default for EventFanout<L> {
    fn default() -> Self {
        Self {
            listeners: RwLock::new(Vec::new()),
        }
    }
}

impl<L: ?Sized> EventFanout<L> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `listener` unless it is already present. Returns whether it was
    /// added.
    pub fn add_listener(&self, listener: &Arc<L>) -> bool {
        let mut listeners = self.listeners.write();
        compact(&mut listeners);
        if listeners.iter().any(|entry| entry.refers_to(listener)) {
            return false;
        }
        listeners.push(WeakHandle::new(listener));
        debug_assert!(
            listeners
                .iter()
                .filter(|entry| entry.refers_to(listener))
                .count()
                == 1,
            "listener registered twice"
        );
        true
    }

    /// Remove `listener`. Returns whether it was present.
    pub fn remove_listener(&self, listener: &Arc<L>) -> bool {
        let mut listeners = self.listeners.write();
        let before = listeners.len();
        listeners.retain(|entry| !entry.refers_to(listener));
        let removed = listeners.len() != before;
        compact(&mut listeners);
        removed
    }

    /// Live listeners at this instant. The lock is released before returning,
    /// so callers may invoke listeners that re-enter the set.
    pub fn snapshot(&self) -> Vec<Arc<L>> {
        self.listeners
            .read()
            .iter()
            .filter_map(WeakHandle::get)
            .collect()
    }

    /// Number of entries, including dead ones not yet compacted.
    pub fn len(&self) -> usize {
        self.listeners.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.read().is_empty()
    }

    pub fn live_count(&self) -> usize {
        self.listeners
            .read()
            .iter()
            .filter(|entry| entry.is_alive())
            .count()
    }

    pub fn clear(&self) {
        self.listeners.write().clear();
    }
}

impl EventFanout<dyn AppEventListener> {
    /// Deliver `event` to every live listener. Every listener is invoked,
    /// even after one reports the event handled; the result is the OR of
    /// all answers.
    pub fn fire(&self, event: &str, payload: &EventPayload) -> bool {
        let listeners = self.snapshot();
        let mut handled = false;
        for listener in &listeners {
            handled |= listener.notify(event, payload);
        }
        trace!(event, listeners = listeners.len(), handled, "App event fired");
        handled
    }
}

fn compact<L: ?Sized>(listeners: &mut Vec<WeakHandle<L>>) {
    let before = listeners.len();
    listeners.retain(WeakHandle::is_alive);
    if listeners.len() != before {
        debug!(dropped = before - listeners.len(), "Compacted dead listeners");
    }
}
