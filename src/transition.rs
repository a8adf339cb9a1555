//! Transition signal: announces UI-recreation transitions to decoupled
//! observers.
//!
//! Listeners are held strongly. They are expected to be long-lived and to
//! de-register themselves.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

pub trait TransitionListener: Send + Sync {
    fn on_transition(&self, state: bool);
}

#[derive(Default)]
pub struct TransitionSignal {
    transitioning: AtomicBool,
    listeners: Mutex<Vec<Arc<dyn TransitionListener>>>,
}

impl TransitionSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `state` and notify listeners in registration order, on the
    /// calling thread.
    pub fn set_transitioning(&self, state: bool) {
        self.transitioning.store(state, Ordering::SeqCst);
        let listeners = self.listeners.lock().clone();
        debug!(state, listeners = listeners.len(), "Transition state changed");
        for listener in listeners {
            listener.on_transition(state);
        }
    }

    pub fn is_transitioning(&self) -> bool {
        self.transitioning.load(Ordering::SeqCst)
    }

    pub fn add_listener(&self, listener: Arc<dyn TransitionListener>) {
        self.listeners.lock().push(listener);
    }

    /// Remove the first registration of `listener`.
    pub fn remove_listener(&self, listener: &Arc<dyn TransitionListener>) -> bool {
        let mut listeners = self.listeners.lock();
        match listeners
            .iter()
            .position(|l| crate::handle::same_allocation(l, listener))
        {
            Some(index) => {
                listeners.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.lock().len()
    }

    /// Back to the initial state: not transitioning, no listeners.
    pub fn reset(&self) {
        self.transitioning.store(false, Ordering::SeqCst);
        self.listeners.lock().clear();
    }
}
