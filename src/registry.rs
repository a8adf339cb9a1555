//! Weak handle registries: in-memory id lookup that never pins its values.
//!
//! Two policies are used by the runtime. Script proxies register first-wins
//! (a duplicate id is ignored while the first value lives). Native modules
//! register last-wins, with a warning when a live entry is replaced.

use crate::handle::WeakHandle;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// What to do when an id already maps to a live value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationPolicy {
    FirstWins,
    ReplaceWithWarning,
}

/// Mapping from string ids to weak handles.
pub struct WeakRegistry<T: ?Sized> {
    name: &'static str,
    policy: RegistrationPolicy,
    entries: RwLock<HashMap<String, WeakHandle<T>>>,
}

impl<T: ?Sized> WeakRegistry<T> {
    pub fn new(name: &'static str, policy: RegistrationPolicy) -> Self {
        Self {
            name,
            policy,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Register `value` under `id`. Returns whether the registry now points at
    /// `value`.
    pub fn register(&self, id: &str, value: &Arc<T>) -> bool {
        let mut entries = self.entries.write();
        // Liveness and identity only; upgrading here could drop the last
        // strong reference while the write lock is held.
        let existing = entries
            .get(id)
            .filter(|handle| handle.is_alive())
            .map(|handle| handle.refers_to(value));
        match (existing, self.policy) {
            (Some(same), RegistrationPolicy::FirstWins) => {
                debug!(registry = self.name, id, same, "Duplicate registration ignored");
                return false;
            }
            (Some(same), RegistrationPolicy::ReplaceWithWarning) => {
                if !same {
                    warn!(registry = self.name, id, "Registering with name already in use");
                }
            }
            (None, _) => {}
        }

        let previous = entries.insert(id.to_string(), WeakHandle::new(value));
        debug_assert!(
            self.policy != RegistrationPolicy::FirstWins
                || previous.as_ref().map_or(true, |p| !p.is_alive()),
            "first-wins registry overwrote a live entry for {id}"
        );
        true
    }

    /// Remove `id` and return its value if it was still alive.
    pub fn unregister(&self, id: &str) -> Option<Arc<T>> {
        self.entries.write().remove(id).and_then(|handle| handle.get())
    }

    /// Look up a live value by id. A dead entry reads as absent and is purged.
    pub fn get(&self, id: &str) -> Option<Arc<T>> {
        let stale = {
            let entries = self.entries.read();
            match entries.get(id) {
                None => return None,
                Some(handle) => match handle.get() {
                    Some(value) => return Some(value),
                    None => handle.clone(),
                },
            }
        };

        let mut entries = self.entries.write();
        // Only drop the entry we saw; another thread may have re-registered.
        if entries
            .get(id)
            .is_some_and(|current| current.same_target(&stale) && !current.is_alive())
        {
            entries.remove(id);
            debug!(registry = self.name, id, "Purged reclaimed entry");
        }
        None
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Drop every entry whose value has been reclaimed.
    pub fn purge(&self) -> usize {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, handle| handle.is_alive());
        before - entries.len()
    }

    /// Number of entries, live or not yet purged.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Ids with a live value, sorted.
    pub fn live_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .entries
            .read()
            .iter()
            .filter(|(_, handle)| handle.is_alive())
            .map(|(id, _)| id.clone())
            .collect();
        ids.sort();
        ids
    }
}
