//! Context Stack
//!
//! Ordered weak handles to the surfaces the host has created, oldest first.
//! The current surface is derived on read: dead or finishing entries at the
//! top are discarded until a usable one is found, so the host never has to
//! deliver eager cleanup callbacks.

use crate::handle::WeakHandle;
use crate::surface::{Surface, SurfaceKind, SurfaceRef};
use parking_lot::RwLock;
use tracing::debug;

type Entry = WeakHandle<dyn Surface>;

/// Stack of recycled UI surfaces.
#[derive(Default)]
pub struct ContextStack {
    entries: RwLock<Vec<Entry>>,
}

impl ContextStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a surface at the top.
    pub fn push(&self, surface: &SurfaceRef) {
        let mut entries = self.entries.write();
        entries.push(WeakHandle::new(surface));
        debug!(surface = surface.label(), depth = entries.len(), "Surface pushed");
    }

    /// Remove every entry referring to `surface`. Dead entries encountered on
    /// the way are dropped too.
    pub fn remove(&self, surface: &SurfaceRef) -> bool {
        let mut entries = self.entries.write();
        let before = entries.len();
        let mut removed = false;
        entries.retain(|entry| {
            if entry.refers_to(surface) {
                removed = true;
                return false;
            }
            entry.is_alive()
        });
        if before != entries.len() {
            debug!(
                surface = surface.label(),
                removed,
                depth = entries.len(),
                "Surface removed from stack"
            );
        }
        removed
    }

    /// Remove the entry at `index` (0 is the oldest). Out-of-range is a no-op.
    pub fn remove_at(&self, index: usize) -> bool {
        let mut entries = self.entries.write();
        if index < entries.len() {
            entries.remove(index);
            true
        } else {
            false
        }
    }

    /// The newest live surface that is not finishing.
    ///
    /// The top entry is copied out under a read lock and checked with no lock
    /// held, since `is_finishing` is host code. A rejected entry is popped only
    /// if it is still the top when the write lock is taken.
    pub fn current(&self) -> Option<SurfaceRef> {
        loop {
            let top = {
                let entries = self.entries.read();
                match entries.last() {
                    Some(top) => top.clone(),
                    None => {
                        debug!("Context stack is empty, no current surface");
                        return None;
                    }
                }
            };
            if let Some(surface) = usable(&top) {
                return Some(surface);
            }

            let mut entries = self.entries.write();
            if entries.last().is_some_and(|entry| entry.same_target(&top)) {
                entries.pop();
                debug!(depth = entries.len(), "Pruned dead or finishing surface");
            }
        }
    }

    /// Ask every live, non-finishing surface to finish, newest first, then
    /// clear the stack.
    ///
    /// No lock is held while `finish()` runs, so a surface may remove other
    /// entries from inside its callback. The index is re-checked against the
    /// current length before every access.
    pub fn terminate_all(&self) {
        let mut index = self.entries.read().len();
        while index > 0 {
            index -= 1;
            let entry = {
                let entries = self.entries.read();
                if index >= entries.len() {
                    continue;
                }
                entries[index].clone()
            };
            if let Some(surface) = usable(&entry) {
                debug!(surface = surface.label(), "Terminating surface");
                surface.finish();
            }
        }
        self.entries.write().clear();
    }

    /// True if a live surface of `kind` is anywhere on the stack.
    pub fn contains_kind(&self, kind: SurfaceKind) -> bool {
        self.entries
            .read()
            .iter()
            .filter_map(|entry| entry.get())
            .any(|surface| surface.kind() == kind)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Labels of live entries, oldest first.
    pub fn labels(&self) -> Vec<String> {
        self.entries
            .read()
            .iter()
            .filter_map(|entry| entry.get())
            .map(|surface| surface.label().to_string())
            .collect()
    }
}

fn usable(entry: &Entry) -> Option<SurfaceRef> {
    entry.get().filter(|surface| !surface.is_finishing())
}
