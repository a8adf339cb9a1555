//! Weak handles
//!
//! A `WeakHandle<T>` points at a value owned elsewhere (by the host toolkit or
//! the script side) without extending its lifetime. Dereferencing yields the
//! live value or `None` once the owner has dropped it.

use std::fmt;
use std::sync::{Arc, Weak};

/// Non-owning reference to a shared value.
pub struct WeakHandle<T: ?Sized> {
    inner: Weak<T>,
}

impl<T: ?Sized> WeakHandle<T> {
    pub fn new(value: &Arc<T>) -> Self {
        Self {
            inner: Arc::downgrade(value),
        }
    }

    /// Upgrade to the live value, if it still exists.
    pub fn get(&self) -> Option<Arc<T>> {
        self.inner.upgrade()
    }

    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }

    /// True when this handle refers to the same allocation as `value`.
    pub fn refers_to(&self, value: &Arc<T>) -> bool {
        addr_of_weak(&self.inner) == addr_of(value)
    }

    /// True when both handles refer to the same allocation.
    pub fn same_target(&self, other: &WeakHandle<T>) -> bool {
        addr_of_weak(&self.inner) == addr_of_weak(&other.inner)
    }
}

impl<T: ?Sized> Clone for WeakHandle<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: ?Sized> fmt::Debug for WeakHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakHandle")
            .field("addr", &addr_of_weak(&self.inner))
            .field("alive", &self.is_alive())
            .finish()
    }
}

impl<T: ?Sized> From<&Arc<T>> for WeakHandle<T> {
    fn from(value: &Arc<T>) -> Self {
        Self::new(value)
    }
}

/// Identity comparison for shared values, ignoring trait-object metadata.
pub fn same_allocation<T: ?Sized>(a: &Arc<T>, b: &Arc<T>) -> bool {
    addr_of(a) == addr_of(b)
}

fn addr_of<T: ?Sized>(value: &Arc<T>) -> *const () {
    Arc::as_ptr(value) as *const ()
}

fn addr_of_weak<T: ?Sized>(value: &Weak<T>) -> *const () {
    value.as_ptr() as *const ()
}
