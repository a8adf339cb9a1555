//! Blocking primitives for readiness.
//!
//! [`ReadyLatch`] is released exactly once and may be awaited by any number of
//! threads (or tokio tasks) regardless of whether they arrive before or after
//! the release. [`Beacon`] is a generation counter used to wake waiters that
//! need to re-check a condition after some state change.

use parking_lot::{Condvar, Mutex};
use std::time::{Duration, Instant};
use tokio::sync::Notify;

/// One-shot readiness signal.
#[derive(Default)]
pub struct ReadyLatch {
    released: Mutex<bool>,
    cond: Condvar,
    notify: Notify,
}

impl ReadyLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Release the latch. Returns `true` only for the call that released it.
    pub fn release(&self) -> bool {
        {
            let mut released = self.released.lock();
            if *released {
                return false;
            }
            *released = true;
            self.cond.notify_all();
        }
        self.notify.notify_waiters();
        true
    }

    pub fn is_released(&self) -> bool {
        *self.released.lock()
    }

    /// Block the calling thread until the latch is released.
    pub fn wait(&self) {
        let mut released = self.released.lock();
        while !*released {
            self.cond.wait(&mut released);
        }
    }

    /// Block for at most `timeout`. Returns whether the latch is released.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut released = self.released.lock();
        while !*released {
            if self.cond.wait_until(&mut released, deadline).timed_out() {
                return *released;
            }
        }
        true
    }

    /// Wait without blocking a runtime worker thread.
    pub async fn wait_async(&self) {
        loop {
            // Registered before the check, so a release in between is not lost.
            let notified = self.notify.notified();
            if self.is_released() {
                return;
            }
            notified.await;
        }
    }
}

/// Monotonic change counter with blocking waiters.
#[derive(Default)]
pub struct Beacon {
    generation: Mutex<u64>,
    cond: Condvar,
}

impl Beacon {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generation(&self) -> u64 {
        *self.generation.lock()
    }

    /// Record a change and wake every waiter.
    pub fn bump(&self) {
        let mut generation = self.generation.lock();
        *generation = generation.wrapping_add(1);
        self.cond.notify_all();
    }

    /// Block until the generation differs from `seen`.
    pub fn wait_past(&self, seen: u64) -> u64 {
        let mut generation = self.generation.lock();
        while *generation == seen {
            self.cond.wait(&mut generation);
        }
        *generation
    }

    /// Like [`wait_past`](Self::wait_past) but gives up at `deadline`.
    pub fn wait_past_until(&self, seen: u64, deadline: Instant) -> Option<u64> {
        let mut generation = self.generation.lock();
        while *generation == seen {
            if self.cond.wait_until(&mut generation, deadline).timed_out() {
                break;
            }
        }
        (*generation != seen).then_some(*generation)
    }
}
