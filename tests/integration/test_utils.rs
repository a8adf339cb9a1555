//! Shared test utilities for integration tests
//!
//! In-memory surfaces, listeners and a cache, plus HOME isolation for
//! configuration tests.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use surface_runtime::fanout::{AppEventListener, EventPayload};
use surface_runtime::memory::BoundedCache;
use surface_runtime::{Surface, SurfaceKind, SurfaceRef};
use tempfile::TempDir;

pub struct FakeSurface {
    label: String,
    kind: SurfaceKind,
    finishing: AtomicBool,
    restarts: Mutex<Vec<Duration>>,
}

impl FakeSurface {
    pub fn new(label: &str) -> Arc<Self> {
        Self::with_kind(label, SurfaceKind::Standard)
    }

    pub fn with_kind(label: &str, kind: SurfaceKind) -> Arc<Self> {
        Arc::new(Self {
            label: label.to_string(),
            kind,
            finishing: AtomicBool::new(false),
            restarts: Mutex::new(Vec::new()),
        })
    }

    pub fn set_finishing(&self) {
        self.finishing.store(true, Ordering::SeqCst);
    }

    pub fn restarts(&self) -> Vec<Duration> {
        self.restarts.lock().clone()
    }
}

impl Surface for FakeSurface {
    fn label(&self) -> &str {
        &self.label
    }

    fn kind(&self) -> SurfaceKind {
        self.kind
    }

    fn is_finishing(&self) -> bool {
        self.finishing.load(Ordering::SeqCst)
    }

    fn finish(&self) {
        self.set_finishing();
    }

    fn request_restart(&self, delay: Duration) {
        self.restarts.lock().push(delay);
    }
}

/// Upcast helper; `&Arc<FakeSurface>` does not coerce to `&SurfaceRef`.
pub fn surface(fake: &Arc<FakeSurface>) -> SurfaceRef {
    fake.clone()
}

pub struct CountingListener {
    handled: bool,
    calls: AtomicUsize,
}

impl CountingListener {
    pub fn new(handled: bool) -> Arc<Self> {
        Arc::new(Self {
            handled,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl AppEventListener for CountingListener {
    fn notify(&self, _event: &str, _payload: &EventPayload) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.handled
    }
}

#[derive(Default)]
pub struct CountingCache {
    evictions: AtomicUsize,
}

impl CountingCache {
    pub fn evictions(&self) -> usize {
        self.evictions.load(Ordering::SeqCst)
    }
}

impl BoundedCache for CountingCache {
    fn evict_all(&self) {
        self.evictions.fetch_add(1, Ordering::SeqCst);
    }
}

/// Global mutex to serialize environment variable access across all tests
static ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());

struct EnvState {
    home: Option<String>,
    surface_env: Option<String>,
    trim_threshold: Option<String>,
}

const TRIM_THRESHOLD_VAR: &str = "SURFACE_MEMORY__TRIM_THRESHOLD";

impl EnvState {
    fn capture() -> Self {
        Self {
            home: std::env::var("HOME").ok(),
            surface_env: std::env::var("SURFACE_ENV").ok(),
            trim_threshold: std::env::var(TRIM_THRESHOLD_VAR).ok(),
        }
    }

    fn restore(self) {
        restore_var("HOME", self.home);
        restore_var("SURFACE_ENV", self.surface_env);
        restore_var(TRIM_THRESHOLD_VAR, self.trim_threshold);
    }
}

fn restore_var(key: &str, value: Option<String>) {
    match value {
        Some(value) => std::env::set_var(key, value),
        None => std::env::remove_var(key),
    }
}

/// Run `f` with HOME pointed into `test_dir` and the SURFACE_* overrides
/// cleared. The original environment is restored afterwards.
pub fn with_isolated_env<F, R>(test_dir: &TempDir, f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let env_state = EnvState::capture();

    let test_home = test_dir.path().join("home");
    std::fs::create_dir_all(&test_home).unwrap();
    std::env::set_var("HOME", &test_home);
    std::env::remove_var("SURFACE_ENV");
    std::env::remove_var(TRIM_THRESHOLD_VAR);

    let result = f();

    env_state.restore();
    result
}
