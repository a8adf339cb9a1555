//! Application context
//!
//! The single, explicitly constructed owner of every lifecycle component.
//! Hosts create one per process and share it by `Arc`; tests build as many
//! isolated instances as they need.

use crate::bridge::{self, ModuleRegistry, NativeModule, ProxyRegistry, ScriptProxy};
use crate::config::RuntimeConfig;
use crate::fanout::{AppEventListener, EventFanout, EventPayload};
use crate::latch::Beacon;
use crate::memory::{BoundedCache, MemoryPressureController};
use crate::ownership::CurrentOwnership;
use crate::properties::{BuildInfo, DeployType, FeatureFlags, MapPropertyStore, PropertyStore};
use crate::root::RootGate;
use crate::stack::ContextStack;
use crate::surface::{SurfaceKind, SurfaceRef};
use crate::transition::TransitionSignal;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, ThreadId};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

pub struct Application {
    stack: ContextStack,
    root: RootGate,
    ownership: CurrentOwnership,
    available: Beacon,
    proxies: ProxyRegistry,
    modules: ModuleRegistry,
    app_events: EventFanout,
    transitions: TransitionSignal,
    memory: MemoryPressureController,
    properties: Arc<dyn PropertyStore>,
    deploy_type: DeployType,
    flags: FeatureFlags,
    build: BuildInfo,
    restart_pending: AtomicBool,
    force_finish_root: AtomicBool,
    main_thread: ThreadId,
}

impl Application {
    /// Build an application from configuration. The calling thread is
    /// recorded as the UI thread.
    pub fn new(config: &RuntimeConfig) -> Self {
        let properties: Arc<dyn PropertyStore> = Arc::new(config.properties.clone());
        let flags = FeatureFlags::resolve(properties.as_ref(), config.deploy_type.clone());
        info!(build = %config.build, deploy_type = flags.deploy_type.as_str(), "Runtime created");

        Self {
            stack: ContextStack::new(),
            root: RootGate::new(),
            ownership: CurrentOwnership::new(),
            available: Beacon::new(),
            proxies: bridge::proxy_registry(),
            modules: bridge::module_registry(),
            app_events: EventFanout::new(),
            transitions: TransitionSignal::new(),
            memory: MemoryPressureController::new(&config.memory),
            properties,
            deploy_type: config.deploy_type.clone(),
            flags,
            build: config.build.clone(),
            restart_pending: AtomicBool::new(false),
            force_finish_root: AtomicBool::new(false),
            main_thread: thread::current().id(),
        }
    }

    /// Replace the property store and re-resolve feature flags.
    pub fn with_properties(mut self, properties: Arc<dyn PropertyStore>) -> Self {
        self.flags = FeatureFlags::resolve(properties.as_ref(), self.deploy_type.clone());
        self.properties = properties;
        self
    }

    /// Attach the shared cache evicted under memory pressure.
    pub fn with_cache(mut self, cache: Arc<dyn BoundedCache>) -> Self {
        self.memory = self.memory.with_cache(cache);
        self
    }

    /// Record `thread` as the UI thread instead of the constructing thread.
    pub fn with_main_thread(mut self, thread: ThreadId) -> Self {
        self.main_thread = thread;
        self
    }

    // Surface lifecycle

    /// The host created `surface`.
    pub fn surface_created(&self, surface: &SurfaceRef) {
        self.stack.push(surface);
        self.available.bump();
    }

    /// `caller` gained or handed off focus to `successor`. Returns whether
    /// the handoff was accepted.
    pub fn surface_focused(&self, caller: &SurfaceRef, successor: &SurfaceRef) -> bool {
        let accepted = self.ownership.claim(caller, successor);
        if accepted {
            self.available.bump();
        }
        accepted
    }

    /// The host destroyed `surface`.
    pub fn surface_destroyed(&self, surface: &SurfaceRef) {
        self.stack.remove(surface);
    }

    /// Register the root surface and release everyone waiting for it.
    pub fn register_root(&self, surface: &SurfaceRef) -> bool {
        let released = self.root.set_root(surface);
        self.available.bump();
        released
    }

    /// Finish every surface on the stack, newest first.
    pub fn terminate_surfaces(&self) {
        info!(depth = self.stack.len(), "Terminating all surfaces");
        self.stack.terminate_all();
    }

    pub fn has_launch_surface(&self) -> bool {
        self.stack.contains_kind(SurfaceKind::Launch)
    }

    // Current / root resolution

    /// Newest live, non-finishing surface on the stack.
    pub fn current_surface(&self) -> Option<SurfaceRef> {
        self.stack.current()
    }

    /// Holder of current status from the ownership handoff.
    pub fn focused_surface(&self) -> Option<SurfaceRef> {
        self.ownership.current()
    }

    /// Block until a live surface is available and return it.
    ///
    /// Prefers the stack-derived current surface and falls back to the
    /// ownership holder. Waits on the availability beacon, never spins.
    pub fn current_surface_blocking(&self) -> SurfaceRef {
        loop {
            let seen = self.available.generation();
            if let Some(surface) = self.resolve_current() {
                return surface;
            }
            debug!("No live surface yet, waiting");
            self.available.wait_past(seen);
        }
    }

    /// [`current_surface_blocking`](Self::current_surface_blocking) bounded
    /// by `timeout`.
    pub fn current_surface_blocking_timeout(&self, timeout: Duration) -> Option<SurfaceRef> {
        let deadline = Instant::now() + timeout;
        loop {
            let seen = self.available.generation();
            if let Some(surface) = self.resolve_current() {
                return Some(surface);
            }
            self.available.wait_past_until(seen, deadline)?;
        }
    }

    fn resolve_current(&self) -> Option<SurfaceRef> {
        self.stack.current().or_else(|| {
            self.ownership
                .current()
                .filter(|surface| !surface.is_finishing())
        })
    }

    pub fn root_if_available(&self) -> Option<SurfaceRef> {
        self.root.root_if_available()
    }

    pub fn is_root_available(&self) -> bool {
        self.root.is_root_available()
    }

    pub fn await_root(&self) -> Option<SurfaceRef> {
        self.root.await_root()
    }

    pub fn await_root_timeout(&self, timeout: Duration) -> Option<SurfaceRef> {
        self.root.await_root_timeout(timeout)
    }

    pub async fn await_root_async(&self) -> Option<SurfaceRef> {
        self.root.await_root_async().await
    }

    /// Live root if any, otherwise the ownership holder.
    pub fn root_or_current(&self) -> Option<SurfaceRef> {
        let found = self
            .root
            .root_if_available()
            .or_else(|| self.ownership.current());
        if found.is_none() {
            error!("No valid root or current surface found");
        }
        found
    }

    // Script bridge

    pub fn register_proxy(&self, proxy: &Arc<dyn ScriptProxy>) -> bool {
        self.proxies.register(proxy.proxy_id(), proxy)
    }

    pub fn unregister_proxy(&self, proxy_id: &str) -> Option<Arc<dyn ScriptProxy>> {
        self.proxies.unregister(proxy_id)
    }

    pub fn proxy(&self, proxy_id: &str) -> Option<Arc<dyn ScriptProxy>> {
        self.proxies.get(proxy_id)
    }

    pub fn register_module(&self, module: &Arc<dyn NativeModule>) {
        self.modules.register(module.module_name(), module);
    }

    pub fn module(&self, name: &str) -> Option<Arc<dyn NativeModule>> {
        self.modules.get(name)
    }

    pub fn add_app_event_listener(&self, listener: &Arc<dyn AppEventListener>) -> bool {
        self.app_events.add_listener(listener)
    }

    pub fn remove_app_event_listener(&self, listener: &Arc<dyn AppEventListener>) -> bool {
        self.app_events.remove_listener(listener)
    }

    /// Broadcast an application event. Returns whether any listener handled
    /// it.
    pub fn fire_app_event(&self, event: &str, payload: &EventPayload) -> bool {
        self.app_events.fire(event, payload)
    }

    // Transitions and memory

    pub fn transitions(&self) -> &TransitionSignal {
        &self.transitions
    }

    pub fn on_low_memory(&self) -> bool {
        self.memory.on_low_memory()
    }

    pub fn on_trim(&self, level: i32) -> bool {
        self.memory.on_trim(level)
    }

    // Restart

    /// Mark a restart as pending and ask the root surface to recreate itself.
    pub fn schedule_restart(&self, delay: Duration) {
        warn!(?delay, "Scheduling application restart");
        self.restart_pending.store(true, Ordering::SeqCst);
        if let Some(root) = self.root.root_if_available() {
            root.request_restart(delay);
        }
    }

    pub fn is_restart_pending(&self) -> bool {
        self.restart_pending.load(Ordering::SeqCst)
    }

    /// Reset the state a real process restart would have reset.
    ///
    /// Forced restarts recreate the root surface inside the same process.
    /// The current-surface pointer, transition flag and listeners, the
    /// surface stack and the restart flag go back to their initial values.
    /// The root gate and its latch are left as they are.
    pub fn reset_for_forced_restart(&self) {
        info!("Resetting lifecycle state for forced restart");
        self.restart_pending.store(false, Ordering::SeqCst);
        self.ownership.clear();
        self.transitions.reset();
        self.stack.clear();
    }

    pub fn set_force_finish_root(&self, forced: bool) {
        self.force_finish_root.store(forced, Ordering::SeqCst);
    }

    pub fn force_finish_root(&self) -> bool {
        self.force_finish_root.load(Ordering::SeqCst)
    }

    // Environment

    pub fn is_ui_thread(&self) -> bool {
        thread::current().id() == self.main_thread
    }

    pub fn flags(&self) -> &FeatureFlags {
        &self.flags
    }

    pub fn build_info(&self) -> &BuildInfo {
        &self.build
    }

    pub fn properties(&self) -> &dyn PropertyStore {
        self.properties.as_ref()
    }

    pub fn stack(&self) -> &ContextStack {
        &self.stack
    }

    /// Point-in-time view for diagnostics.
    pub fn status(&self) -> ApplicationStatus {
        let label = |surface: Option<SurfaceRef>| surface.map(|s| s.label().to_string());
        ApplicationStatus {
            root: label(self.root.root_if_available()),
            root_ready: self.root.is_ready(),
            current: label(self.stack.current()),
            focused: label(self.ownership.current()),
            stack: self.stack.labels(),
            transitioning: self.transitions.is_transitioning(),
            transition_listeners: self.transitions.listener_count(),
            restart_pending: self.is_restart_pending(),
            proxies: self.proxies.live_ids(),
            modules: self.modules.live_ids(),
            app_event_listeners: self.app_events.live_count(),
        }
    }
}

impl Default for Application {
    fn default() -> Self {
        Self::new(&RuntimeConfig::default())
    }
}

impl From<MapPropertyStore> for Application {
    fn from(properties: MapPropertyStore) -> Self {
        Application::default().with_properties(Arc::new(properties))
    }
}

/// Serializable snapshot of the lifecycle state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplicationStatus {
    pub root: Option<String>,
    pub root_ready: bool,
    pub current: Option<String>,
    pub focused: Option<String>,
    pub stack: Vec<String>,
    pub transitioning: bool,
    pub transition_listeners: usize,
    pub restart_pending: bool,
    pub proxies: Vec<String>,
    pub modules: Vec<String>,
    pub app_event_listeners: usize,
}
