//! Scenario runner: replays a scripted lifecycle against in-memory surfaces.
//!
//! A scenario file is a TOML document with a `[[steps]]` array. Each step
//! names an `action` and the surfaces it applies to:
//!
//! ```toml
//! [[steps]]
//! action = "create"
//! surface = "main"
//! kind = "root"
//!
//! [[steps]]
//! action = "root"
//! surface = "main"
//! ```

use crate::app::{Application, ApplicationStatus};
use crate::error::RuntimeError;
use crate::fanout::{AppEventListener, EventPayload};
use crate::memory::BoundedCache;
use crate::surface::{Surface, SurfaceKind, SurfaceRef};
use crate::transition::TransitionListener;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Scenario {
    pub fn from_toml(content: &str) -> Result<Self, RuntimeError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self, RuntimeError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }
}

fn default_kind() -> SurfaceKind {
    SurfaceKind::Standard
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    Create {
        surface: String,
        #[serde(default = "default_kind")]
        kind: SurfaceKind,
    },
    /// `surface` hands current status to `successor` (itself when omitted).
    Focus {
        surface: String,
        successor: Option<String>,
    },
    /// The host starts tearing the surface down.
    Finish { surface: String },
    /// The host destroyed the surface and released its last reference.
    Destroy { surface: String },
    Root { surface: String },
    Trim { level: i32 },
    LowMemory,
    Fire {
        event: String,
        #[serde(default)]
        payload: EventPayload,
    },
    Transition { state: bool },
    Restart {
        #[serde(default)]
        delay_ms: u64,
    },
    /// Forced restart: reset lifecycle state in place.
    Reset,
    Terminate,
}

impl Step {
    pub fn action(&self) -> &'static str {
        match self {
            Step::Create { .. } => "create",
            Step::Focus { .. } => "focus",
            Step::Finish { .. } => "finish",
            Step::Destroy { .. } => "destroy",
            Step::Root { .. } => "root",
            Step::Trim { .. } => "trim",
            Step::LowMemory => "low_memory",
            Step::Fire { .. } => "fire",
            Step::Transition { .. } => "transition",
            Step::Restart { .. } => "restart",
            Step::Reset => "reset",
            Step::Terminate => "terminate",
        }
    }
}

/// Surface driven by the scenario instead of a real toolkit.
struct ScriptedSurface {
    label: String,
    kind: SurfaceKind,
    finishing: AtomicBool,
    restart_requests: AtomicUsize,
}

impl ScriptedSurface {
    fn new(label: &str, kind: SurfaceKind) -> Self {
        Self {
            label: label.to_string(),
            kind,
            finishing: AtomicBool::new(false),
            restart_requests: AtomicUsize::new(0),
        }
    }
}

impl Surface for ScriptedSurface {
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
        self.finishing.store(true, Ordering::SeqCst);
    }

    fn request_restart(&self, _delay: Duration) {
        self.restart_requests.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Default)]
struct EventJournal {
    events: Mutex<Vec<String>>,
}

impl AppEventListener for EventJournal {
    fn notify(&self, event: &str, _payload: &EventPayload) -> bool {
        self.events.lock().push(event.to_string());
        true
    }
}

#[derive(Default)]
struct TransitionJournal {
    states: Mutex<Vec<bool>>,
}

impl TransitionListener for TransitionJournal {
    fn on_transition(&self, state: bool) {
        self.states.lock().push(state);
    }
}

#[derive(Default)]
struct EvictionCounter {
    evictions: AtomicUsize,
}

impl BoundedCache for EvictionCounter {
    fn evict_all(&self) {
        self.evictions.fetch_add(1, Ordering::SeqCst);
    }
}

/// What one step did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepOutcome {
    pub index: usize,
    pub action: String,
    pub detail: String,
}

/// Final state after a scenario run.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub generated_at: String,
    pub steps: Vec<StepOutcome>,
    pub status: ApplicationStatus,
    pub events: Vec<String>,
    pub transitions: Vec<bool>,
    pub evictions: usize,
}

pub struct ScenarioRunner {
    app: Application,
    surfaces: HashMap<String, Arc<ScriptedSurface>>,
    events: Arc<EventJournal>,
    // Keeps the weakly held listener alive for the whole run.
    _event_listener: Arc<dyn AppEventListener>,
    transitions: Arc<TransitionJournal>,
    cache: Arc<EvictionCounter>,
    outcomes: Vec<StepOutcome>,
}

impl ScenarioRunner {
    pub fn new(app: Application) -> Self {
        let cache = Arc::new(EvictionCounter::default());
        let app = app.with_cache(cache.clone());
        let events = Arc::new(EventJournal::default());
        let event_listener: Arc<dyn AppEventListener> = events.clone();
        app.add_app_event_listener(&event_listener);
        let transitions = Arc::new(TransitionJournal::default());
        app.transitions().add_listener(transitions.clone());

        Self {
            app,
            surfaces: HashMap::new(),
            events,
            _event_listener: event_listener,
            transitions,
            cache,
            outcomes: Vec::new(),
        }
    }

    pub fn app(&self) -> &Application {
        &self.app
    }

    pub fn run(mut self, scenario: &Scenario) -> Result<SimulationReport, RuntimeError> {
        info!(steps = scenario.steps.len(), "Running scenario");
        for (index, step) in scenario.steps.iter().enumerate() {
            let detail = self.apply(step)?;
            debug!(index, action = step.action(), %detail, "Scenario step applied");
            self.outcomes.push(StepOutcome {
                index,
                action: step.action().to_string(),
                detail,
            });
        }
        Ok(self.finish_report())
    }

    fn surface(&self, label: &str) -> Result<SurfaceRef, RuntimeError> {
        self.surfaces
            .get(label)
            .map(|surface| -> SurfaceRef { surface.clone() })
            .ok_or_else(|| RuntimeError::UnknownSurface(label.to_string()))
    }

    fn apply(&mut self, step: &Step) -> Result<String, RuntimeError> {
        let detail = match step {
            Step::Create { surface, kind } => {
                if self.surfaces.contains_key(surface) {
                    return Err(RuntimeError::ScenarioError(format!(
                        "Surface '{}' created twice",
                        surface
                    )));
                }
                let created = Arc::new(ScriptedSurface::new(surface, *kind));
                self.surfaces.insert(surface.clone(), created.clone());
                let created: SurfaceRef = created;
                self.app.surface_created(&created);
                format!("pushed {} ({:?})", surface, kind)
            }
            Step::Focus { surface, successor } => {
                let caller = self.surface(surface)?;
                let successor = match successor {
                    Some(label) => self.surface(label)?,
                    None => caller.clone(),
                };
                if self.app.surface_focused(&caller, &successor) {
                    format!("{} is current", successor.label())
                } else {
                    format!("claim by {} rejected", surface)
                }
            }
            Step::Finish { surface } => {
                self.surface(surface)?.finish();
                format!("{} finishing", surface)
            }
            Step::Destroy { surface } => {
                let destroyed = self.surface(surface)?;
                self.surfaces.remove(surface);
                self.app.surface_destroyed(&destroyed);
                format!("{} destroyed", surface)
            }
            Step::Root { surface } => {
                let root = self.surface(surface)?;
                if self.app.register_root(&root) {
                    format!("{} registered as root, waiters released", surface)
                } else {
                    format!("{} registered as root", surface)
                }
            }
            Step::Trim { level } => {
                if self.app.on_trim(*level) {
                    format!("level {} evicted cache", level)
                } else {
                    format!("level {} ignored", level)
                }
            }
            Step::LowMemory => {
                self.app.on_low_memory();
                "cache evicted".to_string()
            }
            Step::Fire { event, payload } => {
                let handled = self.app.fire_app_event(event, payload);
                format!("{} handled={}", event, handled)
            }
            Step::Transition { state } => {
                self.app.transitions().set_transitioning(*state);
                format!("transitioning={}", state)
            }
            Step::Restart { delay_ms } => {
                self.app.schedule_restart(Duration::from_millis(*delay_ms));
                let requests: usize = self
                    .surfaces
                    .values()
                    .map(|surface| surface.restart_requests.load(Ordering::SeqCst))
                    .sum();
                format!(
                    "restart scheduled in {}ms, {} restart requests",
                    delay_ms, requests
                )
            }
            Step::Reset => {
                self.app.reset_for_forced_restart();
                "lifecycle state reset".to_string()
            }
            Step::Terminate => {
                let depth = self.app.stack().len();
                self.app.terminate_surfaces();
                format!("{} surfaces finished", depth)
            }
        };
        Ok(detail)
    }

    fn finish_report(self) -> SimulationReport {
        let status = self.app.status();
        let events = self.events.events.lock().clone();
        let transitions = self.transitions.states.lock().clone();
        SimulationReport {
            generated_at: chrono::Utc::now().to_rfc3339(),
            steps: self.outcomes,
            status,
            events,
            transitions,
            evictions: self.cache.evictions.load(Ordering::SeqCst),
        }
    }
}
