//! Forced restart: in-process reset of lifecycle state.

use super::test_utils::{surface, FakeSurface};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use surface_runtime::transition::TransitionListener;
use surface_runtime::{Application, SurfaceKind};

struct Journal(Mutex<Vec<bool>>);

impl TransitionListener for Journal {
    fn on_transition(&self, state: bool) {
        self.0.lock().push(state);
    }
}

#[test]
fn test_reset_clears_transition_state_but_not_root() {
    let app = Application::default();
    let root = FakeSurface::with_kind("root", SurfaceKind::Root);
    app.register_root(&surface(&root));

    let journal = Arc::new(Journal(Mutex::new(Vec::new())));
    app.transitions().add_listener(journal.clone());
    app.transitions().set_transitioning(true);
    assert_eq!(*journal.0.lock(), vec![true]);

    app.reset_for_forced_restart();

    assert!(!app.transitions().is_transitioning());
    assert_eq!(app.transitions().listener_count(), 0);
    assert_eq!(app.root_if_available().unwrap().label(), "root");
    assert!(app.status().root_ready);

    // Listeners from before the reset are gone.
    app.transitions().set_transitioning(false);
    assert_eq!(*journal.0.lock(), vec![true]);
}

#[test]
fn test_restart_request_reaches_root_and_reset_clears_flag() {
    let app = Application::default();
    let root = FakeSurface::with_kind("root", SurfaceKind::Root);
    let child = FakeSurface::new("child");
    app.register_root(&surface(&root));
    app.surface_created(&surface(&root));
    app.surface_created(&surface(&child));
    app.surface_focused(&surface(&child), &surface(&child));

    app.schedule_restart(Duration::from_millis(500));
    assert!(app.is_restart_pending());
    assert_eq!(root.restarts(), vec![Duration::from_millis(500)]);
    assert!(child.restarts().is_empty());

    app.reset_for_forced_restart();
    assert!(!app.is_restart_pending());
    assert!(app.current_surface().is_none());
    assert!(app.focused_surface().is_none());

    // The recreated root starts a fresh stack.
    app.surface_created(&surface(&root));
    assert_eq!(app.current_surface().unwrap().label(), "root");
}

#[test]
fn test_restart_without_root_only_sets_flag() {
    let app = Application::default();
    app.schedule_restart(Duration::ZERO);
    assert!(app.is_restart_pending());
}

#[test]
fn test_force_finish_root_flag() {
    let app = Application::default();
    assert!(!app.force_finish_root());
    app.set_force_finish_root(true);
    assert!(app.force_finish_root());
}
