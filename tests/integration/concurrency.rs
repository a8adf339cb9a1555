//! Cross-thread behavior: latch release, blocking current, racing claims.

use super::test_utils::{surface, CountingListener, FakeSurface};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc, Barrier};
use std::thread;
use std::time::Duration;
use surface_runtime::bridge::ScriptProxy;
use surface_runtime::fanout::{AppEventListener, EventPayload};
use surface_runtime::{Application, SurfaceKind};

struct Proxy(String);

impl ScriptProxy for Proxy {
    fn proxy_id(&self) -> &str {
        &self.0
    }
}

#[test]
fn test_all_waiters_observe_the_same_root() {
    let app = Arc::new(Application::default());
    let (tx, rx) = mpsc::channel();

    let waiters: Vec<_> = (0..8)
        .map(|_| {
            let app = app.clone();
            let tx = tx.clone();
            thread::spawn(move || {
                let root = app.await_root().expect("root alive");
                tx.send(root.label().to_string()).unwrap();
            })
        })
        .collect();

    thread::sleep(Duration::from_millis(20));
    let root = FakeSurface::with_kind("root", SurfaceKind::Root);
    app.register_root(&surface(&root));

    // Late arrivals return immediately.
    assert_eq!(app.await_root().unwrap().label(), "root");

    for _ in 0..8 {
        assert_eq!(rx.recv_timeout(Duration::from_secs(5)).unwrap(), "root");
    }
    for waiter in waiters {
        waiter.join().unwrap();
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_async_waiters_released_by_root() {
    let app = Arc::new(Application::default());
    let pending = {
        let app = app.clone();
        tokio::spawn(async move { app.await_root_async().await.map(|r| r.label().to_string()) })
    };

    tokio::time::sleep(Duration::from_millis(20)).await;
    let root = FakeSurface::with_kind("root", SurfaceKind::Root);
    app.register_root(&surface(&root));

    let label = tokio::time::timeout(Duration::from_secs(5), pending)
        .await
        .expect("waiter released")
        .unwrap();
    assert_eq!(label.as_deref(), Some("root"));
}

#[test]
fn test_blocking_current_wakes_on_focus() {
    let app = Arc::new(Application::default());
    let (tx, rx) = mpsc::channel();
    let waiter = {
        let app = app.clone();
        thread::spawn(move || {
            let current = app.current_surface_blocking();
            tx.send(current.label().to_string()).unwrap();
        })
    };

    assert!(rx.recv_timeout(Duration::from_millis(30)).is_err());
    let focused = FakeSurface::new("focused");
    app.surface_focused(&surface(&focused), &surface(&focused));

    assert_eq!(rx.recv_timeout(Duration::from_secs(5)).unwrap(), "focused");
    waiter.join().unwrap();
}

#[test]
fn test_racing_claims_have_one_winner() {
    let app = Arc::new(Application::default());
    let owner = FakeSurface::new("owner");
    app.surface_focused(&surface(&owner), &surface(&owner));

    let successors: Vec<_> = (0..16)
        .map(|i| FakeSurface::new(&format!("next-{}", i)))
        .collect();
    let barrier = Arc::new(Barrier::new(successors.len()));
    let winners = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = successors
        .iter()
        .map(|successor| {
            let app = app.clone();
            let owner = surface(&owner);
            let successor = surface(successor);
            let barrier = barrier.clone();
            let winners = winners.clone();
            thread::spawn(move || {
                barrier.wait();
                if app.surface_focused(&owner, &successor) {
                    winners.fetch_add(1, Ordering::SeqCst);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(winners.load(Ordering::SeqCst), 1);
    let current = app.focused_surface().unwrap();
    assert!(current.label().starts_with("next-"));
}

#[test]
fn test_concurrent_proxy_registration_first_wins() {
    let app = Arc::new(Application::default());
    let proxies: Vec<Arc<dyn ScriptProxy>> = (0..8)
        .map(|_| -> Arc<dyn ScriptProxy> { Arc::new(Proxy("shared".to_string())) })
        .collect();
    let barrier = Arc::new(Barrier::new(proxies.len()));

    let accepted: usize = proxies
        .iter()
        .map(|proxy| {
            let app = app.clone();
            let proxy = proxy.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                app.register_proxy(&proxy)
            })
        })
        .collect::<Vec<_>>()
        .into_iter()
        .map(|handle| handle.join().unwrap() as usize)
        .sum();

    assert_eq!(accepted, 1);
    let winner = app.proxy("shared").unwrap();
    assert!(proxies
        .iter()
        .any(|p| surface_runtime::handle::same_allocation(p, &winner)));
}

#[test]
fn test_fire_while_listeners_change() {
    let app = Arc::new(Application::default());
    let stable = CountingListener::new(true);
    let stable_dyn: Arc<dyn AppEventListener> = stable.clone();
    app.add_app_event_listener(&stable_dyn);

    let churn = {
        let app = app.clone();
        thread::spawn(move || {
            for _ in 0..200 {
                let transient: Arc<dyn AppEventListener> = CountingListener::new(false);
                app.add_app_event_listener(&transient);
                app.remove_app_event_listener(&transient);
            }
        })
    };

    for _ in 0..200 {
        assert!(app.fire_app_event("tick", &EventPayload::new()));
    }
    churn.join().unwrap();
    assert_eq!(stable.calls(), 200);
}
