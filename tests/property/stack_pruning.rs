//! `current()` never yields a finishing or reclaimed surface.

use proptest::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use surface_runtime::stack::ContextStack;
use surface_runtime::{Surface, SurfaceRef};

struct Probe {
    label: String,
    finishing: AtomicBool,
}

impl Surface for Probe {
    fn label(&self) -> &str {
        &self.label
    }

    fn is_finishing(&self) -> bool {
        self.finishing.load(Ordering::SeqCst)
    }

    fn finish(&self) {
        self.finishing.store(true, Ordering::SeqCst);
    }
}

#[derive(Debug, Clone)]
enum Op {
    Push,
    Remove(usize),
    MarkFinishing(usize),
    Drop(usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => Just(Op::Push),
        1 => any::<usize>().prop_map(Op::Remove),
        1 => any::<usize>().prop_map(Op::MarkFinishing),
        1 => any::<usize>().prop_map(Op::Drop),
    ]
}

proptest! {
    #[test]
    fn current_is_live_and_not_finishing(ops in prop::collection::vec(op_strategy(), 1..60)) {
        let stack = ContextStack::new();
        // Strong references standing in for the host's ownership.
        let mut owned: Vec<Arc<Probe>> = Vec::new();
        let mut next = 0usize;

        for op in ops {
            match op {
                Op::Push => {
                    let probe = Arc::new(Probe {
                        label: format!("s{}", next),
                        finishing: AtomicBool::new(false),
                    });
                    next += 1;
                    let surface: SurfaceRef = probe.clone();
                    stack.push(&surface);
                    owned.push(probe);
                }
                Op::Remove(i) if !owned.is_empty() => {
                    let surface: SurfaceRef = owned[i % owned.len()].clone();
                    stack.remove(&surface);
                }
                Op::MarkFinishing(i) if !owned.is_empty() => {
                    owned[i % owned.len()].finish();
                }
                Op::Drop(i) if !owned.is_empty() => {
                    let index = i % owned.len();
                    owned.remove(index);
                }
                _ => {}
            }

            if let Some(current) = stack.current() {
                prop_assert!(!current.is_finishing());
                let label = current.label().to_string();
                prop_assert!(owned.iter().any(|probe| probe.label == label));
            }
            for label in stack.labels() {
                prop_assert!(owned.iter().any(|probe| probe.label == label));
            }
        }
    }

    #[test]
    fn current_is_the_newest_eligible(finishing in prop::collection::vec(any::<bool>(), 1..20)) {
        let stack = ContextStack::new();
        let probes: Vec<Arc<Probe>> = finishing
            .iter()
            .enumerate()
            .map(|(i, done)| Arc::new(Probe {
                label: format!("s{}", i),
                finishing: AtomicBool::new(*done),
            }))
            .collect();
        for probe in &probes {
            let surface: SurfaceRef = probe.clone();
            stack.push(&surface);
        }

        let expected = finishing.iter().rposition(|done| !done).map(|i| format!("s{}", i));
        let actual = stack.current().map(|s| s.label().to_string());
        prop_assert_eq!(actual, expected);
    }
}
