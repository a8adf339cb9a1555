//! Surface Runtime: lifecycle and weak-reference registry core
//!
//! Tracks which native UI surface is current, gates work on the root surface
//! becoming ready, and keeps non-owning registries of script proxies, native
//! modules and listeners so that none of them outlive their owners.

pub mod app;
pub mod bridge;
pub mod cli;
pub mod config;
pub mod error;
pub mod fanout;
pub mod handle;
pub mod latch;
pub mod logging;
pub mod memory;
pub mod ownership;
pub mod properties;
pub mod registry;
pub mod root;
pub mod stack;
pub mod surface;
pub mod transition;


pub use app::{Application, ApplicationStatus};
pub use handle::WeakHandle;
pub use surface::{Surface, SurfaceKind, SurfaceRef};
