//! Script bridge objects the core tracks without owning.

use crate::registry::{RegistrationPolicy, WeakRegistry};

/// A script-visible object with a stable id.
pub trait ScriptProxy: Send + Sync {
    fn proxy_id(&self) -> &str;
}

/// A native module instance exposed to scripts by name.
pub trait NativeModule: Send + Sync {
    fn module_name(&self) -> &str;
}

pub type ProxyRegistry = WeakRegistry<dyn ScriptProxy>;
pub type ModuleRegistry = WeakRegistry<dyn NativeModule>;

pub fn proxy_registry() -> ProxyRegistry {
    WeakRegistry::new("proxies", RegistrationPolicy::FirstWins)
}

pub fn module_registry() -> ModuleRegistry {
    WeakRegistry::new("modules", RegistrationPolicy::ReplaceWithWarning)
}
