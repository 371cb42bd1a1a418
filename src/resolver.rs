//! Component specialization.
//!
//! The host's registration table names a default component for each view
//! model. The resolver layers platform or feature specializations on top:
//! a specialization registered for a default component's key shadows the
//! default at resolution time, and its disposer restores the default when
//! it goes away. Specializations stack LIFO like every other registry.
//!
//! # Example
//!
//! ```ignore
//! use rigging::resolver;
//!
//! // TerminalButton resolves wherever Button would.
//! let handle = resolver::specialize::<Button, TerminalButton>();
//! ```

use std::rc::Rc;

use tracing::debug;

use crate::component::{Component, ComponentHandle};
use crate::dispose::Disposer;
use crate::key::TypeKey;
use crate::registry::Registry;

/// A registry of component specializations keyed by the default
/// component's type.
pub struct ComponentResolver {
    overrides: Registry<TypeKey, ComponentHandle>,
}

impl Default for ComponentResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ComponentResolver {
    pub fn new() -> Self {
        Self {
            overrides: Registry::new(),
        }
    }

    /// Register `S` as the specialization of `D`.
    pub fn register<D, S>(&self) -> Disposer
    where
        D: Component,
        S: Component + Default,
    {
        self.register_factory(TypeKey::of::<D>(), || Rc::new(S::default()))
    }

    /// Register a specialization factory under an explicit key.
    pub fn register_factory(
        &self,
        key: TypeKey,
        factory: impl Fn() -> ComponentHandle + 'static,
    ) -> Disposer {
        debug!(component = key.name(), "specialization registered");
        self.overrides.register(key, factory)
    }

    /// Build the component for `C`, honoring any active specialization.
    pub fn get<C: Component + Default>(&self) -> ComponentHandle {
        self.resolve_with(TypeKey::of::<C>(), || Rc::new(C::default()))
    }

    /// Build the component for `key`, falling back to `fallback` when no
    /// specialization is active.
    pub fn resolve_with(
        &self,
        key: TypeKey,
        fallback: impl FnOnce() -> ComponentHandle,
    ) -> ComponentHandle {
        match self.overrides.resolve(&key) {
            Some(component) => component,
            None => fallback(),
        }
    }
}

thread_local! {
    static CURRENT: ComponentResolver = ComponentResolver::new();
}

/// Register `S` as the specialization of `D` on the thread resolver.
pub fn specialize<D, S>() -> Disposer
where
    D: Component,
    S: Component + Default,
{
    CURRENT.with(|resolver| resolver.register::<D, S>())
}

/// Register a specialization factory on the thread resolver.
pub fn specialize_factory(
    key: TypeKey,
    factory: impl Fn() -> ComponentHandle + 'static,
) -> Disposer {
    CURRENT.with(|resolver| resolver.register_factory(key, factory))
}

/// Resolve `key` on the thread resolver.
pub fn resolve_with(
    key: TypeKey,
    fallback: impl FnOnce() -> ComponentHandle,
) -> ComponentHandle {
    CURRENT.with(|resolver| resolver.resolve_with(key, fallback))
}

// =============================================================================
// Tests
// =============================================================================
