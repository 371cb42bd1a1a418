//! A navigation-stack router built on the engine's own primitives.
//!
//! [`RouterViewModel`] keeps an ordered stack of view models; the most
//! recent entry is exposed as the computed `currentViewModel` property.
//! The [`Router`] component watches that property and re-renders its
//! subtree through the published host whenever navigation changes it,
//! which makes it both a usable router and a proving ground for
//! rendered-slot replacement.

use std::any::Any;

use spark_signals::{Derived, Signal, derived, effect, signal};
use tracing::{debug, warn};

use crate::component::{Component, ComponentCore};
use crate::dispose::{Disposer, DisposerBag};
use crate::host::{self, RenderTarget, ViewHost};
use crate::key::TypeKey;
use crate::value::{Value, rc_eq};
use crate::viewmodel::{Property, ViewModel, VmHandle};

/// The router's navigation stack, most recent entry first.
#[derive(Clone, Default)]
pub struct NavStack(pub Vec<VmHandle>);

impl PartialEq for NavStack {
    fn eq(&self, other: &Self) -> bool {
        self.0.len() == other.0.len()
            && self.0.iter().zip(other.0.iter()).all(|(a, b)| rc_eq(a, b))
    }
}

// =============================================================================
// RouterViewModel
// =============================================================================

pub struct RouterViewModel {
    stack: Signal<NavStack>,
    current: Derived<Value>,
}

impl Default for RouterViewModel {
    fn default() -> Self {
        Self::new()
    }
}

impl RouterViewModel {
    pub fn new() -> Self {
        let stack = signal(NavStack::default());
        let stack_clone = stack.clone();
        let current = derived(move || {
            stack_clone
                .get()
                .0
                .first()
                .map(|head| Value::ViewModel(head.clone()))
                .unwrap_or(Value::Null)
        });
        Self { stack, current }
    }

    /// Push `view_model` as the new current entry.
    pub fn navigate(&self, view_model: VmHandle) {
        debug!(to = view_model.type_key().name(), "router navigate");
        let mut stack = self.stack.get().0;
        stack.insert(0, view_model);
        self.stack.set(NavStack(stack));
    }

    /// Pop the current entry, returning to the previous one. A no-op on
    /// an empty stack.
    pub fn navigate_back(&self) {
        let mut stack = self.stack.get().0;
        if stack.is_empty() {
            return;
        }
        stack.remove(0);
        debug!(depth = stack.len(), "router navigate back");
        self.stack.set(NavStack(stack));
    }

    /// Replace the whole stack with `view_model` as the only entry.
    pub fn navigate_and_reset(&self, view_model: VmHandle) {
        debug!(to = view_model.type_key().name(), "router reset");
        self.stack.set(NavStack(vec![view_model]));
    }

    /// The current entry, or `None` when the stack is empty.
    pub fn current(&self) -> Option<VmHandle> {
        self.current.get().as_view_model()
    }

    pub fn stack_len(&self) -> usize {
        self.stack.get().0.len()
    }
}

impl ViewModel for RouterViewModel {
    fn type_key(&self) -> TypeKey {
        TypeKey::of::<RouterViewModel>()
    }

    fn property(&self, key: &str) -> Option<Property> {
        match key {
            "currentViewModel" => Some(Property::Computed(self.current.clone())),
            _ => None,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// =============================================================================
// Router
// =============================================================================

/// The component half of the router pair.
///
/// On activation it starts an effect over `currentViewModel`: every
/// navigation renders the new entry through the published host and
/// places it in the rendered slot, and the host's rendered watcher
/// deactivates the entry it replaced.
#[derive(Default)]
pub struct Router {
    core: ComponentCore,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Component for Router {
    fn type_key(&self) -> TypeKey {
        TypeKey::of::<Router>()
    }

    fn core(&self) -> &ComponentCore {
        &self.core
    }

    fn on_activated(&self, disposers: &mut DisposerBag) {
        if let Some(view_model) = self.core.view_model() {
            if let Some(current) = view_model.property("currentViewModel") {
                let rendered = self.core.rendered_signal();
                let stop = effect(move || match current.get() {
                    Value::ViewModel(next) => match host::render(
                        RenderTarget::ViewModel(next),
                        None,
                        Vec::new(),
                    ) {
                        Ok(subtree) => {
                            rendered.set(crate::component::RenderedSlot(Some(subtree)));
                        }
                        Err(error) => {
                            warn!(%error, "router could not render current entry");
                        }
                    },
                    _ => {
                        rendered.set(crate::component::RenderedSlot(None));
                    }
                });
                disposers.push(Disposer::new(stop));
            }
        }
        self.core.notify_activated(disposers);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Register the router pair with `host`.
pub fn register_router(view_host: &ViewHost) -> Disposer {
    view_host.register::<RouterViewModel, Router>()
}

// =============================================================================
// Tests
// =============================================================================
