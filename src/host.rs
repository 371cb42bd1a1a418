//! The view host - registration, rendering and cascading lifecycle.
//!
//! A [`ViewHost`] pairs view-model types with default component types,
//! renders targets into activated components, and tracks every live
//! component in an activation table. Rendering assigns the view model,
//! replaces the child sequence, wraps the component in a
//! [`BoundComponent`] when bindings were declared, captures the rendered
//! subtree, and activates the result. Deactivation cascades leaves-first:
//! component children, then the rendered subtree, then the component's
//! own disposers in reverse registration order.
//!
//! The booted host publishes itself through the locator under
//! [`VIEW_HOST`], so components can call the module-level [`render`] from
//! inside their own `render` implementations without carrying a handle.
//!
//! # Example
//!
//! ```ignore
//! use rigging::host::{RenderTarget, ViewHost};
//!
//! let host = ViewHost::new();
//! host.register::<AppViewModel, AppComponent>();
//!
//! let mut booted = host.boot(RenderTarget::of::<AppViewModel>())?;
//! // ... run the app through booted.root ...
//! booted.teardown.dispose();
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use spark_signals::effect;
use tracing::{debug, trace, warn};

use crate::binding::Binding;
use crate::component::{BoundComponent, Component, ComponentChild, ComponentHandle};
use crate::dispose::{Disposer, DisposerBag};
use crate::error::EngineError;
use crate::key::{ServiceKey, TypeKey};
use crate::locator::{self, Service};
use crate::platform;
use crate::registry::Registry;
use crate::resolver;
use crate::value::{rc_addr, rc_eq};
use crate::viewmodel::{ViewModel, VmHandle};

/// Locator key the booted host publishes itself under.
pub const VIEW_HOST: ServiceKey = ServiceKey("rigging.view-host");

// =============================================================================
// RenderTarget
// =============================================================================

/// What to render: a registered type, a live view model, or an already
/// built component.
#[derive(Clone)]
pub enum RenderTarget {
    /// Resolve the pair registered for this view-model type.
    Type(TypeKey),
    /// Display this view-model instance through its registered component.
    ViewModel(VmHandle),
    /// Activate this component instance as-is.
    Component(ComponentHandle),
}

impl RenderTarget {
    /// Target the pair registered for view-model type `Vm`.
    pub fn of<Vm: ViewModel>() -> Self {
        RenderTarget::Type(TypeKey::of::<Vm>())
    }
}

impl From<TypeKey> for RenderTarget {
    fn from(key: TypeKey) -> Self {
        RenderTarget::Type(key)
    }
}

impl From<VmHandle> for RenderTarget {
    fn from(handle: VmHandle) -> Self {
        RenderTarget::ViewModel(handle)
    }
}

impl From<ComponentHandle> for RenderTarget {
    fn from(handle: ComponentHandle) -> Self {
        RenderTarget::Component(handle)
    }
}

// =============================================================================
// ViewHost
// =============================================================================

#[derive(Clone)]
struct PairEntry {
    component_key: TypeKey,
    make_view_model: Rc<dyn Fn() -> VmHandle>,
    make_component: Rc<dyn Fn() -> ComponentHandle>,
}

struct ActivationRecord {
    component: ComponentHandle,
    rendered: Option<ComponentHandle>,
    disposers: DisposerBag,
}

struct HostState {
    pairs: Registry<TypeKey, PairEntry>,
    // Activation records keyed by component allocation address.
    active: RefCell<HashMap<usize, ActivationRecord>>,
    // Live components in activation order.
    live: RefCell<Vec<ComponentHandle>>,
}

/// The activation manager. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct ViewHost {
    state: Rc<HostState>,
}

impl Default for ViewHost {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewHost {
    pub fn new() -> Self {
        Self {
            state: Rc::new(HostState {
                pairs: Registry::new(),
                active: RefCell::new(HashMap::new()),
                live: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Register `C` as the default component for `Vm`.
    ///
    /// The pair is indexed under both types, so a target naming either
    /// one resolves to it. Later registrations for the same types shadow
    /// earlier ones; the returned disposer removes this registration.
    pub fn register<Vm, C>(&self) -> Disposer
    where
        Vm: ViewModel + Default,
        C: Component + Default,
    {
        let entry = PairEntry {
            component_key: TypeKey::of::<C>(),
            make_view_model: Rc::new(|| Rc::new(Vm::default()) as VmHandle),
            make_component: Rc::new(|| Rc::new(C::default()) as ComponentHandle),
        };
        debug!(
            view_model = TypeKey::of::<Vm>().name(),
            component = entry.component_key.name(),
            "pair registered"
        );
        let by_vm = {
            let entry = entry.clone();
            self.state.pairs.register(TypeKey::of::<Vm>(), move || entry.clone())
        };
        let by_component = self
            .state
            .pairs
            .register(TypeKey::of::<C>(), move || entry.clone());
        Disposer::join(by_vm, by_component)
    }

    fn resolve_target(
        &self,
        target: RenderTarget,
    ) -> Result<(ComponentHandle, VmHandle), EngineError> {
        match target {
            RenderTarget::Type(key) => {
                let pair = self
                    .state
                    .pairs
                    .resolve(&key)
                    .ok_or(EngineError::Resolution { type_name: key.name() })?;
                let component = {
                    let make = pair.make_component.clone();
                    resolver::resolve_with(pair.component_key, move || make())
                };
                let view_model = component
                    .core()
                    .view_model()
                    .unwrap_or_else(|| (pair.make_view_model)());
                Ok((component, view_model))
            }
            RenderTarget::ViewModel(view_model) => {
                let key = view_model.type_key();
                let pair = self
                    .state
                    .pairs
                    .resolve(&key)
                    .ok_or(EngineError::Resolution { type_name: key.name() })?;
                let component = {
                    let make = pair.make_component.clone();
                    resolver::resolve_with(pair.component_key, move || make())
                };
                Ok((component, view_model))
            }
            RenderTarget::Component(component) => {
                let view_model = match component.core().view_model() {
                    Some(view_model) => view_model,
                    None => {
                        let key = component.type_key();
                        let pair = self
                            .state
                            .pairs
                            .resolve(&key)
                            .ok_or(EngineError::Resolution { type_name: key.name() })?;
                        (pair.make_view_model)()
                    }
                };
                Ok((component, view_model))
            }
        }
    }

    /// Render `target` into an activated component.
    ///
    /// Resolution builds the component (honoring specializations),
    /// assigns the view model if the component has none, replaces the
    /// child sequence, wraps in a [`BoundComponent`] when `bindings` is
    /// given, captures the component's rendered subtree, and activates
    /// the result.
    pub fn render(
        &self,
        target: impl Into<RenderTarget>,
        bindings: Option<Vec<Binding>>,
        children: Vec<ComponentChild>,
    ) -> Result<ComponentHandle, EngineError> {
        let (component, view_model) = self.resolve_target(target.into())?;
        trace!(component = component.type_key().name(), "rendering");

        if let Some(info) = platform::current() {
            if !component.supports_platform(&info) {
                warn!(
                    component = component.type_key().name(),
                    "component does not support the published platform"
                );
            }
        }

        if component.core().view_model().is_none() {
            component.core().set_view_model(view_model);
        }
        component.core().set_children(children);

        let activated: ComponentHandle = match bindings {
            Some(bindings) => Rc::new(BoundComponent::new(component, bindings)),
            None => component,
        };

        if let Some(subtree) = activated.render() {
            activated.core().set_rendered(Some(subtree));
        }

        self.activate(activated.clone());
        Ok(activated)
    }

    fn activate(&self, component: ComponentHandle) {
        let id = rc_addr(&component);

        // Re-activating a live component releases its previous disposers.
        let stale = self.state.active.borrow_mut().remove(&id);
        if let Some(mut record) = stale {
            record.disposers.dispose_all();
        }

        let mut disposers = DisposerBag::new();
        component.on_activated(&mut disposers);

        // Watch the child sequence: children that drop out of the list
        // are deactivated.
        {
            let children = component.core().children();
            let weak = Rc::downgrade(&self.state);
            let mut previous: Vec<ComponentHandle> = Vec::new();
            let stop = effect(move || {
                let current: Vec<ComponentHandle> = children
                    .get()
                    .0
                    .iter()
                    .filter_map(|child| child.as_component().cloned())
                    .collect();
                if let Some(state) = weak.upgrade() {
                    let host = ViewHost { state };
                    for removed in previous
                        .iter()
                        .filter(|prev| !current.iter().any(|cur| rc_eq(cur, prev)))
                    {
                        host.deactivate(removed);
                    }
                }
                previous = current;
            });
            disposers.push(Disposer::new(stop));
        }

        // Watch the rendered slot: a replaced subtree is deactivated
        // after the record's snapshot moves to the new one.
        {
            let rendered = component.core().rendered_signal();
            let weak = Rc::downgrade(&self.state);
            let mut first = true;
            let stop = effect(move || {
                let current = rendered.get().0;
                if first {
                    first = false;
                    return;
                }
                let Some(state) = weak.upgrade() else { return };
                let host = ViewHost { state };
                let replaced = {
                    let mut active = host.state.active.borrow_mut();
                    active.get_mut(&id).and_then(|record| {
                        let old = record.rendered.take();
                        record.rendered = current.clone();
                        old
                    })
                };
                if let Some(old) = replaced {
                    let same = current.as_ref().is_some_and(|new| rc_eq(new, &old));
                    if !same {
                        host.deactivate(&old);
                    }
                }
            });
            disposers.push(Disposer::new(stop));
        }

        trace!(component = component.type_key().name(), "activated");
        self.state.active.borrow_mut().insert(
            id,
            ActivationRecord {
                component: component.clone(),
                rendered: component.core().rendered(),
                disposers,
            },
        );
        self.state.live.borrow_mut().push(component);
    }

    /// Deactivate `component` and everything beneath it.
    ///
    /// Children first, then the rendered subtree, then the component's
    /// own disposers in reverse registration order. Deactivating a
    /// component that is not live is a no-op.
    pub fn deactivate(&self, component: &ComponentHandle) {
        let id = rc_addr(component);
        let record = self.state.active.borrow_mut().remove(&id);
        let Some(mut record) = record else { return };
        trace!(component = component.type_key().name(), "deactivating");

        let children = record.component.core().children().get().0;
        for child in children.iter().filter_map(ComponentChild::as_component) {
            self.deactivate(child);
        }

        if let Some(rendered) = record.rendered.take() {
            self.deactivate(&rendered);
        }

        record.disposers.dispose_all();
        self.state
            .live
            .borrow_mut()
            .retain(|live| !rc_eq(live, component));
    }

    /// Deactivate every live component, most recently activated first.
    ///
    /// Leaves any locator publication in place: publication scope is
    /// owned by the [`publish`](ViewHost::publish) disposer (or the boot
    /// teardown, which runs both).
    pub fn shutdown(&self) {
        debug!(live = self.state.live.borrow().len(), "host shutdown");
        let live: Vec<ComponentHandle> = self.state.live.borrow().clone();
        for component in live.iter().rev() {
            self.deactivate(component);
        }
    }

    /// Whether `component` is currently live.
    pub fn is_active(&self, component: &ComponentHandle) -> bool {
        self.state.active.borrow().contains_key(&rc_addr(component))
    }

    /// Number of live components.
    pub fn active_count(&self) -> usize {
        self.state.active.borrow().len()
    }

    /// Publish this host under [`VIEW_HOST`].
    pub fn publish(&self) -> Disposer {
        let host = self.clone();
        locator::register(VIEW_HOST, move || Rc::new(host.clone()) as Service)
    }

    /// Publish the host and render the root target.
    ///
    /// On success, the returned teardown disposer shuts the host down
    /// and withdraws the publication. On failure nothing stays
    /// published.
    pub fn boot(&self, target: impl Into<RenderTarget>) -> Result<BootResult, EngineError> {
        let mut publication = self.publish();
        match self.render(target, None, Vec::new()) {
            Ok(root) => {
                let host = self.clone();
                let teardown = Disposer::new(move || {
                    let mut publication = publication;
                    host.shutdown();
                    publication.dispose();
                });
                Ok(BootResult { root, teardown })
            }
            Err(error) => {
                publication.dispose();
                Err(error)
            }
        }
    }
}

/// A successfully booted tree: its root and the handle that tears the
/// whole host down.
pub struct BootResult {
    pub root: ComponentHandle,
    pub teardown: Disposer,
}

// =============================================================================
// Module-level access to the published host
// =============================================================================

/// The currently published host, if any.
pub fn current_host() -> Option<ViewHost> {
    locator::get_as::<ViewHost>(VIEW_HOST)
}

/// Render through the published host.
pub fn render(
    target: impl Into<RenderTarget>,
    bindings: Option<Vec<Binding>>,
    children: Vec<ComponentChild>,
) -> Result<ComponentHandle, EngineError> {
    current_host()
        .ok_or(EngineError::HostNotPublished)?
        .render(target, bindings, children)
}

/// Run `f` against a fresh host published for its duration.
///
/// The host is shut down and unpublished before this returns, whatever
/// `f` left behind.
pub fn with_published_host<R>(f: impl FnOnce(&ViewHost) -> R) -> R {
    let host = ViewHost::new();
    let mut publication = host.publish();
    let result = f(&host);
    host.shutdown();
    publication.dispose();
    result
}

// =============================================================================
// Tests
// =============================================================================
