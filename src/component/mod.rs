//! The component model - nodes of the live UI tree.
//!
//! A component displays exactly one view model, houses an ordered reactive
//! sequence of children, and may delegate to a rendered subtree. All of
//! that state lives in a [`ComponentCore`]; a component type implements
//! [`Component`] by exposing its core plus whatever capability hooks it
//! wants to override (`supports_platform`, `on_activated`, `render`).
//!
//! Components are shared as `Rc<dyn Component>` handles; the activation
//! manager tracks them by allocation identity.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use spark_signals::{Signal, signal};

use crate::binding::Binding;
use crate::dispose::DisposerBag;
use crate::key::TypeKey;
use crate::platform::PlatformInfo;
use crate::value::{Value, rc_eq};
use crate::viewmodel::VmHandle;

mod bound;
mod router;

pub use bound::BoundComponent;
pub use router::{Router, RouterViewModel, register_router};

/// A shared component handle.
pub type ComponentHandle = Rc<dyn Component>;

// =============================================================================
// Component
// =============================================================================

/// A node in the live UI tree.
pub trait Component: 'static {
    /// Stable identity token used by the host's resolution table.
    fn type_key(&self) -> TypeKey;

    /// The component's owned state.
    fn core(&self) -> &ComponentCore;

    /// Whether this component can run on the given platform.
    fn supports_platform(&self, _platform: &PlatformInfo) -> bool {
        true
    }

    /// Called when the component has been activated.
    ///
    /// Cleanup work registered with `disposers` runs exactly once, when
    /// the component is deactivated. The default runs any callbacks
    /// registered through [`ComponentCore::when_activated`].
    fn on_activated(&self, disposers: &mut DisposerBag) {
        self.core().notify_activated(disposers);
    }

    /// Build the subtree this component delegates to.
    ///
    /// `None` means the component is a leaf; the host assigns a returned
    /// subtree to the `rendered` slot.
    fn render(&self) -> Option<ComponentHandle> {
        None
    }

    fn as_any(&self) -> &dyn Any;
}

// =============================================================================
// Children / rendered slot
// =============================================================================

/// A child entry of a component.
#[derive(Clone)]
pub enum ComponentChild {
    /// A literal value (e.g. text content).
    Literal(Value),
    /// A binding passed down as a child.
    Binding(Binding),
    /// A nested component.
    Component(ComponentHandle),
}

impl ComponentChild {
    pub fn as_component(&self) -> Option<&ComponentHandle> {
        match self {
            ComponentChild::Component(handle) => Some(handle),
            _ => None,
        }
    }
}

impl PartialEq for ComponentChild {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ComponentChild::Literal(a), ComponentChild::Literal(b)) => a == b,
            (ComponentChild::Binding(a), ComponentChild::Binding(b)) => a == b,
            (ComponentChild::Component(a), ComponentChild::Component(b)) => rc_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for ComponentChild {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentChild::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            ComponentChild::Binding(binding) => f.debug_tuple("Binding").field(binding).finish(),
            ComponentChild::Component(handle) => {
                write!(f, "Component({})", handle.type_key().name())
            }
        }
    }
}

impl From<Value> for ComponentChild {
    fn from(value: Value) -> Self {
        ComponentChild::Literal(value)
    }
}

impl From<&str> for ComponentChild {
    fn from(value: &str) -> Self {
        ComponentChild::Literal(Value::from(value))
    }
}

impl From<Binding> for ComponentChild {
    fn from(binding: Binding) -> Self {
        ComponentChild::Binding(binding)
    }
}

impl From<ComponentHandle> for ComponentChild {
    fn from(handle: ComponentHandle) -> Self {
        ComponentChild::Component(handle)
    }
}

/// The full child sequence of a component. Assignment replaces the whole
/// list, so re-rendering a node discards stale children.
#[derive(Clone, Default, PartialEq)]
pub struct ChildList(pub Vec<ComponentChild>);

/// The at-most-one subtree a component delegates to.
#[derive(Clone, Default)]
pub struct RenderedSlot(pub Option<ComponentHandle>);

impl PartialEq for RenderedSlot {
    fn eq(&self, other: &Self) -> bool {
        match (&self.0, &other.0) {
            (None, None) => true,
            (Some(a), Some(b)) => rc_eq(a, b),
            _ => false,
        }
    }
}

// =============================================================================
// ComponentCore
// =============================================================================

type ActivationCallback = Rc<dyn Fn(&mut DisposerBag)>;

/// The owned state every component carries.
pub struct ComponentCore {
    view_model: RefCell<Option<VmHandle>>,
    children: Signal<ChildList>,
    rendered: Signal<RenderedSlot>,
    callbacks: RefCell<Vec<ActivationCallback>>,
}

impl Default for ComponentCore {
    fn default() -> Self {
        Self::new()
    }
}

impl ComponentCore {
    pub fn new() -> Self {
        Self {
            view_model: RefCell::new(None),
            children: signal(ChildList::default()),
            rendered: signal(RenderedSlot::default()),
            callbacks: RefCell::new(Vec::new()),
        }
    }

    /// The view model this component displays, if one has been assigned.
    pub fn view_model(&self) -> Option<VmHandle> {
        self.view_model.borrow().clone()
    }

    pub fn set_view_model(&self, view_model: VmHandle) {
        *self.view_model.borrow_mut() = Some(view_model);
    }

    /// Handle to the reactive child sequence.
    pub fn children(&self) -> Signal<ChildList> {
        self.children.clone()
    }

    /// Replace the entire child sequence.
    pub fn set_children(&self, children: Vec<ComponentChild>) {
        self.children.set(ChildList(children));
    }

    /// The current rendered subtree.
    pub fn rendered(&self) -> Option<ComponentHandle> {
        self.rendered.get().0
    }

    /// Handle to the reactive rendered slot.
    pub fn rendered_signal(&self) -> Signal<RenderedSlot> {
        self.rendered.clone()
    }

    pub fn set_rendered(&self, component: Option<ComponentHandle>) {
        self.rendered.set(RenderedSlot(component));
    }

    /// Register a callback to run when the owning component is activated.
    pub fn when_activated(&self, callback: impl Fn(&mut DisposerBag) + 'static) {
        self.callbacks.borrow_mut().push(Rc::new(callback));
    }

    /// Run all `when_activated` callbacks.
    pub fn notify_activated(&self, disposers: &mut DisposerBag) {
        let callbacks: Vec<ActivationCallback> = self.callbacks.borrow().clone();
        for callback in callbacks {
            callback(disposers);
        }
    }
}

// =============================================================================
// BasicComponent
// =============================================================================

/// A plain component with no render operation and no platform constraints.
///
/// Behavior is attached through [`ComponentCore::when_activated`]; useful
/// as a leaf or as a base for tests.
#[derive(Default)]
pub struct BasicComponent {
    core: ComponentCore,
}

impl BasicComponent {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Component for BasicComponent {
    fn type_key(&self) -> TypeKey {
        TypeKey::of::<BasicComponent>()
    }

    fn core(&self) -> &ComponentCore {
        &self.core
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// =============================================================================
// Tests
// =============================================================================
