//! View models and reactive properties.
//!
//! A view model is the plain state/behavior object a component displays -
//! the only state a component should own directly. View models expose
//! their bindable state as named reactive properties: each property is
//! either a mutable [`Signal`] slot or a read-only [`Derived`] value.
//!
//! # Example
//!
//! ```ignore
//! use spark_signals::{signal, Signal};
//! use rigging::key::TypeKey;
//! use rigging::value::Value;
//! use rigging::viewmodel::{Property, ViewModel};
//!
//! struct CounterViewModel {
//!     count: Signal<Value>,
//! }
//!
//! impl ViewModel for CounterViewModel {
//!     fn type_key(&self) -> TypeKey {
//!         TypeKey::of::<CounterViewModel>()
//!     }
//!
//!     fn property(&self, key: &str) -> Option<Property> {
//!         match key {
//!             "count" => Some(Property::Mutable(self.count.clone())),
//!             _ => None,
//!         }
//!     }
//!
//!     fn as_any(&self) -> &dyn std::any::Any {
//!         self
//!     }
//! }
//! ```

use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use spark_signals::{Derived, Signal, signal};

use crate::key::TypeKey;
use crate::value::Value;

/// A shared view-model handle.
pub type VmHandle = Rc<dyn ViewModel>;

// =============================================================================
// ViewModel
// =============================================================================

/// The state/behavior object a component displays.
pub trait ViewModel: 'static {
    /// Stable identity token used by the host's resolution table.
    fn type_key(&self) -> TypeKey;

    /// Look up a reactive property by name.
    ///
    /// The default is no bindable properties; a view model that wants to
    /// participate in bindings maps its property names here.
    fn property(&self, _key: &str) -> Option<Property> {
        None
    }

    fn as_any(&self) -> &dyn Any;
}

// =============================================================================
// Property
// =============================================================================

/// A named reactive property of a view model.
#[derive(Clone)]
pub enum Property {
    /// A read-write reactive slot.
    Mutable(Signal<Value>),
    /// A read-only reactive value, computed from other state.
    Computed(Derived<Value>),
}

impl Property {
    /// Current value. Reading inside an effect establishes a dependency.
    pub fn get(&self) -> Value {
        match self {
            Property::Mutable(slot) => slot.get(),
            Property::Computed(derived) => derived.get(),
        }
    }

    /// Write the property. Returns `false` for computed properties.
    pub fn set(&self, value: Value) -> bool {
        match self {
            Property::Mutable(slot) => {
                slot.set(value);
                true
            }
            Property::Computed(_) => false,
        }
    }

    pub fn is_mutable(&self) -> bool {
        matches!(self, Property::Mutable(_))
    }
}

// =============================================================================
// PropertyBag
// =============================================================================

/// A create-on-demand map of named mutable property slots.
///
/// Backs view models whose property set is open-ended; every name
/// resolves, with new slots starting at `Value::Null`.
#[derive(Default)]
pub struct PropertyBag {
    slots: RefCell<HashMap<String, Signal<Value>>>,
}

impl PropertyBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// The slot for `key`, created on first touch.
    pub fn slot(&self, key: &str) -> Signal<Value> {
        let mut slots = self.slots.borrow_mut();
        if let Some(slot) = slots.get(key) {
            return slot.clone();
        }
        let slot = signal(Value::Null);
        slots.insert(key.to_string(), slot.clone());
        slot
    }

    pub fn property(&self, key: &str) -> Property {
        Property::Mutable(self.slot(key))
    }
}

/// A permissive view model backed entirely by a [`PropertyBag`].
///
/// Every property name is bindable; this is the engine's
/// dynamic-property host.
#[derive(Default)]
pub struct DynamicViewModel {
    props: PropertyBag,
}

impl DynamicViewModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn props(&self) -> &PropertyBag {
        &self.props
    }
}

impl ViewModel for DynamicViewModel {
    fn type_key(&self) -> TypeKey {
        TypeKey::of::<DynamicViewModel>()
    }

    fn property(&self, key: &str) -> Option<Property> {
        Some(self.props.property(key))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// =============================================================================
// Tests
// =============================================================================
