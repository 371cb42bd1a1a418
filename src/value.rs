//! Dynamic values - the payload of properties, bindings and literal children.
//!
//! Reactive properties are uniform `Signal<Value>` slots, so a single value
//! type covers everything a binding can carry: scalars, strings, and
//! handles to view models or components. Handles compare by identity,
//! which is what the signal layer's change detection needs - replacing a
//! view model with a different instance is a change, mutating it is not.

use std::fmt;
use std::rc::Rc;

use crate::component::ComponentHandle;
use crate::viewmodel::VmHandle;

/// Address of an `Rc` allocation, ignoring trait-object metadata.
pub(crate) fn rc_addr<T: ?Sized>(handle: &Rc<T>) -> usize {
    Rc::as_ptr(handle) as *const () as usize
}

/// Identity comparison for shared handles.
pub(crate) fn rc_eq<T: ?Sized>(a: &Rc<T>, b: &Rc<T>) -> bool {
    rc_addr(a) == rc_addr(b)
}

/// A dynamically typed value.
#[derive(Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// A shared view-model handle; compares by identity.
    ViewModel(VmHandle),
    /// A shared component handle; compares by identity.
    Component(ComponentHandle),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_view_model(&self) -> Option<VmHandle> {
        match self {
            Value::ViewModel(handle) => Some(handle.clone()),
            _ => None,
        }
    }

    pub fn as_component(&self) -> Option<ComponentHandle> {
        match self {
            Value::Component(handle) => Some(handle.clone()),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            // Bit comparison so NaN equals itself; change detection must
            // treat a re-written NaN as unchanged or update loops never
            // converge.
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::ViewModel(a), Value::ViewModel(b)) => rc_eq(a, b),
            (Value::Component(a), Value::Component(b)) => rc_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("Null"),
            Value::Bool(value) => f.debug_tuple("Bool").field(value).finish(),
            Value::Int(value) => f.debug_tuple("Int").field(value).finish(),
            Value::Float(value) => f.debug_tuple("Float").field(value).finish(),
            Value::Str(value) => f.debug_tuple("Str").field(value).finish(),
            Value::ViewModel(handle) => {
                write!(f, "ViewModel({})", handle.type_key().name())
            }
            Value::Component(handle) => {
                write!(f, "Component({})", handle.type_key().name())
            }
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<VmHandle> for Value {
    fn from(handle: VmHandle) -> Self {
        Value::ViewModel(handle)
    }
}

impl From<ComponentHandle> for Value {
    fn from(handle: ComponentHandle) -> Self {
        Value::Component(handle)
    }
}
