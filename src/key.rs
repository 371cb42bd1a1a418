//! Identity tokens for registries.
//!
//! Registries never key on runtime reflection; they key on opaque tokens.
//! [`TypeKey`] is a stable token for a Rust type (used to pair view models
//! with components), [`ServiceKey`] is an interned name for a well-known
//! service published through the locator.

use std::any::{TypeId, type_name};
use std::fmt;
use std::hash::{Hash, Hasher};

// =============================================================================
// TypeKey
// =============================================================================

/// A stable, opaque identity token for a type.
///
/// Equality and hashing use the `TypeId` only; the type name is carried
/// for diagnostics and error messages.
#[derive(Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    /// The token for `T`.
    pub fn of<T: 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    /// The full type name this token was created from.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypeKey").field(&self.name).finish()
    }
}

// =============================================================================
// ServiceKey
// =============================================================================

/// An interned name for a service registered with the locator.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ServiceKey(pub &'static str);

impl fmt::Display for ServiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Alpha;
    struct Beta;

    #[test]
    fn test_type_key_identity() {
        assert_eq!(TypeKey::of::<Alpha>(), TypeKey::of::<Alpha>());
        assert_ne!(TypeKey::of::<Alpha>(), TypeKey::of::<Beta>());
    }

    #[test]
    fn test_type_key_carries_name() {
        assert!(TypeKey::of::<Alpha>().name().contains("Alpha"));
    }
}
