//! Process-wide service locator.
//!
//! A single thread-local [`Registry`] keyed by [`ServiceKey`]. Services
//! register a factory under a well-known key and consumers resolve them
//! without holding a direct reference to the provider. Registrations are
//! scoped by their disposer, not by the locator: the locator lives for the
//! thread, entries come and go.
//!
//! The engine uses this to publish the active view host under
//! [`crate::host::VIEW_HOST`], so nested `render()` calls made from inside
//! a component can reach their host without threading a handle through
//! every call.
//!
//! # Example
//!
//! ```ignore
//! use std::rc::Rc;
//! use rigging::key::ServiceKey;
//! use rigging::locator::{self, Service};
//!
//! const CLOCK: ServiceKey = ServiceKey("app.clock");
//!
//! let mut registration = locator::register(CLOCK, || Rc::new(42u64) as Service);
//! assert_eq!(locator::get_as::<u64>(CLOCK), Some(42));
//! registration.dispose();
//! assert_eq!(locator::get_as::<u64>(CLOCK), None);
//! ```

use std::any::Any;
use std::rc::Rc;

use crate::dispose::Disposer;
use crate::key::ServiceKey;
use crate::registry::Registry;

/// A resolved service instance.
pub type Service = Rc<dyn Any>;

thread_local! {
    /// The locator for the current thread.
    static CURRENT: Registry<ServiceKey, Service> = Registry::new();
}

/// Register a service factory under `key`.
///
/// The most recent registration for a key shadows earlier ones; the
/// returned disposer removes exactly this registration.
pub fn register(key: ServiceKey, factory: impl Fn() -> Service + 'static) -> Disposer {
    CURRENT.with(|locator| locator.register(key, factory))
}

/// Resolve the service for `key`, or `None` if nothing is registered.
pub fn get(key: ServiceKey) -> Option<Service> {
    CURRENT.with(|locator| locator.resolve(&key))
}

/// Resolve every active registration for `key`, most-recent first.
pub fn get_all(key: ServiceKey) -> Vec<Service> {
    CURRENT.with(|locator| locator.resolve_all(&key))
}

/// Resolve the service for `key` and downcast it to a concrete type.
pub fn get_as<T: Any + Clone>(key: ServiceKey) -> Option<T> {
    get(key)?.downcast::<T>().ok().map(|service| (*service).clone())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const SERVICE: ServiceKey = ServiceKey("test.service");

    #[test]
    fn test_get_unregistered_returns_none() {
        assert!(get(SERVICE).is_none());
        assert!(get_all(SERVICE).is_empty());
    }

    #[test]
    fn test_get_returns_registered_value() {
        let _registration = register(SERVICE, || Rc::new(7i32) as Service);
        assert_eq!(get_as::<i32>(SERVICE), Some(7));
    }

    #[test]
    fn test_get_returns_last_registered_value() {
        let _first = register(SERVICE, || Rc::new(1i32) as Service);
        let _second = register(SERVICE, || Rc::new(2i32) as Service);

        assert_eq!(get_as::<i32>(SERVICE), Some(2));
    }

    #[test]
    fn test_disposed_registration_is_skipped() {
        let _first = register(SERVICE, || Rc::new(1i32) as Service);
        let mut second = register(SERVICE, || Rc::new(2i32) as Service);

        second.dispose();

        assert_eq!(get_as::<i32>(SERVICE), Some(1));
    }

    #[test]
    fn test_get_all_excludes_disposed() {
        let _first = register(SERVICE, || Rc::new(1i32) as Service);
        let mut second = register(SERVICE, || Rc::new(2i32) as Service);

        assert_eq!(get_all(SERVICE).len(), 2);

        second.dispose();
        let remaining = get_all(SERVICE);

        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].downcast_ref::<i32>(), Some(&1));
    }

    #[test]
    fn test_get_as_wrong_type_returns_none() {
        let _registration = register(SERVICE, || Rc::new(7i32) as Service);
        assert_eq!(get_as::<String>(SERVICE), None);
    }
}
