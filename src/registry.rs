//! Generic keyed factory stack with LIFO override and scoped removal.
//!
//! A [`Registry`] maps opaque keys to stacks of factories. Registering a
//! factory for a key that already has one shadows the existing entry;
//! disposing the returned handle removes exactly that entry - wherever it
//! now sits in the stack - and un-shadows whatever it covered. Resolving a
//! key with no active entries yields `None`, never an error.
//!
//! # Example
//!
//! ```ignore
//! use rigging::registry::Registry;
//!
//! let registry: Registry<&str, i32> = Registry::new();
//! registry.register("answer", || 41);
//! let mut shadow = registry.register("answer", || 42);
//!
//! assert_eq!(registry.resolve(&"answer"), Some(42));
//! shadow.dispose();
//! assert_eq!(registry.resolve(&"answer"), Some(41));
//! ```

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::hash::Hash;
use std::rc::Rc;

use crate::dispose::Disposer;

struct Entry<V> {
    id: u64,
    factory: Rc<dyn Fn() -> V>,
}

struct RegistryState<K, V> {
    entries: RefCell<HashMap<K, Vec<Entry<V>>>>,
    next_id: Cell<u64>,
}

/// A keyed stack of factories. Cheap to clone; clones share state.
pub struct Registry<K, V>
where
    K: Eq + Hash + Clone + 'static,
    V: 'static,
{
    state: Rc<RegistryState<K, V>>,
}

impl<K, V> Clone for Registry<K, V>
where
    K: Eq + Hash + Clone + 'static,
    V: 'static,
{
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
        }
    }
}

impl<K, V> Default for Registry<K, V>
where
    K: Eq + Hash + Clone + 'static,
    V: 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Registry<K, V>
where
    K: Eq + Hash + Clone + 'static,
    V: 'static,
{
    pub fn new() -> Self {
        Self {
            state: Rc::new(RegistryState {
                entries: RefCell::new(HashMap::new()),
                next_id: Cell::new(0),
            }),
        }
    }

    /// Push a factory onto the key's stack.
    ///
    /// The returned disposer removes exactly this entry, regardless of how
    /// many entries have been stacked above or below it since. Disposing
    /// twice is a no-op. The disposer holds only a weak reference to the
    /// registry, so an outliving disposer never keeps a dropped registry
    /// alive.
    pub fn register(&self, key: K, factory: impl Fn() -> V + 'static) -> Disposer {
        let id = self.state.next_id.get();
        self.state.next_id.set(id + 1);
        self.state
            .entries
            .borrow_mut()
            .entry(key.clone())
            .or_default()
            .push(Entry {
                id,
                factory: Rc::new(factory),
            });

        let state = Rc::downgrade(&self.state);
        Disposer::new(move || {
            let Some(state) = state.upgrade() else { return };
            let mut entries = state.entries.borrow_mut();
            if let Some(stack) = entries.get_mut(&key) {
                stack.retain(|entry| entry.id != id);
                if stack.is_empty() {
                    entries.remove(&key);
                }
            }
        })
    }

    /// Invoke the most-recently-registered still-active factory for `key`.
    ///
    /// Returns `None` when the stack is empty; absence is not an error at
    /// this layer.
    pub fn resolve(&self, key: &K) -> Option<V> {
        // The map borrow is released before the factory runs, so factories
        // may re-enter the registry.
        let factory = {
            let entries = self.state.entries.borrow();
            entries.get(key)?.last()?.factory.clone()
        };
        Some(factory())
    }

    /// Invoke every active factory for `key`, most-recent first.
    pub fn resolve_all(&self, key: &K) -> Vec<V> {
        let factories: Vec<Rc<dyn Fn() -> V>> = {
            let entries = self.state.entries.borrow();
            entries
                .get(key)
                .map(|stack| stack.iter().rev().map(|entry| entry.factory.clone()).collect())
                .unwrap_or_default()
        };
        factories.into_iter().map(|factory| factory()).collect()
    }

    /// Number of active entries for `key`.
    pub fn active(&self, key: &K) -> usize {
        self.state
            .entries
            .borrow()
            .get(key)
            .map_or(0, |stack| stack.len())
    }
}

// =============================================================================
// Tests
// =============================================================================
