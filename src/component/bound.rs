//! The binding decorator.
//!
//! [`BoundComponent`] wraps any component and carries the declarative
//! bindings its render site declared. Everything is proxied to the inner
//! component except activation, which applies the bindings against the
//! inner view model first. A binding that fails to apply is logged and
//! skipped rather than failing activation; not every platform's view
//! model exposes every property.

use std::any::Any;

use tracing::warn;

use crate::binding::{Binding, apply_bindings};
use crate::component::{Component, ComponentCore, ComponentHandle};
use crate::dispose::DisposerBag;
use crate::key::TypeKey;
use crate::platform::PlatformInfo;

pub struct BoundComponent {
    inner: ComponentHandle,
    bindings: Vec<Binding>,
}

impl BoundComponent {
    pub fn new(inner: ComponentHandle, bindings: Vec<Binding>) -> Self {
        Self { inner, bindings }
    }

    pub fn inner(&self) -> &ComponentHandle {
        &self.inner
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }
}

impl Component for BoundComponent {
    fn type_key(&self) -> TypeKey {
        self.inner.type_key()
    }

    fn core(&self) -> &ComponentCore {
        self.inner.core()
    }

    fn supports_platform(&self, platform: &PlatformInfo) -> bool {
        self.inner.supports_platform(platform)
    }

    fn on_activated(&self, disposers: &mut DisposerBag) {
        if let Err(error) = apply_bindings(self.inner.as_ref(), &self.bindings, disposers) {
            warn!(
                component = self.type_key().name(),
                %error,
                "skipping bindings for component"
            );
        }
        self.inner.on_activated(disposers);
    }

    fn render(&self) -> Option<ComponentHandle> {
        self.inner.render()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::BasicComponent;
    use crate::value::Value;
    use crate::viewmodel::{DynamicViewModel, ViewModel, VmHandle};
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    #[test]
    fn test_bindings_apply_before_inner_activation() {
        let inner = BasicComponent::new();
        let view_model: VmHandle = Rc::new(DynamicViewModel::new());
        inner.core().set_view_model(view_model.clone());

        let seen = Rc::new(RefCell::new(Value::Null));
        let seen_clone = seen.clone();
        let vm_clone = view_model.clone();
        inner.core().when_activated(move |_| {
            if let Some(prop) = vm_clone.property("title") {
                *seen_clone.borrow_mut() = prop.get();
            }
        });

        let bound = BoundComponent::new(
            Rc::new(inner),
            vec![Binding::assign("ready", "title")],
        );
        let mut bag = DisposerBag::new();
        bound.on_activated(&mut bag);

        assert_eq!(*seen.borrow(), Value::from("ready"));
    }

    #[test]
    fn test_failed_binding_does_not_block_activation() {
        // No view model assigned, so every binding fails.
        let inner = BasicComponent::new();
        let ran = Rc::new(Cell::new(false));
        let ran_clone = ran.clone();
        inner.core().when_activated(move |_| ran_clone.set(true));

        let bound = BoundComponent::new(
            Rc::new(inner),
            vec![Binding::assign(1i64, "value")],
        );
        let mut bag = DisposerBag::new();
        bound.on_activated(&mut bag);

        assert!(ran.get());
    }

    #[test]
    fn test_core_and_identity_proxy_to_inner() {
        let inner: ComponentHandle = Rc::new(BasicComponent::new());
        let bound = BoundComponent::new(inner.clone(), Vec::new());

        assert_eq!(bound.type_key(), inner.type_key());
        assert!(std::ptr::eq(
            bound.core() as *const ComponentCore,
            inner.core() as *const ComponentCore
        ));
    }
}
