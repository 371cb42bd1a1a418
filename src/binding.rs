//! Declarative bindings between values and view-model properties.
//!
//! A [`Binding`] names a target property on the bound component's view
//! model and either a verbatim value to assign or a source property to
//! keep it synchronized with. Synchronization runs through effects; the
//! stop handles land in the component's disposer bag so links are torn
//! down with the component.
//!
//! Link direction depends on what the two ends are. Two mutable
//! properties link both ways, with writes converging instead of echoing
//! because identical values are deduplicated at the signal layer. A
//! computed source feeds a mutable target one way. A computed target
//! cannot be written at all.

use tracing::trace;

use crate::component::Component;
use crate::dispose::{Disposer, DisposerBag};
use crate::error::BindingError;
use crate::value::Value;
use crate::viewmodel::{Property, ViewModel, VmHandle};

/// A property name on a view model.
pub type PropKey = &'static str;

/// One declarative binding carried by a bound component.
#[derive(Clone, Debug, PartialEq)]
pub struct Binding {
    source: Value,
    target: PropKey,
    source_prop: Option<PropKey>,
}

impl Binding {
    /// Assign `source` verbatim to the target property, once, at
    /// activation time.
    pub fn assign(source: impl Into<Value>, target: PropKey) -> Self {
        Self {
            source: source.into(),
            target,
            source_prop: None,
        }
    }

    /// Keep the target property synchronized with `source_prop` on the
    /// source view model.
    pub fn prop(source: VmHandle, source_prop: PropKey, target: PropKey) -> Self {
        Self {
            source: Value::ViewModel(source),
            target,
            source_prop: Some(source_prop),
        }
    }

    pub fn target(&self) -> PropKey {
        self.target
    }

    /// Apply this binding against `view_model`, parking any effect stop
    /// handles in `disposers`.
    pub fn apply(
        &self,
        view_model: &dyn ViewModel,
        disposers: &mut DisposerBag,
    ) -> Result<(), BindingError> {
        let target = view_model
            .property(self.target)
            .ok_or(BindingError::TargetMissing(self.target))?;

        let Some(source_prop) = self.source_prop else {
            // Verbatim assignment, no ongoing link.
            if !target.set(self.source.clone()) {
                return Err(BindingError::TargetReadOnly(self.target));
            }
            trace!(target_prop = self.target, "binding assigned");
            return Ok(());
        };

        let source_vm = self
            .source
            .as_view_model()
            .ok_or(BindingError::SourceNotReactive(source_prop))?;
        let source = source_vm
            .property(source_prop)
            .ok_or(BindingError::SourceMissing(source_prop))?;

        match (source, target) {
            (Property::Mutable(a), Property::Mutable(b)) => {
                link_two_way(a, b, disposers);
            }
            (source, Property::Mutable(b)) => {
                link_one_way(source, b, disposers);
            }
            (_, Property::Computed(_)) => {
                return Err(BindingError::TargetReadOnly(self.target));
            }
        }
        trace!(
            source_prop,
            target_prop = self.target,
            "binding linked"
        );
        Ok(())
    }
}

fn link_one_way(
    source: Property,
    target: spark_signals::Signal<Value>,
    disposers: &mut DisposerBag,
) {
    let stop = spark_signals::effect(move || {
        target.set(source.get());
    });
    disposers.push(Disposer::new(stop));
}

fn link_two_way(
    a: spark_signals::Signal<Value>,
    b: spark_signals::Signal<Value>,
    disposers: &mut DisposerBag,
) {
    // Forward runs first, so the source value wins the initial sync.
    let (a_fwd, b_fwd) = (a.clone(), b.clone());
    let stop_forward = spark_signals::effect(move || {
        b_fwd.set(a_fwd.get());
    });
    let stop_backward = spark_signals::effect(move || {
        a.set(b.get());
    });
    disposers.push(Disposer::new(stop_forward));
    disposers.push(Disposer::new(stop_backward));
}

/// Apply `bindings` against `component`'s view model in order, stopping
/// at the first failure.
pub fn apply_bindings(
    component: &dyn Component,
    bindings: &[Binding],
    disposers: &mut DisposerBag,
) -> Result<(), BindingError> {
    let view_model = component.core().view_model().ok_or(BindingError::NoViewModel)?;
    for binding in bindings {
        binding.apply(view_model.as_ref(), disposers)?;
    }
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewmodel::DynamicViewModel;
    use spark_signals::{derived, signal};
    use std::rc::Rc;

    #[test]
    fn test_assign_sets_target_once() {
        let view_model = DynamicViewModel::new();
        let mut bag = DisposerBag::new();

        Binding::assign("hello", "title")
            .apply(&view_model, &mut bag)
            .unwrap();

        assert_eq!(view_model.props().slot("title").get(), Value::from("hello"));
        assert!(bag.is_empty());
    }

    #[test]
    fn test_assign_to_missing_target_fails() {
        struct Closed;
        impl ViewModel for Closed {
            fn type_key(&self) -> crate::key::TypeKey {
                crate::key::TypeKey::of::<Closed>()
            }
            fn as_any(&self) -> &dyn std::any::Any {
                self
            }
        }

        let mut bag = DisposerBag::new();
        let err = Binding::assign(1i64, "missing")
            .apply(&Closed, &mut bag)
            .unwrap_err();

        assert_eq!(err, BindingError::TargetMissing("missing"));
    }

    #[test]
    fn test_two_way_link_propagates_both_directions() {
        let source: VmHandle = Rc::new(DynamicViewModel::new());
        let target = DynamicViewModel::new();
        let source_dyn = source
            .as_any()
            .downcast_ref::<DynamicViewModel>()
            .unwrap();
        source_dyn.props().slot("value").set(Value::from(1i64));

        let mut bag = DisposerBag::new();
        Binding::prop(source.clone(), "value", "value")
            .apply(&target, &mut bag)
            .unwrap();

        // Initial sync flows source to target.
        assert_eq!(target.props().slot("value").get(), Value::from(1i64));

        source_dyn.props().slot("value").set(Value::from(2i64));
        assert_eq!(target.props().slot("value").get(), Value::from(2i64));

        target.props().slot("value").set(Value::from(3i64));
        assert_eq!(source_dyn.props().slot("value").get(), Value::from(3i64));
    }

    #[test]
    fn test_two_way_link_converges_on_nan() {
        let source: VmHandle = Rc::new(DynamicViewModel::new());
        let target = DynamicViewModel::new();
        let source_dyn = source
            .as_any()
            .downcast_ref::<DynamicViewModel>()
            .unwrap();

        let mut bag = DisposerBag::new();
        Binding::prop(source.clone(), "value", "value")
            .apply(&target, &mut bag)
            .unwrap();

        // The echo between the two link effects must settle; NaN only
        // dedups under bitwise float equality.
        source_dyn.props().slot("value").set(Value::Float(f64::NAN));

        assert_eq!(target.props().slot("value").get(), Value::Float(f64::NAN));
        assert_eq!(
            source_dyn.props().slot("value").get(),
            Value::Float(f64::NAN)
        );
    }

    #[test]
    fn test_duplicate_targets_last_applied_wins() {
        let component = crate::component::BasicComponent::new();
        component
            .core()
            .set_view_model(Rc::new(DynamicViewModel::new()));

        let mut bag = DisposerBag::new();
        apply_bindings(
            &component,
            &[
                Binding::assign("first", "title"),
                Binding::assign("second", "title"),
            ],
            &mut bag,
        )
        .unwrap();

        let view_model = component.core().view_model().unwrap();
        assert_eq!(
            view_model.property("title").unwrap().get(),
            Value::from("second")
        );
    }

    #[test]
    fn test_link_stops_after_disposal() {
        let source: VmHandle = Rc::new(DynamicViewModel::new());
        let target = DynamicViewModel::new();
        let source_dyn = source
            .as_any()
            .downcast_ref::<DynamicViewModel>()
            .unwrap();

        let mut bag = DisposerBag::new();
        Binding::prop(source.clone(), "value", "value")
            .apply(&target, &mut bag)
            .unwrap();
        bag.dispose_all();

        source_dyn.props().slot("value").set(Value::from(9i64));
        assert_eq!(target.props().slot("value").get(), Value::Null);
    }

    #[test]
    fn test_computed_source_links_one_way() {
        struct Doubler {
            base: spark_signals::Signal<Value>,
            doubled: spark_signals::Derived<Value>,
        }
        impl Doubler {
            fn new() -> Self {
                let base = signal(Value::from(2i64));
                let base_clone = base.clone();
                let doubled = derived(move || match base_clone.get() {
                    Value::Int(value) => Value::Int(value * 2),
                    other => other,
                });
                Self { base, doubled }
            }
        }
        impl ViewModel for Doubler {
            fn type_key(&self) -> crate::key::TypeKey {
                crate::key::TypeKey::of::<Doubler>()
            }
            fn property(&self, key: &str) -> Option<Property> {
                match key {
                    "doubled" => Some(Property::Computed(self.doubled.clone())),
                    _ => None,
                }
            }
            fn as_any(&self) -> &dyn std::any::Any {
                self
            }
        }

        let source = Rc::new(Doubler::new());
        let target = DynamicViewModel::new();

        let mut bag = DisposerBag::new();
        Binding::prop(source.clone() as VmHandle, "doubled", "value")
            .apply(&target, &mut bag)
            .unwrap();

        assert_eq!(target.props().slot("value").get(), Value::from(4i64));

        source.base.set(Value::from(5i64));
        assert_eq!(target.props().slot("value").get(), Value::from(10i64));
    }

    #[test]
    fn test_binding_to_computed_target_fails() {
        struct ReadOnly {
            total: spark_signals::Derived<Value>,
        }
        impl ViewModel for ReadOnly {
            fn type_key(&self) -> crate::key::TypeKey {
                crate::key::TypeKey::of::<ReadOnly>()
            }
            fn property(&self, key: &str) -> Option<Property> {
                match key {
                    "total" => Some(Property::Computed(self.total.clone())),
                    _ => None,
                }
            }
            fn as_any(&self) -> &dyn std::any::Any {
                self
            }
        }

        let source: VmHandle = Rc::new(DynamicViewModel::new());
        let target = ReadOnly {
            total: derived(|| Value::from(0i64)),
        };

        let mut bag = DisposerBag::new();
        let err = Binding::prop(source, "value", "total")
            .apply(&target, &mut bag)
            .unwrap_err();

        assert_eq!(err, BindingError::TargetReadOnly("total"));
    }

    #[test]
    fn test_prop_binding_source_must_be_view_model() {
        let target = DynamicViewModel::new();
        let mut bag = DisposerBag::new();

        let binding = Binding {
            source: Value::from(1i64),
            target: "value",
            source_prop: Some("value"),
        };
        let err = binding.apply(&target, &mut bag).unwrap_err();

        assert_eq!(err, BindingError::SourceNotReactive("value"));
    }
}
