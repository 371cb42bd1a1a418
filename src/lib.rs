//! # rigging
//!
//! A reactive component activation engine: a service locator with scoped
//! LIFO registration, a view-model/component pairing table, declarative
//! property bindings, and an activation manager with cascading teardown.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals) for
//! fine-grained reactivity.
//!
//! ## Modules
//!
//! - [`locator`] - thread-local service registry; registrations shadow
//!   LIFO and are withdrawn through disposers
//! - [`viewmodel`] / [`value`] - reactive named properties over a dynamic
//!   value type, backed by signals
//! - [`component`] - the live tree: a view model, a reactive child
//!   sequence, an optional rendered subtree, plus the binding decorator
//!   and a navigation-stack router
//! - [`binding`] - declarative value/property bindings applied at
//!   activation time
//! - [`resolver`] - platform/feature specialization of default components
//! - [`host`] - registration, rendering, activation records, cascading
//!   deactivation, and boot/teardown of the whole tree
//!
//! ## Example
//!
//! ```ignore
//! use rigging::{RenderTarget, ViewHost};
//!
//! let host = ViewHost::new();
//! let _pair = host.register::<AppViewModel, AppComponent>();
//!
//! let mut booted = host.boot(RenderTarget::of::<AppViewModel>())?;
//! // ... drive the app through its view models ...
//! booted.teardown.dispose();
//! ```

pub mod binding;
pub mod component;
pub mod dispose;
pub mod error;
pub mod host;
pub mod key;
pub mod locator;
pub mod platform;
pub mod registry;
pub mod resolver;
pub mod value;
pub mod viewmodel;

// Re-export commonly used items
pub use binding::{Binding, PropKey};
pub use component::{
    BasicComponent, BoundComponent, Component, ComponentChild, ComponentCore, ComponentHandle,
    Router, RouterViewModel, register_router,
};
pub use dispose::{Disposer, DisposerBag};
pub use error::{BindingError, EngineError};
pub use host::{
    BootResult, RenderTarget, VIEW_HOST, ViewHost, current_host, render, with_published_host,
};
pub use key::{ServiceKey, TypeKey};
pub use platform::{PlatformFeatures, PlatformInfo};
pub use resolver::ComponentResolver;
pub use value::Value;
pub use viewmodel::{DynamicViewModel, Property, PropertyBag, ViewModel, VmHandle};
