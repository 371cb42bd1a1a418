//! Error taxonomy for resolution and binding failures.
//!
//! Resolution misses and host misuse surface as [`EngineError`]. Binding
//! application reports [`BindingError`] on its own; the decorator layer
//! downgrades those to warnings for targets that are simply absent on a
//! given platform's view model, so they never cross into the host's
//! error type.

use thiserror::Error;

use crate::binding::PropKey;

/// A failure surfaced by the view host.
#[derive(Debug, Error)]
pub enum EngineError {
    /// No component/view-model pair is registered for the requested type.
    #[error("no component/view-model registration found for `{type_name}`")]
    Resolution { type_name: &'static str },

    /// A module-level render call found no published view host.
    #[error("no view host is currently published")]
    HostNotPublished,
}

/// A failure applying one declarative binding.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BindingError {
    /// The component has no view model to bind against.
    #[error("component has no view model to bind against")]
    NoViewModel,

    /// The target property does not exist on the view model.
    #[error("binding target property `{0}` not found")]
    TargetMissing(PropKey),

    /// The target property is computed and cannot be written.
    #[error("binding target property `{0}` is read-only")]
    TargetReadOnly(PropKey),

    /// The source property does not exist on the source view model.
    #[error("binding source property `{0}` not found")]
    SourceMissing(PropKey),

    /// A property-to-property binding names a source that is not a view model.
    #[error("binding source is not a view model; property `{0}` cannot be watched")]
    SourceNotReactive(PropKey),
}
