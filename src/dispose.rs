//! Disposers - idempotent release handles for subscriptions and registrations.
//!
//! Every scoped resource in the engine (a registry entry, a binding effect,
//! an activation watcher) is released through a [`Disposer`]. Disposers are
//! safe to invoke more than once; the second call is a no-op. Dropping a
//! disposer without calling it leaves the resource alive - release only
//! happens through the disposal path, never automatically.
//!
//! [`DisposerBag`] collects the disposers acquired during one component
//! activation and runs them in reverse-registration order on teardown.

// =============================================================================
// Disposer
// =============================================================================

/// An idempotent handle that releases a previously acquired resource.
pub struct Disposer {
    action: Option<Box<dyn FnOnce()>>,
}

impl Disposer {
    /// Wrap a release action.
    pub fn new(action: impl FnOnce() + 'static) -> Self {
        Self {
            action: Some(Box::new(action)),
        }
    }

    /// A disposer that releases nothing.
    pub fn noop() -> Self {
        Self { action: None }
    }

    /// Combine two disposers into one that releases both (in order).
    pub fn join(mut first: Disposer, mut second: Disposer) -> Self {
        Self::new(move || {
            first.dispose();
            second.dispose();
        })
    }

    /// Run the release action. Calling this more than once is a no-op.
    pub fn dispose(&mut self) {
        if let Some(action) = self.action.take() {
            action();
        }
    }

    /// Whether the release action has already run (or never existed).
    pub fn is_disposed(&self) -> bool {
        self.action.is_none()
    }
}

// =============================================================================
// DisposerBag
// =============================================================================

/// An ordered collection of disposers, released in reverse order.
///
/// The activation manager hands a bag to each component's `on_activated`
/// hook; everything pushed into it is released exactly once when the
/// component is deactivated.
#[derive(Default)]
pub struct DisposerBag {
    items: Vec<Disposer>,
}

impl DisposerBag {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Add a disposer to the bag.
    pub fn push(&mut self, disposer: Disposer) {
        self.items.push(disposer);
    }

    /// Add a plain release function to the bag.
    pub fn push_fn(&mut self, action: impl FnOnce() + 'static) {
        self.items.push(Disposer::new(action));
    }

    /// Run every disposer in reverse-registration order and empty the bag.
    pub fn dispose_all(&mut self) {
        for mut disposer in self.items.drain(..).rev() {
            disposer.dispose();
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// =============================================================================
// Tests
// =============================================================================
