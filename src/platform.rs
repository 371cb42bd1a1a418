//! Platform capability flags.
//!
//! A [`PlatformInfo`] describes what the current rendering environment
//! supports. Components advertise their requirements through
//! [`Component::supports_platform`](crate::component::Component::supports_platform);
//! the host checks the published platform before accepting a resolved
//! component. The platform itself is just another locator service, so
//! tests and embedders can publish and swap it like anything else.

use bitflags::bitflags;

use crate::dispose::Disposer;
use crate::key::ServiceKey;
use crate::locator::{self, Service};
use std::rc::Rc;

bitflags! {
    /// Capabilities of a rendering environment.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PlatformFeatures: u32 {
        const HTML     = 1 << 0;
        const IOS      = 1 << 1;
        const ANDROID  = 1 << 2;
        const TERMINAL = 1 << 3;
    }
}

/// The published description of the current platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformInfo {
    features: PlatformFeatures,
}

impl PlatformInfo {
    pub fn new(features: PlatformFeatures) -> Self {
        Self { features }
    }

    pub fn supports(&self, features: PlatformFeatures) -> bool {
        self.features.contains(features)
    }

    pub fn features(&self) -> PlatformFeatures {
        self.features
    }
}

/// Locator key the platform description is published under.
pub const PLATFORM_INFO: ServiceKey = ServiceKey("rigging.platform-info");

/// Publish `info` as the current platform.
pub fn publish(info: PlatformInfo) -> Disposer {
    locator::register(PLATFORM_INFO, move || Rc::new(info) as Service)
}

/// The currently published platform, if any.
pub fn current() -> Option<PlatformInfo> {
    locator::get_as::<PlatformInfo>(PLATFORM_INFO)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_platform_published() {
        assert!(current().is_none());
    }

    #[test]
    fn test_publish_and_query() {
        let _handle = publish(PlatformInfo::new(
            PlatformFeatures::TERMINAL | PlatformFeatures::HTML,
        ));

        let info = current().unwrap();
        assert!(info.supports(PlatformFeatures::TERMINAL));
        assert!(!info.supports(PlatformFeatures::IOS));
    }

    #[test]
    fn test_publication_scopes_with_disposer() {
        let mut handle = publish(PlatformInfo::new(PlatformFeatures::HTML));
        assert!(current().is_some());

        handle.dispose();
        assert!(current().is_none());
    }
}
