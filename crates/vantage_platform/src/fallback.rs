//! Sources used when the host lacks a capability
//!
//! Each one degrades to the behaviour that keeps content visible: the page is
//! always foreground, motion is never reduced, and intersection observation is
//! reported as unsupported so observers reveal everything immediately.

use crate::error::{PlatformError, Result};
use crate::intersection::{IntersectionCallback, IntersectionSource, NodeId, ObservationId};
use crate::signal::{
    MotionCallback, MotionPreferenceSource, SubscriptionId, Visibility, VisibilityCallback,
    VisibilitySource,
};

/// Visibility source for hosts without a visibility API
#[derive(Clone, Copy, Debug, Default)]
pub struct AlwaysVisible;

impl VisibilitySource for AlwaysVisible {
    fn visibility(&self) -> Visibility {
        Visibility::Visible
    }

    fn subscribe(&self, _callback: VisibilityCallback) -> SubscriptionId {
        SubscriptionId::next()
    }

    fn unsubscribe(&self, _id: SubscriptionId) -> bool {
        false
    }
}

/// Motion preference source for hosts without a media-query API
#[derive(Clone, Copy, Debug, Default)]
pub struct NoMotionPreference;

impl MotionPreferenceSource for NoMotionPreference {
    fn prefers_reduced_motion(&self) -> bool {
        false
    }

    fn subscribe(&self, _callback: MotionCallback) -> SubscriptionId {
        SubscriptionId::next()
    }

    fn unsubscribe(&self, _id: SubscriptionId) -> bool {
        false
    }
}

/// Intersection source for hosts that cannot observe the viewport
#[derive(Clone, Copy, Debug, Default)]
pub struct NoIntersection;

impl IntersectionSource for NoIntersection {
    fn observe(
        &self,
        _node: NodeId,
        _threshold: f32,
        _callback: IntersectionCallback,
    ) -> Result<ObservationId> {
        Err(PlatformError::Unsupported("viewport intersection"))
    }

    fn unobserve(&self, _id: ObservationId) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intersection::{IntersectionEntry, ObserveControl};
    use std::sync::Arc;

    #[test]
    fn test_fallbacks_fail_open() {
        assert!(AlwaysVisible.visibility().is_visible());
        assert!(!NoMotionPreference.prefers_reduced_motion());

        let callback = Arc::new(|_: &IntersectionEntry| ObserveControl::Stop);
        let result = NoIntersection.observe(NodeId(1), 0.5, callback);
        assert!(matches!(result, Err(PlatformError::Unsupported(_))));
    }
}
