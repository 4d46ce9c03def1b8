//! Page-level signals: tab visibility and the reduced-motion preference

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Whether the hosting page is in the foreground
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// Foreground tab
    #[default]
    Visible,
    /// Background tab, minimized window, locked screen
    Hidden,
}

impl Visibility {
    pub fn is_visible(self) -> bool {
        self == Visibility::Visible
    }
}

/// Handle returned by `subscribe`, used to unsubscribe later
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Allocate a process-unique subscription id
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        SubscriptionId(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub fn to_raw(self) -> u64 {
        self.0
    }
}

/// Called with the new visibility every time it changes
pub type VisibilityCallback = Arc<dyn Fn(Visibility) + Send + Sync>;

/// Called with the new reduced-motion flag every time it changes
pub type MotionCallback = Arc<dyn Fn(bool) + Send + Sync>;

/// Source of the page-visibility signal (`document.visibilityState` on the web)
pub trait VisibilitySource: Send + Sync {
    /// Current visibility
    fn visibility(&self) -> Visibility;

    /// Register a change listener
    fn subscribe(&self, callback: VisibilityCallback) -> SubscriptionId;

    /// Remove a change listener. Returns `false` if it was not registered.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}

/// Source of the system reduced-motion preference
/// (`prefers-reduced-motion: reduce` on the web)
pub trait MotionPreferenceSource: Send + Sync {
    /// Current preference
    fn prefers_reduced_motion(&self) -> bool;

    /// Register a change listener
    fn subscribe(&self, callback: MotionCallback) -> SubscriptionId;

    /// Remove a change listener. Returns `false` if it was not registered.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscription_ids_are_unique() {
        let a = SubscriptionId::next();
        let b = SubscriptionId::next();
        assert_ne!(a, b);
        assert!(b.to_raw() > a.to_raw());
    }

    #[test]
    fn test_visibility_default() {
        assert_eq!(Visibility::default(), Visibility::Visible);
        assert!(!Visibility::Hidden.is_visible());
    }
}
