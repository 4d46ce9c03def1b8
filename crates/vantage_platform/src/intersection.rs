//! Viewport intersection and element selection

use crate::error::Result;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Opaque handle to an element in the host UI tree
///
/// The core never creates or destroys the element; it only carries the
/// handle back to the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

/// One intersection report for an observed element
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IntersectionEntry {
    pub node: NodeId,
    /// Fraction of the element's area currently on screen (0.0 - 1.0)
    pub ratio: f32,
}

impl IntersectionEntry {
    /// Whether the visible ratio reaches `threshold`
    ///
    /// A fully off-screen element never qualifies, even at threshold 0.
    pub fn reaches(&self, threshold: f32) -> bool {
        self.ratio > 0.0 && self.ratio >= threshold
    }
}

/// What the observer wants after handling an entry
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObserveControl {
    /// Keep delivering entries for this element
    Continue,
    /// Stop observing this element permanently
    Stop,
}

/// Handle to one observed element
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObservationId(u64);

impl ObservationId {
    /// Allocate a process-unique observation id
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        ObservationId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Called for each intersection report of an observed element
pub type IntersectionCallback = Arc<dyn Fn(&IntersectionEntry) -> ObserveControl + Send + Sync>;

/// Source of viewport-intersection reports (`IntersectionObserver` on the web)
pub trait IntersectionSource: Send + Sync {
    /// Start observing `node`; entries are delivered whenever its visible
    /// ratio crosses `threshold` in either direction.
    ///
    /// If the node already reaches `threshold`, an initial entry is delivered
    /// before `observe` returns, so the callback may run (and stop the
    /// observation) before the caller sees the returned id.
    ///
    /// Returns [`PlatformError::Unsupported`](crate::PlatformError::Unsupported)
    /// when the host cannot observe intersections.
    fn observe(
        &self,
        node: NodeId,
        threshold: f32,
        callback: IntersectionCallback,
    ) -> Result<ObservationId>;

    /// Stop observing. Returns `false` if the observation was not active.
    fn unobserve(&self, id: ObservationId) -> bool;
}

/// Marker-based element lookup (`querySelectorAll` on the web)
pub trait NodeQuery {
    /// All elements currently matching `marker`, in document order
    fn query_all(&self, marker: &str) -> Vec<NodeId>;

    /// Whether the host already applied `class` to `node`
    fn has_class(&self, _node: NodeId, _class: &str) -> bool {
        false
    }
}
