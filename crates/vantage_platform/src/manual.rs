//! Manually driven signal sources
//!
//! Hosts that receive signals from their own event loop push them in through
//! these types; tests use them to script visibility, motion preference and
//! scrolling. Listeners are always invoked with the internal lock released,
//! so a listener may subscribe, unsubscribe or read the source again.

use crate::error::Result;
use crate::intersection::{
    IntersectionCallback, IntersectionEntry, IntersectionSource, NodeId, NodeQuery,
    ObservationId, ObserveControl,
};
use crate::signal::{
    MotionCallback, MotionPreferenceSource, SubscriptionId, Visibility, VisibilityCallback,
    VisibilitySource,
};
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use std::sync::Mutex;

/// Listener list shared by the manual signal sources
struct Listeners<C> {
    entries: SmallVec<[(SubscriptionId, C); 4]>,
}

impl<C: Clone> Listeners<C> {
    fn new() -> Self {
        Self {
            entries: SmallVec::new(),
        }
    }

    fn add(&mut self, callback: C) -> SubscriptionId {
        let id = SubscriptionId::next();
        self.entries.push((id, callback));
        id
    }

    fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(existing, _)| *existing != id);
        self.entries.len() != before
    }

    fn snapshot(&self) -> SmallVec<[C; 4]> {
        self.entries.iter().map(|(_, cb)| cb.clone()).collect()
    }
}

struct SignalState<T, C> {
    value: T,
    listeners: Listeners<C>,
}

impl<T: Copy + PartialEq, C: Clone> SignalState<T, C> {
    /// Store `value`; returns the listeners to notify if it changed
    fn replace(&mut self, value: T) -> Option<SmallVec<[C; 4]>> {
        if self.value == value {
            return None;
        }
        self.value = value;
        Some(self.listeners.snapshot())
    }
}

// ============================================================================
// Visibility
// ============================================================================

/// Visibility source driven by [`ManualVisibility::set`]
pub struct ManualVisibility {
    state: Mutex<SignalState<Visibility, VisibilityCallback>>,
}

impl ManualVisibility {
    pub fn new(initial: Visibility) -> Self {
        Self {
            state: Mutex::new(SignalState {
                value: initial,
                listeners: Listeners::new(),
            }),
        }
    }

    /// Update visibility, notifying listeners if it changed
    pub fn set(&self, visibility: Visibility) -> bool {
        let listeners = self.state.lock().unwrap().replace(visibility);
        match listeners {
            Some(listeners) => {
                tracing::trace!("ManualVisibility: {:?}", visibility);
                for listener in listeners {
                    listener(visibility);
                }
                true
            }
            None => false,
        }
    }

    /// Number of registered listeners
    pub fn subscriber_count(&self) -> usize {
        self.state.lock().unwrap().listeners.entries.len()
    }
}

impl Default for ManualVisibility {
    fn default() -> Self {
        Self::new(Visibility::Visible)
    }
}

impl VisibilitySource for ManualVisibility {
    fn visibility(&self) -> Visibility {
        self.state.lock().unwrap().value
    }

    fn subscribe(&self, callback: VisibilityCallback) -> SubscriptionId {
        self.state.lock().unwrap().listeners.add(callback)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.state.lock().unwrap().listeners.remove(id)
    }
}

// ============================================================================
// Motion preference
// ============================================================================

/// Reduced-motion source driven by [`ManualMotionPreference::set`]
pub struct ManualMotionPreference {
    state: Mutex<SignalState<bool, MotionCallback>>,
}

impl ManualMotionPreference {
    pub fn new(reduced: bool) -> Self {
        Self {
            state: Mutex::new(SignalState {
                value: reduced,
                listeners: Listeners::new(),
            }),
        }
    }

    /// Update the preference, notifying listeners if it changed
    pub fn set(&self, reduced: bool) -> bool {
        let listeners = self.state.lock().unwrap().replace(reduced);
        match listeners {
            Some(listeners) => {
                tracing::trace!("ManualMotionPreference: reduced={}", reduced);
                for listener in listeners {
                    listener(reduced);
                }
                true
            }
            None => false,
        }
    }

    /// Number of registered listeners
    pub fn subscriber_count(&self) -> usize {
        self.state.lock().unwrap().listeners.entries.len()
    }
}

impl Default for ManualMotionPreference {
    fn default() -> Self {
        Self::new(false)
    }
}

impl MotionPreferenceSource for ManualMotionPreference {
    fn prefers_reduced_motion(&self) -> bool {
        self.state.lock().unwrap().value
    }

    fn subscribe(&self, callback: MotionCallback) -> SubscriptionId {
        self.state.lock().unwrap().listeners.add(callback)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.state.lock().unwrap().listeners.remove(id)
    }
}

// ============================================================================
// Intersection
// ============================================================================

struct Observation {
    node: NodeId,
    threshold: f32,
    callback: IntersectionCallback,
}

#[derive(Default)]
struct IntersectionState {
    observations: FxHashMap<ObservationId, Observation>,
    ratios: FxHashMap<NodeId, f32>,
}

/// Intersection source driven by [`ManualIntersection::set_ratio`]
///
/// Every node starts fully off screen. A new observation receives an entry
/// right away if its node already reaches the threshold; after that, entries
/// are delivered only when a ratio change crosses the threshold.
#[derive(Default)]
pub struct ManualIntersection {
    state: Mutex<IntersectionState>,
}

impl ManualIntersection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report how much of `node` is on screen (clamped to 0.0 - 1.0)
    pub fn set_ratio(&self, node: NodeId, ratio: f32) {
        let ratio = if ratio.is_nan() {
            0.0
        } else {
            ratio.clamp(0.0, 1.0)
        };

        let mut targets: SmallVec<[(ObservationId, IntersectionCallback); 4]> = {
            let mut state = self.state.lock().unwrap();
            let previous = state.ratios.insert(node, ratio).unwrap_or(0.0);
            let before = IntersectionEntry {
                node,
                ratio: previous,
            };
            let after = IntersectionEntry { node, ratio };
            state
                .observations
                .iter()
                .filter(|(_, obs)| {
                    obs.node == node && before.reaches(obs.threshold) != after.reaches(obs.threshold)
                })
                .map(|(id, obs)| (*id, obs.callback.clone()))
                .collect()
        };
        targets.sort_by_key(|(id, _)| *id);

        let entry = IntersectionEntry { node, ratio };
        for (id, callback) in targets {
            if callback(&entry) == ObserveControl::Stop {
                self.unobserve(id);
            }
        }
    }

    /// Number of active observations
    pub fn observation_count(&self) -> usize {
        self.state.lock().unwrap().observations.len()
    }

    /// Whether `node` is currently observed by anyone
    pub fn is_observed(&self, node: NodeId) -> bool {
        self.state
            .lock()
            .unwrap()
            .observations
            .values()
            .any(|obs| obs.node == node)
    }
}

impl IntersectionSource for ManualIntersection {
    fn observe(
        &self,
        node: NodeId,
        threshold: f32,
        callback: IntersectionCallback,
    ) -> Result<ObservationId> {
        let id = ObservationId::next();
        let ratio = {
            let mut state = self.state.lock().unwrap();
            state.observations.insert(
                id,
                Observation {
                    node,
                    threshold,
                    callback: callback.clone(),
                },
            );
            state.ratios.get(&node).copied().unwrap_or(0.0)
        };

        let entry = IntersectionEntry { node, ratio };
        if entry.reaches(threshold) && callback(&entry) == ObserveControl::Stop {
            self.unobserve(id);
        }
        Ok(id)
    }

    fn unobserve(&self, id: ObservationId) -> bool {
        self.state.lock().unwrap().observations.remove(&id).is_some()
    }
}

// ============================================================================
// Element lookup
// ============================================================================

/// Fixed marker-to-node table implementing [`NodeQuery`]
#[derive(Debug, Default, Clone)]
pub struct StaticNodes {
    markers: FxHashMap<String, Vec<NodeId>>,
    classes: FxHashSet<(NodeId, String)>,
}

impl StaticNodes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the nodes matching `marker`, in document order
    pub fn with_marker(mut self, marker: &str, nodes: impl IntoIterator<Item = NodeId>) -> Self {
        self.markers
            .entry(marker.to_string())
            .or_default()
            .extend(nodes);
        self
    }

    /// Record that the host already applied `class` to `node`
    pub fn with_class(mut self, node: NodeId, class: &str) -> Self {
        self.classes.insert((node, class.to_string()));
        self
    }
}

impl NodeQuery for StaticNodes {
    fn query_all(&self, marker: &str) -> Vec<NodeId> {
        self.markers.get(marker).cloned().unwrap_or_default()
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.classes.contains(&(node, class.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_visibility_notifies_on_change_only() {
        let source = ManualVisibility::default();
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = Arc::clone(&calls);
        let id = source.subscribe(Arc::new(move |_| {
            calls_clone.fetch_add(1, Ordering::SeqCst);
        }));

        assert!(!source.set(Visibility::Visible));
        assert!(source.set(Visibility::Hidden));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(source.visibility(), Visibility::Hidden);

        assert!(source.unsubscribe(id));
        assert!(!source.unsubscribe(id));
        source.set(Visibility::Visible);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(source.subscriber_count(), 0);
    }

    #[test]
    fn test_listener_may_unsubscribe_itself() {
        let source = Arc::new(ManualMotionPreference::default());
        let slot: Arc<Mutex<Option<SubscriptionId>>> = Arc::new(Mutex::new(None));

        let source_clone = Arc::clone(&source);
        let slot_clone = Arc::clone(&slot);
        let id = source.subscribe(Arc::new(move |_| {
            if let Some(id) = slot_clone.lock().unwrap().take() {
                source_clone.unsubscribe(id);
            }
        }));
        *slot.lock().unwrap() = Some(id);

        source.set(true);
        assert_eq!(source.subscriber_count(), 0);
        assert!(source.prefers_reduced_motion());
    }

    #[test]
    fn test_intersection_delivers_on_crossing() {
        let source = ManualIntersection::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);
        source
            .observe(
                NodeId(7),
                0.5,
                Arc::new(move |entry: &IntersectionEntry| {
                    seen_clone.lock().unwrap().push(entry.ratio);
                    ObserveControl::Continue
                }),
            )
            .unwrap();

        source.set_ratio(NodeId(7), 0.2);
        source.set_ratio(NodeId(7), 0.6);
        source.set_ratio(NodeId(7), 0.9);
        source.set_ratio(NodeId(7), 0.1);

        assert_eq!(*seen.lock().unwrap(), vec![0.6, 0.1]);
    }

    #[test]
    fn test_intersection_stop_removes_observation() {
        let source = ManualIntersection::new();
        source
            .observe(NodeId(1), 0.1, Arc::new(|_: &IntersectionEntry| ObserveControl::Stop))
            .unwrap();
        assert!(source.is_observed(NodeId(1)));

        source.set_ratio(NodeId(1), 1.0);
        assert!(!source.is_observed(NodeId(1)));
        assert_eq!(source.observation_count(), 0);
    }

    #[test]
    fn test_observe_reports_node_already_on_screen() {
        let source = ManualIntersection::new();
        source.set_ratio(NodeId(3), 0.8);

        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);
        source
            .observe(
                NodeId(3),
                0.5,
                Arc::new(move |entry: &IntersectionEntry| {
                    seen_clone.lock().unwrap().push(entry.ratio);
                    ObserveControl::Stop
                }),
            )
            .unwrap();

        assert_eq!(*seen.lock().unwrap(), vec![0.8]);
        assert!(!source.is_observed(NodeId(3)));

        // Below the threshold: nothing until a crossing
        source.set_ratio(NodeId(4), 0.2);
        source
            .observe(NodeId(4), 0.5, Arc::new(|_: &IntersectionEntry| ObserveControl::Stop))
            .unwrap();
        assert!(source.is_observed(NodeId(4)));
    }

    #[test]
    fn test_static_nodes_query() {
        let nodes = StaticNodes::new()
            .with_marker("[data-reveal]", [NodeId(1), NodeId(2)])
            .with_class(NodeId(2), "reveal-in");

        assert_eq!(nodes.query_all("[data-reveal]"), vec![NodeId(1), NodeId(2)]);
        assert!(nodes.query_all(".missing").is_empty());
        assert!(nodes.has_class(NodeId(2), "reveal-in"));
        assert!(!nodes.has_class(NodeId(1), "reveal-in"));
    }
}
