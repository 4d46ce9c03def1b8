//! Reveal-on-scroll
//!
//! A [`RevealObserver`] captures every element matching a marker when it is
//! mounted and flips each one from [`RevealPhase::Initial`] to
//! [`RevealPhase::Revealed`] the first time enough of it scrolls into view.
//! The flip is one-shot: observation of an element ends the moment it is
//! revealed.
//!
//! With reduced motion, or on a host without intersection reporting, every
//! element is revealed at mount.

use crate::lifecycle::Teardown;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::hash_map::Entry;
use std::sync::{Arc, Mutex, Weak};
use vantage_platform::{
    IntersectionEntry, IntersectionSource, MotionPreferenceSource, NoIntersection,
    NoMotionPreference, NodeId, NodeQuery, ObservationId, ObserveControl,
};

/// Marker matched when none is configured
pub const DEFAULT_MARKER: &str = "[data-reveal]";

/// Visible fraction that triggers a reveal when none is configured
pub const DEFAULT_THRESHOLD: f32 = 0.12;

/// Reveal configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealOptions {
    /// Selector the host resolves into elements
    pub marker: String,
    /// Fraction of an element (0.0 - 1.0) that must be visible
    pub threshold: f32,
}

impl Default for RevealOptions {
    fn default() -> Self {
        Self {
            marker: DEFAULT_MARKER.to_string(),
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl RevealOptions {
    /// Clamp the threshold into range, replacing NaN with the default
    pub fn normalized(mut self) -> Self {
        self.threshold = if self.threshold.is_nan() {
            DEFAULT_THRESHOLD
        } else {
            self.threshold.clamp(0.0, 1.0)
        };
        self
    }
}

/// Where an element is in its reveal
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RevealPhase {
    /// Hidden, waiting to scroll into view
    Initial,
    /// Shown; never goes back
    Revealed,
}

impl RevealPhase {
    /// CSS class the host applies for this phase
    pub fn css_class(self) -> &'static str {
        match self {
            RevealPhase::Initial => "reveal-init",
            RevealPhase::Revealed => "reveal-in",
        }
    }

    pub fn is_revealed(self) -> bool {
        self == RevealPhase::Revealed
    }
}

/// How a mounted observer is revealing its elements
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RevealMode {
    /// Nothing matched the marker
    Empty,
    /// Everything was revealed at mount
    Immediate,
    /// Elements are revealed as they scroll into view
    Observing,
}

/// Called once for each element that gets revealed
pub type RevealListener = Arc<dyn Fn(NodeId) + Send + Sync>;

struct Element {
    node: NodeId,
    phase: RevealPhase,
    observation: Option<ObservationId>,
}

#[derive(Default)]
struct RevealShared {
    elements: Vec<Element>,
    /// Slot of each captured node
    slots: FxHashMap<NodeId, usize>,
    listeners: SmallVec<[RevealListener; 2]>,
    torn_down: bool,
}

/// Mark element `slot` revealed and notify listeners outside the lock
fn reveal(shared: &Mutex<RevealShared>, slot: usize) {
    let (node, listeners) = {
        let mut state = shared.lock().unwrap();
        let element = &mut state.elements[slot];
        if element.phase.is_revealed() {
            return;
        }
        element.phase = RevealPhase::Revealed;
        element.observation = None;
        let node = element.node;
        (node, state.listeners.clone())
    };

    tracing::trace!("RevealObserver: revealed {:?}", node);
    for listener in listeners {
        listener(node);
    }
}

/// Builder for [`RevealObserver`]
pub struct RevealBuilder {
    options: RevealOptions,
    motion: Option<Arc<dyn MotionPreferenceSource>>,
    intersection: Option<Arc<dyn IntersectionSource>>,
    listeners: SmallVec<[RevealListener; 2]>,
}

impl RevealBuilder {
    pub fn options(mut self, options: RevealOptions) -> Self {
        self.options = options;
        self
    }

    pub fn marker(mut self, marker: impl Into<String>) -> Self {
        self.options.marker = marker.into();
        self
    }

    pub fn threshold(mut self, threshold: f32) -> Self {
        self.options.threshold = threshold;
        self
    }

    pub fn motion(mut self, source: Arc<dyn MotionPreferenceSource>) -> Self {
        self.motion = Some(source);
        self
    }

    pub fn intersection(mut self, source: Arc<dyn IntersectionSource>) -> Self {
        self.intersection = Some(source);
        self
    }

    /// Register a callback run once per revealed element
    pub fn on_reveal<F>(mut self, listener: F) -> Self
    where
        F: Fn(NodeId) + Send + Sync + 'static,
    {
        self.listeners.push(Arc::new(listener));
        self
    }

    /// Capture the matching elements and start revealing them
    pub fn mount(self, nodes: &dyn NodeQuery) -> RevealObserver {
        let RevealBuilder {
            options,
            motion,
            intersection,
            listeners,
        } = self;
        let options = options.normalized();

        // A node listed twice is still one element
        let mut slots = FxHashMap::default();
        let mut matched = nodes.query_all(&options.marker);
        matched.retain(|&node| {
            let slot = slots.len();
            match slots.entry(node) {
                Entry::Occupied(_) => false,
                Entry::Vacant(entry) => {
                    entry.insert(slot);
                    true
                }
            }
        });
        if matched.is_empty() {
            tracing::debug!("RevealObserver: no elements match {:?}", options.marker);
            return RevealObserver {
                shared: Arc::new(Mutex::new(RevealShared::default())),
                mode: RevealMode::Empty,
                options,
                lifecycle: Teardown::new(),
            };
        }

        let shared = Arc::new(Mutex::new(RevealShared {
            slots,
            elements: matched
                .iter()
                .map(|&node| Element {
                    node,
                    // Already revealed by an earlier mount of the same page
                    phase: if nodes.has_class(node, RevealPhase::Revealed.css_class()) {
                        RevealPhase::Revealed
                    } else {
                        RevealPhase::Initial
                    },
                    observation: None,
                })
                .collect(),
            listeners,
            torn_down: false,
        }));

        let motion = motion.unwrap_or_else(|| Arc::new(NoMotionPreference));
        if motion.prefers_reduced_motion() {
            tracing::debug!(
                "RevealObserver: reduced motion, revealing {} elements",
                matched.len()
            );
            for slot in 0..matched.len() {
                reveal(&shared, slot);
            }
            return RevealObserver {
                shared,
                mode: RevealMode::Immediate,
                options,
                lifecycle: Teardown::new(),
            };
        }

        let intersection = intersection.unwrap_or_else(|| Arc::new(NoIntersection));
        let mut observing = 0;
        for (slot, &node) in matched.iter().enumerate() {
            if shared.lock().unwrap().elements[slot].phase.is_revealed() {
                continue;
            }

            let weak: Weak<Mutex<RevealShared>> = Arc::downgrade(&shared);
            let threshold = options.threshold;
            let result = intersection.observe(
                node,
                threshold,
                Arc::new(move |entry: &IntersectionEntry| {
                    let Some(shared) = weak.upgrade() else {
                        return ObserveControl::Stop;
                    };
                    if shared.lock().unwrap().torn_down {
                        return ObserveControl::Stop;
                    }
                    if entry.reaches(threshold) {
                        reveal(&shared, slot);
                        ObserveControl::Stop
                    } else {
                        ObserveControl::Continue
                    }
                }),
            );

            match result {
                Ok(id) => {
                    let mut state = shared.lock().unwrap();
                    let element = &mut state.elements[slot];
                    // The source may report synchronously and stop before we get here
                    if !element.phase.is_revealed() {
                        element.observation = Some(id);
                        observing += 1;
                    }
                }
                Err(err) => {
                    tracing::warn!(
                        "RevealObserver: cannot observe {:?}, revealing now: {}",
                        node,
                        err
                    );
                    reveal(&shared, slot);
                }
            }
        }

        let mut lifecycle = Teardown::new();
        {
            let shared = Arc::clone(&shared);
            let intersection = Arc::clone(&intersection);
            lifecycle.defer(move || {
                let ids: SmallVec<[ObservationId; 8]> = {
                    let mut state = shared.lock().unwrap();
                    state.torn_down = true;
                    state
                        .elements
                        .iter_mut()
                        .filter_map(|element| element.observation.take())
                        .collect()
                };
                for id in ids {
                    intersection.unobserve(id);
                }
            });
        }

        let mode = if observing > 0 {
            RevealMode::Observing
        } else {
            RevealMode::Immediate
        };
        tracing::debug!(
            "RevealObserver: mounted {} elements, observing {} ({:?})",
            matched.len(),
            observing,
            mode
        );

        RevealObserver {
            shared,
            mode,
            options,
            lifecycle,
        }
    }
}

/// One-shot reveal of the elements in a section
pub struct RevealObserver {
    shared: Arc<Mutex<RevealShared>>,
    mode: RevealMode,
    options: RevealOptions,
    lifecycle: Teardown,
}

impl RevealObserver {
    pub fn builder() -> RevealBuilder {
        RevealBuilder {
            options: RevealOptions::default(),
            motion: None,
            intersection: None,
            listeners: SmallVec::new(),
        }
    }

    /// Mount with fallback sources: everything is revealed at once
    pub fn mount(nodes: &dyn NodeQuery, options: RevealOptions) -> Self {
        Self::builder().options(options).mount(nodes)
    }

    pub fn mode(&self) -> RevealMode {
        self.mode
    }

    /// Options in effect, after normalization
    pub fn options(&self) -> &RevealOptions {
        &self.options
    }

    /// Captured elements, in document order
    pub fn nodes(&self) -> Vec<NodeId> {
        let state = self.shared.lock().unwrap();
        state.elements.iter().map(|element| element.node).collect()
    }

    /// Phase of `node`, or `None` if it was not captured at mount
    pub fn phase(&self, node: NodeId) -> Option<RevealPhase> {
        let state = self.shared.lock().unwrap();
        state
            .slots
            .get(&node)
            .map(|&slot| state.elements[slot].phase)
    }

    pub fn is_revealed(&self, node: NodeId) -> bool {
        self.phase(node).is_some_and(RevealPhase::is_revealed)
    }

    /// Every captured element with its current phase
    pub fn phases(&self) -> Vec<(NodeId, RevealPhase)> {
        let state = self.shared.lock().unwrap();
        state
            .elements
            .iter()
            .map(|element| (element.node, element.phase))
            .collect()
    }

    pub fn revealed_count(&self) -> usize {
        let state = self.shared.lock().unwrap();
        state
            .elements
            .iter()
            .filter(|element| element.phase.is_revealed())
            .count()
    }

    /// Elements still being observed
    pub fn pending_count(&self) -> usize {
        let state = self.shared.lock().unwrap();
        state
            .elements
            .iter()
            .filter(|element| element.observation.is_some())
            .count()
    }

    /// Cancel every outstanding observation; later calls do nothing
    pub fn teardown(&mut self) -> bool {
        let released = self.lifecycle.release();
        if released {
            tracing::debug!("RevealObserver: torn down");
        }
        released
    }

    pub fn is_torn_down(&self) -> bool {
        self.lifecycle.is_released()
    }
}

impl std::fmt::Debug for RevealObserver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RevealObserver")
            .field("mode", &self.mode)
            .field("options", &self.options)
            .field("phases", &self.phases())
            .field("lifecycle", &self.lifecycle)
            .finish()
    }
}
