//! Vantage page runtime
//!
//! Owns the interval scheduler and the manually driven signal sources that
//! every section on a page is mounted against.

use crate::carousel::{CarouselEngine, CarouselOptions};
use crate::config::VantageConfig;
use crate::deck::SlideDeck;
use crate::reveal::RevealObserver;
use std::sync::Arc;
use std::time::Duration;
use vantage_animation::IntervalScheduler;
use vantage_platform::{ManualIntersection, ManualMotionPreference, ManualVisibility, NodeQuery};

/// The page runtime - owns the timers and signals shared by all sections
pub struct PageRuntime {
    pub scheduler: Arc<IntervalScheduler>,
    pub visibility: Arc<ManualVisibility>,
    pub motion: Arc<ManualMotionPreference>,
    pub intersection: Arc<ManualIntersection>,
    config: VantageConfig,
}

impl PageRuntime {
    pub fn new() -> Self {
        Self::with_config(VantageConfig::default())
    }

    pub fn with_config(config: VantageConfig) -> Self {
        Self {
            scheduler: Arc::new(IntervalScheduler::new()),
            visibility: Arc::new(ManualVisibility::default()),
            motion: Arc::new(ManualMotionPreference::default()),
            intersection: Arc::new(ManualIntersection::new()),
            config,
        }
    }

    pub fn config(&self) -> &VantageConfig {
        &self.config
    }

    /// Make this runtime's scheduler the process-wide default timer
    ///
    /// Only the first call in a process takes effect; returns whether this
    /// one did. Never panics, even when called from several threads.
    pub fn install_global(&self) -> bool {
        let installed = vantage_animation::try_set_global_scheduler(self.scheduler.handle());
        if !installed {
            tracing::warn!("PageRuntime: global scheduler already installed");
        }
        installed
    }

    /// Mount a carousel with the configured options
    pub fn carousel(&self, length: usize) -> CarouselEngine {
        self.carousel_with(length, self.config.carousel.clone())
    }

    pub fn carousel_with(&self, length: usize, options: CarouselOptions) -> CarouselEngine {
        CarouselEngine::builder(length)
            .options(options)
            .timer(self.scheduler.clone())
            .visibility(self.visibility.clone())
            .motion(self.motion.clone())
            .build()
    }

    /// Mount a carousel over `items` with the configured options
    pub fn deck<T>(&self, items: Vec<T>) -> SlideDeck<T> {
        let engine = self.carousel(items.len());
        SlideDeck::with_engine(items, engine)
    }

    /// Mount a reveal section over the elements `nodes` resolves
    pub fn reveal(&self, nodes: &dyn NodeQuery) -> RevealObserver {
        RevealObserver::builder()
            .options(self.config.reveal.clone())
            .motion(self.motion.clone())
            .intersection(self.intersection.clone())
            .mount(nodes)
    }

    /// Advance page time, firing due timers
    pub fn advance(&self, dt: Duration) -> usize {
        self.scheduler.advance(dt)
    }

    /// Advance by wall-clock time; call once per frame
    pub fn tick(&self) -> usize {
        self.scheduler.tick()
    }

    /// Get statistics about the runtime
    pub fn stats(&self) -> RuntimeStats {
        RuntimeStats {
            timer_count: self.scheduler.interval_count(),
            visibility_subscribers: self.visibility.subscriber_count(),
            motion_subscribers: self.motion.subscriber_count(),
            observation_count: self.intersection.observation_count(),
        }
    }
}

impl Default for PageRuntime {
    fn default() -> Self {
        Self::new()
    }
}

/// Statistics about the runtime
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuntimeStats {
    pub timer_count: usize,
    pub visibility_subscribers: usize,
    pub motion_subscribers: usize,
    pub observation_count: usize,
}

impl RuntimeStats {
    /// Nothing is holding a timer, a listener or an observation
    pub fn is_quiescent(&self) -> bool {
        *self == RuntimeStats::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vantage_platform::{NodeId, StaticNodes, Visibility};

    #[test]
    fn test_runtime_integration() {
        let mut config = VantageConfig::default();
        config.carousel.autoplay_ms = 1000;
        let runtime = PageRuntime::with_config(config);

        let mut carousel = runtime.carousel(3);
        let nodes = StaticNodes::new().with_marker("[data-reveal]", [NodeId(1), NodeId(2)]);
        let mut reveal = runtime.reveal(&nodes);

        let stats = runtime.stats();
        assert_eq!(stats.timer_count, 1);
        assert_eq!(stats.visibility_subscribers, 1);
        assert_eq!(stats.motion_subscribers, 1);
        assert_eq!(stats.observation_count, 2);

        runtime.advance(Duration::from_millis(1000));
        assert_eq!(carousel.index(), 1);

        runtime.intersection.set_ratio(NodeId(1), 1.0);
        assert!(reveal.is_revealed(NodeId(1)));
        assert_eq!(runtime.stats().observation_count, 1);

        runtime.visibility.set(Visibility::Hidden);
        assert_eq!(runtime.stats().timer_count, 0);

        carousel.teardown();
        reveal.teardown();
        assert!(runtime.stats().is_quiescent());
    }

    #[test]
    fn test_deck_uses_configured_options() {
        let mut config = VantageConfig::default();
        config.carousel.initial = 2;
        let runtime = PageRuntime::with_config(config);

        let deck = runtime.deck(vec!["a", "b", "c"]);
        assert_eq!(deck.current(), Some(&"c"));
        // No autoplay: only the motion preference is subscribed
        assert_eq!(
            runtime.stats(),
            RuntimeStats {
                motion_subscribers: 1,
                ..Default::default()
            }
        );
    }
}
