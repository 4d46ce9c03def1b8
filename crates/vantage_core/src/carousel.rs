//! Carousel engine
//!
//! Owns the current slide index of one carousel and, optionally, its autoplay
//! timer. Navigation goes through [`next_index`]; autoplay goes through the
//! [`autoplay`](crate::autoplay) state machine.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use std::time::Duration;
//! use vantage_animation::IntervalScheduler;
//! use vantage_core::{CarouselEngine, CarouselOptions};
//!
//! let scheduler = Arc::new(IntervalScheduler::new());
//! let carousel = CarouselEngine::builder(3)
//!     .options(CarouselOptions { autoplay_ms: 1000, ..Default::default() })
//!     .timer(scheduler.clone())
//!     .build();
//!
//! scheduler.advance(Duration::from_millis(2000));
//! assert_eq!(carousel.index(), 2);
//! ```
//!
//! # Shared state
//!
//! The timer and the signal sources call back into the engine, so its state
//! lives behind `Arc<Mutex<_>>` and every callback holds only a `Weak`
//! reference. A callback that fires after the engine is gone does nothing.

use crate::autoplay::{self, AutoplayAction, AutoplayEvent, AutoplayState, Gates};
use crate::index::{next_index, wrap_index};
use crate::lifecycle::Teardown;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;
use vantage_platform::{
    AlwaysVisible, InteractionEvent, IntervalId, IntervalTimer, MotionPreferenceSource,
    NoMotionPreference, TickCallback, Visibility, VisibilitySource,
};

/// Carousel configuration
///
/// Every field is optional in serialized form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarouselOptions {
    /// Autoplay period in milliseconds; 0 disables autoplay
    pub autoplay_ms: u64,
    /// Starting slide, wrapped into range
    pub initial: i64,
    /// Pause autoplay while the pointer hovers or a touch is active
    pub pause_on_hover: bool,
    /// Pause autoplay while focus is inside the carousel
    pub pause_on_focus: bool,
}

impl Default for CarouselOptions {
    fn default() -> Self {
        Self {
            autoplay_ms: 0,
            initial: 0,
            pause_on_hover: true,
            pause_on_focus: true,
        }
    }
}

impl CarouselOptions {
    /// Options with autoplay every `ms` milliseconds
    pub fn autoplay(ms: u64) -> Self {
        Self {
            autoplay_ms: ms,
            ..Default::default()
        }
    }

    fn accepts(&self, event: InteractionEvent) -> bool {
        if event.is_focus() {
            self.pause_on_focus
        } else {
            self.pause_on_hover
        }
    }
}

/// Everything currently holding autoplay paused
///
/// Hover, touch and focus are tracked separately because they overlap: the
/// pointer leaving does not resume autoplay while focus is still inside.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PauseSources {
    pub manual: bool,
    pub hover: bool,
    pub touch: bool,
    pub focus: bool,
}

impl PauseSources {
    pub fn any(&self) -> bool {
        self.manual || self.hover || self.touch || self.focus
    }

    fn apply(&mut self, event: InteractionEvent) {
        match event {
            InteractionEvent::PointerEntered => self.hover = true,
            InteractionEvent::PointerLeft => self.hover = false,
            InteractionEvent::TouchStarted => self.touch = true,
            InteractionEvent::TouchEnded => self.touch = false,
            InteractionEvent::FocusGained => self.focus = true,
            InteractionEvent::FocusLost => self.focus = false,
        }
    }
}

/// Point-in-time view of a carousel
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CarouselState {
    pub length: usize,
    pub index: usize,
    pub paused: bool,
    pub reduced_motion: bool,
    pub autoplay_ms: u64,
    pub autoplay: AutoplayState,
}

/// Mutable state shared with timer and signal callbacks
struct Shared {
    length: usize,
    /// Last position; kept while the length is 0 so it can be re-wrapped
    cursor: usize,
    pause: PauseSources,
    reduced_motion: bool,
    visibility: Visibility,
    autoplay: AutoplayState,
    timer: Option<IntervalId>,
    advances: u64,
}

impl Shared {
    fn index(&self) -> usize {
        if self.length == 0 {
            0
        } else {
            self.cursor
        }
    }

    fn gates(&self) -> Gates {
        Gates {
            paused: self.pause.any(),
            reduced_motion: self.reduced_motion,
            visible: self.visibility.is_visible(),
        }
    }

    fn step_by(&mut self, delta: i64) {
        self.cursor = next_index(self.index() as i64, delta, self.length as i64);
    }
}

/// Feed one event through the state machine
///
/// Applies `update` first so the gates reflect the event, then performs
/// `Advance` in place. Timer effects are returned for the caller, which is
/// the only place holding the timer.
fn step(
    shared: &Mutex<Shared>,
    event: AutoplayEvent,
    update: impl FnOnce(&mut Shared),
) -> AutoplayAction {
    let mut state = shared.lock().unwrap();
    update(&mut state);
    let (next, action) = autoplay::transition(state.autoplay, event, state.gates());
    if next != state.autoplay {
        tracing::trace!(
            "Carousel: {:?} --{:?}--> {:?}",
            state.autoplay,
            event,
            next
        );
        state.autoplay = next;
    }
    if action == AutoplayAction::Advance {
        state.step_by(1);
        state.advances += 1;
    }
    action
}

/// The timer a carousel autoplays with
#[derive(Clone)]
struct TimerBinding {
    timer: Arc<dyn IntervalTimer>,
    period: Duration,
}

impl TimerBinding {
    fn start(&self, shared: &Arc<Mutex<Shared>>) {
        let weak = Arc::downgrade(shared);
        let callback: TickCallback = Box::new(move || {
            if let Some(shared) = weak.upgrade() {
                step(&shared, AutoplayEvent::Tick, |_| {});
            }
        });

        match self.timer.set_interval(self.period, callback) {
            Ok(id) => {
                tracing::debug!("Carousel: autoplay timer started ({:?})", self.period);
                let previous = shared.lock().unwrap().timer.replace(id);
                if let Some(previous) = previous {
                    self.timer.clear_interval(previous);
                }
            }
            Err(err) => {
                tracing::warn!("Carousel: autoplay disabled, timer unavailable: {}", err);
                shared.lock().unwrap().autoplay = AutoplayState::Idle;
            }
        }
    }

    fn stop(&self, shared: &Mutex<Shared>) {
        let id = shared.lock().unwrap().timer.take();
        if let Some(id) = id {
            tracing::debug!("Carousel: autoplay timer stopped");
            self.timer.clear_interval(id);
        }
    }

    fn apply(&self, shared: &Arc<Mutex<Shared>>, action: AutoplayAction) {
        match action {
            AutoplayAction::StartTimer => self.start(shared),
            AutoplayAction::StopTimer | AutoplayAction::Release => self.stop(shared),
            AutoplayAction::None | AutoplayAction::Advance => {}
        }
    }
}

/// Builder for [`CarouselEngine`]
///
/// Signal sources default to the fail-open fallbacks; the timer defaults to
/// the global scheduler when one is installed.
pub struct CarouselBuilder {
    length: usize,
    options: CarouselOptions,
    visibility: Option<Arc<dyn VisibilitySource>>,
    motion: Option<Arc<dyn MotionPreferenceSource>>,
    timer: Option<Arc<dyn IntervalTimer>>,
}

impl CarouselBuilder {
    pub fn length(mut self, length: usize) -> Self {
        self.length = length;
        self
    }

    pub fn options(mut self, options: CarouselOptions) -> Self {
        self.options = options;
        self
    }

    pub fn autoplay_ms(mut self, ms: u64) -> Self {
        self.options.autoplay_ms = ms;
        self
    }

    pub fn initial(mut self, initial: i64) -> Self {
        self.options.initial = initial;
        self
    }

    pub fn visibility(mut self, source: Arc<dyn VisibilitySource>) -> Self {
        self.visibility = Some(source);
        self
    }

    pub fn motion(mut self, source: Arc<dyn MotionPreferenceSource>) -> Self {
        self.motion = Some(source);
        self
    }

    pub fn timer(mut self, timer: Arc<dyn IntervalTimer>) -> Self {
        self.timer = Some(timer);
        self
    }

    /// Mount the carousel: sample signals, subscribe, start autoplay
    pub fn build(self) -> CarouselEngine {
        let CarouselBuilder {
            length,
            options,
            visibility,
            motion,
            timer,
        } = self;

        let visibility = visibility.unwrap_or_else(|| Arc::new(AlwaysVisible));
        let motion = motion.unwrap_or_else(|| Arc::new(NoMotionPreference));

        let shared = Arc::new(Mutex::new(Shared {
            length,
            cursor: wrap_index(options.initial, length),
            pause: PauseSources::default(),
            reduced_motion: motion.prefers_reduced_motion(),
            visibility: visibility.visibility(),
            autoplay: AutoplayState::Idle,
            timer: None,
            advances: 0,
        }));

        let binding = if options.autoplay_ms > 0 {
            let timer = timer.or_else(|| {
                vantage_animation::try_get_scheduler()
                    .map(|handle| Arc::new(handle) as Arc<dyn IntervalTimer>)
            });
            if timer.is_none() {
                tracing::warn!("Carousel: autoplay requested but no timer is available");
            }
            timer.map(|timer| TimerBinding {
                timer,
                period: Duration::from_millis(options.autoplay_ms),
            })
        } else {
            None
        };

        let mut lifecycle = Teardown::new();

        // Registered first so it runs last, after both listeners are gone
        {
            let shared = Arc::clone(&shared);
            let binding = binding.clone();
            lifecycle.defer(move || {
                let action = step(&shared, AutoplayEvent::Teardown, |_| {});
                if let Some(binding) = binding {
                    binding.apply(&shared, action);
                }
            });
        }

        {
            let weak = Arc::downgrade(&shared);
            let id = motion.subscribe(Arc::new(move |reduced| {
                if let Some(shared) = weak.upgrade() {
                    step(&shared, AutoplayEvent::MotionChanged, |s| {
                        s.reduced_motion = reduced
                    });
                }
            }));
            let motion = Arc::clone(&motion);
            lifecycle.defer(move || {
                motion.unsubscribe(id);
            });
        }

        if let Some(binding) = &binding {
            let weak = Arc::downgrade(&shared);
            let callback_binding = binding.clone();
            let id = visibility.subscribe(Arc::new(move |v| {
                if let Some(shared) = weak.upgrade() {
                    let event = if v.is_visible() {
                        AutoplayEvent::Shown
                    } else {
                        AutoplayEvent::Hidden
                    };
                    let action = step(&shared, event, |s| s.visibility = v);
                    callback_binding.apply(&shared, action);
                }
            }));
            let visibility = Arc::clone(&visibility);
            lifecycle.defer(move || {
                visibility.unsubscribe(id);
            });
        }

        let action = {
            let mut state = shared.lock().unwrap();
            let (initial, action) = autoplay::initial(binding.is_some(), state.gates());
            state.autoplay = initial;
            action
        };
        if let Some(binding) = &binding {
            binding.apply(&shared, action);
        }

        tracing::debug!(
            "Carousel: mounted length={} autoplay_ms={} state={:?}",
            length,
            options.autoplay_ms,
            shared.lock().unwrap().autoplay
        );

        CarouselEngine {
            shared,
            options,
            lifecycle,
        }
    }
}

/// Index and autoplay controller for one carousel
pub struct CarouselEngine {
    shared: Arc<Mutex<Shared>>,
    options: CarouselOptions,
    lifecycle: Teardown,
}

impl CarouselEngine {
    /// Start building a carousel over `length` items
    pub fn builder(length: usize) -> CarouselBuilder {
        CarouselBuilder {
            length,
            options: CarouselOptions::default(),
            visibility: None,
            motion: None,
            timer: None,
        }
    }

    /// Mount a carousel with fallback signal sources
    pub fn new(length: usize, options: CarouselOptions) -> Self {
        Self::builder(length).options(options).build()
    }

    /// Current slide, always in `[0, len)`; 0 when empty
    pub fn index(&self) -> usize {
        self.shared.lock().unwrap().index()
    }

    pub fn len(&self) -> usize {
        self.shared.lock().unwrap().length
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn options(&self) -> &CarouselOptions {
        &self.options
    }

    /// Go to the next slide, wrapping to the first
    pub fn next(&self) -> usize {
        self.go(1)
    }

    /// Go to the previous slide, wrapping to the last
    pub fn prev(&self) -> usize {
        self.go(-1)
    }

    fn go(&self, delta: i64) -> usize {
        let mut state = self.shared.lock().unwrap();
        state.step_by(delta);
        state.index()
    }

    /// Jump to slide `target`, wrapped into range
    pub fn go_to(&self, target: i64) -> usize {
        let mut state = self.shared.lock().unwrap();
        state.cursor = next_index(0, target, state.length as i64);
        state.index()
    }

    /// Update the number of items, re-wrapping the current position
    ///
    /// Shrinking keeps the relative position by modulo rather than clamping.
    /// While the length is 0 the position is remembered and re-wrapped once
    /// items come back.
    pub fn set_length(&self, length: usize) -> usize {
        let mut state = self.shared.lock().unwrap();
        state.length = length;
        if length > 0 {
            state.cursor = wrap_index(state.cursor as i64, length);
        }
        state.index()
    }

    /// Pause autoplay until [`resume`](Self::resume)
    pub fn pause(&self) {
        step(&self.shared, AutoplayEvent::Paused, |s| s.pause.manual = true);
    }

    /// Resume autoplay, clearing every pause source including interactions
    pub fn resume(&self) {
        step(&self.shared, AutoplayEvent::Resumed, |s| {
            s.pause = PauseSources::default()
        });
    }

    pub fn is_paused(&self) -> bool {
        self.shared.lock().unwrap().pause.any()
    }

    pub fn pause_sources(&self) -> PauseSources {
        self.shared.lock().unwrap().pause
    }

    /// Forward a pointer, touch or focus interaction
    ///
    /// Returns `false` when the options disable this kind of interaction.
    pub fn interact(&self, event: InteractionEvent) -> bool {
        apply_interaction(&self.shared, &self.options, event)
    }

    /// Detached interaction handlers for the host UI to wire to its events
    pub fn bind(&self) -> CarouselBindings {
        CarouselBindings {
            shared: Arc::downgrade(&self.shared),
            options: self.options.clone(),
        }
    }

    pub fn reduced_motion(&self) -> bool {
        self.shared.lock().unwrap().reduced_motion
    }

    pub fn autoplay_state(&self) -> AutoplayState {
        self.shared.lock().unwrap().autoplay
    }

    /// Whether an autoplay interval is currently registered
    pub fn has_timer(&self) -> bool {
        self.shared.lock().unwrap().timer.is_some()
    }

    /// Slides advanced by autoplay so far
    pub fn autoplay_advances(&self) -> u64 {
        self.shared.lock().unwrap().advances
    }

    pub fn state(&self) -> CarouselState {
        let state = self.shared.lock().unwrap();
        CarouselState {
            length: state.length,
            index: state.index(),
            paused: state.pause.any(),
            reduced_motion: state.reduced_motion,
            autoplay_ms: self.options.autoplay_ms,
            autoplay: state.autoplay,
        }
    }

    /// Clear the timer and drop both signal subscriptions
    ///
    /// Safe to call any number of times; only the first call does anything.
    /// Dropping the engine tears it down as well.
    pub fn teardown(&mut self) -> bool {
        let released = self.lifecycle.release();
        if released {
            tracing::debug!("Carousel: torn down");
        }
        released
    }

    pub fn is_torn_down(&self) -> bool {
        self.lifecycle.is_released()
    }
}

impl std::fmt::Debug for CarouselEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CarouselEngine")
            .field("state", &self.state())
            .field("lifecycle", &self.lifecycle)
            .finish()
    }
}

fn apply_interaction(
    shared: &Mutex<Shared>,
    options: &CarouselOptions,
    event: InteractionEvent,
) -> bool {
    if !options.accepts(event) {
        return false;
    }
    let autoplay_event = if event.is_start() {
        AutoplayEvent::Paused
    } else {
        AutoplayEvent::Resumed
    };
    step(shared, autoplay_event, |s| s.pause.apply(event));
    true
}

/// Interaction handlers detached from the engine
///
/// Cheap to clone and `'static`, so the host can move one into each event
/// handler. Handlers do nothing once the engine is dropped.
#[derive(Clone)]
pub struct CarouselBindings {
    shared: Weak<Mutex<Shared>>,
    options: CarouselOptions,
}

impl CarouselBindings {
    /// Interactions the host should wire, per the pause options
    pub fn events(&self) -> SmallVec<[InteractionEvent; 6]> {
        [
            InteractionEvent::PointerEntered,
            InteractionEvent::PointerLeft,
            InteractionEvent::TouchStarted,
            InteractionEvent::TouchEnded,
            InteractionEvent::FocusGained,
            InteractionEvent::FocusLost,
        ]
        .into_iter()
        .filter(|event| self.options.accepts(*event))
        .collect()
    }

    /// Dispatch one interaction; `false` if disabled or the engine is gone
    pub fn dispatch(&self, event: InteractionEvent) -> bool {
        match self.shared.upgrade() {
            Some(shared) => apply_interaction(&shared, &self.options, event),
            None => false,
        }
    }

    pub fn pointer_entered(&self) -> bool {
        self.dispatch(InteractionEvent::PointerEntered)
    }

    pub fn pointer_left(&self) -> bool {
        self.dispatch(InteractionEvent::PointerLeft)
    }

    pub fn touch_started(&self) -> bool {
        self.dispatch(InteractionEvent::TouchStarted)
    }

    pub fn touch_ended(&self) -> bool {
        self.dispatch(InteractionEvent::TouchEnded)
    }

    pub fn focus_gained(&self) -> bool {
        self.dispatch(InteractionEvent::FocusGained)
    }

    pub fn focus_lost(&self) -> bool {
        self.dispatch(InteractionEvent::FocusLost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vantage_animation::IntervalScheduler;
    use vantage_platform::{ManualMotionPreference, ManualVisibility};

    struct Rig {
        scheduler: Arc<IntervalScheduler>,
        visibility: Arc<ManualVisibility>,
        motion: Arc<ManualMotionPreference>,
    }

    impl Rig {
        fn new() -> Self {
            Self {
                scheduler: Arc::new(IntervalScheduler::new()),
                visibility: Arc::new(ManualVisibility::default()),
                motion: Arc::new(ManualMotionPreference::default()),
            }
        }

        fn carousel(&self, length: usize, options: CarouselOptions) -> CarouselEngine {
            CarouselEngine::builder(length)
                .options(options)
                .timer(self.scheduler.clone())
                .visibility(self.visibility.clone())
                .motion(self.motion.clone())
                .build()
        }

        fn advance_ms(&self, ms: u64) {
            self.scheduler.advance(Duration::from_millis(ms));
        }
    }

    #[test]
    fn test_create_wraps_initial() {
        let carousel = CarouselEngine::new(
            5,
            CarouselOptions {
                initial: 7,
                ..Default::default()
            },
        );
        assert_eq!(carousel.index(), 2);

        let carousel = CarouselEngine::new(
            5,
            CarouselOptions {
                initial: -1,
                ..Default::default()
            },
        );
        assert_eq!(carousel.index(), 4);

        let empty = CarouselEngine::new(
            0,
            CarouselOptions {
                initial: 3,
                ..Default::default()
            },
        );
        assert_eq!(empty.index(), 0);
        assert!(empty.is_empty());
    }

    #[test]
    fn test_navigation_wraps() {
        let carousel = CarouselEngine::new(3, CarouselOptions::default());
        assert_eq!(carousel.prev(), 2);
        assert_eq!(carousel.next(), 0);
        assert_eq!(carousel.next(), 1);
        assert_eq!(carousel.go_to(5), 2);
        assert_eq!(carousel.go_to(-1), 2);
        assert_eq!(carousel.go_to(0), 0);
    }

    #[test]
    fn test_single_item_navigation_is_stable() {
        let carousel = CarouselEngine::new(1, CarouselOptions::default());
        assert_eq!(carousel.next(), 0);
        assert_eq!(carousel.prev(), 0);

        let empty = CarouselEngine::new(0, CarouselOptions::default());
        assert_eq!(empty.next(), 0);
        assert_eq!(empty.go_to(4), 0);
    }

    #[test]
    fn test_set_length_rewraps() {
        let carousel = CarouselEngine::new(5, CarouselOptions::default());
        carousel.go_to(4);
        assert_eq!(carousel.set_length(3), 1);
        assert_eq!(carousel.set_length(10), 1);
    }

    #[test]
    fn test_set_length_through_zero_keeps_position() {
        let carousel = CarouselEngine::new(5, CarouselOptions::default());
        carousel.go_to(2);
        assert_eq!(carousel.set_length(0), 0);
        assert_eq!(carousel.index(), 0);
        assert_eq!(carousel.set_length(3), 2);
    }

    #[test]
    fn test_no_autoplay_never_advances() {
        let rig = Rig::new();
        let carousel = rig.carousel(3, CarouselOptions::default());
        assert_eq!(carousel.autoplay_state(), AutoplayState::Idle);
        assert!(!carousel.has_timer());

        rig.advance_ms(60_000);
        assert_eq!(carousel.index(), 0);
        assert_eq!(rig.scheduler.interval_count(), 0);
        assert_eq!(rig.visibility.subscriber_count(), 0);
    }

    #[test]
    fn test_autoplay_advances_once_per_period() {
        let rig = Rig::new();
        let carousel = rig.carousel(3, CarouselOptions::autoplay(1000));
        assert_eq!(carousel.autoplay_state(), AutoplayState::Running);

        rig.advance_ms(999);
        assert_eq!(carousel.index(), 0);
        rig.advance_ms(1);
        assert_eq!(carousel.index(), 1);
        rig.advance_ms(2000);
        assert_eq!(carousel.index(), 0);
        assert_eq!(carousel.autoplay_advances(), 3);
    }

    #[test]
    fn test_pause_gates_ticks_without_stopping_timer() {
        let rig = Rig::new();
        let carousel = rig.carousel(3, CarouselOptions::autoplay(1000));

        carousel.pause();
        carousel.pause();
        assert_eq!(carousel.autoplay_state(), AutoplayState::Suspended);
        rig.advance_ms(5000);
        assert_eq!(carousel.index(), 0);
        assert!(carousel.has_timer());

        carousel.resume();
        carousel.resume();
        assert_eq!(carousel.autoplay_state(), AutoplayState::Running);
        rig.advance_ms(1000);
        assert_eq!(carousel.index(), 1);
    }

    #[test]
    fn test_reduced_motion_gates_ticks() {
        let rig = Rig::new();
        rig.motion.set(true);
        let carousel = rig.carousel(3, CarouselOptions::autoplay(1000));
        assert!(carousel.reduced_motion());
        assert_eq!(carousel.autoplay_state(), AutoplayState::Suspended);

        rig.advance_ms(3000);
        assert_eq!(carousel.index(), 0);

        rig.motion.set(false);
        assert_eq!(carousel.autoplay_state(), AutoplayState::Running);
        rig.advance_ms(1000);
        assert_eq!(carousel.index(), 1);
    }

    #[test]
    fn test_hidden_page_stops_and_restarts_timer() {
        let rig = Rig::new();
        let carousel = rig.carousel(5, CarouselOptions::autoplay(1000));

        rig.advance_ms(1500);
        assert_eq!(carousel.index(), 1);

        rig.visibility.set(Visibility::Hidden);
        assert_eq!(carousel.autoplay_state(), AutoplayState::Stopped);
        assert!(!carousel.has_timer());
        assert_eq!(rig.scheduler.interval_count(), 0);
        rig.advance_ms(10_000);
        assert_eq!(carousel.index(), 1);

        rig.visibility.set(Visibility::Visible);
        assert_eq!(carousel.autoplay_state(), AutoplayState::Running);
        assert_eq!(rig.scheduler.interval_count(), 1);
        // Fresh timer: a full period from the moment the page came back
        rig.advance_ms(999);
        assert_eq!(carousel.index(), 1);
        rig.advance_ms(1);
        assert_eq!(carousel.index(), 2);
    }

    #[test]
    fn test_mounted_hidden_starts_stopped() {
        let rig = Rig::new();
        rig.visibility.set(Visibility::Hidden);
        let carousel = rig.carousel(3, CarouselOptions::autoplay(1000));
        assert_eq!(carousel.autoplay_state(), AutoplayState::Stopped);
        assert!(!carousel.has_timer());

        rig.visibility.set(Visibility::Visible);
        rig.advance_ms(1000);
        assert_eq!(carousel.index(), 1);
    }

    #[test]
    fn test_hover_and_focus_overlap() {
        let rig = Rig::new();
        let carousel = rig.carousel(3, CarouselOptions::autoplay(1000));

        assert!(carousel.interact(InteractionEvent::FocusGained));
        assert!(carousel.interact(InteractionEvent::PointerEntered));
        assert!(carousel.interact(InteractionEvent::PointerLeft));
        // Focus is still inside
        assert!(carousel.is_paused());
        rig.advance_ms(2000);
        assert_eq!(carousel.index(), 0);

        carousel.interact(InteractionEvent::FocusLost);
        assert!(!carousel.is_paused());
        rig.advance_ms(1000);
        assert_eq!(carousel.index(), 1);
    }

    #[test]
    fn test_leave_without_enter_sets_state_explicitly() {
        let carousel = CarouselEngine::new(3, CarouselOptions::default());
        carousel.interact(InteractionEvent::PointerLeft);
        carousel.interact(InteractionEvent::PointerLeft);
        assert!(!carousel.is_paused());
        carousel.interact(InteractionEvent::PointerEntered);
        carousel.interact(InteractionEvent::PointerEntered);
        assert!(carousel.is_paused());
        carousel.interact(InteractionEvent::PointerLeft);
        assert!(!carousel.is_paused());
    }

    #[test]
    fn test_interaction_gating_options() {
        let carousel = CarouselEngine::new(
            3,
            CarouselOptions {
                pause_on_hover: false,
                ..Default::default()
            },
        );
        assert!(!carousel.interact(InteractionEvent::PointerEntered));
        assert!(!carousel.interact(InteractionEvent::TouchStarted));
        assert!(!carousel.is_paused());
        assert!(carousel.interact(InteractionEvent::FocusGained));
        assert!(carousel.is_paused());

        let bindings = carousel.bind();
        assert_eq!(
            bindings.events().as_slice(),
            &[InteractionEvent::FocusGained, InteractionEvent::FocusLost]
        );
    }

    #[test]
    fn test_resume_clears_interaction_pauses() {
        let carousel = CarouselEngine::new(3, CarouselOptions::default());
        carousel.interact(InteractionEvent::TouchStarted);
        carousel.pause();
        carousel.resume();
        assert_eq!(carousel.pause_sources(), PauseSources::default());
    }

    #[test]
    fn test_bindings_outlive_engine_safely() {
        let bindings = {
            let carousel = CarouselEngine::new(3, CarouselOptions::default());
            let bindings = carousel.bind();
            assert!(bindings.pointer_entered());
            assert!(carousel.is_paused());
            bindings
        };
        assert!(!bindings.pointer_left());
    }

    #[test]
    fn test_teardown_releases_everything_once() {
        let rig = Rig::new();
        let mut carousel = rig.carousel(3, CarouselOptions::autoplay(1000));
        assert_eq!(rig.scheduler.interval_count(), 1);
        assert_eq!(rig.visibility.subscriber_count(), 1);
        assert_eq!(rig.motion.subscriber_count(), 1);

        assert!(carousel.teardown());
        assert!(!carousel.teardown());
        assert!(carousel.is_torn_down());
        assert_eq!(carousel.autoplay_state(), AutoplayState::TornDown);
        assert_eq!(rig.scheduler.interval_count(), 0);
        assert_eq!(rig.visibility.subscriber_count(), 0);
        assert_eq!(rig.motion.subscriber_count(), 0);

        // Signals after teardown are inert
        rig.visibility.set(Visibility::Hidden);
        rig.visibility.set(Visibility::Visible);
        assert_eq!(rig.scheduler.interval_count(), 0);
        rig.advance_ms(5000);
        assert_eq!(carousel.index(), 0);
    }

    #[test]
    fn test_drop_releases_resources() {
        let rig = Rig::new();
        {
            let _carousel = rig.carousel(3, CarouselOptions::autoplay(500));
            assert_eq!(rig.scheduler.interval_count(), 1);
        }
        assert_eq!(rig.scheduler.interval_count(), 0);
        assert_eq!(rig.visibility.subscriber_count(), 0);
        assert_eq!(rig.motion.subscriber_count(), 0);
    }

    #[test]
    fn test_dead_timer_degrades_to_idle() {
        let handle = IntervalScheduler::new().handle();
        let carousel = CarouselEngine::builder(3)
            .autoplay_ms(1000)
            .timer(Arc::new(handle))
            .build();
        assert_eq!(carousel.autoplay_state(), AutoplayState::Idle);
        assert!(!carousel.has_timer());
        assert_eq!(carousel.next(), 1);
    }

    #[test]
    fn test_options_deserialize_with_defaults() {
        let options: CarouselOptions = serde_json::from_str(r#"{"autoplay_ms": 5000}"#).unwrap();
        assert_eq!(options, CarouselOptions::autoplay(5000));
        assert!(options.pause_on_hover);
        assert!(options.pause_on_focus);
    }
}
