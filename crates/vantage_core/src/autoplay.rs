//! Autoplay state machine
//!
//! Each carousel carries one [`AutoplayState`]. Every signal the engine
//! receives is turned into an [`AutoplayEvent`] and run through
//! [`transition`], a pure function that returns the next state together with
//! the single side effect the engine has to perform.
//!
//! ```text
//!             pause / reduced motion
//!   Running  ───────────────────────▶  Suspended
//!      ▲  ◀───────────────────────────    │
//!      │        resume / motion ok        │
//!      │ shown                     hidden │
//!      └──────────────  Stopped  ◀────────┘   (Running ─hidden─▶ Stopped too)
//!
//!   Idle: autoplay disabled, never leaves except to TornDown
//!   TornDown: terminal, reachable from every state
//! ```
//!
//! Pause and reduced motion only gate ticks; the timer keeps running.
//! Page visibility is different: hiding the page stops the timer
//! (`StopTimer`) and showing it again starts a fresh one (`StartTimer`), so
//! no backlog of ticks builds up while the tab is in the background.

/// Autoplay lifecycle of one carousel
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AutoplayState {
    /// Autoplay disabled; no timer was ever created
    Idle,
    /// Timer active and ticks advance the index
    Running,
    /// Timer active but ticks are ignored (paused or reduced motion)
    Suspended,
    /// Page hidden; the timer is torn down until the page is shown again
    Stopped,
    /// Torn down; terminal
    TornDown,
}

impl AutoplayState {
    /// Whether a timer should currently exist
    pub fn has_timer(self) -> bool {
        matches!(self, AutoplayState::Running | AutoplayState::Suspended)
    }

    pub fn is_torn_down(self) -> bool {
        self == AutoplayState::TornDown
    }
}

/// Signals fed to the state machine
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AutoplayEvent {
    /// The interval fired
    Tick,
    /// A pause source was engaged
    Paused,
    /// A pause source was released
    Resumed,
    /// The reduced-motion preference changed
    MotionChanged,
    /// The page went to the background
    Hidden,
    /// The page came back to the foreground
    Shown,
    /// The carousel is being unmounted
    Teardown,
}

/// Side effect requested by a transition
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AutoplayAction {
    #[default]
    None,
    /// Move to the next slide
    Advance,
    /// Create the interval
    StartTimer,
    /// Clear the interval
    StopTimer,
    /// Clear the interval and release every resource
    Release,
}

/// The three conditions that must all hold for a tick to advance
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Gates {
    pub paused: bool,
    pub reduced_motion: bool,
    pub visible: bool,
}

impl Gates {
    /// True when a tick may advance the index
    pub fn open(&self) -> bool {
        !self.paused && !self.reduced_motion && self.visible
    }

    /// Running or Suspended, depending on the pause and motion gates
    fn settle(&self) -> AutoplayState {
        if self.open() {
            AutoplayState::Running
        } else {
            AutoplayState::Suspended
        }
    }
}

/// Initial state for a freshly mounted carousel
pub fn initial(autoplay_enabled: bool, gates: Gates) -> (AutoplayState, AutoplayAction) {
    if !autoplay_enabled {
        (AutoplayState::Idle, AutoplayAction::None)
    } else if !gates.visible {
        (AutoplayState::Stopped, AutoplayAction::None)
    } else {
        (gates.settle(), AutoplayAction::StartTimer)
    }
}

/// Compute the next state and the side effect to perform
///
/// `gates` must already reflect the signal carried by `event`.
pub fn transition(
    state: AutoplayState,
    event: AutoplayEvent,
    gates: Gates,
) -> (AutoplayState, AutoplayAction) {
    use AutoplayAction as A;
    use AutoplayEvent as E;
    use AutoplayState as S;

    match (state, event) {
        (S::TornDown, _) => (S::TornDown, A::None),
        (_, E::Teardown) => (S::TornDown, A::Release),
        (S::Idle, _) => (S::Idle, A::None),

        (S::Running | S::Suspended, E::Tick) => {
            if gates.open() {
                (S::Running, A::Advance)
            } else {
                (gates.settle(), A::None)
            }
        }
        (S::Running | S::Suspended, E::Hidden) => (S::Stopped, A::StopTimer),
        (S::Running | S::Suspended, E::Shown | E::Paused | E::Resumed | E::MotionChanged) => {
            (gates.settle(), A::None)
        }

        (S::Stopped, E::Shown) => (gates.settle(), A::StartTimer),
        // A tick can still be in flight from the interval that was just cleared
        (S::Stopped, E::Tick | E::Hidden | E::Paused | E::Resumed | E::MotionChanged) => {
            (S::Stopped, A::None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OPEN: Gates = Gates {
        paused: false,
        reduced_motion: false,
        visible: true,
    };

    fn with(f: impl FnOnce(&mut Gates)) -> Gates {
        let mut gates = OPEN;
        f(&mut gates);
        gates
    }

    #[test]
    fn test_initial_states() {
        assert_eq!(
            initial(false, OPEN),
            (AutoplayState::Idle, AutoplayAction::None)
        );
        assert_eq!(
            initial(true, OPEN),
            (AutoplayState::Running, AutoplayAction::StartTimer)
        );
        assert_eq!(
            initial(true, with(|g| g.reduced_motion = true)),
            (AutoplayState::Suspended, AutoplayAction::StartTimer)
        );
        assert_eq!(
            initial(true, with(|g| g.visible = false)),
            (AutoplayState::Stopped, AutoplayAction::None)
        );
    }

    #[test]
    fn test_idle_is_permanent() {
        for event in [
            AutoplayEvent::Tick,
            AutoplayEvent::Paused,
            AutoplayEvent::Resumed,
            AutoplayEvent::MotionChanged,
            AutoplayEvent::Hidden,
            AutoplayEvent::Shown,
        ] {
            assert_eq!(
                transition(AutoplayState::Idle, event, OPEN),
                (AutoplayState::Idle, AutoplayAction::None)
            );
        }
    }

    #[test]
    fn test_tick_advances_only_with_open_gates() {
        assert_eq!(
            transition(AutoplayState::Running, AutoplayEvent::Tick, OPEN),
            (AutoplayState::Running, AutoplayAction::Advance)
        );
        for gates in [
            with(|g| g.paused = true),
            with(|g| g.reduced_motion = true),
            with(|g| g.visible = false),
        ] {
            let (_, action) = transition(AutoplayState::Running, AutoplayEvent::Tick, gates);
            assert_eq!(action, AutoplayAction::None);
        }
    }

    #[test]
    fn test_pause_and_motion_gate_without_stopping_timer() {
        let paused = with(|g| g.paused = true);
        assert_eq!(
            transition(AutoplayState::Running, AutoplayEvent::Paused, paused),
            (AutoplayState::Suspended, AutoplayAction::None)
        );
        assert_eq!(
            transition(AutoplayState::Suspended, AutoplayEvent::Resumed, OPEN),
            (AutoplayState::Running, AutoplayAction::None)
        );

        let reduced = with(|g| g.reduced_motion = true);
        assert_eq!(
            transition(AutoplayState::Running, AutoplayEvent::MotionChanged, reduced),
            (AutoplayState::Suspended, AutoplayAction::None)
        );
    }

    #[test]
    fn test_resume_with_other_gate_closed_stays_suspended() {
        let reduced = with(|g| g.reduced_motion = true);
        assert_eq!(
            transition(AutoplayState::Suspended, AutoplayEvent::Resumed, reduced),
            (AutoplayState::Suspended, AutoplayAction::None)
        );
    }

    #[test]
    fn test_visibility_stops_and_restarts_timer() {
        let hidden = with(|g| g.visible = false);
        assert_eq!(
            transition(AutoplayState::Running, AutoplayEvent::Hidden, hidden),
            (AutoplayState::Stopped, AutoplayAction::StopTimer)
        );
        assert_eq!(
            transition(AutoplayState::Suspended, AutoplayEvent::Hidden, hidden),
            (AutoplayState::Stopped, AutoplayAction::StopTimer)
        );
        assert_eq!(
            transition(AutoplayState::Stopped, AutoplayEvent::Shown, OPEN),
            (AutoplayState::Running, AutoplayAction::StartTimer)
        );
        assert_eq!(
            transition(
                AutoplayState::Stopped,
                AutoplayEvent::Shown,
                with(|g| g.paused = true)
            ),
            (AutoplayState::Suspended, AutoplayAction::StartTimer)
        );
    }

    #[test]
    fn test_stopped_ignores_everything_but_shown() {
        let hidden = with(|g| g.visible = false);
        for event in [
            AutoplayEvent::Tick,
            AutoplayEvent::Hidden,
            AutoplayEvent::Paused,
            AutoplayEvent::Resumed,
            AutoplayEvent::MotionChanged,
        ] {
            assert_eq!(
                transition(AutoplayState::Stopped, event, hidden),
                (AutoplayState::Stopped, AutoplayAction::None)
            );
        }
    }

    #[test]
    fn test_teardown_is_terminal_and_idempotent() {
        for state in [
            AutoplayState::Idle,
            AutoplayState::Running,
            AutoplayState::Suspended,
            AutoplayState::Stopped,
        ] {
            assert_eq!(
                transition(state, AutoplayEvent::Teardown, OPEN),
                (AutoplayState::TornDown, AutoplayAction::Release)
            );
        }
        assert_eq!(
            transition(AutoplayState::TornDown, AutoplayEvent::Teardown, OPEN),
            (AutoplayState::TornDown, AutoplayAction::None)
        );
        assert_eq!(
            transition(AutoplayState::TornDown, AutoplayEvent::Shown, OPEN),
            (AutoplayState::TornDown, AutoplayAction::None)
        );
    }
}
