//! Interval scheduler
//!
//! Owns every repeating timer in the app and fires them as time advances.
//! Time only moves when the host says so: either explicitly through
//! `advance()` or from the wall clock through `tick()`, which the host calls
//! once per frame. Nothing runs on a background thread.

use slotmap::{new_key_type, SlotMap};
use std::sync::{Arc, Mutex, OnceLock, Weak};
use std::time::{Duration, Instant};
use vantage_platform::{IntervalId, IntervalTimer, PlatformError, Result, TickCallback};

/// Shortest period an interval may have; shorter requests are raised to it
pub const MIN_PERIOD: Duration = Duration::from_millis(1);

// ============================================================================
// Global Scheduler State
// ============================================================================

/// Global scheduler handle for access from anywhere in the application
static GLOBAL_SCHEDULER: OnceLock<SchedulerHandle> = OnceLock::new();

/// Set the global interval scheduler handle
///
/// This should be called once at app startup after creating the scheduler.
///
/// # Panics
///
/// Panics if called more than once. Use [`try_set_global_scheduler`] when a
/// second call is expected.
pub fn set_global_scheduler(handle: SchedulerHandle) {
    if !try_set_global_scheduler(handle) {
        panic!("set_global_scheduler() called more than once");
    }
}

/// Set the global interval scheduler handle if none is set yet
///
/// Returns whether this call installed `handle`. Concurrent callers race on
/// the slot; exactly one of them wins.
pub fn try_set_global_scheduler(handle: SchedulerHandle) -> bool {
    GLOBAL_SCHEDULER.set(handle).is_ok()
}

/// Try to get the global scheduler (returns None if not initialized)
pub fn try_get_scheduler() -> Option<SchedulerHandle> {
    GLOBAL_SCHEDULER.get().cloned()
}

/// Check if the global scheduler has been initialized
pub fn is_scheduler_initialized() -> bool {
    GLOBAL_SCHEDULER.get().is_some()
}

new_key_type! {
    /// Handle to a registered interval
    pub struct TimerId;
}

impl TimerId {
    /// Convert to the platform-level interval id
    pub fn to_interval_id(self) -> IntervalId {
        IntervalId::from_raw(self.0.as_ffi())
    }

    /// Reconstruct from a platform-level interval id
    ///
    /// The id must have been produced by `to_interval_id()`; anything else
    /// yields a key that simply matches no interval.
    pub fn from_interval_id(id: IntervalId) -> Self {
        TimerId::from(slotmap::KeyData::from_ffi(id.to_raw()))
    }
}

struct Interval {
    period: Duration,
    /// Scheduler time of the next firing
    next_due: Duration,
    /// Registration order, breaks ties between equal deadlines
    seq: u64,
    /// Taken out while the callback runs
    callback: Option<TickCallback>,
    fired: u64,
}

/// Internal state of the scheduler
struct SchedulerInner {
    intervals: SlotMap<TimerId, Interval>,
    /// Time elapsed since the scheduler was created
    now: Duration,
    last_frame: Instant,
    next_seq: u64,
}

impl SchedulerInner {
    /// Earliest interval due at or before `target`
    fn next_due(&self, target: Duration) -> Option<TimerId> {
        self.intervals
            .iter()
            .filter(|(_, iv)| iv.callback.is_some() && iv.next_due <= target)
            .min_by_key(|(_, iv)| (iv.next_due, iv.seq))
            .map(|(id, _)| id)
    }
}

/// The scheduler that fires all registered intervals
///
/// Typically held by the page runtime and shared via `SchedulerHandle`.
///
/// ```
/// use std::time::Duration;
/// use vantage_animation::IntervalScheduler;
///
/// let scheduler = IntervalScheduler::new();
/// let id = scheduler.add_interval(Duration::from_millis(500), Box::new(|| {}));
/// assert_eq!(scheduler.advance(Duration::from_millis(1200)), 2);
/// assert_eq!(scheduler.fire_count(id), Some(2));
/// ```
pub struct IntervalScheduler {
    inner: Arc<Mutex<SchedulerInner>>,
}

impl IntervalScheduler {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(SchedulerInner {
                intervals: SlotMap::with_key(),
                now: Duration::ZERO,
                last_frame: Instant::now(),
                next_seq: 0,
            })),
        }
    }

    /// Get a handle to this scheduler for passing to components
    pub fn handle(&self) -> SchedulerHandle {
        SchedulerHandle {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Register a repeating interval; the first firing is one period from now
    pub fn add_interval(&self, period: Duration, callback: TickCallback) -> TimerId {
        register(&self.inner, period, callback)
    }

    /// Cancel an interval
    pub fn remove_interval(&self, id: TimerId) -> bool {
        self.inner.lock().unwrap().intervals.remove(id).is_some()
    }

    /// Advance scheduler time by `dt`, firing every interval that comes due
    ///
    /// Intervals fire in deadline order, once per elapsed period. Callbacks run
    /// with the scheduler unlocked, so they may add or remove intervals; an
    /// interval removed mid-advance does not fire again.
    ///
    /// Returns the number of callbacks fired.
    pub fn advance(&self, dt: Duration) -> usize {
        advance(&self.inner, dt)
    }

    /// Advance by the wall-clock time since the previous `tick()`
    ///
    /// Call once per frame from the host's event loop.
    pub fn tick(&self) -> usize {
        let dt = {
            let mut inner = self.inner.lock().unwrap();
            let now = Instant::now();
            let dt = now - inner.last_frame;
            inner.last_frame = now;
            dt
        };
        self.advance(dt)
    }

    /// Time elapsed on the scheduler clock
    pub fn elapsed(&self) -> Duration {
        self.inner.lock().unwrap().now
    }

    /// Number of registered intervals
    pub fn interval_count(&self) -> usize {
        self.inner.lock().unwrap().intervals.len()
    }

    /// Whether `id` is still registered
    pub fn contains(&self, id: TimerId) -> bool {
        self.inner.lock().unwrap().intervals.contains_key(id)
    }

    /// How many times an interval has fired
    pub fn fire_count(&self, id: TimerId) -> Option<u64> {
        self.inner.lock().unwrap().intervals.get(id).map(|iv| iv.fired)
    }
}

impl Default for IntervalScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl IntervalTimer for IntervalScheduler {
    fn set_interval(&self, period: Duration, callback: TickCallback) -> Result<IntervalId> {
        Ok(self.add_interval(period, callback).to_interval_id())
    }

    fn clear_interval(&self, id: IntervalId) -> bool {
        self.remove_interval(TimerId::from_interval_id(id))
    }
}

fn register(inner: &Mutex<SchedulerInner>, period: Duration, callback: TickCallback) -> TimerId {
    let period = if period < MIN_PERIOD {
        tracing::warn!(
            "IntervalScheduler: period {:?} below minimum, using {:?}",
            period,
            MIN_PERIOD
        );
        MIN_PERIOD
    } else {
        period
    };

    let mut guard = inner.lock().unwrap();
    let seq = guard.next_seq;
    guard.next_seq += 1;
    let next_due = guard.now + period;
    let id = guard.intervals.insert(Interval {
        period,
        next_due,
        seq,
        callback: Some(callback),
        fired: 0,
    });
    tracing::debug!("IntervalScheduler: registered {:?} every {:?}", id, period);
    id
}

fn advance(inner: &Mutex<SchedulerInner>, dt: Duration) -> usize {
    let target = inner.lock().unwrap().now + dt;
    let mut fired = 0;

    loop {
        // Take the due callback out so it can run without the lock
        let (id, mut callback) = {
            let mut guard = inner.lock().unwrap();
            let Some(id) = guard.next_due(target) else {
                guard.now = target;
                break;
            };
            let due = guard.intervals[id].next_due;
            guard.now = due;
            let interval = &mut guard.intervals[id];
            interval.next_due += interval.period;
            interval.fired += 1;
            match interval.callback.take() {
                Some(callback) => (id, callback),
                None => continue,
            }
        };

        callback();
        fired += 1;

        // Slotmap keys are versioned: a removed interval never matches again
        if let Some(interval) = inner.lock().unwrap().intervals.get_mut(id) {
            interval.callback = Some(callback);
        }
    }

    fired
}

/// A weak handle to the interval scheduler
///
/// This is passed to components that need timers.
/// It won't prevent the scheduler from being dropped.
#[derive(Clone)]
pub struct SchedulerHandle {
    inner: Weak<Mutex<SchedulerInner>>,
}

impl SchedulerHandle {
    /// Register an interval; `None` if the scheduler is gone
    pub fn register_interval(&self, period: Duration, callback: TickCallback) -> Option<TimerId> {
        self.inner
            .upgrade()
            .map(|inner| register(&inner, period, callback))
    }

    /// Cancel an interval
    pub fn remove_interval(&self, id: TimerId) -> bool {
        self.inner
            .upgrade()
            .map(|inner| inner.lock().unwrap().intervals.remove(id).is_some())
            .unwrap_or(false)
    }

    /// Check if the scheduler is still alive
    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }
}

impl IntervalTimer for SchedulerHandle {
    fn set_interval(&self, period: Duration, callback: TickCallback) -> Result<IntervalId> {
        self.register_interval(period, callback)
            .map(TimerId::to_interval_id)
            .ok_or_else(|| PlatformError::Unavailable("interval scheduler dropped".into()))
    }

    fn clear_interval(&self, id: IntervalId) -> bool {
        self.remove_interval(TimerId::from_interval_id(id))
    }
}
