//! Repeating timer primitive (`setInterval` on the web)

use crate::error::Result;
use std::time::Duration;

/// Raw handle to a registered interval
///
/// Backends encode their own key into the raw value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct IntervalId(u64);

impl IntervalId {
    pub fn from_raw(raw: u64) -> Self {
        IntervalId(raw)
    }

    pub fn to_raw(self) -> u64 {
        self.0
    }
}

/// Callback fired once per elapsed period
pub type TickCallback = Box<dyn FnMut() + Send>;

/// A wall-clock repeating timer
pub trait IntervalTimer: Send + Sync {
    /// Fire `callback` every `period` until cleared
    fn set_interval(&self, period: Duration, callback: TickCallback) -> Result<IntervalId>;

    /// Cancel an interval. Returns `false` if it was not active.
    fn clear_interval(&self, id: IntervalId) -> bool;
}
