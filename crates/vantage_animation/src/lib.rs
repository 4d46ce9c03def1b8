//! Vantage Animation Timing
//!
//! Repeating timers for autoplaying widgets.
//!
//! # Features
//!
//! - **Deterministic time**: drive the clock explicitly with `advance()` or
//!   from the wall clock with `tick()` once per frame
//! - **Ordered firing**: every elapsed period fires once, earliest deadline first
//! - **Weak handles**: components hold a `SchedulerHandle` that no-ops once the
//!   scheduler is gone
//! - **Global slot**: one scheduler per app, reachable without context passing

pub mod scheduler;

pub use scheduler::{
    is_scheduler_initialized, set_global_scheduler, try_get_scheduler, try_set_global_scheduler,
    IntervalScheduler, SchedulerHandle, TimerId, MIN_PERIOD,
};
