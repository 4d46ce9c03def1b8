//! Vantage Platform Abstraction Layer
//!
//! This crate defines the capabilities the Vantage engines consume from the
//! hosting page, as injectable traits:
//!
//! - [`VisibilitySource`] - foreground/background tab signal
//! - [`MotionPreferenceSource`] - live reduced-motion preference
//! - [`IntersectionSource`] - per-element viewport intersection reports
//! - [`IntervalTimer`] - wall-clock repeating timer
//! - [`NodeQuery`] - marker-based element lookup
//!
//! # Implementations
//!
//! - [`fallback`] - used when the host lacks a capability; always fails open
//! - [`manual`] - driven by the host's own event loop (and by tests)
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use vantage_platform::prelude::*;
//!
//! let visibility = ManualVisibility::default();
//! let _sub = visibility.subscribe(Arc::new(|v| println!("page is now {:?}", v)));
//! visibility.set(Visibility::Hidden);
//! ```

mod error;
pub mod fallback;
mod input;
mod intersection;
pub mod manual;
mod signal;
mod timer;

// Re-export all public types
pub use error::{PlatformError, Result};
pub use fallback::{AlwaysVisible, NoIntersection, NoMotionPreference};
pub use input::{InteractionEvent, Key};
pub use intersection::{
    IntersectionCallback, IntersectionEntry, IntersectionSource, NodeId, NodeQuery,
    ObservationId, ObserveControl,
};
pub use manual::{ManualIntersection, ManualMotionPreference, ManualVisibility, StaticNodes};
pub use signal::{
    MotionCallback, MotionPreferenceSource, SubscriptionId, Visibility, VisibilityCallback,
    VisibilitySource,
};
pub use timer::{IntervalId, IntervalTimer, TickCallback};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{PlatformError, Result};
    pub use crate::fallback::{AlwaysVisible, NoIntersection, NoMotionPreference};
    pub use crate::input::{InteractionEvent, Key};
    pub use crate::intersection::{
        IntersectionEntry, IntersectionSource, NodeId, NodeQuery, ObserveControl,
    };
    pub use crate::manual::{
        ManualIntersection, ManualMotionPreference, ManualVisibility, StaticNodes,
    };
    pub use crate::signal::{MotionPreferenceSource, Visibility, VisibilitySource};
    pub use crate::timer::{IntervalId, IntervalTimer};
}
