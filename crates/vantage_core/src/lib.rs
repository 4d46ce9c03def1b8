//! Vantage Core
//!
//! Interaction engines for a landing page:
//!
//! - **Carousel**: wrapping navigation, autoplay gated by pause, reduced
//!   motion and page visibility, keyboard and pointer/touch/focus bindings
//! - **Reveal on scroll**: one-shot reveal of marked elements as they enter
//!   the viewport
//! - **Page runtime**: one scheduler and one set of signal sources shared by
//!   every section on the page
//!
//! Both engines consume their environment through the capability traits in
//! `vantage_platform` and release every timer, listener and observation
//! exactly once when torn down or dropped.
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use vantage_core::{CarouselOptions, PageRuntime};
//! use vantage_platform::Visibility;
//!
//! let runtime = PageRuntime::new();
//! let carousel = runtime.carousel_with(4, CarouselOptions::autoplay(5000));
//!
//! runtime.advance(Duration::from_secs(5));
//! assert_eq!(carousel.index(), 1);
//!
//! // Background tabs do not advance
//! runtime.visibility.set(Visibility::Hidden);
//! runtime.advance(Duration::from_secs(60));
//! assert_eq!(carousel.index(), 1);
//! ```

pub mod autoplay;
pub mod carousel;
pub mod config;
pub mod deck;
pub mod error;
pub mod index;
mod keyboard;
pub mod lifecycle;
pub mod reveal;
pub mod runtime;

pub use autoplay::{AutoplayAction, AutoplayEvent, AutoplayState, Gates};
pub use carousel::{
    CarouselBindings, CarouselBuilder, CarouselEngine, CarouselOptions, CarouselState,
    PauseSources,
};
pub use config::VantageConfig;
pub use deck::SlideDeck;
pub use error::{ConfigError, IndexError};
pub use index::{next_index, try_next_index, wrap_index, IndexArg};
pub use lifecycle::Teardown;
pub use reveal::{
    RevealBuilder, RevealListener, RevealMode, RevealObserver, RevealOptions, RevealPhase,
};
pub use runtime::{PageRuntime, RuntimeStats};
