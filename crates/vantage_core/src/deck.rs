//! Items paired with a carousel engine

use crate::carousel::{CarouselEngine, CarouselOptions};

/// The slides of one carousel together with the engine driving them
///
/// The engine only knows the number of items; the deck keeps the items and
/// resolves the current one. An empty deck renders nothing.
#[derive(Debug)]
pub struct SlideDeck<T> {
    items: Vec<T>,
    engine: CarouselEngine,
}

impl<T> SlideDeck<T> {
    /// Wrap an engine built elsewhere, syncing its length to `items`
    pub fn with_engine(items: Vec<T>, engine: CarouselEngine) -> Self {
        engine.set_length(items.len());
        Self { items, engine }
    }

    /// Mount a deck with fallback signal sources
    pub fn new(items: Vec<T>, options: CarouselOptions) -> Self {
        let engine = CarouselEngine::new(items.len(), options);
        Self { items, engine }
    }

    pub fn engine(&self) -> &CarouselEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut CarouselEngine {
        &mut self.engine
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Replace the items, re-wrapping the current position
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.engine.set_length(self.items.len());
    }

    /// The item currently shown, if any
    pub fn current(&self) -> Option<&T> {
        if self.items.is_empty() {
            return None;
        }
        self.items.get(self.engine.index())
    }

    /// 1-based position for "n of total" labels
    pub fn position(&self) -> Option<(usize, usize)> {
        if self.items.is_empty() {
            None
        } else {
            Some((self.engine.index() + 1, self.items.len()))
        }
    }
}

impl SlideDeck<String> {
    /// Build a deck from image sources, skipping empty entries
    pub fn from_sources<I, S>(sources: I, options: CarouselOptions) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let items: Vec<String> = sources
            .into_iter()
            .map(Into::into)
            .filter(|src| !src.trim().is_empty())
            .collect();
        Self::new(items, options)
    }
}
