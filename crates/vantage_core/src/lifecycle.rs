//! Scoped resource release
//!
//! A mounted component acquires a timer and a few subscriptions. Each
//! acquisition registers its release with a [`Teardown`] handle; releasing
//! the handle runs every registered action exactly once, newest first.
//! Dropping the handle releases it as well, so a component that is simply
//! dropped cannot leak a timer or a listener.

use smallvec::SmallVec;

type ReleaseFn = Box<dyn FnOnce() + Send>;

/// Exactly-once release of acquired resources
#[derive(Default)]
pub struct Teardown {
    actions: SmallVec<[ReleaseFn; 4]>,
    released: bool,
}

impl Teardown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a release action
    ///
    /// If the handle was already released the action runs immediately, so a
    /// resource acquired late is never orphaned.
    pub fn defer<F>(&mut self, action: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if self.released {
            action();
        } else {
            self.actions.push(Box::new(action));
        }
    }

    /// Run every registered action, newest first
    ///
    /// Returns `true` on the first call and `false` on every later one.
    pub fn release(&mut self) -> bool {
        if self.released {
            return false;
        }
        self.released = true;
        while let Some(action) = self.actions.pop() {
            action();
        }
        true
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Number of actions still waiting to run
    pub fn pending(&self) -> usize {
        self.actions.len()
    }
}

impl Drop for Teardown {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for Teardown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Teardown")
            .field("pending", &self.actions.len())
            .field("released", &self.released)
            .finish()
    }
}
