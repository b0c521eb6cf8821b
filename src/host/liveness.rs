//! Teardown flag shared with deferred callbacks

use std::cell::Cell;
use std::rc::Rc;

/// Owner side of a liveness flag.
///
/// Deferred work captures a [`LivenessToken`] and checks it before touching
/// engine state. Killing the flag turns every outstanding callback into a no-op.
#[derive(Debug)]
pub struct Liveness(Rc<Cell<bool>>);

/// Observer side of a liveness flag.
#[derive(Debug, Clone)]
pub struct LivenessToken(Rc<Cell<bool>>);

impl Liveness {
    /// Create a live flag.
    pub fn new() -> Self {
        Self(Rc::new(Cell::new(true)))
    }

    /// Hand out a token observing this flag.
    pub fn token(&self) -> LivenessToken {
        LivenessToken(Rc::clone(&self.0))
    }

    /// Mark as torn down. Irreversible.
    pub fn kill(&self) {
        self.0.set(false);
    }

    /// Whether [`Liveness::kill`] has not been called yet.
    pub fn is_alive(&self) -> bool {
        self.0.get()
    }
}

impl Default for Liveness {
    fn default() -> Self {
        Self::new()
    }
}

impl LivenessToken {
    /// Whether the owner is still alive.
    pub fn is_alive(&self) -> bool {
        self.0.get()
    }
}
