//! # Actor Context
//!
//! A [`Context`] is the snapshot of an actor's state handed to
//! [`Actor::on_receive`](crate::Actor::on_receive). It is a value type: there
//! is no way to mutate the state inside a `Context`. A handler evolves state by
//! returning a new snapshot built with [`Context::with_state`], and the
//! dispatch loop stores that snapshot as the actor's current state.
//!
//! ```rust
//! use synapsys::Context;
//!
//! let original = Context::new(1);
//! let updated = original.with_state(2);
//!
//! assert_eq!(*original.state(), 1);
//! assert_eq!(*updated.state(), 2);
//! ```

use std::fmt;

/// Immutable snapshot of an actor's state.
#[derive(Clone, PartialEq, Eq)]
pub struct Context<S> {
    state: S,
}

impl<S> Context<S> {
    pub fn new(state: S) -> Self {
        Self { state }
    }

    /// Read-only view of the state.
    pub fn state(&self) -> &S {
        &self.state
    }

    /// Produces the next snapshot. `self` is left as it was.
    pub fn with_state(&self, new_state: S) -> Self {
        Self { state: new_state }
    }

    /// Builds the next snapshot from the current state.
    pub fn map(&self, f: impl FnOnce(&S) -> S) -> Self {
        Self {
            state: f(&self.state),
        }
    }

    pub fn into_state(self) -> S {
        self.state
    }
}

impl<S: fmt::Debug> fmt::Debug for Context<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context").field("state", &self.state).finish()
    }
}
