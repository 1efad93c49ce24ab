//! # Runtime Errors
//!
//! This module defines the error type shared by the actor system, the pointers
//! and the dispatch loop. Every variant is local to the operation that raised
//! it: a fault in one actor never shows up as an error on another actor's
//! pointer.

use std::time::Duration;

/// Errors that can occur within the actor runtime.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActorError {
    /// `actor_of` was called with a name that is already registered.
    #[error("Actor name already registered: {0}")]
    DuplicateName(String),

    /// Actor names must be non-empty.
    #[error("Actor name must not be empty")]
    InvalidName,

    /// An `ask` was not answered before its deadline.
    #[error("Ask to {actor} timed out after {after:?}")]
    Timeout { actor: String, after: Duration },

    /// `on_receive` returned an error or panicked while processing an envelope.
    #[error("Actor {actor} failed to process message: {reason}")]
    HandlerFault { actor: String, reason: String },

    /// The actor's bounded mailbox is at capacity.
    #[error("Mailbox full: {0}")]
    MailboxFull(String),

    /// The actor's dispatch loop has stopped: the system shut down, or the
    /// actor's `on_start` panicked and it was never started.
    #[error("Actor stopped: {0}")]
    ActorStopped(String),

    #[error("Actor not found: {0}")]
    NotFound(String),

    /// A typed lookup used message/reply types that differ from the registered actor.
    #[error("Actor {0} has a different message or reply type")]
    TypeMismatch(String),

    #[error("Parent actor is not registered in this system: {0}")]
    UnknownParent(String),

    #[error("Actor system is shut down")]
    SystemShutdown,

    #[error("Actor system must be created inside a tokio runtime")]
    NoRuntime,
}
