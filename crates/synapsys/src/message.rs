//! # Envelopes
//!
//! Everything that travels through a mailbox is an [`Envelope`]: the message
//! payload plus, for `ask`, the one-shot channel the reply goes back on and
//! the caller's deadline.

use crate::error::ActorError;
use std::time::Instant;
use tokio::sync::oneshot;

/// One-shot channel carrying the outcome of an `ask`.
pub type ReplyTo<R> = oneshot::Sender<Result<R, ActorError>>;

/// A message queued for an actor.
#[derive(Debug)]
pub struct Envelope<M, R> {
    pub message: M,
    pub reply_to: Option<ReplyTo<R>>,
    /// When the `ask` caller stops waiting. Informational only: the actor
    /// still processes an envelope whose deadline has passed.
    pub deadline: Option<Instant>,
}

impl<M, R> Envelope<M, R> {
    /// Fire-and-forget envelope.
    pub fn tell(message: M) -> Self {
        Self {
            message,
            reply_to: None,
            deadline: None,
        }
    }

    /// Request-reply envelope.
    pub fn ask(message: M, reply_to: ReplyTo<R>, deadline: Option<Instant>) -> Self {
        Self {
            message,
            reply_to: Some(reply_to),
            deadline,
        }
    }

    pub fn expects_reply(&self) -> bool {
        self.reply_to.is_some()
    }

    /// True once the caller can no longer receive a reply, either because it
    /// gave up (timeout) or because the deadline has passed.
    pub fn is_stale(&self, now: Instant) -> bool {
        match &self.reply_to {
            Some(reply_to) => reply_to.is_closed() || self.deadline.is_some_and(|d| now >= d),
            None => false,
        }
    }
}
