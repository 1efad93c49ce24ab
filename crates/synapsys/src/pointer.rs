//! # Actor Pointers
//!
//! An [`ActorPointer`] is the only way to reach an actor. It holds the actor's
//! [`ActorId`] and the sending half of its mailbox, nothing else: the state
//! and the behavior stay inside the dispatch loop. Pointers are cheap to clone
//! and can be shared across tasks and threads.
//!
//! Two delivery patterns are offered:
//!
//! - [`ActorPointer::send`]: fire-and-forget. Synchronous, never waits for
//!   the actor, fails only when the envelope cannot be enqueued.
//! - [`ActorPointer::ask`]: request-reply. Waits for the reply up to a
//!   timeout. The outcome is decided exactly once: either the reply arrives
//!   first or the timeout does. A reply produced after the timeout is
//!   dropped by the actor because nobody holds the receiving end any more.

use crate::error::ActorError;
use crate::mailbox::{MailboxSender, MailboxStatus, StatusCell};
use crate::message::Envelope;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::oneshot;
use tracing::{debug, warn};
use uuid::Uuid;

/// Untyped address of an actor: the owning system plus the registered name.
///
/// Displays as the actor's canonical address, the lowercased name in angle
/// brackets (`<counter>`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ActorId {
    system: Uuid,
    name: Arc<str>,
}

impl ActorId {
    pub(crate) fn new(system: Uuid, name: &str) -> Self {
        Self {
            system,
            name: Arc::from(name),
        }
    }

    pub fn system(&self) -> Uuid {
        self.system
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address(&self) -> String {
        format!("<{}>", self.name.to_lowercase())
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.name.to_lowercase())
    }
}

/// Typed handle to a live actor accepting `M` and answering with `R`.
pub struct ActorPointer<M, R> {
    id: ActorId,
    sender: MailboxSender<M, R>,
    status: Arc<StatusCell>,
    ask_timeout: Duration,
}

impl<M, R> Clone for ActorPointer<M, R> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            sender: self.sender.clone(),
            status: self.status.clone(),
            ask_timeout: self.ask_timeout,
        }
    }
}

impl<M, R> fmt::Debug for ActorPointer<M, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActorPointer")
            .field("id", &self.id)
            .field("status", &self.status.get())
            .finish()
    }
}

impl<M, R> ActorPointer<M, R>
where
    M: Send + fmt::Debug + 'static,
    R: Send + 'static,
{
    pub(crate) fn new(
        id: ActorId,
        sender: MailboxSender<M, R>,
        status: Arc<StatusCell>,
        ask_timeout: Duration,
    ) -> Self {
        Self {
            id,
            sender,
            status,
            ask_timeout,
        }
    }

    pub fn id(&self) -> &ActorId {
        &self.id
    }

    pub fn name(&self) -> &str {
        self.id.name()
    }

    /// Canonical address, e.g. `<counter>`.
    pub fn address(&self) -> String {
        self.id.address()
    }

    pub fn status(&self) -> MailboxStatus {
        self.status.get()
    }

    /// True once the actor no longer accepts envelopes.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// Enqueues `message` without waiting for it to be processed.
    pub fn send(&self, message: M) -> Result<(), ActorError> {
        debug!(actor = self.name(), ?message, "Send");
        self.sender.enqueue(Envelope::tell(message), self.name())
    }

    /// Enqueues `message` and waits up to `timeout` for the reply.
    pub async fn ask(&self, message: M, timeout: Duration) -> Result<R, ActorError> {
        let (reply_to, response) = oneshot::channel();
        let deadline = Instant::now().checked_add(timeout);
        debug!(actor = self.name(), ?message, ?timeout, "Ask");
        self.sender
            .enqueue(Envelope::ask(message, reply_to, deadline), self.name())?;

        match tokio::time::timeout(timeout, response).await {
            Ok(Ok(result)) => result,
            // The loop dropped the envelope without answering (aborted shutdown).
            Ok(Err(_)) => Err(ActorError::ActorStopped(self.name().to_string())),
            Err(_) => {
                warn!(actor = self.name(), ?timeout, "Ask timed out");
                Err(ActorError::Timeout {
                    actor: self.name().to_string(),
                    after: timeout,
                })
            }
        }
    }

    /// [`ask`](Self::ask) with the system's configured default timeout.
    pub async fn ask_default(&self, message: M) -> Result<R, ActorError> {
        self.ask(message, self.ask_timeout).await
    }
}
