//! # Mailboxes
//!
//! A mailbox is the per-actor queue of [`Envelope`]s. The sending half is
//! cloned into every [`ActorPointer`](crate::ActorPointer); the receiving half
//! is owned by the actor's dispatch loop, which is the only reader. That
//! single reader is what serializes an actor's processing.
//!
//! Two capacity policies exist, picked by [`MailboxKind`]:
//!
//! - **Unbounded** (default): backed by `mpsc::unbounded_channel`, enqueue
//!   succeeds until the actor stops.
//! - **Bounded**: backed by `mpsc::channel`; a full mailbox rejects the
//!   envelope with [`ActorError::MailboxFull`] instead of blocking the sender.
//!
//! The mailbox also publishes a [`MailboxStatus`] that the dispatch loop
//! updates as it moves through `Idle -> Processing -> Idle`, and finally
//! `Draining -> Stopped` on shutdown.

use crate::config::MailboxKind;
use crate::error::ActorError;
use crate::message::Envelope;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

/// Observable processing state of one actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailboxStatus {
    /// Waiting for the next envelope.
    Idle,
    /// `on_receive` is running.
    Processing,
    /// Shutdown was requested; the loop is emptying what was already queued.
    Draining,
    /// The loop has exited. Enqueue fails with `ActorStopped`.
    Stopped,
}

impl MailboxStatus {
    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Self::Idle,
            1 => Self::Processing,
            2 => Self::Draining,
            _ => Self::Stopped,
        }
    }
}

/// Shared cell holding a [`MailboxStatus`].
#[derive(Debug, Default)]
pub(crate) struct StatusCell(AtomicU8);

impl StatusCell {
    pub(crate) fn get(&self) -> MailboxStatus {
        MailboxStatus::from_u8(self.0.load(Ordering::Acquire))
    }

    pub(crate) fn set(&self, status: MailboxStatus) {
        self.0.store(status as u8, Ordering::Release);
    }
}

/// Sending half of a mailbox.
#[derive(Debug)]
pub(crate) enum MailboxSender<M, R> {
    Unbounded(mpsc::UnboundedSender<Envelope<M, R>>),
    Bounded(mpsc::Sender<Envelope<M, R>>),
}

impl<M, R> Clone for MailboxSender<M, R> {
    fn clone(&self) -> Self {
        match self {
            Self::Unbounded(sender) => Self::Unbounded(sender.clone()),
            Self::Bounded(sender) => Self::Bounded(sender.clone()),
        }
    }
}

impl<M, R> MailboxSender<M, R> {
    /// Appends an envelope without waiting.
    pub(crate) fn enqueue(&self, envelope: Envelope<M, R>, actor: &str) -> Result<(), ActorError> {
        match self {
            Self::Unbounded(sender) => sender
                .send(envelope)
                .map_err(|_| ActorError::ActorStopped(actor.to_string())),
            Self::Bounded(sender) => sender.try_send(envelope).map_err(|e| match e {
                TrySendError::Full(_) => ActorError::MailboxFull(actor.to_string()),
                TrySendError::Closed(_) => ActorError::ActorStopped(actor.to_string()),
            }),
        }
    }

    pub(crate) fn is_closed(&self) -> bool {
        match self {
            Self::Unbounded(sender) => sender.is_closed(),
            Self::Bounded(sender) => sender.is_closed(),
        }
    }
}

#[derive(Debug)]
enum MailboxReceiver<M, R> {
    Unbounded(mpsc::UnboundedReceiver<Envelope<M, R>>),
    Bounded(mpsc::Receiver<Envelope<M, R>>),
}

/// Receiving half of a mailbox, owned by the dispatch loop.
#[derive(Debug)]
pub(crate) struct Mailbox<M, R> {
    receiver: MailboxReceiver<M, R>,
    status: Arc<StatusCell>,
}

/// Allocates a fresh mailbox of the given kind.
pub(crate) fn mailbox<M, R>(kind: MailboxKind) -> (MailboxSender<M, R>, Mailbox<M, R>) {
    let (sender, receiver) = match kind.normalized() {
        MailboxKind::Unbounded => {
            let (tx, rx) = mpsc::unbounded_channel();
            (MailboxSender::Unbounded(tx), MailboxReceiver::Unbounded(rx))
        }
        MailboxKind::Bounded(capacity) => {
            let (tx, rx) = mpsc::channel(capacity);
            (MailboxSender::Bounded(tx), MailboxReceiver::Bounded(rx))
        }
    };
    let mailbox = Mailbox {
        receiver,
        status: Arc::new(StatusCell::default()),
    };
    (sender, mailbox)
}

impl<M, R> Mailbox<M, R> {
    /// Waits for the next envelope. `None` once the mailbox is closed and empty.
    pub(crate) async fn recv(&mut self) -> Option<Envelope<M, R>> {
        match &mut self.receiver {
            MailboxReceiver::Unbounded(rx) => rx.recv().await,
            MailboxReceiver::Bounded(rx) => rx.recv().await,
        }
    }

    /// Takes the next envelope if one is already queued.
    pub(crate) fn try_recv(&mut self) -> Option<Envelope<M, R>> {
        match &mut self.receiver {
            MailboxReceiver::Unbounded(rx) => rx.try_recv().ok(),
            MailboxReceiver::Bounded(rx) => rx.try_recv().ok(),
        }
    }

    /// Stops accepting envelopes. Already-queued envelopes stay readable.
    pub(crate) fn close(&mut self) {
        match &mut self.receiver {
            MailboxReceiver::Unbounded(rx) => rx.close(),
            MailboxReceiver::Bounded(rx) => rx.close(),
        }
    }

    pub(crate) fn set_status(&self, status: MailboxStatus) {
        self.status.set(status);
    }

    pub(crate) fn status_cell(&self) -> Arc<StatusCell> {
        self.status.clone()
    }
}
