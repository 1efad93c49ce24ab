//! # Dispatch Loop
//!
//! Each registered actor gets one [`Dispatcher`] running as its own tokio
//! task. The dispatcher is the "server" half of the actor: it owns the
//! behavior, the receiving end of the mailbox and the current [`Context`].
//! Because it is the only reader of the mailbox and awaits each handler
//! before taking the next envelope, an actor never runs two handlers at once
//! and needs no lock around its state.
//!
//! ## Per-envelope steps
//!
//! 1. Pop the next envelope; status becomes `Processing`.
//! 2. Call `on_receive` with the current Context (panics are caught).
//! 3. On success store the returned Context; on failure keep the old one.
//! 4. Resolve the `ask` reply, if any. A reply nobody waits for is dropped.
//! 5. Status returns to `Idle`.
//!
//! After `max_reductions` envelopes in a row the task yields to the
//! scheduler so other actors sharing the worker thread get a turn.
//!
//! ## Shutdown
//!
//! When the system signals shutdown (or is dropped) the mailbox is closed and
//! status becomes `Draining`. With [`ShutdownPolicy::Drain`] the queued
//! envelopes are still processed; with [`ShutdownPolicy::Abort`] they are
//! dropped and their `ask` callers receive `ActorStopped`. Then `on_stop`
//! runs and status becomes `Stopped`.
//!
//! ## Failed start
//!
//! If `on_start` panics there is no Context to run with, so the actor never
//! enters the loop: its mailbox is closed, status becomes `Stopped`, and
//! [`run`](Dispatcher::run) reports [`Exit::StartFailed`]. The system then
//! removes the registry entry so the name can be registered again. Pointers
//! handed out before that point get `ActorStopped`.

use crate::actor::Actor;
use crate::config::{Config, ShutdownPolicy};
use crate::context::Context;
use crate::error::ActorError;
use crate::mailbox::{Mailbox, MailboxStatus};
use crate::message::Envelope;
use crate::pointer::ActorId;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::time::Instant;
use tokio::sync::watch;
use tracing::{debug, error, info, trace, warn};

/// How a dispatch loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Exit {
    /// Mailbox closed and drained, `on_stop` ran.
    Stopped,
    /// `on_start` panicked; no message was processed.
    StartFailed,
}

pub(crate) struct Dispatcher<A: Actor> {
    actor: A,
    id: ActorId,
    mailbox: Mailbox<A::Message, A::Reply>,
    shutdown: watch::Receiver<bool>,
    policy: ShutdownPolicy,
    max_reductions: usize,
    draining: bool,
    processed: u64,
    faults: u64,
}

impl<A: Actor> Dispatcher<A> {
    pub(crate) fn new(
        actor: A,
        id: ActorId,
        mailbox: Mailbox<A::Message, A::Reply>,
        shutdown: watch::Receiver<bool>,
        config: &Config,
    ) -> Self {
        Self {
            actor,
            id,
            mailbox,
            shutdown,
            policy: config.shutdown,
            max_reductions: config.max_reductions.max(1),
            draining: false,
            processed: 0,
            faults: 0,
        }
    }

    /// Runs the actor until its mailbox is closed and empty.
    pub(crate) async fn run(mut self, initial: Context<A::State>) -> Exit {
        let name = self.id.name().to_string();
        let actor = name.as_str();
        info!(actor, "Actor started");

        let started = AssertUnwindSafe(self.actor.on_start(initial))
            .catch_unwind()
            .await;
        let mut current = match started {
            Ok(ctx) => ctx,
            Err(panic) => {
                let reason = panic_reason(&*panic);
                error!(actor, %reason, "on_start panicked, actor not started");
                self.mailbox.close();
                self.mailbox.set_status(MailboxStatus::Stopped);
                return Exit::StartFailed;
            }
        };

        if *self.shutdown.borrow() {
            self.begin_shutdown();
        }

        let mut reductions = 0;
        loop {
            let next = if self.draining {
                self.mailbox.recv().await
            } else {
                tokio::select! {
                    biased;
                    // Err means the system was dropped, which stops the actor too.
                    _ = self.shutdown.changed() => {
                        self.begin_shutdown();
                        continue;
                    }
                    envelope = self.mailbox.recv() => envelope,
                }
            };
            let Some(envelope) = next else {
                break;
            };

            self.process(&mut current, envelope).await;

            reductions += 1;
            if reductions >= self.max_reductions {
                trace!(actor, reductions, "Reduction budget spent, yielding");
                reductions = 0;
                tokio::task::yield_now().await;
            }
        }

        self.mailbox.set_status(MailboxStatus::Draining);
        if AssertUnwindSafe(self.actor.on_stop(&current))
            .catch_unwind()
            .await
            .is_err()
        {
            warn!(actor, "on_stop panicked");
        }
        self.mailbox.set_status(MailboxStatus::Stopped);
        info!(
            actor,
            processed = self.processed,
            faults = self.faults,
            state = ?current.state(),
            "Actor stopped"
        );
        Exit::Stopped
    }

    async fn process(
        &mut self,
        current: &mut Context<A::State>,
        envelope: Envelope<A::Message, A::Reply>,
    ) {
        let actor = self.id.name();
        if envelope.is_stale(Instant::now()) {
            debug!(actor, "Caller already gave up, processing anyway");
        }
        let Envelope {
            message,
            reply_to,
            deadline,
        } = envelope;

        self.mailbox.set_status(MailboxStatus::Processing);
        debug!(actor, ?message, "Dispatch");

        let outcome = AssertUnwindSafe(self.actor.on_receive(message, current))
            .catch_unwind()
            .await;
        self.processed += 1;

        let result = match outcome {
            Ok(Ok((next, reply))) => {
                *current = next;
                Ok(reply)
            }
            Ok(Err(e)) => {
                self.faults += 1;
                warn!(actor, error = %e, "Handler failed, context unchanged");
                Err(ActorError::HandlerFault {
                    actor: actor.to_string(),
                    reason: e.to_string(),
                })
            }
            Err(panic) => {
                self.faults += 1;
                let reason = panic_reason(&*panic);
                error!(actor, %reason, "Handler panicked, context unchanged");
                Err(ActorError::HandlerFault {
                    actor: actor.to_string(),
                    reason,
                })
            }
        };

        if !self.draining {
            self.mailbox.set_status(MailboxStatus::Idle);
        }

        if let Some(reply_to) = reply_to {
            if reply_to.send(result).is_err() {
                let late_by = deadline.map(|d| Instant::now().saturating_duration_since(d));
                warn!(actor, ?late_by, "Caller stopped waiting, reply discarded");
            }
        }
    }

    fn begin_shutdown(&mut self) {
        let actor = self.id.name();
        self.draining = true;
        self.mailbox.close();
        self.mailbox.set_status(MailboxStatus::Draining);

        match self.policy {
            ShutdownPolicy::Drain => info!(actor, "Draining mailbox"),
            ShutdownPolicy::Abort => {
                let mut dropped = 0u64;
                while let Some(envelope) = self.mailbox.try_recv() {
                    if let Some(reply_to) = envelope.reply_to {
                        let _ = reply_to.send(Err(ActorError::ActorStopped(actor.to_string())));
                    }
                    dropped += 1;
                }
                info!(actor, dropped, "Mailbox aborted");
            }
        }
    }
}

fn panic_reason(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
