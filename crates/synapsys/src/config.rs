//! # Runtime Configuration
//!
//! [`Config`] collects the knobs of an [`ActorSystem`](crate::ActorSystem).
//! Defaults match the behaviour most callers want: unbounded mailboxes, a
//! 50-envelope reduction budget, a 5 second default `ask` timeout and a
//! draining shutdown.
//!
//! The struct derives `serde` traits so an application can load it from
//! whatever format it already uses for settings. Missing fields fall back to
//! their defaults.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Capacity policy of every mailbox created by the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MailboxKind {
    /// Enqueue always succeeds; memory is the only bound.
    Unbounded,
    /// Enqueue fails with [`ActorError::MailboxFull`](crate::ActorError::MailboxFull)
    /// once `capacity` envelopes are waiting. Never blocks the sender.
    /// A capacity of 0 is raised to 1.
    Bounded(usize),
}

impl MailboxKind {
    /// Same kind with the capacity raised to at least 1.
    pub fn normalized(self) -> Self {
        match self {
            Self::Bounded(capacity) => Self::Bounded(capacity.max(1)),
            Self::Unbounded => Self::Unbounded,
        }
    }
}

/// What happens to envelopes still queued when the system shuts down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShutdownPolicy {
    /// Process every envelope already enqueued, then stop.
    Drain,
    /// Drop queued envelopes; pending `ask` callers get `ActorStopped`.
    Abort,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub mailbox: MailboxKind,
    /// Envelopes an actor may process back-to-back before yielding its worker.
    pub max_reductions: usize,
    /// Timeout used by [`ActorPointer::ask_default`](crate::ActorPointer::ask_default).
    pub ask_timeout: Duration,
    pub shutdown: ShutdownPolicy,
    /// Worker threads for [`Config::build_runtime`]. `None` uses one per core.
    pub worker_threads: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mailbox: MailboxKind::Unbounded,
            max_reductions: 50,
            ask_timeout: Duration::from_secs(5),
            shutdown: ShutdownPolicy::Drain,
            worker_threads: None,
        }
    }
}

impl Config {
    pub fn with_mailbox(mut self, mailbox: MailboxKind) -> Self {
        self.mailbox = mailbox.normalized();
        self
    }

    pub fn with_max_reductions(mut self, max_reductions: usize) -> Self {
        self.max_reductions = max_reductions.max(1);
        self
    }

    pub fn with_ask_timeout(mut self, timeout: Duration) -> Self {
        self.ask_timeout = timeout;
        self
    }

    pub fn with_shutdown(mut self, policy: ShutdownPolicy) -> Self {
        self.shutdown = policy;
        self
    }

    pub fn with_worker_threads(mut self, threads: usize) -> Self {
        self.worker_threads = Some(threads.max(1));
        self
    }

    /// Builds the multi-threaded tokio runtime that hosts the actors.
    ///
    /// Every actor is a task on this runtime, so `worker_threads` is the size
    /// of the pool the actors share.
    pub fn build_runtime(&self) -> std::io::Result<tokio::runtime::Runtime> {
        let mut builder = tokio::runtime::Builder::new_multi_thread();
        builder.enable_all().thread_name("synapsys-worker");
        if let Some(threads) = self.worker_threads {
            builder.worker_threads(threads);
        }
        builder.build()
    }
}
