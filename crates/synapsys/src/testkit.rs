//! # Test Kit
//!
//! Code that talks to actors (request handlers, orchestrators, other actors)
//! is easier to test when the actor on the other end is under the test's
//! control. This module provides two stand-ins that hand out real
//! [`ActorPointer`]s, so the code under test cannot tell the difference.
//!
//! | Tool | Reply source | Use case |
//! |------|--------------|----------|
//! | [`MockActor`] | Scripted expectations, answered by a background task | Checking how callers react to replies and errors |
//! | [`probe`] | The test, envelope by envelope | Asserting exactly what a caller sent, and when |
//!
//! ## Scripted replies
//!
//! ```rust
//! use synapsys::testkit::MockActor;
//! use synapsys::ActorError;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mock = MockActor::<String, usize>::new("lengths");
//!     mock.expect_ask().return_ok(5);
//!     mock.expect_ask().return_err(ActorError::MailboxFull("lengths".into()));
//!
//!     let pointer = mock.pointer();
//!     assert_eq!(pointer.ask("hello".into(), Duration::from_secs(1)).await, Ok(5));
//!     assert!(pointer.ask("again".into(), Duration::from_secs(1)).await.is_err());
//!
//!     mock.verify();
//! }
//! ```
//!
//! ## Manual probe
//!
//! ```rust
//! use synapsys::testkit::probe;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() {
//!     let (pointer, mut probe) = probe::<u32, u32>("doubler");
//!
//!     let caller = tokio::spawn(async move { pointer.ask(21, Duration::from_secs(1)).await });
//!
//!     let (message, responder) = probe.expect_ask().await.expect("an ask");
//!     responder.reply(message * 2);
//!
//!     assert_eq!(caller.await.unwrap(), Ok(42));
//! }
//! ```

use crate::config::{Config, MailboxKind};
use crate::error::ActorError;
use crate::mailbox::{mailbox, Mailbox};
use crate::message::{Envelope, ReplyTo};
use crate::pointer::{ActorId, ActorPointer};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::fmt::Debug;
use std::sync::Arc;
use uuid::Uuid;

fn detached<M, R>(name: &str) -> (ActorPointer<M, R>, Mailbox<M, R>)
where
    M: Send + Debug + 'static,
    R: Send + 'static,
{
    let (sender, mailbox) = mailbox(MailboxKind::Unbounded);
    let id = ActorId::new(Uuid::nil(), name);
    let pointer = ActorPointer::new(
        id,
        sender,
        mailbox.status_cell(),
        Config::default().ask_timeout,
    );
    (pointer, mailbox)
}

// =============================================================================
// Probe
// =============================================================================

/// Creates a pointer whose envelopes are delivered to the returned [`Probe`]
/// instead of an actor.
pub fn probe<M, R>(name: &str) -> (ActorPointer<M, R>, Probe<M, R>)
where
    M: Send + Debug + 'static,
    R: Send + 'static,
{
    let (pointer, mailbox) = detached(name);
    (pointer, Probe { mailbox })
}

/// Receiving end of a [`probe`] pointer.
pub struct Probe<M, R> {
    mailbox: Mailbox<M, R>,
}

impl<M, R> Probe<M, R> {
    /// Next envelope, whatever its kind. `None` once every pointer is dropped.
    pub async fn next(&mut self) -> Option<Envelope<M, R>> {
        self.mailbox.recv().await
    }

    /// Next envelope, which must come from `send`.
    pub async fn expect_send(&mut self) -> Option<M> {
        match self.next().await {
            Some(envelope) if !envelope.expects_reply() => Some(envelope.message),
            _ => None,
        }
    }

    /// Next envelope, which must come from `ask`.
    pub async fn expect_ask(&mut self) -> Option<(M, Responder<R>)> {
        match self.next().await {
            Some(Envelope {
                message,
                reply_to: Some(reply_to),
                ..
            }) => Some((message, Responder { reply_to })),
            _ => None,
        }
    }

    /// Panics if an envelope is already waiting.
    pub fn assert_empty(&mut self) {
        if self.mailbox.try_recv().is_some() {
            panic!("Probe received an unexpected envelope");
        }
    }
}

/// Answers one `ask` captured by a [`Probe`].
pub struct Responder<R> {
    reply_to: ReplyTo<R>,
}

impl<R> Responder<R> {
    /// Returns false if the caller already gave up.
    pub fn reply(self, value: R) -> bool {
        self.reply_to.send(Ok(value)).is_ok()
    }

    pub fn fail(self, error: ActorError) -> bool {
        self.reply_to.send(Err(error)).is_ok()
    }

    pub fn is_abandoned(&self) -> bool {
        self.reply_to.is_closed()
    }
}

// =============================================================================
// MockActor
// =============================================================================

enum Expectation<R> {
    Send,
    Ask(Result<R, ActorError>),
}

/// A stand-in actor answering from a queue of expectations.
///
/// Expectations are consumed in order. An envelope that does not match the
/// next expectation (or arrives when none are left) is recorded as a
/// mismatch: an `ask` caller gets a `HandlerFault`, and [`MockActor::verify`]
/// panics afterwards.
///
/// ```ignore
/// let mock = MockActor::<Command, Reply>::new("inventory");
/// mock.expect_send();
/// mock.expect_ask().return_ok(Reply::Reserved);
///
/// run_code_under_test(mock.pointer()).await;
/// mock.verify(); // all expectations met
/// ```
pub struct MockActor<M, R> {
    pointer: ActorPointer<M, R>,
    expectations: Arc<Mutex<VecDeque<Expectation<R>>>>,
    received: Arc<Mutex<Vec<M>>>,
    mismatches: Arc<Mutex<Vec<String>>>,
    handle: tokio::task::JoinHandle<()>,
}

impl<M, R> MockActor<M, R>
where
    M: Send + Debug + 'static,
    R: Send + 'static,
{
    /// Creates a mock with no expectations. Must be called inside a tokio runtime.
    pub fn new(name: &str) -> Self {
        let (pointer, mut mailbox) = detached::<M, R>(name);
        let expectations = Arc::new(Mutex::new(VecDeque::new()));
        let received = Arc::new(Mutex::new(Vec::new()));

        let mismatches = Arc::new(Mutex::new(Vec::new()));

        let actor = name.to_string();
        let expectations_clone = expectations.clone();
        let received_clone = received.clone();
        let mismatches_clone = mismatches.clone();
        let handle = tokio::spawn(async move {
            while let Some(envelope) = mailbox.recv().await {
                let expectation = expectations_clone.lock().pop_front();
                let Envelope {
                    message, reply_to, ..
                } = envelope;

                match (reply_to, expectation) {
                    (None, Some(Expectation::Send)) => {}
                    (Some(reply_to), Some(Expectation::Ask(response))) => {
                        let _ = reply_to.send(response);
                    }
                    (reply_to, expectation) => {
                        let expected = match expectation {
                            Some(Expectation::Send) => "send",
                            Some(Expectation::Ask(_)) => "ask",
                            None => "nothing",
                        };
                        let got = if reply_to.is_some() { "ask" } else { "send" };
                        let reason = format!("expected {expected}, got {got} of {message:?}");
                        if let Some(reply_to) = reply_to {
                            let _ = reply_to.send(Err(ActorError::HandlerFault {
                                actor: actor.clone(),
                                reason: reason.clone(),
                            }));
                        }
                        mismatches_clone.lock().push(reason);
                    }
                }
                received_clone.lock().push(message);
            }
        });

        Self {
            pointer,
            expectations,
            received,
            mismatches,
            handle,
        }
    }

    pub fn pointer(&self) -> ActorPointer<M, R> {
        self.pointer.clone()
    }

    /// Expects a fire-and-forget envelope.
    pub fn expect_send(&self) {
        self.expectations.lock().push_back(Expectation::Send);
    }

    /// Expects an `ask`; finish with `return_ok` or `return_err`.
    pub fn expect_ask(&self) -> AskExpectationBuilder<R> {
        AskExpectationBuilder {
            expectations: self.expectations.clone(),
        }
    }

    /// Messages handled so far, in arrival order.
    pub fn received(&self) -> Vec<M>
    where
        M: Clone,
    {
        self.received.lock().clone()
    }

    /// Verifies that every envelope matched its expectation and that all
    /// expectations were met.
    pub fn verify(&self) {
        let mismatches = self.mismatches.lock();
        if !mismatches.is_empty() {
            panic!("Mock received unexpected envelopes: {mismatches:?}");
        }
        if self.handle.is_finished() {
            panic!("Mock task stopped before verification");
        }
        let remaining = self.expectations.lock().len();
        if remaining > 0 {
            panic!("Not all expectations were met. {remaining} remaining");
        }
    }
}

/// Builder for `ask` expectations.
pub struct AskExpectationBuilder<R> {
    expectations: Arc<Mutex<VecDeque<Expectation<R>>>>,
}

impl<R> AskExpectationBuilder<R> {
    pub fn return_ok(self, reply: R) {
        self.expectations
            .lock()
            .push_back(Expectation::Ask(Ok(reply)));
    }

    pub fn return_err(self, error: ActorError) {
        self.expectations
            .lock()
            .push_back(Expectation::Ask(Err(error)));
    }
}
