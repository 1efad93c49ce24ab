//! # Actor Trait
//!
//! The [`Actor`] trait is the contract every behavior implements to be hosted
//! by an [`ActorSystem`](crate::ActorSystem). It names the state, message,
//! reply and error types through associated types, so a pointer to a counter
//! actor cannot be handed a message meant for some other actor: the compiler
//! rejects it.
//!
//! # Transition Function
//!
//! [`Actor::on_receive`] is a transition `(message, context) -> (context, reply)`.
//! The handler borrows the current [`Context`] and returns the next one; it
//! never mutates anything in place. The dispatch loop owns the current
//! snapshot and swaps it for the returned one after the handler succeeds.
//!
//! Because the handler only borrows the snapshot, a failing handler cannot
//! damage it: when `on_receive` returns `Err` (or panics) the actor keeps the
//! Context it had before the message, the `ask` caller receives
//! [`ActorError::HandlerFault`](crate::ActorError::HandlerFault), and the
//! actor goes on with the next envelope.
//!
//! # Blocking
//!
//! The handler is `async`, but everything it awaits delays the rest of that
//! actor's mailbox. A handler that sleeps for a second holds every later
//! message to the same actor for a second. Other actors are unaffected.
//!
//! # Provided Hooks
//!
//! - [`Actor::on_start`] runs once before the first message.
//! - [`Actor::on_stop`] runs once after the mailbox is closed and drained.
//!
//! Both default to doing nothing.

use crate::context::Context;
use async_trait::async_trait;
use std::fmt::Debug;

/// A behavior over a state type, a message type and a reply type.
///
/// ```rust
/// use synapsys::{Actor, Context};
/// use async_trait::async_trait;
///
/// struct Counter;
///
/// #[derive(Debug, thiserror::Error)]
/// #[error("counter overflow")]
/// struct Overflow;
///
/// #[async_trait]
/// impl Actor for Counter {
///     type State = u8;
///     type Message = u8;
///     type Reply = u8;
///     type Error = Overflow;
///
///     async fn on_receive(
///         &self,
///         step: u8,
///         ctx: &Context<u8>,
///     ) -> Result<(Context<u8>, u8), Overflow> {
///         let next = ctx.state().checked_add(step).ok_or(Overflow)?;
///         Ok((ctx.with_state(next), next))
///     }
/// }
/// ```
#[async_trait]
pub trait Actor: Send + Sync + 'static {
    type State: Send + Sync + Debug + 'static;

    type Message: Send + Debug + 'static;

    type Reply: Send + Debug + 'static;

    /// Errors returned by `on_receive`. They are reported to `ask` callers as
    /// `HandlerFault` and never stop the actor.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Computes the next Context and the reply for one message.
    async fn on_receive(
        &self,
        message: Self::Message,
        ctx: &Context<Self::State>,
    ) -> Result<(Context<Self::State>, Self::Reply), Self::Error>;

    /// Called once with the initial Context before any message is processed.
    ///
    /// A panic here stops the actor before its first message and releases
    /// its name in the system.
    async fn on_start(&self, ctx: Context<Self::State>) -> Context<Self::State> {
        ctx
    }

    /// Called once with the final Context after the dispatch loop ends.
    async fn on_stop(&self, _ctx: &Context<Self::State>) {}
}
