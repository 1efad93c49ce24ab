//! # Counter Actor
//!
//! The simplest useful actor: its state is the number of messages it has
//! processed, and every reply echoes the message text together with the new
//! count. The demo binary and the benches run many of these.
//!
//! ## Structure
//!
//! - [`CounterActor`] - [`Actor`](synapsys::Actor) implementation
//! - [`error`] - [`CounterError`] type for type-safe error handling
//! - [`spawn()`] - Registers a counter with an [`ActorSystem`]
//!
//! ## Usage
//!
//! ```rust
//! use synapsys::ActorSystem;
//! use synapsys_sample::counter_actor;
//! use synapsys_sample::model::Message;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let system = ActorSystem::create_default()?;
//!     let counter = counter_actor::spawn(&system, "counter")?;
//!
//!     let reply = counter.ask(Message::new("x"), Duration::from_secs(1)).await?;
//!     assert_eq!(reply, "Processed: x with new state: 1");
//!
//!     system.shutdown().await;
//!     Ok(())
//! }
//! ```

pub mod error;

pub use error::*;

use crate::model::Message;
use async_trait::async_trait;
use synapsys::{Actor, ActorError, ActorPointer, ActorSystem, Context};
use tracing::debug;

/// Pointer type for counter actors.
pub type CounterPointer = ActorPointer<Message, String>;

/// Counts processed messages.
#[derive(Debug, Clone)]
pub struct CounterActor {
    name: String,
}

impl CounterActor {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[async_trait]
impl Actor for CounterActor {
    type State = i64;
    type Message = Message;
    type Reply = String;
    type Error = CounterError;

    async fn on_receive(
        &self,
        message: Message,
        ctx: &Context<i64>,
    ) -> Result<(Context<i64>, String), CounterError> {
        debug!(
            actor = %self.name,
            text = %message.text,
            state = *ctx.state(),
            "Received message"
        );

        let next = ctx
            .state()
            .checked_add(1)
            .ok_or(CounterError::Overflow(*ctx.state()))?;
        let ctx = ctx.with_state(next);
        let reply = format!("Processed: {} with new state: {}", message.text, next);
        Ok((ctx, reply))
    }
}

/// Registers a counter starting at zero under `name`.
pub fn spawn(system: &ActorSystem, name: &str) -> Result<CounterPointer, ActorError> {
    spawn_at(system, name, 0)
}

/// Registers a counter starting at `initial` under `name`.
pub fn spawn_at(system: &ActorSystem, name: &str, initial: i64) -> Result<CounterPointer, ActorError> {
    system.actor_of(name, initial, None, |name, _| CounterActor::new(name))
}
