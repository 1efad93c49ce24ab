//! # Synapsys
//!
//! A small typed actor runtime on top of tokio. Actors hold private state,
//! receive messages through a mailbox and process them one at a time, so the
//! state never needs a lock. Everything else talks to an actor through an
//! [`ActorPointer`].
//!
//! ## Why actors?
//!
//! - Isolated state (no shared memory, no locks)
//! - Message-passing concurrency
//! - Sequential processing within each actor eliminates races on its state
//! - Many actors run in parallel on the runtime's worker threads
//!
//! **Further Reading**:
//! - [Actor Model (Wikipedia)](https://en.wikipedia.org/wiki/Actor_model) - Foundational concurrency pattern by Carl Hewitt
//! - [Actors in Rust](https://ryhl.io/blog/actors-with-tokio/) - Practical guide to implementing actors with Tokio
//!
//! ## Architecture Overview
//!
//! The runtime separates concerns into three layers:
//!
//! 1. **Behavior Layer** ([`Actor`]) - Your transition function over an immutable [`Context`]
//! 2. **Runtime Layer** ([`ActorSystem`]) - Registry, mailboxes and one dispatch task per actor
//! 3. **Interface Layer** ([`ActorPointer`]) - Typed `send` and `ask`
//!
//! You write the behavior once; the system handles queueing, scheduling,
//! replies, timeouts and fault isolation.
//!
//! ## Core Abstractions
//!
//! ### [`Actor`] - The Behavior
//!
//! ```rust
//! use synapsys::{Actor, ActorSystem, Context};
//! use async_trait::async_trait;
//! use std::time::Duration;
//!
//! struct Greeter;
//!
//! #[derive(Debug, thiserror::Error)]
//! #[error("empty name")]
//! struct EmptyName;
//!
//! #[async_trait]
//! impl Actor for Greeter {
//!     type State = u32;          // how many people were greeted
//!     type Message = String;     // a name
//!     type Reply = String;       // the greeting
//!     type Error = EmptyName;
//!
//!     async fn on_receive(&self, name: String, ctx: &Context<u32>) -> Result<(Context<u32>, String), EmptyName> {
//!         if name.is_empty() {
//!             return Err(EmptyName);
//!         }
//!         let next = ctx.map(|n| n + 1);
//!         let reply = format!("Hello {name}, you are visitor #{}", next.state());
//!         Ok((next, reply))
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let system = ActorSystem::create_default().unwrap();
//!     let greeter = system.actor_of("greeter", 0, None, |_, _| Greeter).unwrap();
//!
//!     let reply = greeter.ask("Ada".into(), Duration::from_secs(1)).await.unwrap();
//!     assert_eq!(reply, "Hello Ada, you are visitor #1");
//!
//!     // A failing handler leaves the state as it was.
//!     assert!(greeter.ask(String::new(), Duration::from_secs(1)).await.is_err());
//!     let reply = greeter.ask("Grace".into(), Duration::from_secs(1)).await.unwrap();
//!     assert_eq!(reply, "Hello Grace, you are visitor #2");
//!
//!     system.shutdown().await;
//! }
//! ```
//!
//! ### [`ActorPointer`] - The Interface
//!
//! - `send(msg)` enqueues and returns immediately.
//! - `ask(msg, timeout)` waits for the reply, or fails with
//!   [`ActorError::Timeout`]. Exactly one of the two happens.
//!
//! ### [`ActorSystem`] - The Runtime
//!
//! Maps unique names to actors and stops them on
//! [`shutdown`](ActorSystem::shutdown). Mailbox capacity, the reduction budget,
//! the default ask timeout and the shutdown policy come from [`Config`].
//!
//! ## Concurrency Model
//!
//! - Each actor runs in its own Tokio task
//! - Messages to one actor are processed **sequentially**, in arrival order
//! - Multiple actors run in **parallel** on the runtime's worker threads
//! - A busy actor yields after `max_reductions` messages so it cannot starve
//!   the others on its thread
//!
//! ## Testing
//!
//! The [`testkit`] module hands out real pointers backed by a scripted mock or
//! a manual probe, so code that talks to actors can be tested without
//! spawning them.

pub mod actor;
pub mod config;
pub mod context;
mod dispatch;
pub mod error;
pub mod mailbox;
pub mod message;
pub mod pointer;
pub mod system;
pub mod testkit;
pub mod tracing;

// Re-export core types for convenience
pub use actor::Actor;
pub use config::{Config, MailboxKind, ShutdownPolicy};
pub use context::Context;
pub use error::ActorError;
pub use mailbox::MailboxStatus;
pub use message::Envelope;
pub use pointer::{ActorId, ActorPointer};
pub use system::ActorSystem;
