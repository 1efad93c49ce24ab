//! # Actor System
//!
//! The [`ActorSystem`] is the registry and scheduler of actors. It maps each
//! actor name to its entry, spawns one dispatch task per actor on the tokio
//! runtime it was created in, and coordinates shutdown.
//!
//! ## Usage Pattern
//!
//! 1. **Create**: `ActorSystem::create(config)` inside a tokio runtime.
//! 2. **Register**: `actor_of(name, initial_state, parent, factory)` returns
//!    a typed [`ActorPointer`].
//! 3. **Use**: share the pointers (or the system behind an `Arc`) with
//!    whatever needs to talk to the actors.
//! 4. **Shutdown**: `shutdown().await` stops every actor according to the
//!    configured [`ShutdownPolicy`](crate::ShutdownPolicy).
//!
//! ```rust
//! use synapsys::{Actor, ActorSystem, Context};
//! use async_trait::async_trait;
//! use std::convert::Infallible;
//! use std::time::Duration;
//!
//! struct Echo;
//!
//! #[async_trait]
//! impl Actor for Echo {
//!     type State = ();
//!     type Message = String;
//!     type Reply = String;
//!     type Error = Infallible;
//!
//!     async fn on_receive(&self, msg: String, ctx: &Context<()>) -> Result<(Context<()>, String), Infallible> {
//!         Ok((ctx.with_state(()), msg))
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let system = ActorSystem::create_default().unwrap();
//!     let echo = system.actor_of("echo", (), None, |_, _| Echo).unwrap();
//!
//!     let reply = echo.ask("hi".to_string(), Duration::from_secs(1)).await.unwrap();
//!     assert_eq!(reply, "hi");
//!
//!     system.shutdown().await;
//! }
//! ```
//!
//! ## Instances, not a global
//!
//! Every call to [`ActorSystem::create`] returns an independent system with
//! its own registry; nothing is process-wide. Callers that want one system per
//! process create it once at startup and pass it (usually as
//! `Arc<ActorSystem>`) to the code that needs it.
//!
//! ## Parents
//!
//! `actor_of` accepts an optional parent [`ActorId`]. The relationship is only
//! recorded ([`ActorSystem::parent_of`], [`ActorSystem::children_of`]); no
//! restart or cascading stop is attached to it.
//!
//! ## Failed starts
//!
//! An actor whose `on_start` panics is stopped and removed from the registry
//! as soon as its dispatch task notices; the name becomes free again. Any
//! pointer obtained before that answers with
//! [`ActorError::ActorStopped`].
//!
//! ## Dropping
//!
//! Dropping the system without calling `shutdown` signals every actor to
//! drain and stop, but nobody waits for them.

use crate::actor::Actor;
use crate::config::Config;
use crate::context::Context;
use crate::dispatch::{Dispatcher, Exit};
use crate::error::ActorError;
use crate::mailbox::{mailbox, MailboxStatus, StatusCell};
use crate::pointer::{ActorId, ActorPointer};
use parking_lot::RwLock;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use uuid::Uuid;

struct ActorEntry {
    id: ActorId,
    parent: Option<ActorId>,
    status: Arc<StatusCell>,
    /// The `ActorPointer<M, R>` handed out at registration, type-erased.
    pointer: Box<dyn Any + Send + Sync>,
    handle: Option<JoinHandle<()>>,
}

#[derive(Default)]
struct Registry {
    actors: HashMap<String, ActorEntry>,
    closed: bool,
}

/// Registry and scheduler for a set of actors.
pub struct ActorSystem {
    id: Uuid,
    config: Config,
    runtime: Handle,
    registry: Arc<RwLock<Registry>>,
    shutdown: watch::Sender<bool>,
}

impl ActorSystem {
    /// Creates a system bound to the current tokio runtime.
    ///
    /// Fails with [`ActorError::NoRuntime`] when called outside a runtime.
    pub fn create(config: Config) -> Result<Self, ActorError> {
        let runtime = Handle::try_current().map_err(|_| ActorError::NoRuntime)?;
        let (shutdown, _) = watch::channel(false);
        let id = Uuid::new_v4();
        info!(system = %id, mailbox = ?config.mailbox, max_reductions = config.max_reductions, "Actor system created");
        Ok(Self {
            id,
            config,
            runtime,
            registry: Arc::new(RwLock::new(Registry::default())),
            shutdown,
        })
    }

    pub fn create_default() -> Result<Self, ActorError> {
        Self::create(Config::default())
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Builds an actor with `factory`, seeds its Context with `initial_state`
    /// and registers it under `name`.
    ///
    /// # Errors
    ///
    /// - [`ActorError::InvalidName`] for an empty name.
    /// - [`ActorError::DuplicateName`] when `name` is taken; the existing
    ///   actor is left untouched.
    /// - [`ActorError::UnknownParent`] when `parent` is not registered here.
    /// - [`ActorError::SystemShutdown`] after [`shutdown`](Self::shutdown).
    pub fn actor_of<A, F>(
        &self,
        name: impl Into<String>,
        initial_state: A::State,
        parent: Option<&ActorId>,
        factory: F,
    ) -> Result<ActorPointer<A::Message, A::Reply>, ActorError>
    where
        A: Actor,
        F: FnOnce(&str, &A::State) -> A,
    {
        let name = name.into();
        self.check_registration(&self.registry.read(), &name, parent)?;

        // The factory runs outside the lock so it may look things up in the system.
        let actor = factory(&name, &initial_state);

        let mut registry = self.registry.write();
        // Re-check: another caller may have taken the name meanwhile.
        self.check_registration(&registry, &name, parent)?;

        let id = ActorId::new(self.id, &name);
        let (sender, mailbox) = mailbox(self.config.mailbox);
        let status = mailbox.status_cell();
        let pointer = ActorPointer::new(id.clone(), sender, status.clone(), self.config.ask_timeout);
        let dispatcher = Dispatcher::new(
            actor,
            id.clone(),
            mailbox,
            self.shutdown.subscribe(),
            &self.config,
        );
        let registry_handle = Arc::clone(&self.registry);
        let actor_name = name.clone();
        let handle = self.runtime.spawn(async move {
            if dispatcher.run(Context::new(initial_state)).await == Exit::StartFailed {
                registry_handle.write().actors.remove(&actor_name);
                warn!(actor = %actor_name, "Actor deregistered after failed start");
            }
        });

        info!(actor = %name, parent = ?parent.map(|p| p.name()), "Actor registered");
        registry.actors.insert(
            name,
            ActorEntry {
                id,
                parent: parent.cloned(),
                status,
                pointer: Box::new(pointer.clone()),
                handle: Some(handle),
            },
        );
        Ok(pointer)
    }

    fn check_registration(
        &self,
        registry: &Registry,
        name: &str,
        parent: Option<&ActorId>,
    ) -> Result<(), ActorError> {
        if name.is_empty() {
            return Err(ActorError::InvalidName);
        }
        if registry.closed {
            return Err(ActorError::SystemShutdown);
        }
        if registry.actors.contains_key(name) {
            warn!(actor = name, "Duplicate actor name");
            return Err(ActorError::DuplicateName(name.to_string()));
        }
        if let Some(parent) = parent {
            if parent.system() != self.id || !registry.actors.contains_key(parent.name()) {
                return Err(ActorError::UnknownParent(parent.to_string()));
            }
        }
        Ok(())
    }

    /// Typed lookup of a registered actor.
    pub fn pointer_of<M, R>(&self, name: &str) -> Result<ActorPointer<M, R>, ActorError>
    where
        M: Send + 'static,
        R: Send + 'static,
    {
        let registry = self.registry.read();
        let entry = registry
            .actors
            .get(name)
            .ok_or_else(|| ActorError::NotFound(name.to_string()))?;
        entry
            .pointer
            .downcast_ref::<ActorPointer<M, R>>()
            .cloned()
            .ok_or_else(|| ActorError::TypeMismatch(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.registry.read().actors.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.registry.read().actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.read().actors.is_empty()
    }

    pub fn status_of(&self, name: &str) -> Option<MailboxStatus> {
        self.registry
            .read()
            .actors
            .get(name)
            .map(|entry| entry.status.get())
    }

    pub fn parent_of(&self, name: &str) -> Option<ActorId> {
        self.registry
            .read()
            .actors
            .get(name)
            .and_then(|entry| entry.parent.clone())
    }

    /// Actors registered with `parent` as their parent, sorted by name.
    pub fn children_of(&self, parent: &ActorId) -> Vec<ActorId> {
        let mut children: Vec<ActorId> = self
            .registry
            .read()
            .actors
            .values()
            .filter(|entry| entry.parent.as_ref() == Some(parent))
            .map(|entry| entry.id.clone())
            .collect();
        children.sort_by(|a, b| a.name().cmp(b.name()));
        children
    }

    pub fn is_shut_down(&self) -> bool {
        self.registry.read().closed
    }

    /// Stops every actor and waits for their dispatch loops to finish.
    ///
    /// New registrations are refused from this point on. Queued envelopes are
    /// drained or dropped depending on [`Config::shutdown`]. A second call
    /// returns immediately.
    pub async fn shutdown(&self) {
        let handles: Vec<(String, JoinHandle<()>)> = {
            let mut registry = self.registry.write();
            if registry.closed {
                return;
            }
            registry.closed = true;
            registry
                .actors
                .iter_mut()
                .filter_map(|(name, entry)| entry.handle.take().map(|h| (name.clone(), h)))
                .collect()
        };

        info!(system = %self.id, actors = handles.len(), policy = ?self.config.shutdown, "Shutting down");
        self.shutdown.send_replace(true);

        for (name, handle) in handles {
            if let Err(e) = handle.await {
                warn!(actor = %name, error = %e, "Dispatch task ended abnormally");
            }
        }
        info!(system = %self.id, "Shutdown complete");
    }
}
