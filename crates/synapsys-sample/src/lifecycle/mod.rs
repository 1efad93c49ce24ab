//! # Fleet Lifecycle
//!
//! Wiring many actors together is where the work is; individual counters are
//! trivial. This module provides the "conductor" used by the demo binary,
//! the integration tests and the benches.
//!
//! **Key Responsibilities:**
//! 1. **Actor Creation** - Register `N` counters named `my-actor-{i}`
//! 2. **Load Generation** - Fan fire-and-forget messages out to every counter
//! 3. **Measurement** - Time `ask` round trips
//! 4. **Graceful Shutdown** - Drain every mailbox before returning
//!
//! ```rust,ignore
//! let fleet = CounterFleet::start(Config::default(), 10_000)?;
//! fleet.fan_out(50)?;
//! let latency = fleet.measure_ask(1_000).await?;
//! fleet.shutdown().await;
//! ```
//!
//! ## Graceful Shutdown
//!
//! [`CounterFleet::shutdown`] delegates to [`ActorSystem::shutdown`](synapsys::ActorSystem::shutdown):
//! registration stops, every counter drains what it already has queued, and
//! the call returns once all dispatch loops have exited. Messages sent by
//! `fan_out` are therefore all processed before `shutdown` returns.
//!
//! ## Observability
//!
//! Call [`synapsys::tracing::setup_tracing`] once in `main`; the fleet logs
//! progress at `info` and each counter logs every message at `debug`.

pub mod counter_fleet;

pub use counter_fleet::*;
