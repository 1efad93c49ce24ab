//! # Synapsys Sample
//!
//! A load demo for the [`synapsys`] runtime.
//!
//! ## 🚀 Core Components
//!
//! - **[model]**: The [`Message`] payload.
//! - **[counter_actor]**: The [`CounterActor`](synapsys_sample::counter_actor::CounterActor) behavior.
//! - **[lifecycle]**: The [`CounterFleet`] that registers, drives and stops the counters.
//!
//! ## 📚 Quick Start
//!
//! ```bash
//! RUST_LOG=info cargo run -p synapsys-sample --release
//! ```
//!
//! The demo:
//! 1.  Registers many counter actors.
//! 2.  Sends each of them a burst of fire-and-forget messages.
//! 3.  Measures `ask` latency while they work.
//! 4.  Drains every mailbox on shutdown.

use std::time::Instant;
use synapsys::tracing::setup_tracing;
use synapsys::Config;
use synapsys_sample::lifecycle::CounterFleet;
use synapsys_sample::model::Message;
use tracing::{info, Instrument};

const ACTORS: usize = 80_000;
const MESSAGES_PER_ACTOR: usize = 50;
const ASK_SAMPLES: usize = 1_000;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_tracing();

    let config = Config::default();
    info!(actors = ACTORS, per_actor = MESSAGES_PER_ACTOR, "Starting demo");

    let started = Instant::now();
    let fleet = CounterFleet::start(config, ACTORS)?;
    let creation_time = started.elapsed();

    let started = Instant::now();
    let sent = fleet.fan_out(MESSAGES_PER_ACTOR)?;
    let execution_time = started.elapsed();

    let span = tracing::info_span!("ask_latency");
    let latency = fleet.measure_ask(ASK_SAMPLES).instrument(span).await?;

    if let Some(first) = fleet.counters().first() {
        let reply = first.ask_default(Message::new("Goodbye")).await?;
        info!(actor = %first.address(), %reply, "Final reply");
    }

    let started = Instant::now();
    fleet.shutdown().await;
    let drain_time = started.elapsed();

    println!("Creation time: {creation_time:?}");
    println!("Execution time: {execution_time:?} ({sent} messages)");
    println!(
        "Ask latency: min {:?}, mean {:?}, max {:?} over {} samples",
        latency.min, latency.mean, latency.max, latency.samples
    );
    println!("Drain time: {drain_time:?}");

    info!("Demo completed successfully");
    Ok(())
}
