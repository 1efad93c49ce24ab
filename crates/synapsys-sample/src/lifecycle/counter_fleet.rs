use crate::counter_actor::{self, CounterPointer};
use crate::model::Message;
use std::time::{Duration, Instant};
use synapsys::{ActorError, ActorSystem, Config};
use tracing::info;

/// A set of counter actors hosted by one [`ActorSystem`].
///
/// # Example
///
/// ```ignore
/// let fleet = CounterFleet::start(Config::default(), 8)?;
/// let sent = fleet.fan_out(1_000)?;
/// fleet.shutdown().await;
/// ```
pub struct CounterFleet {
    system: ActorSystem,
    counters: Vec<CounterPointer>,
}

/// Summary of a batch of timed `ask` calls.
#[derive(Debug, Clone, PartialEq)]
pub struct LatencyReport {
    pub samples: usize,
    pub min: Duration,
    pub mean: Duration,
    pub max: Duration,
}

impl CounterFleet {
    /// Creates the system and registers `size` counters.
    ///
    /// Must be called inside a tokio runtime.
    pub fn start(config: Config, size: usize) -> Result<Self, ActorError> {
        let system = ActorSystem::create(config)?;
        let started = Instant::now();
        let counters = (0..size)
            .map(|i| counter_actor::spawn(&system, &format!("my-actor-{i}")))
            .collect::<Result<Vec<_>, _>>()?;
        info!(actors = size, elapsed = ?started.elapsed(), "Fleet started");
        Ok(Self { system, counters })
    }

    pub fn system(&self) -> &ActorSystem {
        &self.system
    }

    pub fn counters(&self) -> &[CounterPointer] {
        &self.counters
    }

    /// Sends `per_actor` messages to every counter without waiting for them
    /// to be processed. Returns the number of messages sent.
    pub fn fan_out(&self, per_actor: usize) -> Result<usize, ActorError> {
        let started = Instant::now();
        for counter in &self.counters {
            for _ in 0..per_actor {
                counter.send(Message::new("Hello"))?;
            }
        }
        let sent = per_actor * self.counters.len();
        info!(sent, elapsed = ?started.elapsed(), "Fan-out complete");
        Ok(sent)
    }

    /// Times `samples` asks spread round-robin over the fleet.
    pub async fn measure_ask(&self, samples: usize) -> Result<LatencyReport, ActorError> {
        let mut min = Duration::MAX;
        let mut max = Duration::ZERO;
        let mut total = Duration::ZERO;
        let mut taken = 0usize;

        for counter in self.counters.iter().cycle().take(samples) {
            let started = Instant::now();
            counter.ask_default(Message::new("Ping")).await?;
            let elapsed = started.elapsed();
            min = min.min(elapsed);
            max = max.max(elapsed);
            total += elapsed;
            taken += 1;
        }

        let report = match taken {
            0 => LatencyReport {
                samples: 0,
                min: Duration::ZERO,
                mean: Duration::ZERO,
                max: Duration::ZERO,
            },
            n => LatencyReport {
                samples: n,
                min,
                mean: total.div_f64(n as f64),
                max,
            },
        };
        info!(samples = report.samples, min = ?report.min, mean = ?report.mean, max = ?report.max, "Ask latency");
        Ok(report)
    }

    /// Drains every counter and waits for all of them to stop.
    pub async fn shutdown(self) {
        info!("Shutting down fleet...");
        self.system.shutdown().await;
        info!("Fleet shutdown complete.");
    }
}
