use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use synapsys::{
    Actor, ActorError, ActorSystem, Config, Context, MailboxKind, MailboxStatus, ShutdownPolicy,
};
use tokio::sync::Semaphore;

const SECOND: Duration = Duration::from_secs(1);

// --- Test Actors ---

#[derive(Debug)]
struct Text(String);

#[derive(Debug, thiserror::Error)]
#[error("counter failed")]
struct CounterError;

/// Counts messages and echoes their text, like the benchmark's simple actor.
struct TextCounter;

#[async_trait]
impl Actor for TextCounter {
    type State = i64;
    type Message = Text;
    type Reply = String;
    type Error = CounterError;

    async fn on_receive(
        &self,
        Text(text): Text,
        ctx: &Context<i64>,
    ) -> Result<(Context<i64>, String), CounterError> {
        let next = ctx.map(|n| n + 1);
        let reply = format!("Processed: {text} with new state: {}", next.state());
        Ok((next, reply))
    }
}

#[derive(Debug)]
enum Op {
    Add(i64),
    Fail,
    Panic,
    Sleep(u64),
}

#[derive(Debug, thiserror::Error)]
#[error("rejected on purpose")]
struct Rejected;

/// Accumulator with a few ways to misbehave.
struct Accumulator {
    stopped_with: Arc<AtomicI64>,
}

impl Accumulator {
    fn new() -> Self {
        Self {
            stopped_with: Arc::new(AtomicI64::new(i64::MIN)),
        }
    }
}

#[async_trait]
impl Actor for Accumulator {
    type State = i64;
    type Message = Op;
    type Reply = i64;
    type Error = Rejected;

    async fn on_receive(&self, op: Op, ctx: &Context<i64>) -> Result<(Context<i64>, i64), Rejected> {
        match op {
            Op::Add(n) => {
                let next = ctx.map(|s| s + n);
                let total = *next.state();
                Ok((next, total))
            }
            Op::Fail => Err(Rejected),
            Op::Panic => panic!("boom"),
            Op::Sleep(ms) => {
                tokio::time::sleep(Duration::from_millis(ms)).await;
                Ok((ctx.clone(), *ctx.state()))
            }
        }
    }

    async fn on_stop(&self, ctx: &Context<i64>) {
        self.stopped_with.store(*ctx.state(), Ordering::SeqCst);
    }
}

/// Records every message it sees, in order.
struct Recorder;

#[async_trait]
impl Actor for Recorder {
    type State = Vec<u32>;
    type Message = u32;
    type Reply = Vec<u32>;
    type Error = std::convert::Infallible;

    async fn on_receive(
        &self,
        n: u32,
        ctx: &Context<Vec<u32>>,
    ) -> Result<(Context<Vec<u32>>, Vec<u32>), Self::Error> {
        let next = ctx.map(|seen| {
            let mut seen = seen.clone();
            seen.push(n);
            seen
        });
        let reply = next.state().clone();
        Ok((next, reply))
    }
}

/// Waits for a permit before every message.
struct Gated {
    gate: Arc<Semaphore>,
}

#[async_trait]
impl Actor for Gated {
    type State = u32;
    type Message = u32;
    type Reply = u32;
    type Error = std::convert::Infallible;

    async fn on_receive(&self, n: u32, ctx: &Context<u32>) -> Result<(Context<u32>, u32), Self::Error> {
        if let Ok(permit) = self.gate.acquire().await {
            permit.forget();
        }
        Ok((ctx.map(|s| s + 1), n))
    }
}

async fn wait_for_status(system: &ActorSystem, name: &str, status: MailboxStatus) {
    for _ in 0..200 {
        if system.status_of(name) == Some(status) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("{name} never reached {status:?}");
}

// --- Tests ---

#[tokio::test]
async fn counter_replies_reflect_each_transition() {
    let system = ActorSystem::create_default().unwrap();
    let counter = system
        .actor_of("counter", 0, None, |_, _| TextCounter)
        .unwrap();

    let first = counter.ask(Text("x".into()), SECOND).await.unwrap();
    assert_eq!(first, "Processed: x with new state: 1");

    let second = counter.ask(Text("y".into()), SECOND).await.unwrap();
    assert_eq!(second, "Processed: y with new state: 2");

    system.shutdown().await;
}

#[tokio::test]
async fn messages_from_one_sender_arrive_in_order() {
    let system = ActorSystem::create_default().unwrap();
    let recorder = system
        .actor_of("recorder", Vec::new(), None, |_, _| Recorder)
        .unwrap();

    for n in 0..500 {
        recorder.send(n).unwrap();
    }
    let seen = recorder.ask(500, SECOND).await.unwrap();

    assert_eq!(seen, (0..=500).collect::<Vec<_>>());
}

#[tokio::test]
async fn same_messages_give_same_replies() {
    let system = ActorSystem::create_default().unwrap();
    let left = system.actor_of("left", 0, None, |_, _| TextCounter).unwrap();
    let right = system.actor_of("right", 0, None, |_, _| TextCounter).unwrap();

    let mut left_replies = Vec::new();
    let mut right_replies = Vec::new();
    for word in ["a", "b", "c", "d"] {
        left_replies.push(left.ask(Text(word.into()), SECOND).await.unwrap());
        right_replies.push(right.ask(Text(word.into()), SECOND).await.unwrap());
    }

    assert_eq!(left_replies, right_replies);
}

struct InFlightCounter {
    in_flight: Arc<AtomicUsize>,
    max_seen: Arc<AtomicUsize>,
}

#[async_trait]
impl Actor for InFlightCounter {
    type State = u64;
    type Message = ();
    type Reply = u64;
    type Error = std::convert::Infallible;

    async fn on_receive(&self, _: (), ctx: &Context<u64>) -> Result<(Context<u64>, u64), Self::Error> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_seen.fetch_max(now, Ordering::SeqCst);
        tokio::task::yield_now().await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let next = ctx.map(|n| n + 1);
        let count = *next.state();
        Ok((next, count))
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn one_actor_never_runs_two_handlers_at_once() {
    let system = ActorSystem::create_default().unwrap();
    let in_flight = Arc::new(AtomicUsize::new(0));
    let max_seen = Arc::new(AtomicUsize::new(0));
    let tracked = {
        let (in_flight, max_seen) = (in_flight.clone(), max_seen.clone());
        system
            .actor_of("tracked", 0, None, move |_, _| InFlightCounter {
                in_flight,
                max_seen,
            })
            .unwrap()
    };

    // Senders on plain threads and on tasks, all at once.
    let threads: Vec<_> = (0..4)
        .map(|_| {
            let pointer = tracked.clone();
            std::thread::spawn(move || {
                for _ in 0..100 {
                    pointer.send(()).unwrap();
                }
            })
        })
        .collect();
    let tasks: Vec<_> = (0..4)
        .map(|_| {
            let pointer = tracked.clone();
            tokio::spawn(async move {
                for _ in 0..100 {
                    pointer.ask((), SECOND).await.unwrap();
                }
            })
        })
        .collect();

    for thread in threads {
        thread.join().unwrap();
    }
    for task in tasks {
        task.await.unwrap();
    }

    let total = tracked.ask((), SECOND).await.unwrap();
    assert_eq!(total, 801);
    assert_eq!(max_seen.load(Ordering::SeqCst), 1);

    system.shutdown().await;
}

#[tokio::test]
async fn duplicate_name_leaves_original_untouched() {
    let system = ActorSystem::create_default().unwrap();
    let original = system.actor_of("counter", 0, None, |_, _| TextCounter).unwrap();
    original.ask(Text("first".into()), SECOND).await.unwrap();

    let err = system
        .actor_of("counter", 100, None, |_, _| TextCounter)
        .unwrap_err();
    assert_eq!(err, ActorError::DuplicateName("counter".into()));
    assert_eq!(system.len(), 1);

    let reply = original.ask(Text("second".into()), SECOND).await.unwrap();
    assert_eq!(reply, "Processed: second with new state: 2");
}

#[tokio::test]
async fn ask_times_out_and_later_asks_get_their_own_reply() {
    let system = ActorSystem::create_default().unwrap();
    let acc = system.actor_of("slow", 0, None, |_, _| Accumulator::new()).unwrap();

    let err = acc
        .ask(Op::Sleep(50), Duration::from_millis(10))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        ActorError::Timeout {
            actor: "slow".into(),
            after: Duration::from_millis(10),
        }
    );

    // The late reply to the sleep is dropped; this ask sees only its own.
    assert_eq!(acc.ask(Op::Add(7), SECOND).await.unwrap(), 7);
}

#[tokio::test]
async fn handler_error_keeps_context_and_actor_alive() {
    let system = ActorSystem::create_default().unwrap();
    let acc = system.actor_of("acc", 0, None, |_, _| Accumulator::new()).unwrap();

    assert_eq!(acc.ask(Op::Add(5), SECOND).await.unwrap(), 5);

    let err = acc.ask(Op::Fail, SECOND).await.unwrap_err();
    assert_eq!(
        err,
        ActorError::HandlerFault {
            actor: "acc".into(),
            reason: "rejected on purpose".into(),
        }
    );

    assert_eq!(acc.ask(Op::Add(1), SECOND).await.unwrap(), 6);
}

#[tokio::test]
async fn handler_panic_is_contained() {
    let system = ActorSystem::create_default().unwrap();
    let acc = system.actor_of("acc", 10, None, |_, _| Accumulator::new()).unwrap();

    match acc.ask(Op::Panic, SECOND).await {
        Err(ActorError::HandlerFault { actor, reason }) => {
            assert_eq!(actor, "acc");
            assert_eq!(reason, "boom");
        }
        other => panic!("expected a handler fault, got {other:?}"),
    }

    // A send that panics has no caller to tell; the actor carries on.
    acc.send(Op::Panic).unwrap();
    assert_eq!(acc.ask(Op::Add(1), SECOND).await.unwrap(), 11);
    assert_eq!(acc.status(), MailboxStatus::Idle);
}

#[tokio::test]
async fn bounded_mailbox_rejects_overflow() {
    let system =
        ActorSystem::create(Config::default().with_mailbox(MailboxKind::Bounded(2))).unwrap();
    let gate = Arc::new(Semaphore::new(0));
    let gated = {
        let gate = gate.clone();
        system.actor_of("gated", 0, None, move |_, _| Gated { gate }).unwrap()
    };

    // First message is taken off the queue and blocks the handler.
    gated.send(1).unwrap();
    wait_for_status(&system, "gated", MailboxStatus::Processing).await;

    gated.send(2).unwrap();
    gated.send(3).unwrap();
    assert_eq!(gated.send(4), Err(ActorError::MailboxFull("gated".into())));

    gate.add_permits(10);
    wait_for_status(&system, "gated", MailboxStatus::Idle).await;
    assert_eq!(gated.ask(5, SECOND).await.unwrap(), 5);

    system.shutdown().await;
}

#[tokio::test]
async fn drain_shutdown_processes_queued_messages() {
    let system = ActorSystem::create_default().unwrap();
    let actor = Accumulator::new();
    let stopped_with = actor.stopped_with.clone();
    let acc = system.actor_of("acc", 0, None, move |_, _| actor).unwrap();

    for _ in 0..100 {
        acc.send(Op::Add(1)).unwrap();
    }
    system.shutdown().await;

    assert_eq!(stopped_with.load(Ordering::SeqCst), 100);
    assert_eq!(acc.status(), MailboxStatus::Stopped);
    assert_eq!(system.status_of("acc"), Some(MailboxStatus::Stopped));
    assert!(acc.is_closed());
    assert_eq!(acc.send(Op::Add(1)), Err(ActorError::ActorStopped("acc".into())));
}

#[tokio::test]
async fn abort_shutdown_fails_pending_asks() {
    let system = Arc::new(
        ActorSystem::create(Config::default().with_shutdown(ShutdownPolicy::Abort)).unwrap(),
    );
    let gate = Arc::new(Semaphore::new(0));
    let gated = {
        let gate = gate.clone();
        system.actor_of("gated", 0, None, move |_, _| Gated { gate }).unwrap()
    };

    gated.send(0).unwrap();
    wait_for_status(&system, "gated", MailboxStatus::Processing).await;

    let pending: Vec<_> = (1..=3)
        .map(|n| {
            let pointer = gated.clone();
            tokio::spawn(async move { pointer.ask(n, SECOND).await })
        })
        .collect();
    tokio::time::sleep(Duration::from_millis(20)).await;

    let stopping = {
        let system = system.clone();
        tokio::spawn(async move { system.shutdown().await })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;
    gate.add_permits(10);
    stopping.await.unwrap();

    for ask in pending {
        assert_eq!(
            ask.await.unwrap(),
            Err(ActorError::ActorStopped("gated".into()))
        );
    }
}

struct Hooked {
    stopped_with: Arc<AtomicI64>,
}

#[async_trait]
impl Actor for Hooked {
    type State = i64;
    type Message = i64;
    type Reply = i64;
    type Error = std::convert::Infallible;

    async fn on_receive(&self, n: i64, ctx: &Context<i64>) -> Result<(Context<i64>, i64), Self::Error> {
        let next = ctx.map(|s| s + n);
        let total = *next.state();
        Ok((next, total))
    }

    async fn on_start(&self, ctx: Context<i64>) -> Context<i64> {
        ctx.map(|s| s * 10)
    }

    async fn on_stop(&self, ctx: &Context<i64>) {
        self.stopped_with.store(*ctx.state(), Ordering::SeqCst);
    }
}

#[tokio::test]
async fn start_and_stop_hooks_see_the_context() {
    let system = ActorSystem::create_default().unwrap();
    let stopped_with = Arc::new(AtomicI64::new(0));
    let hooked = {
        let stopped_with = stopped_with.clone();
        system
            .actor_of("hooked", 4, None, move |name, initial| {
                assert_eq!(name, "hooked");
                assert_eq!(*initial, 4);
                Hooked { stopped_with }
            })
            .unwrap()
    };

    assert_eq!(hooked.ask(2, SECOND).await.unwrap(), 42);
    system.shutdown().await;
    assert_eq!(stopped_with.load(Ordering::SeqCst), 42);
}

#[tokio::test]
async fn ask_default_uses_configured_timeout() {
    let system = ActorSystem::create(
        Config::default().with_ask_timeout(Duration::from_millis(10)),
    )
    .unwrap();
    let acc = system.actor_of("acc", 0, None, |_, _| Accumulator::new()).unwrap();

    assert_eq!(acc.ask_default(Op::Add(3)).await.unwrap(), 3);
    assert!(matches!(
        acc.ask_default(Op::Sleep(50)).await,
        Err(ActorError::Timeout { .. })
    ));
}

struct FailsToStart;

#[async_trait]
impl Actor for FailsToStart {
    type State = i64;
    type Message = i64;
    type Reply = i64;
    type Error = std::convert::Infallible;

    async fn on_receive(&self, n: i64, ctx: &Context<i64>) -> Result<(Context<i64>, i64), Self::Error> {
        Ok((ctx.clone(), n))
    }

    async fn on_start(&self, _ctx: Context<i64>) -> Context<i64> {
        panic!("cannot start")
    }
}

#[tokio::test]
async fn failed_start_frees_the_name() {
    let system = ActorSystem::create_default().unwrap();
    let broken = system.actor_of("z", 0, None, |_, _| FailsToStart).unwrap();

    for _ in 0..200 {
        if !system.contains("z") {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert!(!system.contains("z"));
    assert_eq!(broken.status(), MailboxStatus::Stopped);
    assert_eq!(
        broken.ask(1, SECOND).await,
        Err(ActorError::ActorStopped("z".into()))
    );

    let replacement = system.actor_of("z", 0, None, |_, _| Accumulator::new()).unwrap();
    assert_eq!(replacement.ask(Op::Add(3), SECOND).await.unwrap(), 3);

    system.shutdown().await;
}

struct Tagger {
    tag: char,
    log: Arc<Mutex<Vec<char>>>,
}

#[async_trait]
impl Actor for Tagger {
    type State = ();
    type Message = ();
    type Reply = ();
    type Error = std::convert::Infallible;

    async fn on_receive(&self, _: (), ctx: &Context<()>) -> Result<(Context<()>, ()), Self::Error> {
        self.log.lock().push(self.tag);
        Ok((ctx.clone(), ()))
    }
}

#[tokio::test]
async fn busy_actors_take_turns_under_a_small_reduction_budget() {
    let system = ActorSystem::create(Config::default().with_max_reductions(1)).unwrap();
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut pointers = Vec::new();
    for tag in ['a', 'b'] {
        let log = log.clone();
        pointers.push(
            system
                .actor_of(tag.to_string(), (), None, move |_, _| Tagger { tag, log })
                .unwrap(),
        );
    }

    for pointer in &pointers {
        for _ in 0..20 {
            pointer.send(()).unwrap();
        }
    }
    for pointer in &pointers {
        pointer.ask((), SECOND).await.unwrap();
    }

    let log = log.lock().clone();
    assert_eq!(log.len(), 42);
    let first_b = log.iter().position(|&t| t == 'b').unwrap();
    let last_a = log.iter().rposition(|&t| t == 'a').unwrap();
    assert!(first_b < last_a, "actors did not interleave: {log:?}");
}
