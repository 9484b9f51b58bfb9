// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use crate::config::RuntimeConfig;
use crate::errors::{ActorProcessingError, EngineError};
use crate::runtime::{ActorState, Context, Engine};
use crate::sink::AggregateRecord;
use crate::traits::{Actor, Identity, Message};

/// Adds one to every payload.
struct Increment {
    name: &'static str,
}

impl Identity for Increment {
    fn identity(&self) -> String {
        self.name.to_string()
    }
}

#[async_trait]
impl Actor<i64> for Increment {
    async fn receive(
        &mut self,
        _ctx: &Context<i64>,
        payload: i64,
    ) -> Result<i64, ActorProcessingError<i64>> {
        Ok(payload + 1)
    }
}

struct Upper;

impl Identity for Upper {
    fn identity(&self) -> String {
        "upper".to_string()
    }
}

#[async_trait]
impl Actor<String> for Upper {
    async fn receive(
        &mut self,
        _ctx: &Context<String>,
        payload: String,
    ) -> Result<String, ActorProcessingError<String>> {
        Ok(payload.to_uppercase())
    }
}

/// Appends every payload to a `seen` list in its local store.
struct Recorder {
    name: &'static str,
}

impl Identity for Recorder {
    fn identity(&self) -> String {
        self.name.to_string()
    }
}

#[async_trait]
impl Actor<i64> for Recorder {
    async fn receive(
        &mut self,
        ctx: &Context<i64>,
        payload: i64,
    ) -> Result<i64, ActorProcessingError<i64>> {
        let mut seen: Vec<i64> = match ctx
            .store()
            .get("seen".to_string())
            .await
            .map_err(ActorProcessingError::new)?
        {
            Some(value) => serde_json::from_value(value).map_err(ActorProcessingError::new)?,
            None => Vec::new(),
        };
        seen.push(payload);
        ctx.store()
            .put("seen".to_string(), json!(seen))
            .await
            .map_err(ActorProcessingError::new)?;
        Ok(payload)
    }
}

#[derive(Default)]
struct HookCounts {
    pre_start: AtomicUsize,
    post_stop: AtomicUsize,
    pre_handle: AtomicUsize,
    post_handle: AtomicUsize,
    errors: AtomicUsize,
}

impl HookCounts {
    fn get(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

/// Counts hook invocations and fails on negative payloads.
struct Hooked {
    name: &'static str,
    counts: Arc<HookCounts>,
}

impl Identity for Hooked {
    fn identity(&self) -> String {
        self.name.to_string()
    }
}

#[async_trait]
impl Actor<i64> for Hooked {
    async fn receive(
        &mut self,
        _ctx: &Context<i64>,
        payload: i64,
    ) -> Result<i64, ActorProcessingError<i64>> {
        if payload < 0 {
            return Err(ActorProcessingError::msg("negative payload").with_partial(payload * 10));
        }
        Ok(payload)
    }

    async fn pre_start(&mut self, _ctx: &Context<i64>) {
        self.counts.pre_start.fetch_add(1, Ordering::SeqCst);
    }

    async fn post_stop(&mut self, _ctx: &Context<i64>) {
        self.counts.post_stop.fetch_add(1, Ordering::SeqCst);
    }

    async fn pre_handle_msg(&mut self, _ctx: &Context<i64>, _msg: &i64) {
        self.counts.pre_handle.fetch_add(1, Ordering::SeqCst);
    }

    async fn post_handle_msg(&mut self, _ctx: &Context<i64>, _result: &i64) {
        self.counts.post_handle.fetch_add(1, Ordering::SeqCst);
    }

    async fn error_handler(&mut self, _ctx: &Context<i64>, _error: &ActorProcessingError<i64>) {
        self.counts.errors.fetch_add(1, Ordering::SeqCst);
    }
}

const SETTLE_TIMEOUT: Duration = Duration::from_secs(3);

/// Poll the sink without draining it until `done` holds.
async fn settle<M, F>(engine: &Engine<M>, done: F) -> Vec<AggregateRecord<M>>
where
    M: Message,
    F: Fn(&[AggregateRecord<M>]) -> bool,
{
    let deadline = tokio::time::Instant::now() + SETTLE_TIMEOUT;
    loop {
        let records = engine.results_snapshot().await.unwrap();
        if done(&records) || tokio::time::Instant::now() >= deadline {
            return records;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

async fn wait_until<F: Fn() -> bool>(condition: F) {
    let deadline = tokio::time::Instant::now() + SETTLE_TIMEOUT;
    while !condition() && tokio::time::Instant::now() < deadline {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

fn total_outputs<M>(records: &[AggregateRecord<M>]) -> usize {
    records.iter().map(|record| record.outputs.len()).sum()
}

#[tokio::test]
async fn test_single_actor_hello() {
    let mut engine = Engine::new();
    engine.spawn(Upper).unwrap();
    engine.ready().unwrap();

    engine.send("hello".to_string()).unwrap();
    settle(&engine, |records| total_outputs(records) == 1).await;

    let records = engine.pop_all_results().await.unwrap();
    assert_eq!(records.len(), 1);

    let record = &records[0];
    assert_eq!(record.inputs.len(), 1);
    assert_eq!(record.outputs.len(), 1);
    assert_eq!(record.inputs[0].payload.as_deref(), Some("hello"));
    assert_eq!(record.outputs[0].payload.as_deref(), Some("HELLO"));
    assert_eq!(record.outputs[0].actor.name, "upper");

    assert!(engine.pop_all_results().await.unwrap().is_empty());
    engine.shutdown().await;
}

#[tokio::test]
async fn test_three_actor_chain_increments() {
    let mut engine = Engine::new();
    let a = engine.spawn(Increment { name: "a" }).unwrap();
    let b = engine.spawn(Increment { name: "b" }).unwrap();
    let c = engine.spawn(Increment { name: "c" }).unwrap();
    engine.add_edge(&a, &b).unwrap();
    engine.add_edge(&b, &c).unwrap();
    engine.ready().unwrap();

    assert_eq!(engine.root(), Some(&a));
    assert_eq!(a.context().child_names(), vec!["b"]);
    assert!(c.context().is_leaf());

    engine.send(5).unwrap();
    settle(&engine, |records| total_outputs(records) == 3).await;

    let records = engine.pop_all_results().await.unwrap();
    assert_eq!(records.len(), 1);

    let record = &records[0];
    assert_eq!(record.output_of("c").unwrap().payload, Some(8));
    for name in ["a", "b", "c"] {
        assert_eq!(record.inputs.iter().filter(|t| t.actor.name == name).count(), 1);
        assert_eq!(record.outputs.iter().filter(|t| t.actor.name == name).count(), 1);
    }
    assert!(record
        .inputs
        .iter()
        .chain(record.outputs.iter())
        .all(|tick| tick.correlation_id == record.id));

    engine.shutdown().await;
}

#[tokio::test]
async fn test_diamond_fans_out_and_joins() {
    let mut engine = Engine::new();
    let root = engine.spawn(Increment { name: "root" }).unwrap();
    let left = engine.spawn(Increment { name: "left" }).unwrap();
    let right = engine.spawn(Increment { name: "right" }).unwrap();
    let join = engine.spawn(Increment { name: "join" }).unwrap();
    engine.add_edge(&root, &left).unwrap();
    engine.add_edge(&root, &right).unwrap();
    engine.add_edge(&left, &join).unwrap();
    engine.add_edge(&right, &join).unwrap();
    engine.ready().unwrap();

    engine.send(0).unwrap();
    settle(&engine, |records| total_outputs(records) == 5).await;

    let records = engine.pop_all_results().await.unwrap();
    assert_eq!(records.len(), 1);

    let join_outputs: Vec<_> = records[0]
        .outputs
        .iter()
        .filter(|tick| tick.actor.name == "join")
        .map(|tick| tick.payload)
        .collect();
    assert_eq!(join_outputs, vec![Some(3), Some(3)]);

    engine.shutdown().await;
}

#[tokio::test]
async fn test_messages_reach_each_child_in_send_order() {
    let mut engine = Engine::new();
    let first = engine.spawn(Increment { name: "first" }).unwrap();
    let recorder = engine.spawn(Recorder { name: "recorder" }).unwrap();
    engine.add_edge(&first, &recorder).unwrap();
    engine.ready().unwrap();

    for n in 0..20 {
        engine.send(n).unwrap();
    }
    let records = settle(&engine, |records| total_outputs(records) == 40).await;
    assert_eq!(records.len(), 20);

    let seen = recorder
        .context()
        .store()
        .get("seen".to_string())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(seen, json!((1..=20).collect::<Vec<i64>>()));

    engine.shutdown().await;
}

#[tokio::test]
async fn test_ready_requires_exactly_one_root() {
    let mut empty: Engine<i64> = Engine::new();
    assert_eq!(empty.ready(), Err(EngineError::NoRoot));

    let mut engine = Engine::new();
    engine.spawn(Increment { name: "a" }).unwrap();
    engine.spawn(Increment { name: "b" }).unwrap();
    assert_eq!(
        engine.ready(),
        Err(EngineError::MultipleRoots {
            roots: vec!["a".to_string(), "b".to_string()],
        })
    );
    assert!(!engine.is_ready());

    // A failed ready leaves the graph editable.
    let a = engine.pid("a").unwrap();
    let b = engine.pid("b").unwrap();
    engine.add_edge(&a, &b).unwrap();
    engine.ready().unwrap();
    assert!(engine.is_ready());

    engine.shutdown().await;
}

#[tokio::test]
async fn test_graph_is_frozen_after_ready() {
    let mut engine = Engine::new();
    let a = engine.spawn(Increment { name: "a" }).unwrap();
    engine.ready().unwrap();

    assert_eq!(engine.ready(), Err(EngineError::AlreadyReady));
    assert_eq!(
        engine.spawn(Increment { name: "b" }).unwrap_err(),
        EngineError::AlreadyReady
    );
    assert_eq!(engine.add_edge(&a, &a), Err(EngineError::AlreadyReady));

    engine.shutdown().await;
}

#[tokio::test]
async fn test_configuration_errors() {
    let mut engine = Engine::new();
    let a = engine.spawn(Increment { name: "a" }).unwrap();
    let b = engine.spawn(Increment { name: "b" }).unwrap();
    let c = engine.spawn(Increment { name: "c" }).unwrap();

    let duplicate = engine.spawn(Increment { name: "a" }).unwrap_err();
    assert_eq!(duplicate, EngineError::DuplicateActor { name: "a".to_string() });
    assert!(duplicate.is_configuration_error());

    let mut other = Engine::new();
    let stranger = other.spawn(Increment { name: "stranger" }).unwrap();
    assert_eq!(
        engine.add_edge(&a, &stranger),
        Err(EngineError::UnknownActor {
            pid: "pid:stranger".to_string(),
        })
    );

    engine.add_edge(&a, &b).unwrap();
    engine.add_edge(&b, &c).unwrap();
    assert_eq!(
        engine.add_edge(&c, &a),
        Err(EngineError::Cycle {
            from: "c".to_string(),
            to: "a".to_string(),
        })
    );
    assert_eq!(engine.graph().edges().len(), 2);

    assert_eq!(engine.send(1), Err(EngineError::NotReady));

    let order: Vec<_> = engine
        .execution_order()
        .unwrap()
        .iter()
        .map(|pid| pid.name().to_string())
        .collect();
    assert_eq!(order, vec!["a", "b", "c"]);
    assert_eq!(engine.pids(), vec![a, b, c]);
    assert!(engine.pid("missing").is_none());
}

#[tokio::test]
async fn test_failed_receive_is_contained() {
    let counts = Arc::new(HookCounts::default());
    let mut engine = Engine::new();
    let parser = engine
        .spawn(Hooked {
            name: "parser",
            counts: Arc::clone(&counts),
        })
        .unwrap();
    let after = engine.spawn(Increment { name: "after" }).unwrap();
    engine.add_edge(&parser, &after).unwrap();
    engine.ready().unwrap();

    engine.send(-1).unwrap();
    engine.send(2).unwrap();
    settle(&engine, |records| total_outputs(records) == 3).await;

    let records = engine.pop_all_results().await.unwrap();
    assert_eq!(records.len(), 2);

    let failed = records
        .iter()
        .find(|record| record.inputs[0].payload == Some(-1))
        .unwrap();
    let tick = failed.output_of("parser").unwrap();
    assert!(tick.is_error());
    assert_eq!(tick.error.as_deref(), Some("negative payload"));
    assert_eq!(tick.payload, Some(-10));
    assert!(failed.input_of("after").is_none());

    let ok = records
        .iter()
        .find(|record| record.inputs[0].payload == Some(2))
        .unwrap();
    assert_eq!(ok.output_of("after").unwrap().payload, Some(3));

    assert_eq!(HookCounts::get(&counts.errors), 1);
    assert_eq!(HookCounts::get(&counts.pre_handle), 2);
    assert_eq!(HookCounts::get(&counts.post_handle), 1);

    engine.shutdown().await;
}

#[tokio::test]
async fn test_pause_resume_stop_lifecycle() {
    let counts = Arc::new(HookCounts::default());
    let mut engine = Engine::new();
    let pid = engine
        .spawn(Hooked {
            name: "worker",
            counts: Arc::clone(&counts),
        })
        .unwrap();
    assert_eq!(pid.state(), ActorState::Init);
    assert!(engine.pause(&pid).is_err());

    engine.ready().unwrap();
    assert_eq!(pid.state(), ActorState::Running);
    wait_until(|| HookCounts::get(&counts.pre_start) == 1).await;

    engine.pause(&pid).unwrap();
    assert!(engine.pause(&pid).is_err());
    engine.send(7).unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(HookCounts::get(&counts.pre_handle), 0);

    engine.resume(&pid).unwrap();
    wait_until(|| HookCounts::get(&counts.post_handle) == 1).await;
    assert_eq!(HookCounts::get(&counts.pre_handle), 1);

    engine.stop(&pid).unwrap();
    wait_until(|| HookCounts::get(&counts.post_stop) == 1).await;
    assert_eq!(pid.state(), ActorState::Stopped);
    assert_eq!(
        engine.resume(&pid),
        Err(EngineError::InvalidTransition {
            name: "worker".to_string(),
            from: ActorState::Stopped,
            to: ActorState::Running,
        })
    );

    engine.shutdown().await;
    assert_eq!(HookCounts::get(&counts.pre_start), 1);
    assert_eq!(HookCounts::get(&counts.post_stop), 1);
}

#[tokio::test]
async fn test_shutdown_runs_post_stop_for_every_actor() {
    let counts = Arc::new(HookCounts::default());
    let mut engine = Engine::new();
    let first = engine
        .spawn(Hooked {
            name: "first",
            counts: Arc::clone(&counts),
        })
        .unwrap();
    let second = engine
        .spawn(Hooked {
            name: "second",
            counts: Arc::clone(&counts),
        })
        .unwrap();
    engine.add_edge(&first, &second).unwrap();
    engine.ready().unwrap();

    engine.shutdown().await;

    assert_eq!(HookCounts::get(&counts.pre_start), 2);
    assert_eq!(HookCounts::get(&counts.post_stop), 2);
    assert_eq!(first.state(), ActorState::Stopped);
    assert_eq!(second.state(), ActorState::Stopped);
}

#[tokio::test]
async fn test_send_is_throttled_while_root_is_paused() {
    let config = RuntimeConfig {
        throttle_limit: 2,
        inbox_capacity: 1,
        delivery_timeout_ms: 5_000,
        ..RuntimeConfig::default()
    };
    let mut engine = Engine::with_config(config);
    let root = engine.spawn(Increment { name: "root" }).unwrap();
    engine.ready().unwrap();
    engine.pause(&root).unwrap();

    // One message fills the root inbox, two more hold every admission token.
    engine.send(1).unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;
    engine.send(2).unwrap();
    engine.send(3).unwrap();
    assert!(matches!(engine.send(4), Err(EngineError::Throttled(_))));
    assert_eq!(engine.in_flight(), 2);

    engine.resume(&root).unwrap();
    let records = settle(&engine, |records| total_outputs(records) == 3).await;
    assert_eq!(total_outputs(&records), 3);
    assert_eq!(engine.in_flight(), 0);

    engine.shutdown().await;
}

fn outputs_of<M>(records: &[AggregateRecord<M>], name: &str) -> usize {
    records
        .iter()
        .flat_map(|record| record.outputs.iter())
        .filter(|tick| tick.actor.name == name)
        .count()
}

#[tokio::test]
async fn test_stopped_child_does_not_hold_up_its_siblings() {
    let config = RuntimeConfig {
        inbox_capacity: 1,
        delivery_timeout_ms: 2_000,
        ..RuntimeConfig::default()
    };
    let mut engine = Engine::with_config(config);
    let root = engine.spawn(Increment { name: "root" }).unwrap();
    let dead = engine.spawn(Increment { name: "dead" }).unwrap();
    let live = engine.spawn(Increment { name: "live" }).unwrap();
    engine.add_edge(&root, &dead).unwrap();
    engine.add_edge(&root, &live).unwrap();
    engine.ready().unwrap();
    engine.stop(&dead).unwrap();

    let started = std::time::Instant::now();
    for n in 0..6 {
        engine.send(n).unwrap();
    }
    let records = settle(&engine, |records| outputs_of(records, "live") == 6).await;

    assert_eq!(outputs_of(&records, "live"), 6);
    assert_eq!(outputs_of(&records, "dead"), 0);
    assert!(started.elapsed() < Duration::from_millis(1_500));

    engine.shutdown().await;
}

#[tokio::test]
async fn test_stopped_root_drains_mailbox_without_waiting() {
    let config = RuntimeConfig {
        throttle_limit: 2,
        inbox_capacity: 1,
        delivery_timeout_ms: 10_000,
        ..RuntimeConfig::default()
    };
    let mut engine = Engine::with_config(config);
    let root = engine.spawn(Increment { name: "root" }).unwrap();
    engine.ready().unwrap();
    engine.stop(&root).unwrap();

    for n in 0..2 {
        engine.send(n).unwrap();
    }
    wait_until(|| engine.in_flight() == 0).await;
    assert_eq!(engine.in_flight(), 0);

    // Permits came back, so the mailbox keeps admitting.
    engine.send(2).unwrap();
    engine.send(3).unwrap();
    assert!(engine.pop_all_results().await.unwrap().is_empty());

    engine.shutdown().await;
}

#[tokio::test]
async fn test_full_child_inbox_drops_copy_and_parent_moves_on() {
    let config = RuntimeConfig {
        inbox_capacity: 1,
        delivery_timeout_ms: 50,
        ..RuntimeConfig::default()
    };
    let mut engine = Engine::with_config(config);
    let root = engine.spawn(Increment { name: "root" }).unwrap();
    let child = engine.spawn(Increment { name: "child" }).unwrap();
    engine.add_edge(&root, &child).unwrap();
    engine.ready().unwrap();
    engine.pause(&child).unwrap();

    for n in 1..=3 {
        engine.send(n).unwrap();
    }
    // The first copy fills the child's inbox; the next two time out.
    let records = settle(&engine, |records| outputs_of(records, "root") == 3).await;
    assert_eq!(outputs_of(&records, "root"), 3);
    assert_eq!(outputs_of(&records, "child"), 0);
    // Let the last broadcast run out its timeout before the child drains.
    tokio::time::sleep(Duration::from_millis(150)).await;

    engine.resume(&child).unwrap();
    settle(&engine, |records| outputs_of(records, "child") == 1).await;
    tokio::time::sleep(Duration::from_millis(100)).await;

    let records = engine.pop_all_results().await.unwrap();
    assert_eq!(outputs_of(&records, "child"), 1);

    let delivered = records
        .iter()
        .find(|record| record.input_of("root").unwrap().payload == Some(1))
        .unwrap();
    assert_eq!(delivered.output_of("child").unwrap().payload, Some(3));
    assert!(records
        .iter()
        .filter(|record| record.id != delivered.id)
        .all(|record| record.input_of("child").is_none()));

    engine.shutdown().await;
}
