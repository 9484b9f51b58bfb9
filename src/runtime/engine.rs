// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::config::RuntimeConfig;
use crate::errors::{EngineError, GraphError};
use crate::graph::{Dag, NodeId};
use crate::mailbox::Mailbox;
use crate::observability::messages::engine::{
    ActorSpawned, EdgeRejected, EngineReady, EngineShutdown, ReadinessFailed,
};
use crate::observability::messages::StructuredLog;
use crate::runtime::worker::Worker;
use crate::runtime::{ActorState, Pid};
use crate::sink::{AggregateRecord, Sink, TickEvent};
use crate::traits::{Actor, Message};

/// Owns the actor graph and every task that runs it.
///
/// Lifecycle: construct, [`spawn`](Engine::spawn) actors,
/// [`add_edge`](Engine::add_edge) between them, call [`ready`](Engine::ready)
/// once, then [`send`](Engine::send) messages and collect traces with
/// [`pop_all_results`](Engine::pop_all_results). The graph is frozen from
/// `ready()` on. [`shutdown`](Engine::shutdown) stops every actor and waits for
/// all tasks; dropping the engine only signals them.
///
/// ## Example
///
/// ```no_run
/// use async_trait::async_trait;
/// use the_actorwood::errors::ActorProcessingError;
/// use the_actorwood::runtime::{Context, Engine};
/// use the_actorwood::traits::{Actor, Identity};
///
/// struct Double;
///
/// impl Identity for Double {
///     fn identity(&self) -> String {
///         "double".to_string()
///     }
/// }
///
/// #[async_trait]
/// impl Actor<i64> for Double {
///     async fn receive(
///         &mut self,
///         _ctx: &Context<i64>,
///         payload: i64,
///     ) -> Result<i64, ActorProcessingError<i64>> {
///         Ok(payload * 2)
///     }
/// }
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut engine = Engine::new();
/// engine.spawn(Double)?;
/// engine.ready()?;
/// engine.send(21)?;
/// # tokio::time::sleep(std::time::Duration::from_millis(50)).await;
/// let records = engine.pop_all_results().await?;
/// assert_eq!(records[0].output_of("double").unwrap().payload, Some(42));
/// engine.shutdown().await;
/// # Ok(())
/// # }
/// ```
pub struct Engine<M: Message> {
    config: RuntimeConfig,
    graph: Dag<Pid<M>>,
    by_id: HashMap<Uuid, NodeId>,
    by_name: HashMap<String, Uuid>,
    actors: HashMap<Uuid, Box<dyn Actor<M>>>,
    mailbox: Arc<Mailbox<M>>,
    sink: Sink<M>,
    root: Option<Pid<M>>,
    shutdown: CancellationToken,
    tasks: Vec<JoinHandle<()>>,
    ready: bool,
}

impl<M: Message> Engine<M> {
    /// An engine using [`RuntimeConfig::default`].
    ///
    /// # Panics
    /// When called outside a tokio runtime.
    pub fn new() -> Self {
        Self::with_config(RuntimeConfig::default())
    }

    /// # Panics
    /// When called outside a tokio runtime.
    pub fn with_config(config: RuntimeConfig) -> Self {
        Self {
            mailbox: Arc::new(Mailbox::new(config.throttle_limit)),
            config,
            graph: Dag::new(),
            by_id: HashMap::new(),
            by_name: HashMap::new(),
            actors: HashMap::new(),
            sink: Sink::new(),
            root: None,
            shutdown: CancellationToken::new(),
            tasks: Vec::new(),
            ready: false,
        }
    }

    /// Register `actor` under its identity.
    pub fn spawn<A: Actor<M>>(&mut self, actor: A) -> Result<Pid<M>, EngineError> {
        self.spawn_boxed(Box::new(actor))
    }

    pub fn spawn_boxed(&mut self, actor: Box<dyn Actor<M>>) -> Result<Pid<M>, EngineError> {
        if self.ready {
            return Err(EngineError::AlreadyReady);
        }

        let name = actor.identity();
        if self.by_name.contains_key(&name) {
            return Err(EngineError::DuplicateActor { name });
        }

        let pid = Pid::new(name.clone(), self.config.inbox_capacity);
        let node = self.graph.add_node(pid.clone());
        self.by_id.insert(pid.id(), node);
        self.by_name.insert(name, pid.id());
        self.actors.insert(pid.id(), actor);

        ActorSpawned {
            name: pid.name(),
            pid: &pid.id().to_string(),
        }
        .log();
        Ok(pid)
    }

    /// Connect `from` to `to`: every result of `from` is broadcast to `to`.
    pub fn add_edge(&mut self, from: &Pid<M>, to: &Pid<M>) -> Result<(), EngineError> {
        if self.ready {
            return Err(EngineError::AlreadyReady);
        }

        let from_node = self.node_of(from)?;
        let to_node = self.node_of(to)?;

        self.graph.add_edge(from_node, to_node).map_err(|error| {
            if let GraphError::Cycle { .. } = &error {
                EdgeRejected {
                    from: from.name(),
                    to: to.name(),
                    reason: "would create a cycle",
                }
                .log();
            }
            EngineError::from(error)
        })
    }

    /// Validate the graph and start running it.
    ///
    /// Requires exactly one root actor. On success, wires every parent to its
    /// children, starts one loop per actor, the mailbox drain loop feeding the
    /// root and the loop that folds ticks into the sink. On failure nothing is
    /// started and the graph can still be edited.
    ///
    /// # Panics
    /// When called outside a tokio runtime.
    pub fn ready(&mut self) -> Result<(), EngineError> {
        if self.ready {
            return Err(EngineError::AlreadyReady);
        }

        let root = match self.validate() {
            Ok(root) => root,
            Err(error) => {
                ReadinessFailed { error: &error }.log();
                return Err(error);
            }
        };

        for parent in self.graph.non_leaf_nodes() {
            let context = self.graph.value(parent).context();
            for child in self.graph.neighbors(parent) {
                context.add_child(self.graph.value(child).clone());
            }
        }

        let (ticks, tick_receiver) = mpsc::channel(self.config.tick_buffer.max(1));
        self.tasks
            .push(tokio::spawn(aggregate(tick_receiver, self.sink.clone())));

        let delivery_timeout = self.config.delivery_timeout();
        for node in self.graph.nodes() {
            let pid = node.value().clone();
            let Some(actor) = self.actors.remove(&pid.id()) else {
                continue;
            };
            // Stopped before ready: never started, hooks never run.
            if pid.transition(ActorState::Running).is_err() {
                continue;
            }
            let worker = Worker::new(pid, actor, ticks.clone(), delivery_timeout);
            self.tasks.push(tokio::spawn(worker.run()));
        }

        let root_handle = root.clone();
        self.tasks.push(self.mailbox.consume(
            root.name().to_string(),
            Arc::clone(root.context().inbox()),
            move || !root_handle.state().is_terminal(),
            delivery_timeout,
            self.shutdown.child_token(),
        ));

        EngineReady {
            root: root.name(),
            actor_count: self.graph.len(),
            edge_count: self.graph.edges().len(),
        }
        .log();

        self.root = Some(root);
        self.ready = true;
        Ok(())
    }

    fn validate(&self) -> Result<Pid<M>, EngineError> {
        let root = match self.graph.root_candidates().as_slice() {
            [] => return Err(EngineError::NoRoot),
            [root] => self.graph.value(*root).clone(),
            many => {
                return Err(EngineError::MultipleRoots {
                    roots: many
                        .iter()
                        .map(|node| self.graph.value(*node).name().to_string())
                        .collect(),
                })
            }
        };

        // Edges are checked on insertion; this re-verifies the whole graph.
        self.graph.topological_sort()?;
        Ok(root)
    }

    /// Hand `msg` to the root through the mailbox.
    pub fn send(&self, msg: M) -> Result<(), EngineError> {
        if !self.ready {
            return Err(EngineError::NotReady);
        }
        self.mailbox.source(msg)?;
        Ok(())
    }

    /// Take every aggregate record collected so far, oldest message first.
    pub async fn pop_all_results(&self) -> Result<Vec<AggregateRecord<M>>, EngineError> {
        Ok(self.sink.pop_all_values().await?)
    }

    /// Every aggregate record collected so far, without draining them.
    pub async fn results_snapshot(&self) -> Result<Vec<AggregateRecord<M>>, EngineError> {
        Ok(self.sink.snapshot().await?)
    }

    /// Stop `pid` after its current message. Terminal.
    pub fn stop(&self, pid: &Pid<M>) -> Result<(), EngineError> {
        self.node_of(pid)?;
        pid.transition(ActorState::Stopped).map(|_| ())
    }

    /// Stop dequeuing for `pid` until [`Engine::resume`].
    pub fn pause(&self, pid: &Pid<M>) -> Result<(), EngineError> {
        self.node_of(pid)?;
        pid.transition(ActorState::Paused).map(|_| ())
    }

    pub fn resume(&self, pid: &Pid<M>) -> Result<(), EngineError> {
        self.node_of(pid)?;
        if pid.state() != ActorState::Paused {
            return Err(EngineError::InvalidTransition {
                name: pid.name().to_string(),
                from: pid.state(),
                to: ActorState::Running,
            });
        }
        pid.transition(ActorState::Running).map(|_| ())
    }

    /// Stop every actor and background loop and wait for all of them to finish.
    ///
    /// Ticks already recorded stay in the sink until the engine is dropped.
    pub async fn shutdown(mut self) {
        let started = Instant::now();
        self.stop_all();
        self.shutdown.cancel();

        for task in std::mem::take(&mut self.tasks) {
            if let Err(e) = task.await {
                tracing::error!(error = %e, "Engine task failed during shutdown");
            }
        }

        EngineShutdown {
            actor_count: self.graph.len(),
            duration: started.elapsed(),
        }
        .log();
    }

    fn stop_all(&self) {
        for node in self.graph.nodes() {
            let pid = node.value();
            if !pid.state().is_terminal() {
                let _ = pid.transition(ActorState::Stopped);
            }
        }
    }

    /// Pids in topological order, parents before children.
    pub fn execution_order(&self) -> Result<Vec<Pid<M>>, EngineError> {
        Ok(self
            .graph
            .topological_sort()?
            .into_iter()
            .map(|node| self.graph.value(node).clone())
            .collect())
    }

    /// The root designated by `ready()`.
    pub fn root(&self) -> Option<&Pid<M>> {
        self.root.as_ref()
    }

    pub fn pid(&self, name: &str) -> Option<Pid<M>> {
        let id = self.by_name.get(name)?;
        let node = self.by_id.get(id)?;
        Some(self.graph.value(*node).clone())
    }

    /// Every spawned pid, in spawn order.
    pub fn pids(&self) -> Vec<Pid<M>> {
        self.graph
            .nodes()
            .iter()
            .map(|node| node.value().clone())
            .collect()
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Messages accepted by `send` and not yet handed to the root.
    pub fn in_flight(&self) -> usize {
        self.mailbox.in_flight()
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn graph(&self) -> &Dag<Pid<M>> {
        &self.graph
    }

    fn node_of(&self, pid: &Pid<M>) -> Result<NodeId, EngineError> {
        self.by_id
            .get(&pid.id())
            .copied()
            .ok_or_else(|| EngineError::UnknownActor {
                pid: pid.to_string(),
            })
    }
}

impl<M: Message> Default for Engine<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Message> Drop for Engine<M> {
    fn drop(&mut self) {
        self.stop_all();
        self.shutdown.cancel();
    }
}

impl<M: Message> std::fmt::Debug for Engine<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("actors", &self.graph.len())
            .field("edges", &self.graph.edges().len())
            .field("ready", &self.ready)
            .field("root", &self.root.as_ref().map(|pid| pid.name().to_string()))
            .finish()
    }
}

/// Fold tick events into the sink until every actor loop has exited.
async fn aggregate<M: Message>(mut ticks: mpsc::Receiver<TickEvent<M>>, sink: Sink<M>) {
    while let Some(event) = ticks.recv().await {
        if let Err(e) = sink.record(event).await {
            tracing::error!(error = %e, "Failed to record tick, sink is closed");
            break;
        }
    }
    tracing::trace!("Tick aggregation loop finished");
}
