// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The per-actor execution loop.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::mailbox::{CorrelationId, Envelope};
use crate::observability::messages::actor::{
    ActorStarted, ActorStopped, DeliveryDropped, DeliverySkipped, ReceiveFailed,
};
use crate::observability::messages::StructuredLog;
use crate::runtime::{ActorState, Context, Pid};
use crate::sink::{Tick, TickEvent};
use crate::traits::{Actor, Message};

pub(crate) struct Worker<M: Message> {
    pid: Pid<M>,
    actor: Box<dyn Actor<M>>,
    ticks: mpsc::Sender<TickEvent<M>>,
    delivery_timeout: Duration,
    processed: u64,
    failed: u64,
}

impl<M: Message> Worker<M> {
    pub(crate) fn new(
        pid: Pid<M>,
        actor: Box<dyn Actor<M>>,
        ticks: mpsc::Sender<TickEvent<M>>,
        delivery_timeout: Duration,
    ) -> Self {
        Self {
            pid,
            actor,
            ticks,
            delivery_timeout,
            processed: 0,
            failed: 0,
        }
    }

    /// Drive the actor until its state is observed as `Stopped`.
    ///
    /// While `Init` or `Paused` nothing is dequeued. A message that is already
    /// being handled always finishes, including its broadcast, before a stop
    /// takes effect.
    pub(crate) async fn run(mut self) {
        let pid = self.pid.clone();
        let ctx = pid.context();
        let mut state = pid.subscribe();

        self.actor.pre_start(ctx).await;
        ActorStarted {
            actor: ctx.actor_name(),
            children: ctx.children().len(),
        }
        .log();

        loop {
            let current = *state.borrow_and_update();
            match current {
                ActorState::Stopped => break,
                ActorState::Init | ActorState::Paused => {
                    if state.changed().await.is_err() {
                        break;
                    }
                    continue;
                }
                ActorState::Running => {}
            }

            let envelope = tokio::select! {
                biased;
                changed = state.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    continue;
                }
                envelope = ctx.inbox().recv() => envelope,
            };

            self.handle(ctx, envelope).await;
        }

        self.actor.post_stop(ctx).await;
        ActorStopped {
            actor: ctx.actor_name(),
            processed: self.processed,
            failed: self.failed,
        }
        .log();
    }

    async fn handle(&mut self, ctx: &Context<M>, envelope: Envelope<M>) {
        let Envelope {
            correlation_id,
            payload,
        } = envelope;
        let identity = ctx.actor_identity().clone();
        self.processed += 1;

        self.emit(TickEvent::In(Tick::input(
            correlation_id,
            identity.clone(),
            payload.clone(),
        )))
        .await;
        self.actor.pre_handle_msg(ctx, &payload).await;

        match self.actor.receive(ctx, payload).await {
            Ok(result) => {
                self.emit(TickEvent::Out(Tick::output(
                    correlation_id,
                    identity,
                    result.clone(),
                )))
                .await;
                self.actor.post_handle_msg(ctx, &result).await;
                Self::broadcast(ctx, correlation_id, result, self.delivery_timeout).await;
            }
            Err(error) => {
                self.failed += 1;
                ReceiveFailed {
                    actor: ctx.actor_name(),
                    correlation_id: &correlation_id.to_string(),
                    error: &error,
                }
                .log();
                self.emit(TickEvent::Out(Tick::failed(
                    correlation_id,
                    identity,
                    error.partial().cloned(),
                    error.to_string(),
                )))
                .await;
                self.actor.error_handler(ctx, &error).await;
            }
        }
    }

    async fn emit(&mut self, event: TickEvent<M>) {
        if self.ticks.send(event).await.is_err() {
            tracing::debug!(
                actor = self.pid.name(),
                "Tick channel closed, discarding tick"
            );
        }
    }

    /// Deliver `result` to every child concurrently and wait for all of them.
    ///
    /// Waiting keeps FIFO order between this actor and each child. Stopped
    /// children never drain their inbox, so their copy is dropped up front
    /// instead of holding up the live ones for the full timeout.
    async fn broadcast(
        ctx: &Context<M>,
        correlation_id: CorrelationId,
        result: M,
        timeout: Duration,
    ) {
        let children = ctx.children();
        if children.is_empty() {
            return;
        }

        let mut deliveries = JoinSet::new();
        for child in children {
            if child.state().is_terminal() {
                DeliverySkipped {
                    from: ctx.actor_name(),
                    to: child.name(),
                    correlation_id: &correlation_id.to_string(),
                }
                .log();
                continue;
            }
            let envelope = Envelope::with_id(correlation_id, result.clone());
            deliveries.spawn(async move {
                let delivered = child.context().inbox().deliver(envelope, timeout).await;
                (child, delivered.is_ok())
            });
        }

        while let Some(joined) = deliveries.join_next().await {
            match joined {
                Ok((_, true)) => {}
                Ok((child, false)) => DeliveryDropped {
                    from: ctx.actor_name(),
                    to: child.name(),
                    correlation_id: &correlation_id.to_string(),
                    timeout,
                }
                .log(),
                Err(e) => tracing::error!(
                    actor = ctx.actor_name(),
                    error = %e,
                    "Broadcast delivery task failed"
                ),
            }
        }
    }
}
