// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt::{Display, Formatter};

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::mailbox::CorrelationId;

/// Who produced a tick: the Pid's generated id plus the actor's name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ActorIdentity {
    pub id: Uuid,
    pub name: String,
}

impl Display for ActorIdentity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

/// One message entering or leaving one actor.
///
/// Output ticks of a failed `receive` carry the partial result, if any, and the
/// error text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tick<M> {
    pub correlation_id: CorrelationId,
    pub actor: ActorIdentity,
    pub payload: Option<M>,
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl<M> Tick<M> {
    pub fn input(correlation_id: CorrelationId, actor: ActorIdentity, payload: M) -> Self {
        Self::at_now(correlation_id, actor, Some(payload), None)
    }

    pub fn output(correlation_id: CorrelationId, actor: ActorIdentity, payload: M) -> Self {
        Self::at_now(correlation_id, actor, Some(payload), None)
    }

    pub fn failed(
        correlation_id: CorrelationId,
        actor: ActorIdentity,
        partial: Option<M>,
        error: String,
    ) -> Self {
        Self::at_now(correlation_id, actor, partial, Some(error))
    }

    fn at_now(
        correlation_id: CorrelationId,
        actor: ActorIdentity,
        payload: Option<M>,
        error: Option<String>,
    ) -> Self {
        Self {
            correlation_id,
            actor,
            payload,
            error,
            timestamp: Utc::now(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// A tick on its way to the sink.
#[derive(Debug, Clone)]
pub enum TickEvent<M> {
    In(Tick<M>),
    Out(Tick<M>),
}

impl<M> TickEvent<M> {
    pub fn tick(&self) -> &Tick<M> {
        match self {
            TickEvent::In(tick) | TickEvent::Out(tick) => tick,
        }
    }
}

/// Every tick recorded for one correlation id, in arrival order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateRecord<M> {
    pub id: CorrelationId,
    pub inputs: Vec<Tick<M>>,
    pub outputs: Vec<Tick<M>>,
}

impl<M> AggregateRecord<M> {
    pub fn new(id: CorrelationId) -> Self {
        Self {
            id,
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    /// The input tick recorded by the actor called `name`.
    pub fn input_of(&self, name: &str) -> Option<&Tick<M>> {
        self.inputs.iter().find(|tick| tick.actor.name == name)
    }

    /// The output tick recorded by the actor called `name`.
    pub fn output_of(&self, name: &str) -> Option<&Tick<M>> {
        self.outputs.iter().find(|tick| tick.actor.name == name)
    }

    /// Timestamp of the earliest input, i.e. when the root picked the message up.
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.inputs.iter().map(|tick| tick.timestamp).min()
    }
}
