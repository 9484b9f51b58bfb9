// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use tokio::sync::watch;
use uuid::Uuid;

use crate::errors::EngineError;
use crate::observability::messages::actor::ActorStateChanged;
use crate::observability::messages::StructuredLog;
use crate::runtime::Context;
use crate::sink::ActorIdentity;
use crate::traits::{Identity, Message};

/// Lifecycle of one actor.
///
/// `Init -> Running -> (Paused <-> Running) -> Stopped`. `Stopped` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActorState {
    Init,
    Running,
    Paused,
    Stopped,
}

impl ActorState {
    pub fn can_transition_to(self, next: ActorState) -> bool {
        use ActorState::*;
        matches!(
            (self, next),
            (Init, Running)
                | (Init, Stopped)
                | (Running, Paused)
                | (Running, Stopped)
                | (Paused, Running)
                | (Paused, Stopped)
        )
    }

    pub fn is_terminal(self) -> bool {
        self == ActorState::Stopped
    }
}

impl fmt::Display for ActorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ActorState::Init => "Init",
            ActorState::Running => "Running",
            ActorState::Paused => "Paused",
            ActorState::Stopped => "Stopped",
        };
        f.write_str(label)
    }
}

/// Process identifier of a spawned actor.
///
/// A shared handle: clones refer to the same actor, its [`Context`] and its
/// lifecycle state. Equality and hashing use the generated id only.
pub struct Pid<M> {
    inner: Arc<PidInner<M>>,
}

struct PidInner<M> {
    identity: ActorIdentity,
    state: watch::Sender<ActorState>,
    context: Context<M>,
}

impl<M: Message> Pid<M> {
    pub(crate) fn new(name: String, inbox_capacity: usize) -> Self {
        let identity = ActorIdentity {
            id: Uuid::new_v4(),
            name,
        };
        let (state, _) = watch::channel(ActorState::Init);
        let context = Context::new(identity.clone(), inbox_capacity);

        Self {
            inner: Arc::new(PidInner {
                identity,
                state,
                context,
            }),
        }
    }

    pub fn id(&self) -> Uuid {
        self.inner.identity.id
    }

    pub fn name(&self) -> &str {
        &self.inner.identity.name
    }

    pub fn actor_identity(&self) -> &ActorIdentity {
        &self.inner.identity
    }

    pub fn context(&self) -> &Context<M> {
        &self.inner.context
    }

    pub fn state(&self) -> ActorState {
        *self.inner.state.borrow()
    }

    /// Move to `next`, returning the previous state.
    pub(crate) fn transition(&self, next: ActorState) -> Result<ActorState, EngineError> {
        let mut previous = self.state();
        let moved = self.inner.state.send_if_modified(|state| {
            previous = *state;
            if !state.can_transition_to(next) {
                return false;
            }
            *state = next;
            true
        });

        if !moved {
            return Err(EngineError::InvalidTransition {
                name: self.name().to_string(),
                from: previous,
                to: next,
            });
        }

        ActorStateChanged {
            actor: self.name(),
            from: &previous.to_string(),
            to: &next.to_string(),
        }
        .log();
        Ok(previous)
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<ActorState> {
        self.inner.state.subscribe()
    }
}

impl<M> Clone for Pid<M> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<M> Identity for Pid<M> {
    fn identity(&self) -> String {
        self.inner.identity.name.clone()
    }
}

impl<M> PartialEq for Pid<M> {
    fn eq(&self, other: &Self) -> bool {
        self.inner.identity.id == other.inner.identity.id
    }
}

impl<M> Eq for Pid<M> {}

impl<M> Hash for Pid<M> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.identity.id.hash(state);
    }
}

impl<M> fmt::Display for Pid<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pid:{}", self.inner.identity.name)
    }
}

impl<M> fmt::Debug for Pid<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pid")
            .field("id", &self.inner.identity.id)
            .field("name", &self.inner.identity.name)
            .field("state", &*self.inner.state.borrow())
            .finish()
    }
}
