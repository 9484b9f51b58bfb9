// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::{GraphError, StoreError, ThrottledError};
use crate::runtime::ActorState;
use thiserror::Error;

/// Errors surfaced by the actor engine's host-facing operations.
///
/// Configuration errors (duplicate actor, unknown pid, cycle, root problems,
/// mutation after readiness) are fatal to the call that caused them but leave the
/// engine usable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// An actor with the same identity is already spawned.
    #[error("Actor '{name}' is already spawned")]
    DuplicateActor { name: String },

    /// The pid was not spawned by this engine.
    #[error("Actor '{pid}' is not registered with this engine")]
    UnknownActor { pid: String },

    /// The edge would close a cycle in the actor graph.
    #[error("Adding edge '{from}' -> '{to}' would create a cycle")]
    Cycle { from: String, to: String },

    /// The graph has no candidate root actor.
    #[error("No root actor found")]
    NoRoot,

    /// More than one actor has no incoming edges.
    #[error("Only one root actor is allowed, found: {}", .roots.join(", "))]
    MultipleRoots { roots: Vec<String> },

    /// The graph is already running and can no longer change.
    #[error("Engine is already ready, the actor graph is frozen")]
    AlreadyReady,

    /// Messages can only be sent after `ready()`.
    #[error("Engine is not ready")]
    NotReady,

    /// The requested lifecycle transition is not allowed.
    #[error("Actor '{name}' cannot move from {from} to {to}")]
    InvalidTransition {
        name: String,
        from: ActorState,
        to: ActorState,
    },

    #[error(transparent)]
    Throttled(#[from] ThrottledError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl EngineError {
    /// True for errors detected while building the graph.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            EngineError::DuplicateActor { .. }
                | EngineError::UnknownActor { .. }
                | EngineError::Cycle { .. }
                | EngineError::NoRoot
                | EngineError::MultipleRoots { .. }
                | EngineError::AlreadyReady
        )
    }
}

impl From<GraphError> for EngineError {
    fn from(error: GraphError) -> Self {
        match error {
            GraphError::Cycle { from, to } => EngineError::Cycle { from, to },
            GraphError::UnknownNode(node) => EngineError::UnknownActor {
                pid: node.to_string(),
            },
        }
    }
}
