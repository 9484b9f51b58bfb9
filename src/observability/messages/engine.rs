// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for engine configuration and lifecycle events.
//!
//! This module contains message types for logging events related to:
//! * Actor registration and edge insertion
//! * Graph validation and readiness
//! * Engine shutdown

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Actor registered with the engine.
///
/// # Log Level
/// `debug!` - Configuration detail
pub struct ActorSpawned<'a> {
    pub name: &'a str,
    pub pid: &'a str,
}

impl Display for ActorSpawned<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Spawned actor '{}' as {}", self.name, self.pid)
    }
}

impl StructuredLog for ActorSpawned<'_> {
    fn log(&self) {
        tracing::debug!(actor = self.name, pid = self.pid, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("actor_spawned", span_name = name, actor = self.name, pid = self.pid)
    }
}

/// Edge rejected because it would close a cycle.
///
/// # Log Level
/// `warn!` - Configuration mistake surfaced to the caller
///
/// # Example
/// ```
/// use the_actorwood::observability::messages::engine::EdgeRejected;
///
/// let msg = EdgeRejected {
///     from: "sink",
///     to: "source",
///     reason: "would create a cycle",
/// };
///
/// tracing::warn!("{}", msg);
/// ```
pub struct EdgeRejected<'a> {
    pub from: &'a str,
    pub to: &'a str,
    pub reason: &'a str,
}

impl Display for EdgeRejected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Rejected edge '{}' -> '{}': {}", self.from, self.to, self.reason)
    }
}

impl StructuredLog for EdgeRejected<'_> {
    fn log(&self) {
        tracing::warn!(from = self.from, to = self.to, reason = self.reason, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "edge_rejected",
            span_name = name,
            from = self.from,
            to = self.to,
            reason = self.reason,
        )
    }
}

/// Graph validated and every loop started.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use the_actorwood::observability::messages::engine::EngineReady;
///
/// let msg = EngineReady {
///     root: "parser",
///     actor_count: 3,
///     edge_count: 2,
/// };
///
/// assert_eq!(msg.to_string(), "Engine ready: root='parser', 3 actors, 2 edges");
/// ```
pub struct EngineReady<'a> {
    pub root: &'a str,
    pub actor_count: usize,
    pub edge_count: usize,
}

impl Display for EngineReady<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Engine ready: root='{}', {} actors, {} edges",
            self.root, self.actor_count, self.edge_count
        )
    }
}

impl StructuredLog for EngineReady<'_> {
    fn log(&self) {
        tracing::info!(
            root = self.root,
            actor_count = self.actor_count,
            edge_count = self.edge_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "engine_ready",
            span_name = name,
            root = self.root,
            actor_count = self.actor_count,
            edge_count = self.edge_count,
        )
    }
}

/// Graph validation failed in `ready()`.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct ReadinessFailed<'a> {
    pub error: &'a dyn std::error::Error,
}

impl Display for ReadinessFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Engine readiness check failed: {}", self.error)
    }
}

impl StructuredLog for ReadinessFailed<'_> {
    fn log(&self) {
        tracing::error!(error = %self.error, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!("readiness_failed", span_name = name, error = %self.error)
    }
}

/// Engine shut down and every task joined.
///
/// # Log Level
/// `info!` - Important operational event
pub struct EngineShutdown {
    pub actor_count: usize,
    pub duration: std::time::Duration,
}

impl Display for EngineShutdown {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Engine shut down: {} actors stopped in {:?}",
            self.actor_count, self.duration
        )
    }
}

impl StructuredLog for EngineShutdown {
    fn log(&self) {
        tracing::info!(
            actor_count = self.actor_count,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "engine_shutdown",
            span_name = name,
            actor_count = self.actor_count,
            duration = ?self.duration,
        )
    }
}
