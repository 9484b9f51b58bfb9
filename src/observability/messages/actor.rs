// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for actor execution loop events.
//!
//! This module contains message types for logging events related to:
//! * Loop start and stop
//! * Lifecycle state transitions
//! * `receive` failures
//! * Broadcast deliveries dropped after the delivery timeout or to stopped actors

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Execution loop started.
///
/// # Log Level
/// `debug!` - Lifecycle detail
pub struct ActorStarted<'a> {
    pub actor: &'a str,
    pub children: usize,
}

impl Display for ActorStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Actor '{}' started with {} children",
            self.actor, self.children
        )
    }
}

impl StructuredLog for ActorStarted<'_> {
    fn log(&self) {
        tracing::debug!(actor = self.actor, children = self.children, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "actor_started",
            span_name = name,
            actor = self.actor,
            children = self.children,
        )
    }
}

/// Execution loop exited.
///
/// # Log Level
/// `debug!` - Lifecycle detail
pub struct ActorStopped<'a> {
    pub actor: &'a str,
    pub processed: u64,
    pub failed: u64,
}

impl Display for ActorStopped<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Actor '{}' stopped after {} messages ({} failed)",
            self.actor, self.processed, self.failed
        )
    }
}

impl StructuredLog for ActorStopped<'_> {
    fn log(&self) {
        tracing::debug!(
            actor = self.actor,
            processed = self.processed,
            failed = self.failed,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "actor_stopped",
            span_name = name,
            actor = self.actor,
            processed = self.processed,
            failed = self.failed,
        )
    }
}

/// Lifecycle state changed by the host.
///
/// # Log Level
/// `debug!` - Lifecycle detail
///
/// # Example
/// ```
/// use the_actorwood::observability::messages::actor::ActorStateChanged;
///
/// let msg = ActorStateChanged {
///     actor: "tokenizer",
///     from: "Running",
///     to: "Paused",
/// };
///
/// assert_eq!(msg.to_string(), "Actor 'tokenizer' moved from Running to Paused");
/// ```
pub struct ActorStateChanged<'a> {
    pub actor: &'a str,
    pub from: &'a str,
    pub to: &'a str,
}

impl Display for ActorStateChanged<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Actor '{}' moved from {} to {}", self.actor, self.from, self.to)
    }
}

impl StructuredLog for ActorStateChanged<'_> {
    fn log(&self) {
        tracing::debug!(actor = self.actor, from = self.from, to = self.to, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "actor_state_changed",
            span_name = name,
            actor = self.actor,
            from = self.from,
            to = self.to,
        )
    }
}

/// `receive` returned an error. The message is not broadcast.
///
/// # Log Level
/// `warn!` - Contained per-message failure
///
/// # Example
/// ```
/// use the_actorwood::observability::messages::actor::ReceiveFailed;
///
/// let error = std::io::Error::new(std::io::ErrorKind::Other, "bad payload");
/// let msg = ReceiveFailed {
///     actor: "tokenizer",
///     correlation_id: "5f0c6a1e-1111-4222-8333-944445555666",
///     error: &error,
/// };
///
/// tracing::warn!("{}", msg);
/// ```
pub struct ReceiveFailed<'a> {
    pub actor: &'a str,
    pub correlation_id: &'a str,
    pub error: &'a dyn Display,
}

impl Display for ReceiveFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Actor '{}' failed to process message {}: {}",
            self.actor, self.correlation_id, self.error
        )
    }
}

impl StructuredLog for ReceiveFailed<'_> {
    fn log(&self) {
        tracing::warn!(
            actor = self.actor,
            correlation_id = self.correlation_id,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "receive_failed",
            span_name = name,
            actor = self.actor,
            correlation_id = self.correlation_id,
            error = %self.error,
        )
    }
}

/// A message copy was dropped because the target inbox stayed full.
///
/// # Log Level
/// `warn!` - Data loss the host should know about
pub struct DeliveryDropped<'a> {
    pub from: &'a str,
    pub to: &'a str,
    pub correlation_id: &'a str,
    pub timeout: std::time::Duration,
}

impl Display for DeliveryDropped<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Dropped message {} from '{}' to '{}': inbox full for {:?}",
            self.correlation_id, self.from, self.to, self.timeout
        )
    }
}

impl StructuredLog for DeliveryDropped<'_> {
    fn log(&self) {
        tracing::warn!(
            from = self.from,
            to = self.to,
            correlation_id = self.correlation_id,
            timeout_ms = self.timeout.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "delivery_dropped",
            span_name = name,
            from = self.from,
            to = self.to,
            correlation_id = self.correlation_id,
            timeout = ?self.timeout,
        )
    }
}

/// A message copy was dropped without waiting because the target actor is
/// stopped and will never drain its inbox again.
///
/// # Log Level
/// `warn!` - Data loss the host should know about
///
/// # Example
/// ```
/// use the_actorwood::observability::messages::actor::DeliverySkipped;
///
/// let msg = DeliverySkipped {
///     from: "parser",
///     to: "archiver",
///     correlation_id: "c0ffee",
/// };
///
/// assert_eq!(
///     msg.to_string(),
///     "Dropped message c0ffee from 'parser' to 'archiver': actor is stopped"
/// );
/// ```
pub struct DeliverySkipped<'a> {
    pub from: &'a str,
    pub to: &'a str,
    pub correlation_id: &'a str,
}

impl Display for DeliverySkipped<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Dropped message {} from '{}' to '{}': actor is stopped",
            self.correlation_id, self.from, self.to
        )
    }
}

impl StructuredLog for DeliverySkipped<'_> {
    fn log(&self) {
        tracing::warn!(
            from = self.from,
            to = self.to,
            correlation_id = self.correlation_id,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "delivery_skipped",
            span_name = name,
            from = self.from,
            to = self.to,
            correlation_id = self.correlation_id,
        )
    }
}
