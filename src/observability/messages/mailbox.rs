// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for the ingress mailbox.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// `source` rejected a message because the throttle limit is reached.
///
/// # Log Level
/// `debug!` - Expected backpressure, the caller gets the error
pub struct MessageThrottled {
    pub limit: usize,
}

impl Display for MessageThrottled {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Mailbox throttled at {} in-flight messages", self.limit)
    }
}

impl StructuredLog for MessageThrottled {
    fn log(&self) {
        tracing::debug!(limit = self.limit, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("message_throttled", span_name = name, limit = self.limit)
    }
}

/// Drain loop exited.
///
/// # Log Level
/// `debug!` - Lifecycle detail
pub struct MailboxDrainStopped<'a> {
    pub consumer: &'a str,
    pub delivered: u64,
    pub dropped: u64,
}

impl Display for MailboxDrainStopped<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Mailbox drain to '{}' stopped: {} delivered, {} dropped",
            self.consumer, self.delivered, self.dropped
        )
    }
}

impl StructuredLog for MailboxDrainStopped<'_> {
    fn log(&self) {
        tracing::debug!(
            consumer = self.consumer,
            delivered = self.delivered,
            dropped = self.dropped,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "mailbox_drain_stopped",
            span_name = name,
            consumer = self.consumer,
            delivered = self.delivered,
            dropped = self.dropped,
        )
    }
}
