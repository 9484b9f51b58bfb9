// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Joins every tick produced by one message's traversal of the graph.
///
/// Assigned once when the mailbox hands a message to the root and preserved by
/// every broadcast after that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationId(Uuid);

impl CorrelationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for CorrelationId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for CorrelationId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl Display for CorrelationId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A payload travelling between actors together with its correlation id.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope<M> {
    pub correlation_id: CorrelationId,
    pub payload: M,
}

impl<M> Envelope<M> {
    /// Wrap `payload` with a fresh correlation id.
    pub fn new(payload: M) -> Self {
        Self::with_id(CorrelationId::new(), payload)
    }

    /// Wrap `payload` keeping an existing correlation id.
    pub fn with_id(correlation_id: CorrelationId, payload: M) -> Self {
        Self {
            correlation_id,
            payload,
        }
    }
}

impl<M: std::fmt::Debug> Display for Envelope<M> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {:?}", self.correlation_id, self.payload)
    }
}
