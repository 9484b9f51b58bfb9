// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::graph::NodeId;
use thiserror::Error;

/// Errors raised by the DAG topology engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// The edge `from -> to` would close a path `to -> ... -> from`.
    #[error("Adding edge '{from}' -> '{to}' would create a cycle")]
    Cycle { from: String, to: String },

    /// A node id that was not produced by this graph.
    #[error("Node {0} does not belong to this graph")]
    UnknownNode(NodeId),
}
