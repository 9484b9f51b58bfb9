// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod config;        // runtime tuning, YAML loading
pub mod errors;        // error handling
pub mod graph;         // DAG topology
pub mod mailbox;       // throttled ingress
pub mod observability;
pub mod queue;         // lock-free ring + async inbox
pub mod runtime;       // engine, pids, actor loops
pub mod sink;          // per-message tick aggregation
pub mod store;         // single-owner key/value store
pub mod traits;        // actor abstractions

pub use errors::{ActorProcessingError, EngineError};
pub use mailbox::{CorrelationId, Envelope};
pub use runtime::{ActorState, Context, Engine, Pid};
pub use sink::{AggregateRecord, Tick};
pub use traits::{Actor, Identity, Message};
