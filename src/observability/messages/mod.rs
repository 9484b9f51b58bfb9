// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Each message type implements `Display` for the human-readable line and
//! [`StructuredLog`] to emit it with structured fields at its documented level.
//!
//! # Organization
//!
//! * `engine` - graph configuration, readiness and shutdown
//! * `actor` - execution loop lifecycle, failures and deliveries
//! * `mailbox` - ingress throttling and the drain loop
//!
//! # Usage Pattern
//!
//! ```rust
//! use the_actorwood::observability::messages::engine::EngineReady;
//! use the_actorwood::observability::messages::StructuredLog;
//!
//! let msg = EngineReady {
//!     root: "parser",
//!     actor_count: 3,
//!     edge_count: 2,
//! };
//!
//! msg.log();
//! ```

use tracing::Span;

pub mod actor;
pub mod engine;
pub mod mailbox;

/// A log message that knows its level and structured fields.
pub trait StructuredLog {
    /// Emit the event.
    fn log(&self);

    /// Build a span carrying the same fields.
    fn span(&self, name: &str) -> Span;
}
