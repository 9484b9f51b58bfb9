// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Actor scheduling runtime.
//!
//! The [`Engine`] owns the graph of [`Pid`]s. After `ready()` every actor runs
//! in its own tokio task, pulling envelopes from the private inbox in its
//! [`Context`] and broadcasting results to its children's inboxes. Inputs and
//! outputs are reported as ticks over a bounded channel to a single aggregation
//! task that folds them into the sink.

mod context;
mod engine;
mod pid;
mod worker;

#[cfg(test)]
mod integration_tests;

pub use context::Context;
pub use engine::Engine;
pub use pid::{ActorState, Pid};
