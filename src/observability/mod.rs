// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! Message types for every diagnostic and operational log line live in
//! [`messages`], grouped by subsystem, so log text is not scattered through the
//! runtime as string literals.
//!
//! The runtime only emits `tracing` events; installing a subscriber is up to the
//! host. [`init_tracing`] is a convenience for hosts and tests that want the
//! usual `fmt` output filtered by `RUST_LOG`.

pub mod messages;

use tracing_subscriber::EnvFilter;

/// Install a `fmt` subscriber filtered by `RUST_LOG` (default `info`).
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
