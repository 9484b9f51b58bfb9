// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

/// The ingress mailbox already holds `limit` in-flight messages.
///
/// Recoverable: the caller may retry once the graph drains.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Mailbox throttle limit of {limit} in-flight messages reached, message rejected")]
pub struct ThrottledError {
    pub limit: usize,
}
