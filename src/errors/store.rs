// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Errors returned by the serialized key/value store.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    /// The owner task is gone, so the request could not be served.
    #[error("Key/value store owner task has shut down")]
    Closed,
}
