// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Transport primitives: the lock-free bounded ring and its async inbox front.

mod inbox;
mod ring;

pub use inbox::Inbox;
pub use ring::BoundedQueue;
