// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::time::Duration;

use tokio::sync::Notify;
use tokio::time::Instant;

use crate::queue::BoundedQueue;

/// Async front for a [`BoundedQueue`] with a single consumer.
///
/// The ring stays non-blocking; `Notify` pairs only add the suspension points:
/// the consumer parks in [`Inbox::recv`] until something is published, and a
/// producer in [`Inbox::deliver`] parks until the consumer frees a slot or its
/// deadline passes.
pub struct Inbox<T> {
    queue: BoundedQueue<T>,
    readable: Notify,
    writable: Notify,
}

impl<T> Inbox<T> {
    /// An inbox holding up to `capacity` values.
    pub fn new(capacity: usize) -> Self {
        Self {
            queue: BoundedQueue::new(capacity.max(1) + 1),
            readable: Notify::new(),
            writable: Notify::new(),
        }
    }

    /// Enqueue without waiting, handing the value back when full.
    pub fn try_push(&self, value: T) -> Result<(), T> {
        self.queue.push(value)?;
        self.readable.notify_one();
        Ok(())
    }

    /// Enqueue, waiting for free space for at most `timeout`.
    ///
    /// Returns the value back if the inbox stayed full until the deadline.
    pub async fn deliver(&self, value: T, timeout: Duration) -> Result<(), T> {
        let deadline = Instant::now() + timeout;
        let mut value = value;

        loop {
            let writable = self.writable.notified();
            match self.try_push(value) {
                Ok(()) => return Ok(()),
                Err(back) => value = back,
            }
            if tokio::time::timeout_at(deadline, writable).await.is_err() {
                return self.try_push(value);
            }
        }
    }

    /// Dequeue without waiting.
    pub fn try_recv(&self) -> Option<T> {
        let value = self.queue.pop()?;
        self.writable.notify_waiters();
        Some(value)
    }

    /// Wait until a value is available. Cancel safe: dropping the future never
    /// loses a value.
    pub async fn recv(&self) -> T {
        loop {
            let readable = self.readable.notified();
            if let Some(value) = self.try_recv() {
                return value;
            }
            readable.await;
        }
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.queue.capacity()
    }
}

impl<T> std::fmt::Debug for Inbox<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Inbox")
            .field("capacity", &self.capacity())
            .field("len", &self.len())
            .finish()
    }
}
