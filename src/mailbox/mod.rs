// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Ingress mailbox: the single throttled entry point into a running graph.
//!
//! Admission is counted with a `Semaphore`. [`Mailbox::source`] takes a permit
//! without waiting and forgets it; the permit comes back only once the message
//! has been drained out of the mailbox (handed to the root, or dropped after
//! the delivery timeout). The in-flight count therefore covers every message
//! accepted but not yet drained, and never exceeds the throttle limit.

mod envelope;

pub use envelope::{CorrelationId, Envelope};

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::errors::ThrottledError;
use crate::observability::messages::actor::{DeliveryDropped, DeliverySkipped};
use crate::observability::messages::mailbox::{MailboxDrainStopped, MessageThrottled};
use crate::observability::messages::StructuredLog;
use crate::queue::Inbox;

const MAILBOX_NAME: &str = "mailbox";

pub struct Mailbox<M> {
    queue: Inbox<M>,
    admission: Semaphore,
    limit: usize,
}

impl<M: Send + 'static> Mailbox<M> {
    /// A mailbox admitting at most `limit` in-flight messages.
    pub fn new(limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            queue: Inbox::new(limit),
            admission: Semaphore::new(limit),
            limit,
        }
    }

    /// Accept `msg` without blocking, or fail when the throttle limit is reached.
    pub fn source(&self, msg: M) -> Result<(), ThrottledError> {
        let throttled = ThrottledError { limit: self.limit };

        match self.admission.try_acquire() {
            Ok(permit) => permit.forget(),
            Err(_) => {
                MessageThrottled { limit: self.limit }.log();
                return Err(throttled);
            }
        }

        // The queue holds `limit` values, so holding a permit guarantees a slot.
        if self.queue.try_push(msg).is_err() {
            self.release();
            return Err(throttled);
        }
        Ok(())
    }

    /// Dequeue one message under a fresh correlation id and release its permit.
    pub fn try_recv(&self) -> Option<Envelope<M>> {
        let envelope = self.take()?;
        self.release();
        Some(envelope)
    }

    /// Wait for the next message. The permit stays held until [`Mailbox::release`].
    async fn recv(&self) -> Envelope<M> {
        Envelope::new(self.queue.recv().await)
    }

    fn take(&self) -> Option<Envelope<M>> {
        self.queue.try_recv().map(Envelope::new)
    }

    fn release(&self) {
        self.admission.add_permits(1);
    }

    /// Messages accepted but not yet drained.
    pub fn in_flight(&self) -> usize {
        self.limit - self.admission.available_permits()
    }

    pub fn throttle_limit(&self) -> usize {
        self.limit
    }

    /// Start the drain loop feeding `consumer` in acceptance order.
    ///
    /// Each delivery waits up to `timeout` for space in the consumer's inbox;
    /// a message that still does not fit is dropped with a warning. While
    /// `accepting` returns `false` the consumer is gone for good and messages are
    /// dropped without waiting. The loop ends when `shutdown` is cancelled.
    pub fn consume<F>(
        self: &Arc<Self>,
        consumer_name: String,
        consumer: Arc<Inbox<Envelope<M>>>,
        accepting: F,
        timeout: Duration,
        shutdown: CancellationToken,
    ) -> JoinHandle<()>
    where
        F: Fn() -> bool + Send + 'static,
    {
        let mailbox = Arc::clone(self);

        tokio::spawn(async move {
            let mut delivered = 0u64;
            let mut dropped = 0u64;

            loop {
                let envelope = tokio::select! {
                    biased;
                    _ = shutdown.cancelled() => break,
                    envelope = mailbox.recv() => envelope,
                };
                let correlation_id = envelope.correlation_id;

                if !accepting() {
                    dropped += 1;
                    DeliverySkipped {
                        from: MAILBOX_NAME,
                        to: &consumer_name,
                        correlation_id: &correlation_id.to_string(),
                    }
                    .log();
                    mailbox.release();
                    continue;
                }

                match consumer.deliver(envelope, timeout).await {
                    Ok(()) => delivered += 1,
                    Err(_) => {
                        dropped += 1;
                        DeliveryDropped {
                            from: MAILBOX_NAME,
                            to: &consumer_name,
                            correlation_id: &correlation_id.to_string(),
                            timeout,
                        }
                        .log();
                    }
                }
                mailbox.release();
            }

            MailboxDrainStopped {
                consumer: &consumer_name,
                delivered,
                dropped,
            }
            .log();
        })
    }
}

impl<M> std::fmt::Debug for Mailbox<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mailbox")
            .field("limit", &self.limit)
            .field("available", &self.admission.available_permits())
            .field("queued", &self.queue.len())
            .finish()
    }
}
