// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Result aggregation: folds tick events into one record per correlation id.

mod tick;

pub use tick::{ActorIdentity, AggregateRecord, Tick, TickEvent};

use crate::errors::StoreError;
use crate::mailbox::CorrelationId;
use crate::store::KvStore;
use crate::traits::Message;

/// Per-message timelines backed by a [`KvStore`] keyed by correlation id.
///
/// Appends go through [`KvStore::upsert`], so creating a record and pushing the
/// first tick onto it is a single store request.
#[derive(Debug, Clone)]
pub struct Sink<M> {
    store: KvStore<CorrelationId, AggregateRecord<M>>,
}

impl<M: Message> Sink<M> {
    /// # Panics
    /// When called outside a tokio runtime.
    pub fn new() -> Self {
        Self {
            store: KvStore::new(),
        }
    }

    pub async fn put_in_msg(&self, tick: Tick<M>) -> Result<(), StoreError> {
        let id = tick.correlation_id;
        self.store
            .upsert(id, AggregateRecord::new(id), move |record| {
                record.inputs.push(tick)
            })
            .await
    }

    pub async fn put_out_msg(&self, tick: Tick<M>) -> Result<(), StoreError> {
        let id = tick.correlation_id;
        self.store
            .upsert(id, AggregateRecord::new(id), move |record| {
                record.outputs.push(tick)
            })
            .await
    }

    pub async fn record(&self, event: TickEvent<M>) -> Result<(), StoreError> {
        match event {
            TickEvent::In(tick) => self.put_in_msg(tick).await,
            TickEvent::Out(tick) => self.put_out_msg(tick).await,
        }
    }

    /// Take every record and clear the sink, oldest message first.
    pub async fn pop_all_values(&self) -> Result<Vec<AggregateRecord<M>>, StoreError> {
        let mut records = self.store.pop_all_values().await?;
        records.sort_by_key(|record| record.started_at());
        Ok(records)
    }

    /// Every record, leaving the sink untouched, oldest message first.
    pub async fn snapshot(&self) -> Result<Vec<AggregateRecord<M>>, StoreError> {
        let mut records = self.store.values().await?;
        records.sort_by_key(|record| record.started_at());
        Ok(records)
    }

    pub async fn pop_by_id(
        &self,
        id: CorrelationId,
    ) -> Result<Option<AggregateRecord<M>>, StoreError> {
        self.store.pop_value_by_key(id).await
    }

    pub async fn len(&self) -> Result<usize, StoreError> {
        self.store.len().await
    }

    pub async fn is_empty(&self) -> Result<bool, StoreError> {
        self.store.is_empty().await
    }
}

impl<M: Message> Default for Sink<M> {
    fn default() -> Self {
        Self::new()
    }
}
