// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Key/value store owned by a single task.
//!
//! The backing `HashMap` lives inside one tokio task and is never shared. Every
//! operation is a [`StoreRequest`] sent over an `mpsc` channel with a `oneshot`
//! response slot, and the caller awaits the reply. Requests are served one at a
//! time in arrival order, which makes every operation (including the compound
//! ones) linearizable without locks.

use std::collections::HashMap;
use std::hash::Hash;

use tokio::sync::{mpsc, oneshot};

use crate::config::consts::DEFAULT_STORE_BUFFER;
use crate::errors::StoreError;
use crate::store::request::StoreRequest;

/// Handle to a serialized key/value store.
///
/// Cheap to clone; the owner task exits once every handle is dropped.
pub struct KvStore<K, V> {
    sender: mpsc::Sender<StoreRequest<K, V>>,
}

impl<K, V> Clone for KvStore<K, V> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<K, V> std::fmt::Debug for KvStore<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KvStore")
            .field("closed", &self.sender.is_closed())
            .finish()
    }
}

impl<K, V> KvStore<K, V>
where
    K: Eq + Hash + Send + 'static,
    V: Clone + Send + 'static,
{
    /// Start the owner task and return a handle to it.
    ///
    /// # Panics
    /// When called outside a tokio runtime.
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel(DEFAULT_STORE_BUFFER);
        tokio::spawn(run(receiver));
        Self { sender }
    }

    pub async fn get(&self, key: K) -> Result<Option<V>, StoreError> {
        self.request(|respond_to| StoreRequest::Get { key, respond_to })
            .await
    }

    pub async fn put(&self, key: K, value: V) -> Result<(), StoreError> {
        self.request(|respond_to| StoreRequest::Put {
            key,
            value,
            respond_to,
        })
        .await
    }

    pub async fn has(&self, key: K) -> Result<bool, StoreError> {
        self.request(|respond_to| StoreRequest::Has { key, respond_to })
            .await
    }

    /// Insert `value` only if `key` is absent, in one step.
    ///
    /// Returns `true` when the key was absent (and is now set to `value`). An
    /// existing value is never overwritten, so the first write wins.
    pub async fn has_or_add(&self, key: K, value: V) -> Result<bool, StoreError> {
        self.request(|respond_to| StoreRequest::HasOrAdd {
            key,
            value,
            respond_to,
        })
        .await
    }

    pub async fn delete(&self, key: K) -> Result<(), StoreError> {
        self.request(|respond_to| StoreRequest::Delete { key, respond_to })
            .await
    }

    pub async fn len(&self) -> Result<usize, StoreError> {
        self.request(|respond_to| StoreRequest::Len { respond_to })
            .await
    }

    pub async fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len().await? == 0)
    }

    pub async fn clear(&self) -> Result<(), StoreError> {
        self.request(|respond_to| StoreRequest::Clear { respond_to })
            .await
    }

    /// Snapshot of every value, leaving the store untouched.
    pub async fn values(&self) -> Result<Vec<V>, StoreError> {
        self.request(|respond_to| StoreRequest::Values { respond_to })
            .await
    }

    /// Take every value and clear the store in one step.
    pub async fn pop_all_values(&self) -> Result<Vec<V>, StoreError> {
        self.request(|respond_to| StoreRequest::PopAllValues { respond_to })
            .await
    }

    /// Take every key and clear the store in one step.
    pub async fn pop_all_keys(&self) -> Result<Vec<K>, StoreError> {
        self.request(|respond_to| StoreRequest::PopAllKeys { respond_to })
            .await
    }

    pub async fn pop_value_by_key(&self, key: K) -> Result<Option<V>, StoreError> {
        self.request(|respond_to| StoreRequest::PopValueByKey { key, respond_to })
            .await
    }

    /// Look up `key`, inserting `default` when absent, then run `apply` on the
    /// stored value. The whole sequence is one request.
    pub async fn upsert<F>(&self, key: K, default: V, apply: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut V) + Send + 'static,
    {
        self.request(|respond_to| StoreRequest::Upsert {
            key,
            default,
            apply: Box::new(apply),
            respond_to,
        })
        .await
    }

    async fn request<R>(
        &self,
        build: impl FnOnce(oneshot::Sender<R>) -> StoreRequest<K, V>,
    ) -> Result<R, StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| StoreError::Closed)?;
        response.await.map_err(|_| StoreError::Closed)
    }
}

impl<K, V> Default for KvStore<K, V>
where
    K: Eq + Hash + Send + 'static,
    V: Clone + Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Owner loop. A caller that gave up on its reply is not an error, so failed
/// response sends are ignored.
async fn run<K, V>(mut receiver: mpsc::Receiver<StoreRequest<K, V>>)
where
    K: Eq + Hash,
    V: Clone,
{
    let mut data: HashMap<K, V> = HashMap::new();

    while let Some(request) = receiver.recv().await {
        match request {
            StoreRequest::Get { key, respond_to } => {
                let _ = respond_to.send(data.get(&key).cloned());
            }
            StoreRequest::Put {
                key,
                value,
                respond_to,
            } => {
                data.insert(key, value);
                let _ = respond_to.send(());
            }
            StoreRequest::Has { key, respond_to } => {
                let _ = respond_to.send(data.contains_key(&key));
            }
            StoreRequest::HasOrAdd {
                key,
                value,
                respond_to,
            } => {
                let absent = !data.contains_key(&key);
                if absent {
                    data.insert(key, value);
                }
                let _ = respond_to.send(absent);
            }
            StoreRequest::Delete { key, respond_to } => {
                data.remove(&key);
                let _ = respond_to.send(());
            }
            StoreRequest::Len { respond_to } => {
                let _ = respond_to.send(data.len());
            }
            StoreRequest::Clear { respond_to } => {
                data.clear();
                let _ = respond_to.send(());
            }
            StoreRequest::Values { respond_to } => {
                let _ = respond_to.send(data.values().cloned().collect());
            }
            StoreRequest::PopAllValues { respond_to } => {
                let values = data.drain().map(|(_, value)| value).collect();
                let _ = respond_to.send(values);
            }
            StoreRequest::PopAllKeys { respond_to } => {
                let keys = data.drain().map(|(key, _)| key).collect();
                let _ = respond_to.send(keys);
            }
            StoreRequest::PopValueByKey { key, respond_to } => {
                let _ = respond_to.send(data.remove(&key));
            }
            StoreRequest::Upsert {
                key,
                default,
                apply,
                respond_to,
            } => {
                apply(data.entry(key).or_insert(default));
                let _ = respond_to.send(());
            }
        }
    }

    tracing::trace!(entries = data.len(), "Key/value store owner task exiting");
}
