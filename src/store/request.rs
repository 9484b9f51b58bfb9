// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use tokio::sync::oneshot;

/// Mutation applied in place by the owner task during an upsert.
pub(crate) type Apply<V> = Box<dyn FnOnce(&mut V) + Send>;

/// One store operation, carrying its own response slot.
pub(crate) enum StoreRequest<K, V> {
    Get {
        key: K,
        respond_to: oneshot::Sender<Option<V>>,
    },
    Put {
        key: K,
        value: V,
        respond_to: oneshot::Sender<()>,
    },
    Has {
        key: K,
        respond_to: oneshot::Sender<bool>,
    },
    HasOrAdd {
        key: K,
        value: V,
        respond_to: oneshot::Sender<bool>,
    },
    Delete {
        key: K,
        respond_to: oneshot::Sender<()>,
    },
    Len {
        respond_to: oneshot::Sender<usize>,
    },
    Clear {
        respond_to: oneshot::Sender<()>,
    },
    Values {
        respond_to: oneshot::Sender<Vec<V>>,
    },
    PopAllValues {
        respond_to: oneshot::Sender<Vec<V>>,
    },
    PopAllKeys {
        respond_to: oneshot::Sender<Vec<K>>,
    },
    PopValueByKey {
        key: K,
        respond_to: oneshot::Sender<Option<V>>,
    },
    Upsert {
        key: K,
        default: V,
        apply: Apply<V>,
        respond_to: oneshot::Sender<()>,
    },
}
