// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::{Arc, RwLock};

use uuid::Uuid;

use crate::mailbox::Envelope;
use crate::queue::Inbox;
use crate::runtime::Pid;
use crate::sink::ActorIdentity;
use crate::store::KvStore;
use crate::traits::Message;

/// Everything an actor can reach while handling a message.
///
/// Owned by exactly one [`Pid`]: the private inbox, a local key/value store for
/// actor state that should outlive a single `receive` call, and the children the
/// result is broadcast to. The child list is filled once by `ready()`.
pub struct Context<M> {
    identity: ActorIdentity,
    inbox: Arc<Inbox<Envelope<M>>>,
    store: KvStore<String, serde_json::Value>,
    children: RwLock<Vec<Pid<M>>>,
}

impl<M: Message> Context<M> {
    pub(crate) fn new(identity: ActorIdentity, inbox_capacity: usize) -> Self {
        Self {
            identity,
            inbox: Arc::new(Inbox::new(inbox_capacity)),
            store: KvStore::new(),
            children: RwLock::new(Vec::new()),
        }
    }

    pub fn actor_id(&self) -> Uuid {
        self.identity.id
    }

    pub fn actor_name(&self) -> &str {
        &self.identity.name
    }

    pub fn actor_identity(&self) -> &ActorIdentity {
        &self.identity
    }

    pub fn inbox(&self) -> &Arc<Inbox<Envelope<M>>> {
        &self.inbox
    }

    /// The actor's local store.
    pub fn store(&self) -> &KvStore<String, serde_json::Value> {
        &self.store
    }

    pub(crate) fn add_child(&self, child: Pid<M>) {
        let mut children = self.children.write().unwrap_or_else(|e| e.into_inner());
        if !children.contains(&child) {
            children.push(child);
        }
    }

    /// Snapshot of the broadcast targets, in edge insertion order.
    pub fn children(&self) -> Vec<Pid<M>> {
        self.children
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn child_names(&self) -> Vec<String> {
        self.children()
            .iter()
            .map(|child| child.name().to_string())
            .collect()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.read().unwrap_or_else(|e| e.into_inner()).is_empty()
    }
}

impl<M> std::fmt::Debug for Context<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("actor", &self.identity.name)
            .field("inbox", &self.inbox)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::runtime::Pid;
    use serde_json::json;

    #[tokio::test]
    async fn test_children_keep_insertion_order_without_duplicates() {
        let parent: Pid<i64> = Pid::new("parent".to_string(), 4);
        let left: Pid<i64> = Pid::new("left".to_string(), 4);
        let right: Pid<i64> = Pid::new("right".to_string(), 4);

        assert!(parent.context().is_leaf());
        parent.context().add_child(left.clone());
        parent.context().add_child(right.clone());
        parent.context().add_child(left);

        assert_eq!(parent.context().child_names(), vec!["left", "right"]);
        assert!(!parent.context().is_leaf());
    }

    #[tokio::test]
    async fn test_local_store_is_private_per_actor() {
        let a: Pid<i64> = Pid::new("a".to_string(), 4);
        let b: Pid<i64> = Pid::new("b".to_string(), 4);

        a.context().store().put("seen".into(), json!(3)).await.unwrap();

        assert_eq!(a.context().store().get("seen".into()).await.unwrap(), Some(json!(3)));
        assert_eq!(b.context().store().get("seen".into()).await.unwrap(), None);
        assert_eq!(a.context().actor_name(), "a");
        assert_eq!(a.context().actor_id(), a.id());
    }
}
