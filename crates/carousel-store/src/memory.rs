//! In-memory list store.

use std::collections::{HashSet, VecDeque};

use async_trait::async_trait;
use dashmap::DashMap;

use crate::{ListStore, StoreResult};

/// Process-local store over sharded concurrent maps.
///
/// Backs unit tests and single-node embeddings. Shard locking makes each
/// primitive atomic, the same guarantee the Redis commands give. Lists keep
/// the newest element at the front and the oldest at the back.
#[derive(Debug, Default)]
pub struct MemoryListStore {
    lists: DashMap<String, VecDeque<String>>,
    sets: DashMap<String, HashSet<String>>,
}

impl MemoryListStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ListStore for MemoryListStore {
    async fn push(&self, key: &str, value: &str) -> StoreResult<()> {
        self.lists
            .entry(key.to_string())
            .or_default()
            .push_front(value.to_string());
        Ok(())
    }

    async fn rotate(&self, key: &str) -> StoreResult<Option<String>> {
        let rotated = match self.lists.get_mut(key) {
            Some(mut list) => match list.pop_back() {
                Some(value) => {
                    list.push_front(value.clone());
                    Some(value)
                }
                None => None,
            },
            None => None,
        };
        Ok(rotated)
    }

    async fn remove(&self, key: &str, value: &str) -> StoreResult<bool> {
        let removed = match self.lists.get_mut(key) {
            Some(mut list) => match list.iter().rposition(|v| v == value) {
                Some(index) => {
                    list.remove(index);
                    true
                }
                None => false,
            },
            None => false,
        };
        if removed {
            // Empty lists are absent keys, as on Redis.
            self.lists.remove_if(key, |_, list| list.is_empty());
        }
        Ok(removed)
    }

    async fn len(&self, key: &str) -> StoreResult<usize> {
        Ok(self.lists.get(key).map(|list| list.len()).unwrap_or(0))
    }

    async fn contains(&self, key: &str, value: &str) -> StoreResult<bool> {
        Ok(self
            .lists
            .get(key)
            .map(|list| list.iter().any(|v| v == value))
            .unwrap_or(false))
    }

    async fn add_member(&self, key: &str, member: &str) -> StoreResult<bool> {
        Ok(self
            .sets
            .entry(key.to_string())
            .or_default()
            .insert(member.to_string()))
    }

    async fn remove_member(&self, key: &str, member: &str) -> StoreResult<bool> {
        let removed = match self.sets.get_mut(key) {
            Some(mut set) => set.remove(member),
            None => false,
        };
        if removed {
            self.sets.remove_if(key, |_, set| set.is_empty());
        }
        Ok(removed)
    }
}
