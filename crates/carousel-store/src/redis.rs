//! Redis-backed list store.
//!
//! Lists map onto Redis lists with the newest element at the head, so
//! `RPOPLPUSH key key` serves the oldest element and requeues it in one
//! atomic step. Marker sets map onto Redis sets.

use std::fmt;

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use tracing::info;

use crate::{ListStore, RotatedPair, StoreResult};

/// Redis scripts for atomic operations
mod scripts {
    use redis::Script;

    /// Rotate a membership ring, then rotate the list named by the popped
    /// member, in one atomic step.
    ///
    /// KEYS[1] is the ring, ARGV[1] the prefix of the inner list key.
    /// Returns nil when the ring is empty, {member} when the member's list
    /// is empty, {member, value} otherwise.
    pub fn rotate_pair() -> Script {
        Script::new(
            r#"
            local member = redis.call('RPOPLPUSH', KEYS[1], KEYS[1])
            if not member then
                return nil
            end
            local list = ARGV[1] .. member
            local value = redis.call('RPOPLPUSH', list, list)
            if not value then
                return { member }
            end
            return { member, value }
            "#,
        )
    }
}

/// Shared store backed by Redis.
#[derive(Clone)]
pub struct RedisListStore {
    conn: ConnectionManager,
}

impl fmt::Debug for RedisListStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisListStore")
            .field("connection", &"ConnectionManager")
            .finish()
    }
}

impl RedisListStore {
    /// Connect to Redis and wrap the connection in a reconnecting manager.
    pub async fn connect(redis_url: &str) -> StoreResult<Self> {
        info!("Connecting to Redis list store at {}", redis_url);

        let client = redis::Client::open(redis_url)?;
        let conn = ConnectionManager::new(client).await?;

        Ok(Self { conn })
    }

    /// Wrap an existing connection manager.
    pub fn with_connection(conn: ConnectionManager) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl ListStore for RedisListStore {
    async fn push(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut conn = self.conn.clone();
        conn.lpush::<_, _, ()>(key, value).await?;
        Ok(())
    }

    async fn rotate(&self, key: &str) -> StoreResult<Option<String>> {
        let mut conn = self.conn.clone();
        let value: Option<String> = redis::cmd("RPOPLPUSH")
            .arg(key)
            .arg(key)
            .query_async(&mut conn)
            .await?;
        Ok(value)
    }

    async fn rotate_pair(
        &self,
        ring_key: &str,
        list_prefix: &str,
    ) -> StoreResult<Option<RotatedPair>> {
        let mut conn = self.conn.clone();
        let reply: Option<Vec<String>> = scripts::rotate_pair()
            .key(ring_key)
            .arg(list_prefix)
            .invoke_async(&mut conn)
            .await?;

        Ok(reply.and_then(|parts| {
            let mut parts = parts.into_iter();
            let member = parts.next()?;
            Some(RotatedPair {
                member,
                value: parts.next(),
            })
        }))
    }

    async fn remove(&self, key: &str, value: &str) -> StoreResult<bool> {
        let mut conn = self.conn.clone();
        // Negative count scans from the oldest end.
        let removed: i64 = conn.lrem(key, -1, value).await?;
        Ok(removed > 0)
    }

    async fn len(&self, key: &str) -> StoreResult<usize> {
        let mut conn = self.conn.clone();
        let len: usize = conn.llen(key).await?;
        Ok(len)
    }

    async fn contains(&self, key: &str, value: &str) -> StoreResult<bool> {
        let mut conn = self.conn.clone();
        let index: Option<i64> = redis::cmd("LPOS")
            .arg(key)
            .arg(value)
            .query_async(&mut conn)
            .await?;
        Ok(index.is_some())
    }

    async fn add_member(&self, key: &str, member: &str) -> StoreResult<bool> {
        let mut conn = self.conn.clone();
        let added: i64 = conn.sadd(key, member).await?;
        Ok(added > 0)
    }

    async fn remove_member(&self, key: &str, member: &str) -> StoreResult<bool> {
        let mut conn = self.conn.clone();
        let removed: i64 = conn.srem(key, member).await?;
        Ok(removed > 0)
    }
}

/// Integration tests that require a running Redis.
/// Run with: cargo test -- --ignored
#[cfg(test)]
mod integration_tests {
    use super::*;

    async fn connect() -> RedisListStore {
        let url = std::env::var("REDIS_URL")
            .unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string());
        RedisListStore::connect(&url)
            .await
            .expect("Should connect to Redis")
    }

    async fn clear(store: &RedisListStore, keys: &[&str]) {
        let mut conn = store.conn.clone();
        for key in keys {
            redis::cmd("DEL")
                .arg(key)
                .query_async::<()>(&mut conn)
                .await
                .expect("Should clear test key");
        }
    }

    /// Test rotation order against a real Redis list.
    #[tokio::test]
    #[ignore]
    async fn test_rotate_serves_oldest_first() {
        let store = connect().await;
        clear(&store, &["itest:rotate"]).await;

        store.push("itest:rotate", "a").await.unwrap();
        store.push("itest:rotate", "b").await.unwrap();

        assert_eq!(
            store.rotate("itest:rotate").await.unwrap().as_deref(),
            Some("a")
        );
        assert_eq!(
            store.rotate("itest:rotate").await.unwrap().as_deref(),
            Some("b")
        );
        assert_eq!(
            store.rotate("itest:rotate").await.unwrap().as_deref(),
            Some("a")
        );
        assert_eq!(store.len("itest:rotate").await.unwrap(), 2);
    }

    /// Test the Lua-scripted chained rotation end to end.
    #[tokio::test]
    #[ignore]
    async fn test_rotate_pair_script() {
        let store = connect().await;
        clear(&store, &["itest:ring", "itest:jobs:p1", "itest:jobs:p2"]).await;

        store.push("itest:ring", "p1").await.unwrap();
        store.push("itest:ring", "p2").await.unwrap();
        store.push("itest:jobs:p1", "b1").await.unwrap();

        // p1 is the oldest ring member and has a job.
        let pair = store
            .rotate_pair("itest:ring", "itest:jobs:")
            .await
            .unwrap()
            .expect("ring is non-empty");
        assert_eq!(pair.member, "p1");
        assert_eq!(pair.value.as_deref(), Some("b1"));

        // p2 has no job list; the member still comes back.
        let pair = store
            .rotate_pair("itest:ring", "itest:jobs:")
            .await
            .unwrap()
            .expect("ring is non-empty");
        assert_eq!(pair.member, "p2");
        assert_eq!(pair.value, None);

        clear(&store, &["itest:ring", "itest:jobs:p1"]).await;
        assert_eq!(
            store.rotate_pair("itest:ring", "itest:jobs:").await.unwrap(),
            None
        );
    }

    /// Test LREM-backed removal and the marker-set commands.
    #[tokio::test]
    #[ignore]
    async fn test_remove_and_markers() {
        let store = connect().await;
        clear(&store, &["itest:remove", "itest:markers"]).await;

        store.push("itest:remove", "x").await.unwrap();
        store.push("itest:remove", "y").await.unwrap();

        assert!(store.contains("itest:remove", "x").await.unwrap());
        assert!(store.remove("itest:remove", "x").await.unwrap());
        assert!(!store.remove("itest:remove", "x").await.unwrap());
        assert!(!store.contains("itest:remove", "x").await.unwrap());
        assert_eq!(store.len("itest:remove").await.unwrap(), 1);

        assert!(store.add_member("itest:markers", "m").await.unwrap());
        assert!(!store.add_member("itest:markers", "m").await.unwrap());
        assert!(store.remove_member("itest:markers", "m").await.unwrap());
        assert!(!store.remove_member("itest:markers", "m").await.unwrap());

        clear(&store, &["itest:remove", "itest:markers"]).await;
    }
}
