//! List-store abstraction.

use async_trait::async_trait;

use crate::StoreResult;

/// Outcome of a chained ring-and-list rotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotatedPair {
    /// Member returned by the ring rotation.
    pub member: String,
    /// Oldest value of that member's list, when the list is non-empty.
    pub value: Option<String>,
}

/// Ordered-list and marker-set primitives the queue is built on.
///
/// Lists keep insertion order: `push` adds the newest element, `rotate`
/// returns the oldest and requeues it as newest. Each method must be atomic
/// on its own; the queue never asks for cross-call transactions.
#[async_trait]
pub trait ListStore: Send + Sync {
    /// Add a value as the newest element of the list at `key`, creating the
    /// list if absent.
    async fn push(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Move the oldest element to the newest position and return it.
    /// `None` when the list is empty or absent.
    async fn rotate(&self, key: &str) -> StoreResult<Option<String>>;

    /// Rotate the ring at `ring_key`, then rotate the list whose key is
    /// `list_prefix` followed by the returned member.
    ///
    /// The default implementation issues two calls; backends that can do
    /// better override it with one atomic step.
    async fn rotate_pair(
        &self,
        ring_key: &str,
        list_prefix: &str,
    ) -> StoreResult<Option<RotatedPair>> {
        let Some(member) = self.rotate(ring_key).await? else {
            return Ok(None);
        };
        let value = self.rotate(&format!("{list_prefix}{member}")).await?;
        Ok(Some(RotatedPair { member, value }))
    }

    /// Remove the oldest occurrence of `value` from the list at `key`.
    /// Returns whether anything was removed.
    async fn remove(&self, key: &str, value: &str) -> StoreResult<bool>;

    /// Current length of the list at `key`; zero when absent.
    async fn len(&self, key: &str) -> StoreResult<usize>;

    /// Whether `value` occurs in the list at `key`.
    async fn contains(&self, key: &str, value: &str) -> StoreResult<bool>;

    /// Add `member` to the set at `key`. Returns false when it was already
    /// present; the single false-to-true transition decides claim races.
    async fn add_member(&self, key: &str, member: &str) -> StoreResult<bool>;

    /// Remove `member` from the set at `key`. Returns whether it was present.
    async fn remove_member(&self, key: &str, member: &str) -> StoreResult<bool>;
}
