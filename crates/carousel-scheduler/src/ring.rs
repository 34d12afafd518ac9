//! Bucket membership ring view.

use std::sync::Arc;

use carousel_core::{ProjectId, RunnerId};
use carousel_store::{ListStore, keys};

use crate::QueueResult;
use crate::error::parse_entry;

/// Circular list of the projects registered in one bucket on one runner.
///
/// Rotation round-robins across projects without dropping any of them. A
/// project appears once per enqueue that classified it here; extra
/// occurrences age out through drain removal.
#[derive(Clone)]
pub struct BucketRing {
    store: Arc<dyn ListStore>,
    key: String,
}

impl BucketRing {
    pub fn new(store: Arc<dyn ListStore>, runner: RunnerId, bucket: usize) -> Self {
        let key = keys::bucket_ring(runner, bucket);
        Self { store, key }
    }

    /// Storage key of this ring.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Record a project as a member of this bucket.
    pub async fn register(&self, project: ProjectId) -> QueueResult<()> {
        self.store.push(&self.key, &project.to_string()).await?;
        Ok(())
    }

    /// Move the longest-waiting project to the newest position and return it.
    pub async fn rotate(&self) -> QueueResult<Option<ProjectId>> {
        match self.store.rotate(&self.key).await? {
            Some(value) => Ok(Some(parse_entry(&self.key, &value)?)),
            None => Ok(None),
        }
    }

    /// Remove one occurrence of a project. Returns whether it was present.
    pub async fn remove(&self, project: ProjectId) -> QueueResult<bool> {
        Ok(self.store.remove(&self.key, &project.to_string()).await?)
    }

    /// Number of registrations currently in the ring.
    pub async fn len(&self) -> QueueResult<usize> {
        Ok(self.store.len(&self.key).await?)
    }
}
