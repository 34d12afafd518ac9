//! Per-project job list view.

use std::sync::Arc;

use carousel_core::{BuildId, ProjectId, RunnerId};
use carousel_store::{ListStore, keys};

use crate::QueueResult;
use crate::error::parse_entry;

/// Ordered list of one project's pending builds on one runner.
///
/// Dequeue rotates this list instead of popping it; entries leave only
/// through explicit removal.
#[derive(Clone)]
pub struct ProjectJobList {
    store: Arc<dyn ListStore>,
    key: String,
}

impl ProjectJobList {
    pub fn new(store: Arc<dyn ListStore>, runner: RunnerId, project: ProjectId) -> Self {
        let key = keys::project_jobs(runner, project);
        Self { store, key }
    }

    /// Storage key of this list.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Append a build as the newest entry.
    pub async fn push(&self, build: BuildId) -> QueueResult<()> {
        self.store.push(&self.key, &build.to_string()).await?;
        Ok(())
    }

    /// Move the oldest build to the newest position and return it.
    pub async fn rotate(&self) -> QueueResult<Option<BuildId>> {
        match self.store.rotate(&self.key).await? {
            Some(value) => Ok(Some(parse_entry(&self.key, &value)?)),
            None => Ok(None),
        }
    }

    /// Remove a build. Returns whether it was present.
    pub async fn remove(&self, build: BuildId) -> QueueResult<bool> {
        Ok(self.store.remove(&self.key, &build.to_string()).await?)
    }

    /// Number of builds currently queued.
    pub async fn depth(&self) -> QueueResult<usize> {
        Ok(self.store.len(&self.key).await?)
    }

    /// Whether a build is already queued.
    pub async fn contains(&self, build: BuildId) -> QueueResult<bool> {
        Ok(self.store.contains(&self.key, &build.to_string()).await?)
    }
}
