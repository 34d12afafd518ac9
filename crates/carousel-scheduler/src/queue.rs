//! Runner queue: fairness-aware dispatch over the list store.

use std::sync::Arc;

use carousel_core::{BuildId, DispatchResult, PendingBuild, ProjectId, RunnerId};
use carousel_store::{ListStore, keys};
use chrono::Utc;
use tracing::{debug, trace};

use crate::bucket::{self, SelectionPolicy};
use crate::error::parse_entry;
use crate::job_list::ProjectJobList;
use crate::ring::BucketRing;
use crate::{QueueError, QueueResult};

/// Tunables for one runner queue.
#[derive(Debug, Clone)]
pub struct QueueConfig {
    /// How dequeue picks its starting bucket.
    pub selection: SelectionPolicy,
    /// Cap on candidate picks per bucket in one dequeue pass. Bounds store
    /// round trips however large a ring has grown.
    pub max_rotations_per_bucket: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            selection: SelectionPolicy::default(),
            max_rotations_per_bucket: 16,
        }
    }
}

/// Fairness-aware dispatch queue for a single runner.
///
/// Builds wait in per-project job lists; projects are grouped into buckets
/// by how deep their list was at enqueue time. Dequeue rotates through a
/// bucket's membership ring, so a project with one queued build is served
/// within one ring cycle even when a neighbor has queued hundreds.
pub struct RunnerQueue {
    runner: RunnerId,
    store: Arc<dyn ListStore>,
    config: QueueConfig,
}

impl RunnerQueue {
    pub fn new(runner: RunnerId, store: Arc<dyn ListStore>) -> Self {
        Self::with_config(runner, store, QueueConfig::default())
    }

    pub fn with_config(runner: RunnerId, store: Arc<dyn ListStore>, config: QueueConfig) -> Self {
        Self {
            runner,
            store,
            config,
        }
    }

    pub fn runner(&self) -> RunnerId {
        self.runner
    }

    fn jobs(&self, project: ProjectId) -> ProjectJobList {
        ProjectJobList::new(self.store.clone(), self.runner, project)
    }

    fn ring(&self, bucket: usize) -> BucketRing {
        BucketRing::new(self.store.clone(), self.runner, bucket)
    }

    /// Queue a pending build on this runner.
    ///
    /// The project is classified by its queue depth before the push and
    /// registered in that bucket's ring. The push and the registration are
    /// two store calls; a dequeue racing between them sees the previous
    /// state, which the next enqueue repairs.
    pub async fn enqueue(&self, build: PendingBuild) -> QueueResult<()> {
        let jobs = self.jobs(build.project_id);

        if jobs.contains(build.build_id).await? {
            return Err(QueueError::DuplicateBuild {
                build_id: build.build_id,
                project_id: build.project_id,
            });
        }

        let depth = jobs.depth().await?;
        let bucket = bucket::bucket_for(depth);

        jobs.push(build.build_id).await?;
        self.ring(bucket).register(build.project_id).await?;

        debug!(
            runner_id = %self.runner,
            project_id = %build.project_id,
            build_id = %build.build_id,
            depth,
            bucket,
            "Enqueued build"
        );
        Ok(())
    }

    /// Pick the next build for a polling runner.
    ///
    /// Scans buckets starting at the index sampled by the selection policy
    /// and wraps across all of them. In each bucket the ring is rotated at
    /// most `min(ring length, max_rotations_per_bucket)` times; each
    /// rotation also rotates the surfaced project's job list and tries to
    /// claim the build at its head. Neither list shrinks here, so a caller
    /// that crashes after this call loses nothing.
    ///
    /// Returns `Ok(None)` when one full pass produced no claimable build.
    pub async fn dequeue(&self) -> QueueResult<Option<DispatchResult>> {
        let order = self.config.selection.scan_order(&mut rand::rng());
        let prefix = keys::project_jobs_prefix(self.runner);
        let dispatched_key = keys::dispatched(self.runner);

        for bucket in order {
            let ring = self.ring(bucket);
            let attempts = ring
                .len()
                .await?
                .min(self.config.max_rotations_per_bucket);

            for _ in 0..attempts {
                let Some(pair) = self.store.rotate_pair(ring.key(), &prefix).await? else {
                    // Ring drained between the length snapshot and now.
                    break;
                };

                let project: ProjectId = parse_entry(ring.key(), &pair.member)?;
                let Some(value) = pair.value else {
                    trace!(
                        runner_id = %self.runner,
                        project_id = %project,
                        bucket,
                        "Registration without queued builds, skipping"
                    );
                    continue;
                };
                let jobs_key = keys::project_jobs(self.runner, project);
                let build: BuildId = parse_entry(&jobs_key, &value)?;

                // Marked under the same rendering remove and release clear.
                if !self.store.add_member(&dispatched_key, &build.to_string()).await? {
                    trace!(
                        runner_id = %self.runner,
                        build_id = %build,
                        bucket,
                        "Build already dispatched, skipping"
                    );
                    continue;
                }

                debug!(
                    runner_id = %self.runner,
                    project_id = %project,
                    build_id = %build,
                    bucket,
                    "Dispatched build"
                );
                return Ok(Some(DispatchResult {
                    project_id: project,
                    build_id: build,
                    bucket_key: ring.key().to_string(),
                    jobs_key,
                    dispatched_at: Utc::now(),
                }));
            }
        }

        Ok(None)
    }

    /// Acknowledge a dispatched build.
    ///
    /// Deletes the build from its job list, then clears the dispatched
    /// marker and, when the delete left the list empty, retires one
    /// occurrence of the project from the ring it was served from. Safe to
    /// call twice.
    pub async fn remove(&self, dispatch: &DispatchResult) -> QueueResult<()> {
        let build = dispatch.build_id.to_string();
        let project = dispatch.project_id.to_string();

        // The list entry goes before the marker: a build must never be
        // unmarked while a dequeue can still rotate it up.
        let removed = self.store.remove(&dispatch.jobs_key, &build).await?;
        self.store
            .remove_member(&keys::dispatched(self.runner), &build)
            .await?;

        if removed && self.store.len(&dispatch.jobs_key).await? == 0 {
            // Last build gone; retire the registration this dispatch used.
            self.store.remove(&dispatch.bucket_key, &project).await?;
        }

        debug!(
            runner_id = %self.runner,
            project_id = %dispatch.project_id,
            build_id = %dispatch.build_id,
            removed,
            "Removed build"
        );
        Ok(())
    }

    /// Hand a dispatched build back without acknowledging it.
    ///
    /// The build never left its job list; clearing the marker makes it
    /// claimable again. This is the hook for lease-expiry watchdogs and for
    /// runners that rejected the work. Safe to call twice.
    pub async fn release(&self, dispatch: &DispatchResult) -> QueueResult<()> {
        let released = self
            .store
            .remove_member(
                &keys::dispatched(self.runner),
                &dispatch.build_id.to_string(),
            )
            .await?;

        debug!(
            runner_id = %self.runner,
            build_id = %dispatch.build_id,
            released,
            "Released build"
        );
        Ok(())
    }

    /// Queue depth of one project.
    pub async fn depth(&self, project: ProjectId) -> QueueResult<usize> {
        self.jobs(project).depth().await
    }

    /// Ring length per bucket, indexed by bucket.
    pub async fn bucket_depths(&self) -> QueueResult<Vec<usize>> {
        let mut depths = Vec::with_capacity(bucket::BUCKET_COUNT);
        for bucket in 0..bucket::BUCKET_COUNT {
            depths.push(self.ring(bucket).len().await?);
        }
        Ok(depths)
    }
}
