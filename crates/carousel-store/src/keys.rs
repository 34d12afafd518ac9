//! Storage key construction.
//!
//! All state for one runner's queue lives under the `runner:{runner_id}:`
//! prefix: one job list per project, one membership ring per bucket, and one
//! marker set for dispatched builds.

use carousel_core::{ProjectId, RunnerId};

/// Key of the job list holding one project's pending builds.
pub fn project_jobs(runner: RunnerId, project: ProjectId) -> String {
    format!("runner:{runner}:project:{project}")
}

/// Prefix that [`project_jobs`] appends the project id to.
///
/// The chained ring-and-list rotation discovers the project id mid-operation
/// and builds the job-list key from this prefix.
pub fn project_jobs_prefix(runner: RunnerId) -> String {
    format!("runner:{runner}:project:")
}

/// Key of the membership ring for one bucket.
pub fn bucket_ring(runner: RunnerId, bucket: usize) -> String {
    format!("runner:{runner}:bucket:{bucket}")
}

/// Key of the dispatched-build marker set.
pub fn dispatched(runner: RunnerId) -> String {
    format!("runner:{runner}:dispatched")
}
