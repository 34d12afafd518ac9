//! Dispatch result value object.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{BuildId, ProjectId};

/// Immutable record of a single dispatch.
///
/// Carries the storage keys the build was served from so the caller can
/// acknowledge or release it later without recomputing bucket placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchResult {
    /// Project the build belongs to.
    pub project_id: ProjectId,
    /// The dispatched build.
    pub build_id: BuildId,
    /// Membership ring the project was picked from.
    pub bucket_key: String,
    /// Job list the build was served from.
    pub jobs_key: String,
    /// When the dispatch happened.
    pub dispatched_at: DateTime<Utc>,
}
