//! Pending-build projection.

use serde::{Deserialize, Serialize};

use crate::{BuildId, ProjectId};

/// Minimal projection of a build awaiting dispatch.
///
/// The authoritative build record lives in the relational store owned by the
/// surrounding application; the queue only moves identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingBuild {
    /// The build to dispatch.
    pub build_id: BuildId,
    /// Project that owns the build; decides which job list it joins.
    pub project_id: ProjectId,
}

impl PendingBuild {
    pub fn new(build_id: BuildId, project_id: ProjectId) -> Self {
        Self {
            build_id,
            project_id,
        }
    }
}
