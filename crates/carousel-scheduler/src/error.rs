//! Queue error types.

use carousel_core::{BuildId, ProjectId};
use carousel_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum QueueError {
    /// The shared store rejected or lost the operation. Transient; callers
    /// retry with backoff.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(#[from] StoreError),

    /// The build is already queued for its project.
    #[error("build {build_id} is already queued for project {project_id}")]
    DuplicateBuild {
        build_id: BuildId,
        project_id: ProjectId,
    },

    /// A stored entry does not parse as the id type its key implies, so
    /// something else wrote into the queue keyspace.
    #[error("corrupt entry in {key}: {value:?}")]
    CorruptEntry { key: String, value: String },
}

pub type QueueResult<T> = std::result::Result<T, QueueError>;

/// Parse a stored id string, blaming the key it came from.
///
/// The parsed id must render back to the stored string exactly; an entry
/// that merely parses was written by something else, and every key and
/// marker derived from it would miss the stored rendering.
pub(crate) fn parse_entry<T>(key: &str, value: &str) -> QueueResult<T>
where
    T: std::str::FromStr + std::fmt::Display,
{
    let corrupt = || QueueError::CorruptEntry {
        key: key.to_string(),
        value: value.to_string(),
    };
    let parsed = value.parse::<T>().map_err(|_| corrupt())?;
    if parsed.to_string() != value {
        return Err(corrupt());
    }
    Ok(parsed)
}
