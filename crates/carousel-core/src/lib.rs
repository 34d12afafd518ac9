//! Core domain types for the Carousel dispatch queue.
//!
//! This crate contains:
//! - Typed identifiers for runners, projects, and builds
//! - The pending-build projection consumed by the queue
//! - The dispatch result handed back to polling runners

pub mod build;
pub mod dispatch;
pub mod id;

pub use build::PendingBuild;
pub use dispatch::DispatchResult;
pub use id::{BuildId, ProjectId, RunnerId};
