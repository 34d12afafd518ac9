//! Fair dispatch scheduling for the Carousel queue.
//!
//! Decides which pending build a polling runner receives next. Projects are
//! classified into buckets by queue depth; dequeue rotates through bucket
//! membership rings so small projects are not starved behind bulk enqueuers.

pub mod bucket;
pub mod error;
pub mod job_list;
pub mod poll;
pub mod queue;
pub mod ring;

pub use bucket::{BUCKET_COUNT, BUCKET_THRESHOLDS, SelectionPolicy, bucket_for};
pub use error::{QueueError, QueueResult};
pub use job_list::ProjectJobList;
pub use poll::{JobPoller, PollConfig};
pub use queue::{QueueConfig, RunnerQueue};
pub use ring::BucketRing;
