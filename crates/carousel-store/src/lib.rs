//! Storage layer for the Carousel dispatch queue.
//!
//! Provides the list-store abstraction the scheduler runs on, plus the Redis
//! implementation used in production and an in-memory implementation for
//! tests and single-node embeddings.

pub mod error;
pub mod keys;
pub mod list;
pub mod memory;
pub mod redis;

pub use error::{StoreError, StoreResult};
pub use list::{ListStore, RotatedPair};
pub use memory::MemoryListStore;
pub use redis::RedisListStore;
