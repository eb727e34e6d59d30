//! Key-value store backends.
//!
//! - [`RedisStore`] - production backend, one pooled connection per database index
//! - [`MemoryStore`] - process-local fallback used when no Redis is configured

pub mod memory_store;
pub mod redis_store;

pub use memory_store::MemoryStore;
pub use redis_store::RedisStore;
