//! Key-value store contract shared by link records and quota counters.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Errors raised by a key-value store backend.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("store backend unavailable: {0}")]
    Unavailable(String),
    #[error("store operation timed out: {0}")]
    Timeout(String),
    #[error("store operation failed: {0}")]
    Operation(String),
    #[error("store value is invalid: {0}")]
    InvalidData(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Remaining lifetime of a key as reported by `TTL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyTtl {
    /// The key does not exist (or has already expired).
    Missing,
    /// The key exists but carries no expiry.
    Persistent,
    /// The key expires after the given duration.
    Expires(Duration),
}

impl KeyTtl {
    /// Interprets the integer reply of the Redis `TTL` command.
    ///
    /// `-2` means missing, `-1` means no expiry, anything else is seconds left.
    pub fn from_redis_seconds(seconds: i64) -> Self {
        match seconds {
            -2 => Self::Missing,
            s if s < 0 => Self::Persistent,
            s => Self::Expires(Duration::from_secs(s as u64)),
        }
    }

    /// Returns the remaining duration if the key expires.
    pub fn remaining(&self) -> Option<Duration> {
        match self {
            Self::Expires(d) => Some(*d),
            _ => None,
        }
    }
}

/// A single namespace of a key-value store with per-key expiry.
///
/// The service keeps two isolated instances: one for short link records and
/// one for rate-limit counters. All shared mutable state lives behind this
/// trait; callers never cache what they read.
///
/// # Implementations
///
/// - [`crate::infrastructure::store::RedisStore`] - pooled Redis connection bound to one database index
/// - [`crate::infrastructure::store::MemoryStore`] - in-process map for development and tests
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads a value. Expired keys read as `None`.
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Writes a value with an expiry, replacing any existing value.
    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> StoreResult<()>;

    /// Writes a value with an expiry only if the key is absent.
    ///
    /// Returns `true` if the value was written, `false` if a live key already existed.
    async fn set_nx_ex(&self, key: &str, value: &str, ttl: Duration) -> StoreResult<bool>;

    /// Atomically increments an integer value, creating it at 0 first if absent.
    async fn incr(&self, key: &str) -> StoreResult<i64>;

    /// Atomically decrements an integer value, creating it at 0 first if absent.
    async fn decr(&self, key: &str) -> StoreResult<i64>;

    /// Reports the remaining lifetime of a key.
    async fn ttl(&self, key: &str) -> StoreResult<KeyTtl>;

    /// Sets an expiry on an existing key. Returns `false` if the key is missing.
    async fn expire(&self, key: &str, ttl: Duration) -> StoreResult<bool>;

    /// Removes a key. Returns `true` if something was deleted.
    async fn delete(&self, key: &str) -> StoreResult<bool>;

    /// Checks that the backend answers.
    async fn ping(&self) -> bool;
}
