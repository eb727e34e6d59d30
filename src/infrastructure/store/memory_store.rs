//! In-process key-value store for development and tests.

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

use crate::domain::repositories::{KeyTtl, KeyValueStore, StoreError, StoreResult};

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|at| at > now)
    }
}

/// Minimum time between two sweeps of expired entries.
const SWEEP_INTERVAL: Duration = Duration::from_secs(5);

/// A [`KeyValueStore`] backed by a map guarded by a `parking_lot::RwLock`.
///
/// Expired keys read as absent immediately and are removed by a sweep that
/// runs on writes, at most once per [`SWEEP_INTERVAL`]. Expiry uses
/// `tokio::time::Instant`, so tests can move time with
/// `tokio::time::advance`.
///
/// State is process-local: it is lost on restart and not shared between
/// replicas, so it only stands in for Redis when none is configured.
#[derive(Debug)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Entry>>,
    last_sweep: Mutex<Instant>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            last_sweep: Mutex::new(Instant::now()),
        }
    }
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        debug!("Using MemoryStore (state is process-local)");
        Self::default()
    }

    /// Drops expired entries if the last sweep is older than [`SWEEP_INTERVAL`].
    fn sweep_expired(&self, entries: &mut HashMap<String, Entry>, now: Instant) {
        {
            let mut last_sweep = self.last_sweep.lock();
            if now.duration_since(*last_sweep) < SWEEP_INTERVAL {
                return;
            }
            *last_sweep = now;
        }

        let before = entries.len();
        entries.retain(|_, e| e.is_live(now));
        let removed = before - entries.len();
        if removed > 0 {
            debug!(removed, "Swept expired keys");
        }
    }

    /// Number of live keys.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries.read().values().filter(|e| e.is_live(now)).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn add(&self, key: &str, delta: i64) -> StoreResult<i64> {
        let now = Instant::now();
        let mut entries = self.entries.write();
        self.sweep_expired(&mut entries, now);

        let entry = entries
            .entry(key.to_string())
            .and_modify(|e| {
                if !e.is_live(now) {
                    e.value = "0".to_string();
                    e.expires_at = None;
                }
            })
            .or_insert_with(|| Entry {
                value: "0".to_string(),
                expires_at: None,
            });

        let current: i64 = entry.value.parse().map_err(|_| {
            StoreError::InvalidData(format!("value at '{key}' is not an integer"))
        })?;
        let next = current
            .checked_add(delta)
            .ok_or_else(|| StoreError::InvalidData(format!("value at '{key}' would overflow")))?;

        entry.value = next.to_string();
        Ok(next)
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let now = Instant::now();
        Ok(self
            .entries
            .read()
            .get(key)
            .filter(|e| e.is_live(now))
            .map(|e| e.value.clone()))
    }

    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> StoreResult<()> {
        let now = Instant::now();
        let mut entries = self.entries.write();
        self.sweep_expired(&mut entries, now);

        entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: Some(now + ttl),
            },
        );
        Ok(())
    }

    async fn set_nx_ex(&self, key: &str, value: &str, ttl: Duration) -> StoreResult<bool> {
        let now = Instant::now();
        let mut entries = self.entries.write();
        self.sweep_expired(&mut entries, now);

        if entries.get(key).is_some_and(|e| e.is_live(now)) {
            return Ok(false);
        }

        entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: Some(now + ttl),
            },
        );
        Ok(true)
    }

    async fn incr(&self, key: &str) -> StoreResult<i64> {
        self.add(key, 1)
    }

    async fn decr(&self, key: &str) -> StoreResult<i64> {
        self.add(key, -1)
    }

    async fn ttl(&self, key: &str) -> StoreResult<KeyTtl> {
        let now = Instant::now();
        let ttl = match self.entries.read().get(key) {
            Some(e) if e.is_live(now) => match e.expires_at {
                Some(at) => KeyTtl::Expires(at - now),
                None => KeyTtl::Persistent,
            },
            _ => KeyTtl::Missing,
        };
        Ok(ttl)
    }

    async fn expire(&self, key: &str, ttl: Duration) -> StoreResult<bool> {
        let now = Instant::now();
        match self.entries.write().get_mut(key) {
            Some(e) if e.is_live(now) => {
                e.expires_at = Some(now + ttl);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete(&self, key: &str) -> StoreResult<bool> {
        let now = Instant::now();
        Ok(self
            .entries
            .write()
            .remove(key)
            .is_some_and(|e| e.is_live(now)))
    }

    async fn ping(&self) -> bool {
        true
    }
}
