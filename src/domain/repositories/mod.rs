//! Store trait definitions for the domain layer.
//!
//! Both link records and rate-limit counters live in an external key-value
//! store. The contract is defined here and implemented by
//! `crate::infrastructure::store`.
//!
//! # Testing
//!
//! A [`MockKeyValueStore`] is generated via `mockall` for unit tests; the
//! integration tests in `tests/` run against the in-memory store instead.

pub mod kv_store;

pub use kv_store::{KeyTtl, KeyValueStore, StoreError, StoreResult};

#[cfg(test)]
pub use kv_store::MockKeyValueStore;
