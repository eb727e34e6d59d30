//! Infrastructure layer for external integrations.
//!
//! Implements the [`KeyValueStore`](crate::domain::repositories::KeyValueStore)
//! contract defined by the domain layer.
//!
//! # Modules
//!
//! - [`store`] - Redis and in-memory store implementations

pub mod store;
