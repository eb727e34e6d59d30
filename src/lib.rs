//! # Redis URL Shortener
//!
//! A URL shortening service built with Axum and Redis, with a per-client
//! sliding-window quota on link creation.
//!
//! ## Architecture
//!
//! This crate follows Clean Architecture principles with clear layer separation:
//!
//! - **Domain Layer** ([`domain`]) - Core entities and the key-value store contract
//! - **Application Layer** ([`application`]) - Shortening, resolution and rate limiting
//! - **Infrastructure Layer** ([`infrastructure`]) - Redis and in-memory stores
//! - **API Layer** ([`api`]) - REST API handlers, DTOs, and middleware
//!
//! ## Features
//!
//! - Generated (6 characters) or custom short codes with per-link expiry
//! - Per-client quota in a window opened by the client's first request
//! - Global redirect hit counter
//! - Separate Redis databases for links and quota counters
//! - Request deadlines and structured logging
//!
//! ## Quick Start
//!
//! ```bash
//! export DOMAIN="localhost:3000"
//! export REDIS_URL="redis://localhost:6379"  # Optional, in-memory otherwise
//!
//! cargo run
//!
//! curl -X POST localhost:3000/api/v1/shortener \
//!   -H 'content-type: application/json' \
//!   -d '{"url": "example.com", "customShort": "ex", "expiry": 24}'
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{
        RateLimiter, ResolveService, ShortenOutcome, ShortenService,
    };
    pub use crate::domain::entities::{Admission, QuotaSnapshot, ShortLink};
    pub use crate::domain::repositories::{KeyTtl, KeyValueStore, StoreError};
    pub use crate::error::AppError;
    pub use crate::infrastructure::store::{MemoryStore, RedisStore};
    pub use crate::state::AppState;
}
