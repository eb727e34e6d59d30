//! Application layer services implementing business logic.
//!
//! Services coordinate store calls, validation and the quota. They consume
//! the [`KeyValueStore`](crate::domain::repositories::KeyValueStore) trait
//! and provide a clean API for HTTP handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::shorten_service::ShortenService`] - Metered short link creation
//! - [`services::resolve_service::ResolveService`] - Code lookup and hit counting
//! - [`services::rate_limiter::RateLimiter`] - Per-client sliding-window quota

pub mod services;
