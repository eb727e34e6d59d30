//! Business logic services for the application layer.

pub mod rate_limiter;
pub mod resolve_service;
pub mod shorten_service;

pub use rate_limiter::RateLimiter;
pub use resolve_service::ResolveService;
pub use shorten_service::{ShortenOutcome, ShortenService};
