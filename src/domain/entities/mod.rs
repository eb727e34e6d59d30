//! Core domain entities.
//!
//! - [`ShortLink`] - A short code mapped to a target URL with a TTL
//! - [`Admission`] / [`QuotaSnapshot`] - Rate-limit decisions and counter state
//!
//! Entities are plain data; the authoritative copy always lives in the store.

pub mod quota;
pub mod short_link;

pub use quota::{Admission, QuotaSnapshot};
pub use short_link::ShortLink;
