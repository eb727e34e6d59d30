//! Short link record stored in the links namespace.

use std::time::Duration;

const SECONDS_PER_HOUR: u64 = 3600;

/// A short code mapped to its target URL.
///
/// The record lives in the store under `code` and disappears when its TTL
/// elapses; there is no explicit delete path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortLink {
    pub code: String,
    pub target_url: String,
    pub ttl_hours: u64,
}

impl ShortLink {
    /// Creates a new ShortLink instance.
    pub fn new(code: String, target_url: String, ttl_hours: u64) -> Self {
        Self {
            code,
            target_url,
            ttl_hours,
        }
    }

    /// Store expiry for this record.
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_hours.saturating_mul(SECONDS_PER_HOUR))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_link_creation() {
        let link = ShortLink::new("abc123".to_string(), "http://example.com".to_string(), 24);

        assert_eq!(link.code, "abc123");
        assert_eq!(link.target_url, "http://example.com");
        assert_eq!(link.ttl_hours, 24);
    }

    #[test]
    fn test_short_link_ttl_in_seconds() {
        let link = ShortLink::new("x".to_string(), "http://example.com".to_string(), 2);
        assert_eq!(link.ttl(), Duration::from_secs(7200));
    }

    #[test]
    fn test_short_link_ttl_saturates() {
        let link = ShortLink::new("x".to_string(), "http://example.com".to_string(), u64::MAX);
        assert_eq!(link.ttl(), Duration::from_secs(u64::MAX));
    }
}
