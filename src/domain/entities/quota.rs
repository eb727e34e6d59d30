//! Rate-limit admission results.

use std::time::Duration;

/// Outcome of an admission check for one client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Admission {
    pub allowed: bool,
    /// Quota left in the current window, never negative.
    pub remaining: i64,
    /// Time until the client's window resets.
    pub reset_after: Duration,
}

/// Quota state of a client after a charged request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaSnapshot {
    pub remaining: i64,
    pub reset_after: Duration,
}
