//! Per-client sliding-window quota.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::domain::entities::{Admission, QuotaSnapshot};
use crate::domain::repositories::{KeyTtl, KeyValueStore, StoreError, StoreResult};

/// Quota counter keyed by client identity.
///
/// Each client gets `quota` requests per `window`. The window opens at the
/// client's first request (the counter is created with the window as its
/// TTL) and closes when the store expires the counter. Admission only reads;
/// the counter is decremented by [`RateLimiter::consume`] once the guarded
/// operation has succeeded, so rejected requests are never charged.
pub struct RateLimiter {
    store: Arc<dyn KeyValueStore>,
    quota: i64,
    window: Duration,
}

fn parse_remaining(key: &str, raw: &str) -> StoreResult<i64> {
    raw.trim()
        .parse()
        .map_err(|_| StoreError::InvalidData(format!("quota counter '{key}' is not an integer")))
}

impl RateLimiter {
    pub fn new(store: Arc<dyn KeyValueStore>, quota: i64, window: Duration) -> Self {
        Self {
            store,
            quota,
            window,
        }
    }

    pub fn quota(&self) -> i64 {
        self.quota
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Decides whether `client_key` may perform a metered operation.
    ///
    /// First sight initializes the counter to the full quota with
    /// set-if-absent, so concurrent first requests share one window.
    ///
    /// # Errors
    ///
    /// Propagates store failures; an unparsable counter is
    /// [`StoreError::InvalidData`].
    pub async fn admit(&self, client_key: &str) -> StoreResult<Admission> {
        let initial = self.quota.to_string();

        if self
            .store
            .set_nx_ex(client_key, &initial, self.window)
            .await?
        {
            debug!(client = %client_key, quota = self.quota, "Opened quota window");
            return Ok(self.admission(self.quota, self.window));
        }

        let remaining = match self.store.get(client_key).await? {
            Some(raw) => parse_remaining(client_key, &raw)?,
            None => {
                // Window closed between the two calls.
                self.store
                    .set_nx_ex(client_key, &initial, self.window)
                    .await?;
                self.quota
            }
        };

        let reset_after = match self.store.ttl(client_key).await? {
            KeyTtl::Expires(left) => left,
            KeyTtl::Persistent => {
                // A counter without a TTL would never close.
                self.store.expire(client_key, self.window).await?;
                warn!(client = %client_key, "Quota counter had no expiry, window restarted");
                self.window
            }
            KeyTtl::Missing => self.window,
        };

        let admission = self.admission(remaining, reset_after);
        if !admission.allowed {
            info!(
                client = %client_key,
                reset_after_secs = reset_after.as_secs(),
                "Quota exhausted"
            );
        }
        Ok(admission)
    }

    /// Charges one request to `client_key` and returns the new quota state.
    ///
    /// Only a failed `DECR` is an error, so an `Err` means nothing was
    /// charged. Failures while reading or re-arming the window afterwards are
    /// logged and the configured window is reported instead.
    pub async fn consume(&self, client_key: &str) -> StoreResult<QuotaSnapshot> {
        let charged = self.store.decr(client_key).await?;

        match self.settle(client_key, charged).await {
            Ok(snapshot) => Ok(snapshot),
            Err(e) => {
                warn!(client = %client_key, error = %e, "Charged quota but could not read its window");
                Ok(QuotaSnapshot {
                    remaining: charged.max(0),
                    reset_after: self.window,
                })
            }
        }
    }

    /// Reads the window a charge landed in, re-arming it if it had closed.
    async fn settle(&self, client_key: &str, charged: i64) -> StoreResult<QuotaSnapshot> {
        match self.store.ttl(client_key).await? {
            KeyTtl::Expires(reset_after) => Ok(QuotaSnapshot {
                remaining: charged.max(0),
                reset_after,
            }),
            KeyTtl::Persistent => {
                // DECR recreated a counter whose window closed after admission,
                // so it holds minus the charges made since. A charge landing
                // between that DECR and this SET is overwritten.
                let remaining = (self.quota + charged).max(0);
                self.store
                    .set_ex(client_key, &remaining.to_string(), self.window)
                    .await?;
                debug!(client = %client_key, "Re-armed expired quota window");
                Ok(QuotaSnapshot {
                    remaining,
                    reset_after: self.window,
                })
            }
            KeyTtl::Missing => {
                // Expired between DECR and TTL. Open a window holding this
                // charge unless a concurrent request already opened one.
                let remaining = (self.quota - 1).max(0);
                if self
                    .store
                    .set_nx_ex(client_key, &remaining.to_string(), self.window)
                    .await?
                {
                    debug!(client = %client_key, "Re-armed expired quota window");
                    return Ok(QuotaSnapshot {
                        remaining,
                        reset_after: self.window,
                    });
                }

                let remaining = self.store.decr(client_key).await?;
                let reset_after = self
                    .store
                    .ttl(client_key)
                    .await?
                    .remaining()
                    .unwrap_or(self.window);
                Ok(QuotaSnapshot {
                    remaining: remaining.max(0),
                    reset_after,
                })
            }
        }
    }

    /// Reads the quota state of `client_key` without touching it.
    ///
    /// Returns `None` if the client has no open window.
    pub async fn snapshot(&self, client_key: &str) -> StoreResult<Option<QuotaSnapshot>> {
        let Some(raw) = self.store.get(client_key).await? else {
            return Ok(None);
        };

        let remaining = parse_remaining(client_key, &raw)?;
        let reset_after = self
            .store
            .ttl(client_key)
            .await?
            .remaining()
            .unwrap_or(Duration::ZERO);

        Ok(Some(QuotaSnapshot {
            remaining: remaining.max(0),
            reset_after,
        }))
    }

    /// Closes the window of `client_key`; its next request starts a new one.
    pub async fn reset(&self, client_key: &str) -> StoreResult<bool> {
        self.store.delete(client_key).await
    }

    fn admission(&self, remaining: i64, reset_after: Duration) -> Admission {
        Admission {
            allowed: remaining > 0,
            remaining: remaining.max(0),
            reset_after,
        }
    }
}
