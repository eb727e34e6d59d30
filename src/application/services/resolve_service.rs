//! Short code resolution.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::domain::repositories::{KeyValueStore, StoreError};
use crate::error::AppError;
use crate::utils::code_generator::{HIT_COUNTER_KEY, is_reserved_code};

/// Service for resolving short codes to their targets.
///
/// Resolution is unmetered. Every successful lookup bumps a single global
/// hit counter kept in the links namespace.
pub struct ResolveService {
    links: Arc<dyn KeyValueStore>,
}

impl ResolveService {
    pub fn new(links: Arc<dyn KeyValueStore>) -> Self {
        Self { links }
    }

    /// Returns the target URL of `code`.
    ///
    /// The hit counter update is best-effort: a failure is logged and the
    /// target is still returned.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] if no live record exists (expired and reserved
    ///   codes included); the counter is not touched
    /// - [`AppError::StoreUnavailable`] if the lookup itself fails
    pub async fn resolve(&self, code: &str) -> Result<String, AppError> {
        if is_reserved_code(code) {
            return Err(AppError::not_found(code));
        }

        let target = self
            .links
            .get(code)
            .await?
            .ok_or_else(|| AppError::not_found(code))?;

        match self.links.incr(HIT_COUNTER_KEY).await {
            Ok(hits) => debug!(code = %code, hits, "Resolved short link"),
            Err(e) => warn!(code = %code, error = %e, "Failed to update hit counter"),
        }

        Ok(target)
    }

    /// Total successful resolutions recorded so far.
    pub async fn hit_count(&self) -> Result<i64, AppError> {
        match self.links.get(HIT_COUNTER_KEY).await? {
            Some(raw) => Ok(raw.parse().map_err(|_| {
                StoreError::InvalidData(format!("'{HIT_COUNTER_KEY}' is not an integer"))
            })?),
            None => Ok(0),
        }
    }
}
