//! Short link creation.

use std::sync::Arc;
use tracing::{info, warn};

use crate::application::services::RateLimiter;
use crate::domain::entities::{QuotaSnapshot, ShortLink};
use crate::domain::repositories::KeyValueStore;
use crate::error::AppError;
use crate::utils::code_generator::{generate_code, validate_custom_code};
use crate::utils::url_normalizer::validate_url;

/// Result of a successful shorten call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortenOutcome {
    pub link: ShortLink,
    /// Client quota after this request was charged.
    pub quota: QuotaSnapshot,
}

/// Service for creating short links under a per-client quota.
pub struct ShortenService {
    links: Arc<dyn KeyValueStore>,
    rate_limiter: Arc<RateLimiter>,
    public_domain: String,
    default_ttl_hours: u64,
}

impl ShortenService {
    /// Creates a new shorten service.
    ///
    /// `public_domain` is both the prefix of returned short URLs and the host
    /// that targets may not point at.
    pub fn new(
        links: Arc<dyn KeyValueStore>,
        rate_limiter: Arc<RateLimiter>,
        public_domain: impl Into<String>,
        default_ttl_hours: u64,
    ) -> Self {
        Self {
            links,
            rate_limiter,
            public_domain: public_domain.into(),
            default_ttl_hours,
        }
    }

    /// Creates a short link for `raw_url` on behalf of `client_key`.
    ///
    /// # Sequence
    ///
    /// 1. Admit the client against its quota
    /// 2. Validate and normalize the target (`http://` enforced)
    /// 3. Pick the code: the custom one if non-empty, otherwise a generated one
    /// 4. Store the record with its TTL, only if the code is free
    /// 5. Charge the client's quota
    ///
    /// A `ttl_hours` of `None` or `0` uses the configured default.
    ///
    /// # Errors
    ///
    /// - [`AppError::QuotaExceeded`] if the client has no quota left
    /// - [`AppError::InvalidUrl`] if the target is malformed or self-referential
    /// - [`AppError::Validation`] if the custom code is malformed or reserved
    /// - [`AppError::CodeInUse`] if a live record already owns the code
    /// - [`AppError::StoreUnavailable`] on store failures
    ///
    /// Rejected requests are never charged and write nothing beyond the
    /// idempotent quota window initialization.
    pub async fn shorten(
        &self,
        client_key: &str,
        raw_url: &str,
        custom_code: Option<&str>,
        ttl_hours: Option<u64>,
    ) -> Result<ShortenOutcome, AppError> {
        let admission = self.rate_limiter.admit(client_key).await?;
        if !admission.allowed {
            return Err(AppError::QuotaExceeded {
                reset_after: admission.reset_after,
            });
        }

        let target_url = validate_url(raw_url, &self.public_domain)
            .map_err(|e| AppError::invalid_url(e.to_string()))?;

        let code = match custom_code.filter(|c| !c.is_empty()) {
            Some(custom) => {
                validate_custom_code(custom)?;
                custom.to_string()
            }
            None => generate_code(),
        };

        if self.links.get(&code).await?.is_some() {
            return Err(AppError::CodeInUse { code });
        }

        let ttl_hours = ttl_hours
            .filter(|hours| *hours > 0)
            .unwrap_or(self.default_ttl_hours);
        let link = ShortLink::new(code, target_url, ttl_hours);

        if !self
            .links
            .set_nx_ex(&link.code, &link.target_url, link.ttl())
            .await?
        {
            return Err(AppError::CodeInUse { code: link.code });
        }

        let quota = match self.rate_limiter.consume(client_key).await {
            Ok(quota) => quota,
            Err(e) => {
                // consume only fails when DECR did, so the client was not charged.
                if let Err(cleanup) = self.links.delete(&link.code).await {
                    warn!(code = %link.code, error = %cleanup, "Failed to roll back uncharged link");
                }
                return Err(e.into());
            }
        };

        info!(
            code = %link.code,
            client = %client_key,
            ttl_hours = link.ttl_hours,
            remaining = quota.remaining,
            "Short link created"
        );

        Ok(ShortenOutcome { link, quota })
    }

    /// Public short URL of `code`: `<domain>/<code>`.
    pub fn short_url(&self, code: &str) -> String {
        format!("{}/{}", self.public_domain.trim_end_matches('/'), code)
    }

    pub fn public_domain(&self) -> &str {
        &self.public_domain
    }
}
