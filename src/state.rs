//! Shared application state injected into handlers.

use std::sync::Arc;
use std::time::Duration;

use crate::application::services::{RateLimiter, ResolveService, ShortenService};
use crate::config::Config;
use crate::domain::repositories::KeyValueStore;

/// Handler state. Cloned per request; everything behind it is shared.
#[derive(Clone)]
pub struct AppState {
    pub shorten_service: Arc<ShortenService>,
    pub resolve_service: Arc<ResolveService>,
    pub links_store: Arc<dyn KeyValueStore>,
    pub quota_store: Arc<dyn KeyValueStore>,
    pub behind_proxy: bool,
    pub request_timeout: Duration,
}

impl AppState {
    /// Wires services over the two store namespaces.
    pub fn new(
        config: &Config,
        links_store: Arc<dyn KeyValueStore>,
        quota_store: Arc<dyn KeyValueStore>,
    ) -> Self {
        let rate_limiter = Arc::new(RateLimiter::new(
            quota_store.clone(),
            config.api_quota,
            config.quota_window(),
        ));

        let shorten_service = Arc::new(ShortenService::new(
            links_store.clone(),
            rate_limiter,
            config.domain.clone(),
            config.default_expiry_hours,
        ));

        let resolve_service = Arc::new(ResolveService::new(links_store.clone()));

        Self {
            shorten_service,
            resolve_service,
            links_store,
            quota_store,
            behind_proxy: config.behind_proxy,
            request_timeout: config.request_timeout(),
        }
    }
}
