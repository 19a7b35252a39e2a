//! Application state for Axum handlers.

use meridian_service::{AccountService, CacheStore};
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub account_service: Arc<dyn AccountService>,
    /// Probed by the readiness check.
    pub cache_store: Arc<dyn CacheStore>,
}

impl AppState {
    pub fn new(account_service: Arc<dyn AccountService>, cache_store: Arc<dyn CacheStore>) -> Self {
        Self {
            account_service,
            cache_store,
        }
    }
}
