//! Application state for the web layer.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::lookup::ExactLookup;
use crate::pagination::{AnchorResolver, PageFetcher};
use crate::store::ConnectionStore;

/// Shared application state.
///
/// Everything here is read-only; requests share nothing mutable.
pub struct AppState<S> {
    /// Page queries against the store
    pub fetcher: Arc<PageFetcher<S>>,

    /// Identifier lookups against the same store
    pub lookup: Arc<ExactLookup<S>>,

    pub resolver: Arc<AnchorResolver>,

    /// Public base URL, no trailing slash
    pub base_url: Arc<str>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            fetcher: self.fetcher.clone(),
            lookup: self.lookup.clone(),
            resolver: self.resolver.clone(),
            base_url: self.base_url.clone(),
        }
    }
}

impl<S: ConnectionStore> AppState<S> {
    /// Create a new app state around an injected store.
    pub fn new(store: S, config: &ServerConfig) -> Self {
        let store = Arc::new(store);
        Self {
            fetcher: Arc::new(PageFetcher::new(store.clone(), &config.pagination)),
            lookup: Arc::new(ExactLookup::new(store)),
            resolver: Arc::new(AnchorResolver::new(&config.pagination)),
            base_url: Arc::from(config.base_url.as_str()),
        }
    }
}
