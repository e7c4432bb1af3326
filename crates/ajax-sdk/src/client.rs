//! Request facade combining cache, network and abort registry.

use std::sync::Arc;

use ajax_cache::{cache_tables, CacheAside, CacheStatus};
use ajax_core::{CacheConfig, Clock, SystemClock};
use ajax_data::{ActiveRequests, NetworkFetch, RequestConfig, RequestError};
use ajax_store::{MemoryTableStore, TableStore};
use serde_json::Value;
use tracing::debug;

/// Sends requests through the cache, keeping keyed requests abortable.
///
/// Only the network part of a request can be aborted; cache reads and
/// writes always run to completion.
pub struct AjaxClient<F: NetworkFetch, S: TableStore = MemoryTableStore> {
    fetcher: F,
    store: Arc<S>,
    config: CacheConfig,
    clock: Arc<dyn Clock>,
    cache: CacheAside<S>,
    active: ActiveRequests,
}

impl<F: NetworkFetch> AjaxClient<F> {
    /// A client caching into an in-memory store with the default tables.
    pub fn new(fetcher: F) -> Self {
        let config = CacheConfig::default();
        let store = MemoryTableStore::new().with_tables(cache_tables(&config));
        Self::assemble(fetcher, Arc::new(store), config, Arc::new(SystemClock))
    }
}

impl<F: NetworkFetch, S: TableStore> AjaxClient<F, S> {
    fn assemble(fetcher: F, store: Arc<S>, config: CacheConfig, clock: Arc<dyn Clock>) -> Self {
        let cache = CacheAside::from_shared(Arc::clone(&store), config.clone()).with_clock(Arc::clone(&clock));
        Self {
            fetcher,
            store,
            config,
            clock,
            cache,
            active: ActiveRequests::new(),
        }
    }

    /// Cache into `store`. It must already hold the configured cache tables
    /// (see [`cache_tables`]) plus any named tables endpoints refer to;
    /// requests whose tables are missing bypass the cache.
    pub fn with_store<T: TableStore>(self, store: T) -> AjaxClient<F, T> {
        AjaxClient::assemble(self.fetcher, Arc::new(store), self.config, self.clock)
    }

    /// Replace the cache configuration.
    pub fn with_config(self, config: CacheConfig) -> Self {
        Self::assemble(self.fetcher, self.store, config, self.clock)
    }

    /// Replace the time source used for expiry.
    pub fn with_clock(self, clock: Arc<dyn Clock>) -> Self {
        Self::assemble(self.fetcher, self.store, self.config, clock)
    }

    pub fn cache(&self) -> &CacheAside<S> {
        &self.cache
    }

    pub fn active_requests(&self) -> &ActiveRequests {
        &self.active
    }

    /// Send a request, serving it from the cache when possible.
    ///
    /// With a non-empty `request_key` the network call can be cancelled
    /// through [`AjaxClient::abort_request_by_key`], in which case
    /// [`RequestError::Aborted`] is returned.
    pub async fn send_request(&self, config: &RequestConfig, request_key: Option<&str>) -> Result<Value, RequestError> {
        self.send_request_with_status(config, request_key)
            .await
            .map(|(value, _)| value)
    }

    /// Like [`AjaxClient::send_request`], also reporting how the cache was used.
    pub async fn send_request_with_status(
        &self,
        config: &RequestConfig,
        request_key: Option<&str>,
    ) -> Result<(Value, CacheStatus), RequestError> {
        let prepared = config.prepare();

        self.cache
            .get_with_status(config.method, &config.endpoint, || {
                debug!(method = %prepared.method, url = %prepared.url, "sending request");
                self.active.run(request_key, self.fetcher.fetch(&prepared))
            })
            .await
    }

    /// Abort the in-flight request registered under `key`.
    pub fn abort_request_by_key(&self, key: &str) -> bool {
        self.active.abort(key)
    }
}

impl<F: NetworkFetch, S: TableStore> std::fmt::Debug for AjaxClient<F, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AjaxClient")
            .field("cache", &self.cache)
            .field("active", &self.active)
            .finish()
    }
}
