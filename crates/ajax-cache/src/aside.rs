//! Read-through / write-through caching around a network fetch.

use std::future::Future;
use std::sync::Arc;

use ajax_core::{CacheConfig, Clock, Endpoint, Method, SystemClock};
use ajax_store::{CompanionPut, StoreError, TableStore};
use serde_json::Value;
use tracing::{debug, warn};

use crate::entry::{CacheEntry, CollectionExpiry, CACHE_KEY_FIELD, TABLE_NAME_FIELD};
use crate::error::{CacheError, CacheResult, CacheStatus};
use crate::key::CacheKeyResolver;
use crate::policy::{method_is_cacheable, CacheTier, TierSelector};

/// Cache-aside orchestrator.
///
/// Consults the table store before calling the network and writes fresh
/// responses back. Cache failures never fail a request; network failures are
/// returned to the caller untouched.
///
/// Concurrent misses for the same key are not coalesced: both callers fetch
/// and the last write wins.
pub struct CacheAside<S: TableStore> {
    store: Option<Arc<S>>,
    config: CacheConfig,
    tiers: TierSelector,
    clock: Arc<dyn Clock>,
}

impl<S: TableStore> CacheAside<S> {
    /// Create an orchestrator over `store`.
    pub fn new(store: S, config: CacheConfig) -> Self {
        Self::from_shared(Arc::new(store), config)
    }

    /// Create an orchestrator over a store shared with other components.
    pub fn from_shared(store: Arc<S>, config: CacheConfig) -> Self {
        Self::build(Some(store), config)
    }

    /// An orchestrator with no store configured. Every request bypasses the
    /// cache.
    pub fn without_store(config: CacheConfig) -> Self {
        Self::build(None, config)
    }

    fn build(store: Option<Arc<S>>, config: CacheConfig) -> Self {
        Self {
            store,
            tiers: TierSelector::new(config.default_table.as_str()),
            config,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the time source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn store(&self) -> Option<&Arc<S>> {
        self.store.as_ref()
    }

    /// Whether a request may be served from, and written to, the cache.
    ///
    /// Requires caching to be enabled, a `GET`, a positive TTL, and a store
    /// holding both the target table and the expiry-index table. The store
    /// is only probed once the cheaper checks pass.
    pub async fn is_cacheable(&self, method: Method, endpoint: &Endpoint) -> bool {
        self.eligible_store(method, endpoint).await.is_some()
    }

    async fn eligible_store(&self, method: Method, endpoint: &Endpoint) -> Option<&Arc<S>> {
        if self.config.disabled || !method_is_cacheable(method) || endpoint.ttl_millis().is_none() {
            return None;
        }

        let store = self.store.as_ref()?;
        let table = endpoint.table_or(&self.config.default_table);
        if store.has_table(&self.config.expiry_table).await && store.has_table(table).await {
            Some(store)
        } else {
            None
        }
    }

    /// Satisfy a request from the cache, or from `fetch` on a miss.
    pub async fn get<F, Fut, E>(&self, method: Method, endpoint: &Endpoint, fetch: F) -> Result<Value, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value, E>>,
    {
        let (value, _) = self.get_with_status(method, endpoint, fetch).await?;
        Ok(value)
    }

    /// Like [`CacheAside::get`], also reporting how the request was served.
    pub async fn get_with_status<F, Fut, E>(
        &self,
        method: Method,
        endpoint: &Endpoint,
        fetch: F,
    ) -> Result<(Value, CacheStatus), E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value, E>>,
    {
        let Some(store) = self.eligible_store(method, endpoint).await else {
            debug!(url = %endpoint.url, method = %method, "cache bypass");
            let response = fetch().await?;
            return Ok((response, CacheStatus::Bypass));
        };

        match self.read_from(store, endpoint).await {
            Ok(Some(cached)) => {
                debug!(url = %endpoint.url, "cache hit");
                return Ok((cached, CacheStatus::Hit));
            }
            Ok(None) => debug!(url = %endpoint.url, "cache miss"),
            Err(error) => warn!(
                table = %error.table(),
                error = %error,
                "cache read failed, falling back to network"
            ),
        }

        let response = fetch().await?;

        if let Err(error) = self.write_to(store, endpoint, &response).await {
            warn!(
                table = %error.table(),
                error = %error,
                "failed to cache response, data not cached"
            );
        }

        Ok((response, CacheStatus::Miss))
    }

    /// Fresh cached data for `endpoint`, if any.
    ///
    /// Returns `Ok(None)` when no store is configured.
    pub async fn lookup(&self, endpoint: &Endpoint) -> CacheResult<Option<Value>> {
        match &self.store {
            Some(store) => self.read_from(store, endpoint).await,
            None => Ok(None),
        }
    }

    /// Write `response` to the cache tier of `endpoint`.
    ///
    /// Does nothing when no store is configured or the endpoint has no TTL.
    pub async fn store_response(&self, endpoint: &Endpoint, response: &Value) -> CacheResult<()> {
        match &self.store {
            Some(store) if endpoint.ttl_millis().is_some() => self.write_to(store, endpoint, response).await,
            _ => Ok(()),
        }
    }

    async fn read_from(&self, store: &S, endpoint: &Endpoint) -> CacheResult<Option<Value>> {
        let now = self.clock.now_millis();

        match self.tiers.select(endpoint) {
            CacheTier::Default => {
                let table = self.config.default_table.as_str();
                let key = CacheKeyResolver::resolve(endpoint);
                let read_failure = |source: StoreError| CacheError::ReadFailure {
                    table: table.to_string(),
                    source,
                };

                let rows = store
                    .query_by_field(table, CACHE_KEY_FIELD, &Value::String(key.to_string()))
                    .await
                    .map_err(read_failure)?;
                let Some(row) = rows.into_iter().next() else {
                    return Ok(None);
                };

                let entry: CacheEntry =
                    serde_json::from_value(row).map_err(|e| read_failure(StoreError::from(e)))?;
                if entry.is_expired(now) {
                    return Ok(None);
                }
                Ok(Some(entry.data))
            }
            CacheTier::Named(name) => {
                let expiry_table = self.config.expiry_table.as_str();

                let rows = store
                    .query_by_field(expiry_table, TABLE_NAME_FIELD, &Value::String(name.clone()))
                    .await
                    .map_err(|source| CacheError::ReadFailure {
                        table: expiry_table.to_string(),
                        source,
                    })?;
                let Some(row) = rows.into_iter().next() else {
                    return Ok(None);
                };

                let expiry: CollectionExpiry =
                    serde_json::from_value(row).map_err(|e| CacheError::ReadFailure {
                        table: expiry_table.to_string(),
                        source: StoreError::from(e),
                    })?;
                if expiry.is_expired(now) {
                    return Ok(None);
                }

                let records = store.to_vec(&name).await.map_err(|source| CacheError::ReadFailure {
                    table: name.clone(),
                    source,
                })?;
                Ok(Some(Value::Array(records)))
            }
        }
    }

    async fn write_to(&self, store: &S, endpoint: &Endpoint, response: &Value) -> CacheResult<()> {
        let now = self.clock.now_millis();
        let ttl = endpoint.ttl_millis().unwrap_or_default();

        match self.tiers.select(endpoint) {
            CacheTier::Default => {
                let table = self.config.default_table.as_str();
                let write_failure = |source: StoreError| CacheError::WriteFailure {
                    table: table.to_string(),
                    source,
                };

                let entry = CacheEntry::new(CacheKeyResolver::resolve(endpoint), response.clone(), now, ttl);
                let record = serde_json::to_value(&entry).map_err(|e| write_failure(StoreError::from(e)))?;
                store.put(table, record).await.map_err(write_failure)
            }
            CacheTier::Named(name) => {
                let Value::Array(records) = response else {
                    return Err(CacheError::TransactionFailure {
                        table: name,
                        reason: "response must be an array to be cached into a named table".to_string(),
                        source: None,
                    });
                };

                let expiry = CollectionExpiry::new(name.as_str(), now, ttl);
                let companion = match serde_json::to_value(&expiry) {
                    Ok(record) => CompanionPut::new(self.config.expiry_table.as_str(), record),
                    Err(e) => {
                        return Err(CacheError::TransactionFailure {
                            table: name,
                            reason: "could not encode expiry row".to_string(),
                            source: Some(StoreError::from(e)),
                        })
                    }
                };

                let committed = store.bulk_replace(&name, records.clone(), companion).await;
                committed.map_err(|source| CacheError::TransactionFailure {
                    reason: source.to_string(),
                    table: name,
                    source: Some(source),
                })
            }
        }
    }
}

impl<S: TableStore> std::fmt::Debug for CacheAside<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheAside")
            .field("has_store", &self.store.is_some())
            .field("config", &self.config)
            .field("clock", &self.clock)
            .finish()
    }
}
