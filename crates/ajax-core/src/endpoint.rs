//! Endpoint descriptors.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Describes the endpoint a request targets, plus its caching hints.
///
/// Built by the caller for a single request and never mutated afterwards.
/// The legacy field names `exp`, `cacheTableName` and `cachingKey` are
/// accepted when deserializing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    /// Request URL.
    pub url: String,
    /// Time-to-live in milliseconds. Absent, zero or negative disables caching.
    #[serde(default, alias = "exp", skip_serializing_if = "Option::is_none")]
    pub ttl: Option<i64>,
    /// Cache table for the response. `None` selects the default table.
    #[serde(default, alias = "cacheTableName", skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,
    /// Identity used instead of the URL for default-table lookups.
    #[serde(default, alias = "cachingKey", skip_serializing_if = "Option::is_none")]
    pub cache_key_override: Option<String>,
}

impl Endpoint {
    /// Create an endpoint that is not cacheable.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Set the time-to-live.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX));
        self
    }

    /// Set the time-to-live in raw milliseconds.
    pub fn with_ttl_millis(mut self, ttl: i64) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Cache the response into a named collection table.
    pub fn with_table(mut self, table_name: impl Into<String>) -> Self {
        self.table_name = Some(table_name.into());
        self
    }

    /// Override the cache key.
    pub fn with_cache_key(mut self, key: impl Into<String>) -> Self {
        self.cache_key_override = Some(key.into());
        self
    }

    /// The time-to-live in milliseconds, only when it is a positive value.
    pub fn ttl_millis(&self) -> Option<i64> {
        self.ttl.filter(|ttl| *ttl > 0)
    }

    /// Table name, falling back to `default_table`.
    pub fn table_or<'a>(&'a self, default_table: &'a str) -> &'a str {
        self.table_name.as_deref().unwrap_or(default_table)
    }
}
