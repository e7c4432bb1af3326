//! Rows persisted by the cache.

use ajax_core::CacheConfig;
use ajax_store::TableSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::key::CacheKey;

/// Primary key field of default-table rows.
pub const CACHE_KEY_FIELD: &str = "cacheKey";

/// Primary key field of expiry-index rows.
pub const TABLE_NAME_FIELD: &str = "tableName";

/// Expiry field shared by both row kinds.
pub const EXPIRES_AT_FIELD: &str = "expiresAt";

/// A single cached response in the default table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    /// Unique within the default table.
    pub cache_key: CacheKey,
    /// The cached payload.
    pub data: Value,
    /// Milliseconds since the Unix epoch.
    pub expires_at: i64,
}

impl CacheEntry {
    /// Create an entry expiring `ttl_millis` after `now_millis`.
    pub fn new(cache_key: CacheKey, data: Value, now_millis: i64, ttl_millis: i64) -> Self {
        Self {
            cache_key,
            data,
            expires_at: now_millis.saturating_add(ttl_millis),
        }
    }

    /// An entry is stale once `now >= expires_at`.
    pub fn is_expired(&self, now_millis: i64) -> bool {
        self.expires_at <= now_millis
    }
}

/// Expiry of a named collection table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionExpiry {
    /// Unique within the expiry-index table.
    pub table_name: String,
    /// Milliseconds since the Unix epoch.
    pub expires_at: i64,
}

impl CollectionExpiry {
    pub fn new(table_name: impl Into<String>, now_millis: i64, ttl_millis: i64) -> Self {
        Self {
            table_name: table_name.into(),
            expires_at: now_millis.saturating_add(ttl_millis),
        }
    }

    pub fn is_expired(&self, now_millis: i64) -> bool {
        self.expires_at <= now_millis
    }
}

/// Schemas of the two tables the cache needs in every store.
///
/// Named collection tables are declared by the application, keyed however
/// its records are keyed.
pub fn cache_tables(config: &CacheConfig) -> Vec<TableSchema> {
    vec![
        TableSchema::keyed(config.default_table.as_str(), CACHE_KEY_FIELD).with_index(EXPIRES_AT_FIELD),
        TableSchema::keyed(config.expiry_table.as_str(), TABLE_NAME_FIELD).with_index(EXPIRES_AT_FIELD),
    ]
}
