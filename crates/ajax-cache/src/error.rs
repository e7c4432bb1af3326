//! Cache errors and lookup status.

use ajax_store::StoreError;
use serde::{Deserialize, Serialize};

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Cache operation errors.
///
/// None of these reach callers of [`crate::CacheAside::get`]: read failures
/// degrade to a miss, write failures still return the fetched response.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// Reading a cache table failed.
    #[error("failed to read cache table {table}: {source}")]
    ReadFailure {
        table: String,
        #[source]
        source: StoreError,
    },

    /// Writing a default-tier entry failed.
    #[error("failed to write cache table {table}: {source}")]
    WriteFailure {
        table: String,
        #[source]
        source: StoreError,
    },

    /// Replacing a named collection could not commit.
    #[error("failed to replace cached collection {table}: {reason}")]
    TransactionFailure {
        table: String,
        reason: String,
        #[source]
        source: Option<StoreError>,
    },
}

impl CacheError {
    /// Table the failure relates to.
    pub fn table(&self) -> &str {
        match self {
            Self::ReadFailure { table, .. }
            | Self::WriteFailure { table, .. }
            | Self::TransactionFailure { table, .. } => table,
        }
    }
}

/// How a request was satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheStatus {
    /// Served from a fresh cache entry; no network call.
    Hit,
    /// Fetched from the network and written back.
    Miss,
    /// Not eligible for caching.
    Bypass,
}

impl std::fmt::Display for CacheStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hit => write!(f, "HIT"),
            Self::Miss => write!(f, "MISS"),
            Self::Bypass => write!(f, "BYPASS"),
        }
    }
}
