//! Cache-aside orchestration for outbound requests.
//!
//! This crate provides:
//! - `CacheKeyResolver` - Stable identity of a cacheable request
//! - `TierSelector` - Default (keyed) vs named (collection) storage tier
//! - `CacheEntry` / `CollectionExpiry` - Rows persisted in the table store
//! - `CacheAside` - Read-through / write-through caching around a network fetch
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use ajax_cache::{cache_tables, CacheAside};
//! use ajax_core::{CacheConfig, Endpoint, Method};
//! use ajax_store::MemoryTableStore;
//!
//! let config = CacheConfig::default();
//! let store = MemoryTableStore::new().with_tables(cache_tables(&config));
//! let cache = CacheAside::new(store, config);
//!
//! let endpoint = Endpoint::new("/api/sections").with_ttl(Duration::from_secs(3600));
//! let sections = cache
//!     .get(Method::Get, &endpoint, || fetcher.fetch_json(&endpoint))
//!     .await?;
//! ```

mod aside;
mod entry;
mod error;
mod key;
mod policy;

pub use aside::*;
pub use entry::*;
pub use error::*;
pub use key::*;
pub use policy::*;
