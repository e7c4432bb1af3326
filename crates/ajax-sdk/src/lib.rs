//! Public SDK for cached requests.
//!
//! This crate re-exports the request stack and adds `AjaxClient`, which ties
//! the cache-aside orchestrator, the network fetcher and the abortable
//! request registry together:
//!
//! ```ignore
//! use ajax_sdk::prelude::*;
//! use std::time::Duration;
//!
//! let client = AjaxClient::new(HttpFetcher::new());
//!
//! let endpoint = Endpoint::new("https://api.example.com/countries")
//!     .with_ttl(Duration::from_secs(3600));
//!
//! match client.send_request(&RequestConfig::new(endpoint), Some("countries")).await {
//!     Ok(countries) => render(countries),
//!     Err(err) => {
//!         let envelope = err.envelope();
//!         show(format_server_error_as_text(&envelope));
//!     }
//! }
//! ```

mod client;

pub use ajax_cache;
pub use ajax_core;
pub use ajax_data;
pub use ajax_errors;
pub use ajax_store;
pub use client::AjaxClient;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::AjaxClient;
    pub use ajax_cache::{cache_tables, CacheAside, CacheStatus};
    pub use ajax_core::*;
    pub use ajax_data::*;
    pub use ajax_errors::prelude::*;
    pub use ajax_store::{MemoryTableStore, TableSchema, TableStore};
}
