//! Core abstractions for the ajax request/cache layer.
//!
//! This crate provides the fundamental types shared by the other crates:
//! - `Endpoint` - Per-request endpoint descriptor with caching hints
//! - `Method` - HTTP method
//! - `CacheConfig` - Process-wide cache configuration
//! - `Clock` - Time source used for expiry decisions

mod clock;
mod config;
mod endpoint;
mod method;

pub use clock::*;
pub use config::*;
pub use endpoint::*;
pub use method::*;
