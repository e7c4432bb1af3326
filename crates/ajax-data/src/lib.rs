//! Network layer for cached requests.
//!
//! This crate provides:
//! - `RequestConfig` - what to send, prepared into a `PreparedRequest`
//! - `NetworkFetch` - the capability that performs a request
//! - `HttpFetcher` - `NetworkFetch` over `reqwest`
//! - `ActiveRequests` - in-flight requests that can be aborted by key
//! - `RequestError` - failures, convertible to an `ErrorEnvelope`

mod active;
mod error;
mod fetch;
mod request;

pub use active::*;
pub use error::*;
pub use fetch::*;
pub use request::*;
