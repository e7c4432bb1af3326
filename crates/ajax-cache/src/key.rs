//! Cache key resolution.

use ajax_core::Endpoint;
use serde::{Deserialize, Serialize};

/// A cache key uniquely identifying a default-tier entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheKey(String);

impl CacheKey {
    /// Create a cache key from a string.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Get the key string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Derives the cache identity of an endpoint.
///
/// Query parameters are not part of the key. Callers that cache
/// parameterized requests must fold the parameters into
/// `cache_key_override` themselves.
#[derive(Debug, Clone, Copy, Default)]
pub struct CacheKeyResolver;

impl CacheKeyResolver {
    /// The non-empty override when present, otherwise the URL.
    pub fn resolve(endpoint: &Endpoint) -> CacheKey {
        match endpoint.cache_key_override.as_deref() {
            Some(key) if !key.is_empty() => CacheKey::new(key),
            _ => CacheKey::new(endpoint.url.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_uses_url_by_default() {
        let endpoint = Endpoint::new("/api/partners?page=2");
        assert_eq!(CacheKeyResolver::resolve(&endpoint).as_str(), "/api/partners?page=2");
    }

    #[test]
    fn test_resolve_prefers_override() {
        let endpoint = Endpoint::new("/api/partners").with_cache_key("partners-short");
        assert_eq!(CacheKeyResolver::resolve(&endpoint).as_str(), "partners-short");
    }

    #[test]
    fn test_resolve_ignores_empty_override() {
        let endpoint = Endpoint::new("/api/partners").with_cache_key("");
        assert_eq!(CacheKeyResolver::resolve(&endpoint).as_str(), "/api/partners");
    }

    #[test]
    fn test_cache_key_serializes_as_string() {
        let json = serde_json::to_string(&CacheKey::new("k")).unwrap();
        assert_eq!(json, r#""k""#);
    }
}
