//! Tier selection and cacheability rules.

use ajax_core::{Endpoint, Method};

/// Storage strategy for a cacheable response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheTier {
    /// One row per cache key in the default table, upserted.
    Default,
    /// Whole collection stored in the named table, replaced wholesale and
    /// tracked by a row in the expiry-index table.
    Named(String),
}

/// Chooses the storage tier of a request.
///
/// This is the only place tier selection is decided; both the read and the
/// write path go through [`TierSelector::select`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierSelector {
    default_table: String,
}

impl TierSelector {
    pub fn new(default_table: impl Into<String>) -> Self {
        Self {
            default_table: default_table.into(),
        }
    }

    /// True when `table_name` is the default table.
    pub fn is_default_tier(&self, table_name: &str) -> bool {
        table_name == self.default_table
    }

    /// Tier of `endpoint`.
    pub fn select(&self, endpoint: &Endpoint) -> CacheTier {
        let table = endpoint.table_or(&self.default_table);
        if self.is_default_tier(table) {
            CacheTier::Default
        } else {
            CacheTier::Named(table.to_string())
        }
    }
}

/// Only `GET` responses are ever cached.
pub fn method_is_cacheable(method: Method) -> bool {
    method == Method::Get
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_default_tier() {
        let selector = TierSelector::new("ajaxDefaultDataTable");
        assert!(selector.is_default_tier("ajaxDefaultDataTable"));
        assert!(!selector.is_default_tier("countries"));
    }

    #[test]
    fn test_select_default_when_table_absent() {
        let selector = TierSelector::new("defaults");
        assert_eq!(selector.select(&Endpoint::new("/a")), CacheTier::Default);
    }

    #[test]
    fn test_select_default_when_table_names_default() {
        let selector = TierSelector::new("defaults");
        let endpoint = Endpoint::new("/a").with_table("defaults");
        assert_eq!(selector.select(&endpoint), CacheTier::Default);
    }

    #[test]
    fn test_select_named() {
        let selector = TierSelector::new("defaults");
        let endpoint = Endpoint::new("/a").with_table("countries");
        assert_eq!(selector.select(&endpoint), CacheTier::Named("countries".to_string()));
    }

    #[test]
    fn test_method_is_cacheable() {
        assert!(method_is_cacheable(Method::Get));
        assert!(!method_is_cacheable(Method::Head));
        assert!(!method_is_cacheable(Method::Post));
    }
}
