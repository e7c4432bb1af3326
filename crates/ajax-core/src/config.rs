//! Cache configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Name of the table holding single-document cache entries.
pub const DEFAULT_CACHE_TABLE: &str = "ajaxDefaultDataTable";

/// Name of the table tracking expiry of named collection tables.
pub const DEFAULT_EXPIRY_TABLE: &str = "listsExpireMapTable";

/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to parse JSON config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Cache configuration.
///
/// Created once at startup and handed to the cache layer; it is never read
/// from ambient global state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Disable caching entirely. Every request goes to the network.
    #[serde(default)]
    pub disabled: bool,

    /// Table used for single-document entries keyed by cache key.
    #[serde(default = "default_cache_table")]
    pub default_table: String,

    /// Table holding one expiry row per named collection table.
    #[serde(default = "default_expiry_table")]
    pub expiry_table: String,
}

fn default_cache_table() -> String {
    DEFAULT_CACHE_TABLE.to_string()
}

fn default_expiry_table() -> String {
    DEFAULT_EXPIRY_TABLE.to_string()
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            disabled: false,
            default_table: default_cache_table(),
            expiry_table: default_expiry_table(),
        }
    }
}

impl CacheConfig {
    /// A configuration with caching switched off.
    pub fn disabled() -> Self {
        Self {
            disabled: true,
            ..Self::default()
        }
    }

    /// Parse a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Parse a JSON document.
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load config from a file. `.json` files are parsed as JSON, anything
    /// else as TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        if path.extension().is_some_and(|ext| ext == "json") {
            Self::from_json_str(&content)
        } else {
            Self::from_toml_str(&content)
        }
    }

    /// Set the default table name.
    pub fn with_default_table(mut self, name: impl Into<String>) -> Self {
        self.default_table = name.into();
        self
    }

    /// Set the expiry-index table name.
    pub fn with_expiry_table(mut self, name: impl Into<String>) -> Self {
        self.expiry_table = name.into();
        self
    }
}
