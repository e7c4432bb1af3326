//! Table schema declarations.

use crate::{StoreError, StoreResult};

/// Declared shape of a table: its primary key and secondary indexes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    /// Table name.
    pub name: String,
    /// Primary key field. `None` means rows are appended without a key.
    pub primary_key: Option<String>,
    /// Secondary indexed fields.
    pub indexes: Vec<String>,
}

impl TableSchema {
    /// A table keyed by `primary_key`.
    pub fn keyed(name: impl Into<String>, primary_key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            primary_key: Some(primary_key.into()),
            indexes: Vec::new(),
        }
    }

    /// A table without a primary key.
    pub fn unkeyed(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            primary_key: None,
            indexes: Vec::new(),
        }
    }

    /// Add a secondary index.
    pub fn with_index(mut self, field: impl Into<String>) -> Self {
        self.indexes.push(field.into());
        self
    }

    /// Parse a compact declaration such as `"&cacheKey,expiresAt"`.
    ///
    /// The first entry is the primary key (empty for an unkeyed table). The
    /// `&` (unique) and `++` (auto-increment) markers are accepted and
    /// stripped. Remaining entries are secondary indexes.
    pub fn parse(name: impl Into<String>, declaration: &str) -> StoreResult<Self> {
        let name = name.into();
        let mut entries = declaration.split(',').map(|entry| {
            entry
                .trim()
                .trim_start_matches("++")
                .trim_start_matches('&')
                .trim()
                .to_string()
        });

        let primary_key = entries.next().filter(|key| !key.is_empty());

        let mut indexes = Vec::new();
        for index in entries {
            if index.is_empty() {
                return Err(StoreError::InvalidSchema {
                    table: name,
                    reason: format!("empty index in declaration {declaration:?}"),
                });
            }
            indexes.push(index);
        }

        Ok(Self {
            name,
            primary_key,
            indexes,
        })
    }

    /// Whether `field` may be used with `query_by_field`.
    pub fn is_indexed(&self, field: &str) -> bool {
        self.primary_key.as_deref() == Some(field) || self.indexes.iter().any(|index| index == field)
    }
}
