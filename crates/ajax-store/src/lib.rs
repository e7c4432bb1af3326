//! Table-oriented store capability for the ajax cache layer.
//!
//! The cache layer never talks to a concrete database. It consumes the
//! [`TableStore`] trait, which models a persistent, table-oriented key/value
//! store with upserts, indexed lookups and an atomic collection replace.
//!
//! # Example
//!
//! ```rust,ignore
//! use ajax_store::{MemoryTableStore, TableSchema, TableStore};
//! use serde_json::json;
//!
//! let store = MemoryTableStore::new()
//!     .with_table(TableSchema::parse("countries", "id,name")?);
//!
//! store.put("countries", json!({"id": 1, "name": "Kenya"})).await?;
//! let rows = store.query_by_field("countries", "id", &json!(1)).await?;
//! ```

mod error;
mod memory;
mod schema;

use async_trait::async_trait;
use serde_json::Value;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryTableStore;
pub use schema::TableSchema;

/// A stored row. Rows are schemaless JSON objects.
pub type Record = Value;

/// A `put` that must commit in the same transaction as a `bulk_replace`.
#[derive(Debug, Clone, PartialEq)]
pub struct CompanionPut {
    /// Table receiving the record.
    pub table: String,
    /// Record upserted by the table's primary key.
    pub record: Record,
}

impl CompanionPut {
    pub fn new(table: impl Into<String>, record: Record) -> Self {
        Self {
            table: table.into(),
            record,
        }
    }
}

/// Persistent, table-oriented store.
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Readiness probe: does the store contain `table`?
    async fn has_table(&self, table: &str) -> bool;

    /// Upsert a record by the table's primary key.
    async fn put(&self, table: &str, record: Record) -> StoreResult<()>;

    /// All records whose `field` equals `value`, in stored order.
    ///
    /// `field` must be the primary key or a declared index.
    async fn query_by_field(&self, table: &str, field: &str, value: &Value) -> StoreResult<Vec<Record>>;

    /// Entire contents of `table`, in stored order.
    async fn to_vec(&self, table: &str) -> StoreResult<Vec<Record>>;

    /// Clear `table`, insert `records`, and apply `companion`, atomically.
    ///
    /// When any step fails nothing is committed: the previous contents of
    /// both tables stay as they were.
    async fn bulk_replace(&self, table: &str, records: Vec<Record>, companion: CompanionPut) -> StoreResult<()>;
}
