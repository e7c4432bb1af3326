//! Store error types.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur when using a table store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The table is not declared in the store.
    #[error("Unknown table: {0}")]
    UnknownTable(String),

    /// A record lacks the table's primary key.
    #[error("Record in table {table} is missing primary key {field}")]
    MissingKey { table: String, field: String },

    /// Two records share a primary key within one bulk insert.
    #[error("Constraint violation in table {table}: duplicate key {key}")]
    Constraint { table: String, key: String },

    /// Lookup on a field that is neither the primary key nor an index.
    #[error("Field {field} is not indexed in table {table}")]
    NotIndexed { table: String, field: String },

    /// The record is not storable (e.g. not an object).
    #[error("Invalid record for table {table}: {reason}")]
    InvalidRecord { table: String, reason: String },

    /// Invalid table schema declaration.
    #[error("Invalid schema for table {table}: {reason}")]
    InvalidSchema { table: String, reason: String },

    /// A previous writer panicked while holding the store lock.
    #[error("Store lock poisoned")]
    Poisoned,

    /// Failed to (de)serialize a record.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
