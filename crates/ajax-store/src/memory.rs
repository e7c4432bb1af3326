//! In-memory table store.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use serde_json::Value;

use crate::{CompanionPut, Record, StoreError, StoreResult, TableSchema, TableStore};

#[derive(Debug, Clone)]
struct Table {
    schema: TableSchema,
    rows: Vec<Record>,
}

impl Table {
    fn new(schema: TableSchema) -> Self {
        Self {
            schema,
            rows: Vec::new(),
        }
    }

    /// Primary key value of `record`, validating its shape.
    fn key_of(&self, record: &Record) -> StoreResult<Option<Value>> {
        let Some(field) = self.schema.primary_key.as_deref() else {
            return Ok(None);
        };

        let object = record.as_object().ok_or_else(|| StoreError::InvalidRecord {
            table: self.schema.name.clone(),
            reason: "keyed tables only accept objects".to_string(),
        })?;

        match object.get(field) {
            Some(key) if !key.is_null() => Ok(Some(key.clone())),
            _ => Err(StoreError::MissingKey {
                table: self.schema.name.clone(),
                field: field.to_string(),
            }),
        }
    }

    fn position_of(&self, key: &Value) -> Option<usize> {
        let field = self.schema.primary_key.as_deref()?;
        self.rows.iter().position(|row| row.get(field) == Some(key))
    }

    fn upsert(&mut self, record: Record) -> StoreResult<()> {
        match self.key_of(&record)? {
            Some(key) => match self.position_of(&key) {
                Some(index) => self.rows[index] = record,
                None => self.rows.push(record),
            },
            None => self.rows.push(record),
        }
        Ok(())
    }

    fn insert(&mut self, record: Record) -> StoreResult<()> {
        if let Some(key) = self.key_of(&record)? {
            if self.position_of(&key).is_some() {
                return Err(StoreError::Constraint {
                    table: self.schema.name.clone(),
                    key: key.to_string(),
                });
            }
        }
        self.rows.push(record);
        Ok(())
    }
}

/// Table store kept in process memory.
///
/// Tables must be declared up front. Writes are staged on a copy of the
/// affected tables and swapped in only when every step succeeded, so
/// `bulk_replace` never leaves a partial table behind.
#[derive(Debug, Default)]
pub struct MemoryTableStore {
    tables: RwLock<HashMap<String, Table>>,
}

impl MemoryTableStore {
    /// Create an empty store without any tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a table.
    pub fn with_table(self, schema: TableSchema) -> Self {
        if let Ok(mut tables) = self.tables.write() {
            tables.insert(schema.name.clone(), Table::new(schema));
        }
        self
    }

    /// Declare several tables.
    pub fn with_tables(self, schemas: impl IntoIterator<Item = TableSchema>) -> Self {
        schemas.into_iter().fold(self, Self::with_table)
    }

    /// Number of rows in `table`.
    pub fn len(&self, table: &str) -> StoreResult<usize> {
        let tables = self.read()?;
        let table = Self::table(&tables, table)?;
        Ok(table.rows.len())
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, HashMap<String, Table>>> {
        self.tables.read().map_err(|_| StoreError::Poisoned)
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, HashMap<String, Table>>> {
        self.tables.write().map_err(|_| StoreError::Poisoned)
    }

    fn table<'a>(tables: &'a HashMap<String, Table>, name: &str) -> StoreResult<&'a Table> {
        tables
            .get(name)
            .ok_or_else(|| StoreError::UnknownTable(name.to_string()))
    }
}

#[async_trait]
impl TableStore for MemoryTableStore {
    async fn has_table(&self, table: &str) -> bool {
        self.read()
            .map(|tables| tables.contains_key(table))
            .unwrap_or(false)
    }

    async fn put(&self, table: &str, record: Record) -> StoreResult<()> {
        let mut tables = self.write()?;
        let target = tables
            .get_mut(table)
            .ok_or_else(|| StoreError::UnknownTable(table.to_string()))?;
        target.upsert(record)
    }

    async fn query_by_field(&self, table: &str, field: &str, value: &Value) -> StoreResult<Vec<Record>> {
        let tables = self.read()?;
        let target = Self::table(&tables, table)?;

        if !target.schema.is_indexed(field) {
            return Err(StoreError::NotIndexed {
                table: table.to_string(),
                field: field.to_string(),
            });
        }

        Ok(target
            .rows
            .iter()
            .filter(|row| row.get(field) == Some(value))
            .cloned()
            .collect())
    }

    async fn to_vec(&self, table: &str) -> StoreResult<Vec<Record>> {
        let tables = self.read()?;
        Ok(Self::table(&tables, table)?.rows.clone())
    }

    async fn bulk_replace(&self, table: &str, records: Vec<Record>, companion: CompanionPut) -> StoreResult<()> {
        let mut tables = self.write()?;

        let mut staged = Self::table(&tables, table)?.clone();
        staged.rows.clear();
        for record in records {
            staged.insert(record)?;
        }

        let mut staged_companion = if companion.table == table {
            None
        } else {
            Some(Self::table(&tables, &companion.table)?.clone())
        };
        match staged_companion.as_mut() {
            Some(companion_table) => companion_table.upsert(companion.record)?,
            None => staged.upsert(companion.record)?,
        }

        tables.insert(table.to_string(), staged);
        if let Some(companion_table) = staged_companion {
            tables.insert(companion.table, companion_table);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store() -> MemoryTableStore {
        MemoryTableStore::new()
            .with_table(TableSchema::keyed("cache", "cacheKey").with_index("expiresAt"))
            .with_table(TableSchema::keyed("expiry", "tableName"))
            .with_table(TableSchema::keyed("countries", "id").with_index("name"))
    }

    // === Readiness ===

    #[tokio::test]
    async fn test_has_table() {
        let store = store();
        assert!(store.has_table("cache").await);
        assert!(!store.has_table("missing").await);
    }

    // === Put ===

    #[tokio::test]
    async fn test_put_upserts_by_primary_key() {
        let store = store();
        store.put("cache", json!({"cacheKey": "a", "data": 1})).await.unwrap();
        store.put("cache", json!({"cacheKey": "b", "data": 2})).await.unwrap();
        store.put("cache", json!({"cacheKey": "a", "data": 3})).await.unwrap();

        let rows = store.to_vec("cache").await.unwrap();
        assert_eq!(rows, vec![json!({"cacheKey": "a", "data": 3}), json!({"cacheKey": "b", "data": 2})]);
    }

    #[tokio::test]
    async fn test_put_unknown_table() {
        let result = store().put("nope", json!({"id": 1})).await;
        assert!(matches!(result, Err(StoreError::UnknownTable(name)) if name == "nope"));
    }

    #[tokio::test]
    async fn test_put_missing_key() {
        let result = store().put("cache", json!({"data": 1})).await;
        assert!(matches!(result, Err(StoreError::MissingKey { .. })));
    }

    #[tokio::test]
    async fn test_put_non_object_into_keyed_table() {
        let result = store().put("cache", json!("plain")).await;
        assert!(matches!(result, Err(StoreError::InvalidRecord { .. })));
    }

    #[tokio::test]
    async fn test_put_unkeyed_table_appends() {
        let store = MemoryTableStore::new().with_table(TableSchema::unkeyed("log"));
        store.put("log", json!(1)).await.unwrap();
        store.put("log", json!(1)).await.unwrap();
        assert_eq!(store.len("log").unwrap(), 2);
    }

    // === Query ===

    #[tokio::test]
    async fn test_query_by_index() {
        let store = store();
        store.put("countries", json!({"id": 1, "name": "Kenya"})).await.unwrap();
        store.put("countries", json!({"id": 2, "name": "Chad"})).await.unwrap();

        let rows = store.query_by_field("countries", "name", &json!("Chad")).await.unwrap();
        assert_eq!(rows, vec![json!({"id": 2, "name": "Chad"})]);
    }

    #[tokio::test]
    async fn test_query_requires_index() {
        let result = store().query_by_field("countries", "capital", &json!("x")).await;
        assert!(matches!(result, Err(StoreError::NotIndexed { .. })));
    }

    // === Bulk replace ===

    #[tokio::test]
    async fn test_bulk_replace_swaps_contents_and_writes_companion() {
        let store = store();
        store.put("countries", json!({"id": 9, "name": "Old"})).await.unwrap();

        store
            .bulk_replace(
                "countries",
                vec![json!({"id": 1, "name": "A"}), json!({"id": 2, "name": "B"})],
                CompanionPut::new("expiry", json!({"tableName": "countries", "expiresAt": 10})),
            )
            .await
            .unwrap();

        let rows = store.to_vec("countries").await.unwrap();
        assert_eq!(rows, vec![json!({"id": 1, "name": "A"}), json!({"id": 2, "name": "B"})]);
        let expiry = store.query_by_field("expiry", "tableName", &json!("countries")).await.unwrap();
        assert_eq!(expiry, vec![json!({"tableName": "countries", "expiresAt": 10})]);
    }

    #[tokio::test]
    async fn test_bulk_replace_is_all_or_nothing() {
        let store = store();
        store
            .bulk_replace(
                "countries",
                vec![json!({"id": 1, "name": "A"})],
                CompanionPut::new("expiry", json!({"tableName": "countries", "expiresAt": 10})),
            )
            .await
            .unwrap();

        // Duplicate key halfway through the insert.
        let result = store
            .bulk_replace(
                "countries",
                vec![json!({"id": 5, "name": "X"}), json!({"id": 5, "name": "Y"})],
                CompanionPut::new("expiry", json!({"tableName": "countries", "expiresAt": 99})),
            )
            .await;
        assert!(matches!(result, Err(StoreError::Constraint { .. })));

        assert_eq!(store.to_vec("countries").await.unwrap(), vec![json!({"id": 1, "name": "A"})]);
        let expiry = store.query_by_field("expiry", "tableName", &json!("countries")).await.unwrap();
        assert_eq!(expiry[0]["expiresAt"], json!(10));
    }

    #[tokio::test]
    async fn test_bulk_replace_bad_companion_rolls_back() {
        let store = store();
        store.put("countries", json!({"id": 1, "name": "A"})).await.unwrap();

        let result = store
            .bulk_replace(
                "countries",
                vec![json!({"id": 2, "name": "B"})],
                CompanionPut::new("expiry", json!({"expiresAt": 1})),
            )
            .await;
        assert!(matches!(result, Err(StoreError::MissingKey { .. })));
        assert_eq!(store.to_vec("countries").await.unwrap(), vec![json!({"id": 1, "name": "A"})]);
    }

    #[tokio::test]
    async fn test_bulk_replace_unknown_companion_table() {
        let result = store()
            .bulk_replace("countries", vec![], CompanionPut::new("gone", json!({"tableName": "x"})))
            .await;
        assert!(matches!(result, Err(StoreError::UnknownTable(name)) if name == "gone"));
    }
}
