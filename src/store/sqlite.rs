//! SQLite-backed record store.
//!
//! Tables:
//! - `records`: id, collection, body (JSON document), inserted_at
//!
//! Filters and ordering are evaluated with `json_extract` against the
//! document body, so any camelCase record field can be queried.

use crate::baas::{Database, ListQuery};
use anyhow::{Context, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use rusqlite::types::Value as SqlValue;
use std::path::Path;

/// Local document store implementing [`Database`].
pub struct SqliteRecordStore {
    conn: Mutex<rusqlite::Connection>,
}

impl SqliteRecordStore {
    /// Open (or create) the record database at the given path.
    pub fn new(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let conn = rusqlite::Connection::open(db_path)?;

        // WAL mode for concurrent reads + crash safety
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )?;

        Self::init(conn)
    }

    /// In-memory store (nothing is written to disk).
    pub fn in_memory() -> Result<Self> {
        Self::init(rusqlite::Connection::open_in_memory()?)
    }

    fn init(conn: rusqlite::Connection) -> Result<Self> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS records (
                id TEXT PRIMARY KEY,
                collection TEXT NOT NULL,
                body TEXT NOT NULL,
                inserted_at INTEGER NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_records_collection ON records(collection);",
        )?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn insert(&self, collection: &str, mut record: serde_json::Value) -> Result<serde_json::Value> {
        let Some(fields) = record.as_object_mut() else {
            anyhow::bail!("Records must be JSON objects");
        };

        let id = uuid::Uuid::new_v4().to_string();
        fields.insert("id".into(), serde_json::Value::String(id.clone()));
        let body = serde_json::to_string(&record)?;
        let now = chrono::Utc::now().timestamp_millis();

        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO records (id, collection, body, inserted_at) VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![id, collection, body, now],
        )?;

        Ok(record)
    }

    fn select(&self, collection: &str, query: &ListQuery) -> Result<Vec<serde_json::Value>> {
        let mut sql = String::from("SELECT body FROM records WHERE collection = ?");
        let mut params: Vec<SqlValue> = vec![SqlValue::Text(collection.to_string())];

        for (field, value) in &query.filters {
            sql.push_str(" AND json_extract(body, ?) = ?");
            params.push(SqlValue::Text(json_path(field)));
            params.push(SqlValue::Text(value.clone()));
        }

        match &query.order_by {
            Some(order) => {
                sql.push_str(" ORDER BY json_extract(body, ?)");
                sql.push_str(if order.descending { " DESC" } else { " ASC" });
                params.push(SqlValue::Text(json_path(&order.field)));
                sql.push_str(", inserted_at DESC");
            }
            None => sql.push_str(" ORDER BY inserted_at ASC"),
        }

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            params.push(SqlValue::Integer(i64::try_from(limit).unwrap_or(i64::MAX)));
        }

        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(rusqlite::params_from_iter(params.iter()), |row| {
            row.get::<_, String>(0)
        })?;

        let mut docs = Vec::new();
        for row in rows {
            let body = row?;
            docs.push(serde_json::from_str(&body).context("Corrupt record body")?);
        }
        Ok(docs)
    }

    /// Number of records in a collection.
    pub fn count(&self, collection: &str) -> Result<usize> {
        let conn = self.conn.lock();
        let n: i64 = conn.query_row(
            "SELECT COUNT(*) FROM records WHERE collection = ?1",
            rusqlite::params![collection],
            |row| row.get(0),
        )?;
        Ok(usize::try_from(n).unwrap_or(0))
    }
}

/// JSON path for a top-level field, quoted so dots in names stay literal.
fn json_path(field: &str) -> String {
    format!("$.\"{}\"", field.replace('"', ""))
}

#[async_trait]
impl Database for SqliteRecordStore {
    async fn create(
        &self,
        collection: &str,
        record: serde_json::Value,
    ) -> Result<serde_json::Value> {
        self.insert(collection, record)
    }

    async fn list(&self, collection: &str, query: &ListQuery) -> Result<Vec<serde_json::Value>> {
        self.select(collection, query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::baas::{Collection, VoiceGenerationRecord};
    use chrono::{TimeZone, Utc};
    use serde_json::json;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn test_store() -> (TempDir, SqliteRecordStore) {
        let tmp = TempDir::new().unwrap();
        let db_path = tmp.path().join("records.db");
        let store = SqliteRecordStore::new(&db_path).unwrap();
        (tmp, store)
    }

    #[tokio::test]
    async fn create_assigns_id() {
        let (_tmp, store) = test_store();
        let created = store
            .create("voiceGenerations", json!({"userId": "u1", "script": "hi"}))
            .await
            .unwrap();
        assert!(created["id"].as_str().is_some_and(|id| !id.is_empty()));
        assert_eq!(store.count("voiceGenerations").unwrap(), 1);
        assert_eq!(store.count("videoDubbings").unwrap(), 0);
    }

    #[tokio::test]
    async fn rejects_non_object_records() {
        let (_tmp, store) = test_store();
        assert!(store.create("c", json!([1, 2])).await.is_err());
    }

    #[tokio::test]
    async fn list_filters_orders_and_limits() {
        let (_tmp, store) = test_store();
        for (user, ts) in [
            ("u1", "2024-01-01T00:00:00Z"),
            ("u2", "2024-01-02T00:00:00Z"),
            ("u1", "2024-01-03T00:00:00Z"),
            ("u1", "2024-01-02T00:00:00Z"),
        ] {
            store
                .create("voiceGenerations", json!({"userId": user, "createdAt": ts}))
                .await
                .unwrap();
        }

        let query = ListQuery::recent_for_user("u1", 2);
        let docs = store.list("voiceGenerations", &query).await.unwrap();
        let stamps: Vec<&str> = docs.iter().map(|d| d["createdAt"].as_str().unwrap()).collect();
        assert_eq!(stamps, vec!["2024-01-03T00:00:00Z", "2024-01-02T00:00:00Z"]);
        assert!(docs.iter().all(|d| d["userId"] == "u1"));
    }

    #[tokio::test]
    async fn collections_are_isolated() {
        let store = SqliteRecordStore::in_memory().unwrap();
        store.create("a", json!({"userId": "u1"})).await.unwrap();
        let docs = store
            .list("b", &ListQuery::new().where_eq("userId", "u1"))
            .await
            .unwrap();
        assert!(docs.is_empty());
    }

    #[tokio::test]
    async fn typed_collection_roundtrip() {
        let (_tmp, store) = test_store();
        let db: Arc<dyn Database> = Arc::new(store);
        let collection = Collection::voice_generations(db);

        let record = VoiceGenerationRecord {
            user_id: "u1".into(),
            script: "Hello".into(),
            translated_text: "नमस्ते".into(),
            language: "hi".into(),
            voice: "male-1".into(),
            speed: 1.5,
            audio_url: "https://cdn/a.mp3".into(),
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap(),
        };
        let stored = collection.create(&record).await.unwrap();
        assert_eq!(stored.record, record);

        let listed = collection
            .list(&ListQuery::recent_for_user("u1", 20))
            .await
            .unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, stored.id);
        assert_eq!(listed[0].record.translated_text, "नमस्ते");
    }

    #[test]
    fn json_path_quotes_field() {
        assert_eq!(json_path("userId"), "$.\"userId\"");
    }

    #[tokio::test]
    async fn reopen_preserves_records() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested/records.db");
        {
            let store = SqliteRecordStore::new(&path).unwrap();
            store.create("c", json!({"k": "v"})).await.unwrap();
        }
        let store = SqliteRecordStore::new(&path).unwrap();
        assert_eq!(store.count("c").unwrap(), 1);
    }
}
