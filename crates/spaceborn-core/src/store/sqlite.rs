//! [`DocumentStore`] backed by a SQLite file.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use log::debug;
use tokio::task;
use uuid::Uuid;

use super::{Document, DocumentStore, Fields, Precondition, Query, WriteOp};
use crate::{
    db::Database,
    error::{DashboardError, Result},
};

/// SQLite document store.
///
/// Each call opens its own connection on the blocking thread pool, so the
/// store itself is cheap to clone and share between tasks.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    db_path: PathBuf,
}

impl SqliteStore {
    /// Creates a store for the given database file. The schema is created
    /// lazily on first use; call [`SqliteStore::initialize`] to fail early.
    pub fn new<P: AsRef<Path>>(db_path: P) -> Self {
        Self {
            db_path: db_path.as_ref().to_path_buf(),
        }
    }

    /// Path of the backing database file.
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Opens the database once, creating the schema if needed.
    pub async fn initialize(&self) -> Result<()> {
        self.run(|_db| Ok(())).await
    }

    async fn run<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Database) -> Result<T> + Send + 'static,
    {
        let db_path = self.db_path.clone();

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            op(&mut db)
        })
        .await
        .map_err(|e| DashboardError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }
}

#[async_trait]
impl DocumentStore for SqliteStore {
    async fn insert(&self, collection: &str, fields: Fields) -> Result<String> {
        let collection = collection.to_string();
        let id = Uuid::new_v4().simple().to_string();
        debug!("insert {collection}/{id}");

        let key = id.clone();
        self.run(move |db| db.insert_document(&collection, &key, &fields))
            .await?;
        Ok(id)
    }

    async fn set(&self, collection: &str, id: &str, fields: Fields) -> Result<()> {
        let (collection, id) = (collection.to_string(), id.to_string());
        debug!("set {collection}/{id}");
        self.run(move |db| db.set_document(&collection, &id, &fields))
            .await
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        let (collection, id) = (collection.to_string(), id.to_string());
        self.run(move |db| db.get_document(&collection, &id)).await
    }

    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<Document>> {
        let collection = collection.to_string();
        let query = query.clone();
        self.run(move |db| db.query_documents(&collection, &query))
            .await
    }

    async fn update(&self, collection: &str, id: &str, fields: Fields) -> Result<()> {
        let (collection, id) = (collection.to_string(), id.to_string());
        debug!("update {collection}/{id}");
        self.run(move |db| db.update_document(&collection, &id, &fields))
            .await
    }

    async fn update_if(
        &self,
        collection: &str,
        id: &str,
        precondition: &Precondition,
        fields: Fields,
    ) -> Result<()> {
        let (collection, id) = (collection.to_string(), id.to_string());
        let precondition = precondition.clone();
        debug!(
            "conditional update {collection}/{id} ({} == {})",
            precondition.field, precondition.expected
        );
        self.run(move |db| db.update_document_if(&collection, &id, &precondition, &fields))
            .await
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<()> {
        let (collection, id) = (collection.to_string(), id.to_string());
        debug!("delete {collection}/{id}");
        self.run(move |db| db.delete_document(&collection, &id))
            .await
    }

    async fn batch_write(&self, ops: Vec<WriteOp>) -> Result<()> {
        debug!("batch write of {} operations", ops.len());
        self.run(move |db| db.apply_batch(&ops)).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;
    use crate::store::Direction;

    fn fields(value: serde_json::Value) -> Fields {
        match value {
            serde_json::Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    fn create_test_store() -> (TempDir, SqliteStore) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = SqliteStore::new(temp_dir.path().join("store.db"));
        (temp_dir, store)
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let (_dir, store) = create_test_store();
        let id = store
            .insert("groups", fields(json!({"name": "Ops", "members": ["u1"]})))
            .await
            .expect("insert");

        let doc = store.get("groups", &id).await.expect("get").expect("exists");
        assert_eq!(doc.fields["name"], json!("Ops"));
        assert!(store.get("groups", "missing").await.expect("get").is_none());
    }

    #[tokio::test]
    async fn test_query_predicates() {
        let (_dir, store) = create_test_store();
        for (name, members, rank) in [
            ("Ops", vec!["u1", "u2"], 3),
            ("Dev", vec!["u2"], 1),
            ("Art", vec!["u3"], 2),
        ] {
            store
                .insert(
                    "groups",
                    fields(json!({"name": name, "members": members, "rank": rank})),
                )
                .await
                .expect("insert");
        }

        let with_u2 = store
            .query(
                "groups",
                &Query::new()
                    .contains("members", "u2")
                    .order_by("rank", Direction::Ascending),
            )
            .await
            .expect("query");
        let names: Vec<_> = with_u2.iter().map(|d| d.fields["name"].clone()).collect();
        assert_eq!(names, vec![json!("Dev"), json!("Ops")]);

        let any = store
            .query("groups", &Query::new().contains_any("members", ["u1", "u3"]))
            .await
            .expect("query");
        assert_eq!(any.len(), 2);

        let eq = store
            .query("groups", &Query::new().eq("rank", 2))
            .await
            .expect("query");
        assert_eq!(eq.len(), 1);
        assert_eq!(eq[0].fields["name"], json!("Art"));
    }

    #[tokio::test]
    async fn test_update_merges_and_requires_existing_document() {
        let (_dir, store) = create_test_store();
        store
            .set("users", "u1", fields(json!({"name": "Ada", "role": "intern"})))
            .await
            .expect("set");

        store
            .update("users", "u1", fields(json!({"role": "core_employee"})))
            .await
            .expect("update");
        let doc = store.get("users", "u1").await.expect("get").expect("exists");
        assert_eq!(doc.fields["name"], json!("Ada"));
        assert_eq!(doc.fields["role"], json!("core_employee"));

        let err = store
            .update("users", "nobody", fields(json!({"role": "admin"})))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_update_if_detects_conflicts() {
        let (_dir, store) = create_test_store();
        store
            .set("topics", "t1", fields(json!({"version": 1})))
            .await
            .expect("set");

        store
            .update_if(
                "topics",
                "t1",
                &Precondition::field_equals("version", 1),
                fields(json!({"version": 2})),
            )
            .await
            .expect("first conditional update");

        let err = store
            .update_if(
                "topics",
                "t1",
                &Precondition::field_equals("version", 1),
                fields(json!({"version": 2})),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DashboardError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_failed_batch_leaves_store_untouched() {
        let (_dir, store) = create_test_store();
        store
            .set("topics", "t1", fields(json!({"title": "Auth"})))
            .await
            .expect("set");
        store
            .set("subtopics", "s1", fields(json!({"topicId": "t1"})))
            .await
            .expect("set");

        let result = store
            .batch_write(vec![
                WriteOp::delete("subtopics", "s1"),
                WriteOp::delete("topics", "t1"),
                WriteOp::Update {
                    collection: "topics".to_string(),
                    id: "ghost".to_string(),
                    fields: fields(json!({"title": "x"})),
                },
            ])
            .await;
        assert!(result.is_err());

        assert!(store.get("topics", "t1").await.expect("get").is_some());
        assert!(store.get("subtopics", "s1").await.expect("get").is_some());
    }
}
