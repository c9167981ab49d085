//! Document CRUD operations, conditional updates and atomic batches.

use rusqlite::{params, params_from_iter, Connection, OptionalExtension, TransactionBehavior};

use super::filters::build_select;
use crate::{
    error::{DashboardError, DatabaseResultExt, Result},
    store::{Document, Fields, Precondition, Query, WriteOp},
};

const INSERT_DOCUMENT_SQL: &str = "INSERT INTO documents (collection, id, body) VALUES (?1, ?2, ?3)";
const UPSERT_DOCUMENT_SQL: &str = "INSERT INTO documents (collection, id, body) VALUES (?1, ?2, ?3) ON CONFLICT(collection, id) DO UPDATE SET body = excluded.body";
const SELECT_DOCUMENT_SQL: &str = "SELECT body FROM documents WHERE collection = ?1 AND id = ?2";
const UPDATE_DOCUMENT_BODY_SQL: &str =
    "UPDATE documents SET body = ?1 WHERE collection = ?2 AND id = ?3";
const DELETE_DOCUMENT_SQL: &str = "DELETE FROM documents WHERE collection = ?1 AND id = ?2";

impl super::Database {
    /// Inserts a new document under the given key.
    pub fn insert_document(&mut self, collection: &str, id: &str, fields: &Fields) -> Result<()> {
        let body = serde_json::to_string(fields)?;
        self.connection
            .execute(INSERT_DOCUMENT_SQL, params![collection, id, body])
            .db_context("Failed to insert document")?;
        Ok(())
    }

    /// Creates or replaces a document.
    pub fn set_document(&mut self, collection: &str, id: &str, fields: &Fields) -> Result<()> {
        write_body(&self.connection, collection, id, fields)
    }

    /// Retrieves a document by key.
    pub fn get_document(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        Ok(read_body(&self.connection, collection, id)?.map(|fields| Document {
            id: id.to_string(),
            fields,
        }))
    }

    /// Runs a query and returns matching documents in query order.
    pub fn query_documents(&self, collection: &str, query: &Query) -> Result<Vec<Document>> {
        let built = build_select(collection, query)?;
        let mut stmt = self
            .connection
            .prepare(&built.sql)
            .db_context("Failed to prepare document query")?;

        let rows = stmt
            .query_map(params_from_iter(built.params.iter()), |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })
            .db_context("Failed to query documents")?;

        let mut documents = Vec::new();
        for row in rows {
            let (id, body) = row.db_context("Failed to read document row")?;
            documents.push(Document {
                id,
                fields: serde_json::from_str(&body)?,
            });
        }
        Ok(documents)
    }

    /// Merges fields into an existing document.
    pub fn update_document(&mut self, collection: &str, id: &str, fields: &Fields) -> Result<()> {
        let tx = self
            .connection
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .db_context("Failed to begin transaction")?;

        merge_body(&tx, collection, id, fields)?;

        tx.commit().db_context("Failed to commit transaction")?;
        Ok(())
    }

    /// Merges fields into an existing document if the precondition holds on
    /// the stored version. Check and write share one transaction.
    pub fn update_document_if(
        &mut self,
        collection: &str,
        id: &str,
        precondition: &Precondition,
        fields: &Fields,
    ) -> Result<()> {
        let tx = self
            .connection
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .db_context("Failed to begin transaction")?;

        let stored =
            read_body(&tx, collection, id)?.ok_or_else(|| missing_document(collection, id))?;
        if !precondition.holds(&stored) {
            return Err(DashboardError::Conflict {
                kind: "Document",
                id: format!("{collection}/{id}"),
            });
        }
        merge_body(&tx, collection, id, fields)?;

        tx.commit().db_context("Failed to commit transaction")?;
        Ok(())
    }

    /// Removes a document; missing documents are ignored.
    pub fn delete_document(&mut self, collection: &str, id: &str) -> Result<()> {
        self.connection
            .execute(DELETE_DOCUMENT_SQL, params![collection, id])
            .db_context("Failed to delete document")?;
        Ok(())
    }

    /// Applies every operation in one transaction. Any failure rolls the whole
    /// batch back.
    pub fn apply_batch(&mut self, ops: &[WriteOp]) -> Result<()> {
        let tx = self
            .connection
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .db_context("Failed to begin transaction")?;

        for op in ops {
            match op {
                WriteOp::Set {
                    collection,
                    id,
                    fields,
                } => write_body(&tx, collection, id, fields)?,
                WriteOp::Update {
                    collection,
                    id,
                    fields,
                } => merge_body(&tx, collection, id, fields)?,
                WriteOp::Delete { collection, id } => {
                    tx.execute(DELETE_DOCUMENT_SQL, params![collection, id])
                        .db_context("Failed to delete document in batch")?;
                }
            }
        }

        tx.commit().db_context("Failed to commit batch")?;
        Ok(())
    }
}

fn missing_document(collection: &str, id: &str) -> DashboardError {
    DashboardError::not_found("Document", format!("{collection}/{id}"))
}

fn read_body(conn: &Connection, collection: &str, id: &str) -> Result<Option<Fields>> {
    let body: Option<String> = conn
        .query_row(SELECT_DOCUMENT_SQL, params![collection, id], |row| row.get(0))
        .optional()
        .db_context("Failed to read document")?;

    body.map(|body| serde_json::from_str(&body).map_err(DashboardError::from))
        .transpose()
}

fn write_body(conn: &Connection, collection: &str, id: &str, fields: &Fields) -> Result<()> {
    let body = serde_json::to_string(fields)?;
    conn.execute(UPSERT_DOCUMENT_SQL, params![collection, id, body])
        .db_context("Failed to write document")?;
    Ok(())
}

fn merge_body(conn: &Connection, collection: &str, id: &str, fields: &Fields) -> Result<()> {
    let mut stored =
        read_body(conn, collection, id)?.ok_or_else(|| missing_document(collection, id))?;
    for (key, value) in fields {
        stored.insert(key.clone(), value.clone());
    }

    let body = serde_json::to_string(&stored)?;
    conn.execute(UPDATE_DOCUMENT_BODY_SQL, params![body, collection, id])
        .db_context("Failed to update document")?;
    Ok(())
}
