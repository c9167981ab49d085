//! Document store abstraction consumed by the dashboard core.
//!
//! The core never talks to a concrete backend directly. Every component goes
//! through [`DocumentStore`], a minimal collection/document interface with
//! equality and array-membership predicates, optional ordering, conditional
//! updates and atomic batches. [`SqliteStore`] is the bundled implementation;
//! [`GuardedStore`] wraps any implementation with per-call timeouts and
//! cancellation.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │   Components    │    │  GuardedStore   │    │  DocumentStore  │
//! │ (topics, tasks, │───▶│ (timeout +      │───▶│ (SqliteStore or │
//! │  resources ...) │    │  cancellation)  │    │  any backend)   │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

use crate::error::{DashboardError, Result};

pub mod guarded;
pub mod sqlite;

pub use guarded::GuardedStore;
pub use sqlite::SqliteStore;

/// Maximum number of values accepted by a single contains-any predicate.
/// Callers with larger sets split them into chunks of this size.
pub const CONTAINS_ANY_LIMIT: usize = 10;

/// Collection names used by the dashboard.
pub mod collections {
    pub const TOPICS: &str = "topics";
    pub const SUBTOPICS: &str = "subtopics";
    pub const RESOURCES: &str = "resources";
    pub const TASKS: &str = "tasks";
    pub const USERS: &str = "users";
    pub const GROUPS: &str = "groups";
}

/// Top-level fields of a stored document.
pub type Fields = Map<String, Value>;

/// A stored document: its key plus its fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

impl Document {
    /// Deserializes the document into a model, exposing the key as `id`.
    pub fn decode<T: DeserializeOwned>(self) -> Result<T> {
        let mut fields = self.fields;
        fields.insert("id".to_string(), Value::String(self.id));
        Ok(serde_json::from_value(Value::Object(fields))?)
    }
}

/// Serializes a model into document fields. The `id` field is dropped since
/// the key lives outside the body.
pub fn encode<T: Serialize>(value: &T) -> Result<Fields> {
    match serde_json::to_value(value)? {
        Value::Object(mut fields) => {
            fields.remove("id");
            Ok(fields)
        }
        other => Err(DashboardError::validation("document")
            .with_reason(format!("expected an object, got {other}"))),
    }
}

/// A filter applied to one top-level field.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Field equals the value
    Eq { field: String, value: Value },
    /// Array field contains the value
    Contains { field: String, value: Value },
    /// Array field shares at least one element with the values
    ContainsAny { field: String, values: Vec<Value> },
}

impl Predicate {
    /// Name of the field the predicate inspects.
    pub fn field(&self) -> &str {
        match self {
            Predicate::Eq { field, .. }
            | Predicate::Contains { field, .. }
            | Predicate::ContainsAny { field, .. } => field,
        }
    }
}

/// Sort direction for [`OrderBy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Ascending,
    Descending,
}

/// Ordering applied to query results. Ties keep insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub field: String,
    pub direction: Direction,
}

/// A collection query: conjunction of predicates plus optional ordering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub predicates: Vec<Predicate>,
    pub order_by: Option<OrderBy>,
}

impl Query {
    /// An unfiltered query in insertion order.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an equality predicate.
    pub fn eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.predicates.push(Predicate::Eq {
            field: field.to_string(),
            value: value.into(),
        });
        self
    }

    /// Adds an array-contains predicate.
    pub fn contains(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.predicates.push(Predicate::Contains {
            field: field.to_string(),
            value: value.into(),
        });
        self
    }

    /// Adds an array-contains-any predicate.
    pub fn contains_any<I, V>(mut self, field: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.predicates.push(Predicate::ContainsAny {
            field: field.to_string(),
            values: values.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Orders results by a field.
    pub fn order_by(mut self, field: &str, direction: Direction) -> Self {
        self.order_by = Some(OrderBy {
            field: field.to_string(),
            direction,
        });
        self
    }

    /// Checks field names and contains-any sizes before the query reaches a
    /// backend.
    pub fn validate(&self) -> Result<()> {
        for predicate in &self.predicates {
            validate_field_name(predicate.field())?;
            if let Predicate::ContainsAny { field, values } = predicate {
                if values.is_empty() || values.len() > CONTAINS_ANY_LIMIT {
                    return Err(DashboardError::validation(field.as_str()).with_reason(format!(
                        "contains-any needs between 1 and {CONTAINS_ANY_LIMIT} values, got {}",
                        values.len()
                    )));
                }
            }
        }
        if let Some(order) = &self.order_by {
            validate_field_name(&order.field)?;
        }
        Ok(())
    }
}

/// Field names are plain identifiers; nested paths are not supported.
pub(crate) fn validate_field_name(field: &str) -> Result<()> {
    if field.is_empty() || !field.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(DashboardError::validation(field)
            .with_reason("field names may only contain ASCII letters, digits and '_'"));
    }
    Ok(())
}

/// Condition checked atomically with a conditional update.
#[derive(Debug, Clone, PartialEq)]
pub struct Precondition {
    pub field: String,
    pub expected: Value,
}

impl Precondition {
    /// The stored field must equal `expected` (a missing field equals null).
    pub fn field_equals(field: &str, expected: impl Into<Value>) -> Self {
        Self {
            field: field.to_string(),
            expected: expected.into(),
        }
    }

    /// Evaluates the precondition against stored fields.
    pub fn holds(&self, fields: &Fields) -> bool {
        fields.get(&self.field).unwrap_or(&Value::Null) == &self.expected
    }
}

/// One write inside an atomic batch.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    /// Create or replace a document
    Set {
        collection: String,
        id: String,
        fields: Fields,
    },
    /// Merge fields into an existing document; fails the batch if missing
    Update {
        collection: String,
        id: String,
        fields: Fields,
    },
    /// Remove a document; missing documents are ignored
    Delete { collection: String, id: String },
}

impl WriteOp {
    /// Convenience constructor for a delete.
    pub fn delete(collection: &str, id: impl Into<String>) -> Self {
        WriteOp::Delete {
            collection: collection.to_string(),
            id: id.into(),
        }
    }
}

/// Persistent store of document collections.
///
/// Implementations must make [`DocumentStore::batch_write`] all-or-nothing and
/// check [`Precondition`]s atomically with the write they guard.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Inserts a document under a generated key and returns the key.
    async fn insert(&self, collection: &str, fields: Fields) -> Result<String>;

    /// Creates or replaces the document stored under a caller-chosen key.
    async fn set(&self, collection: &str, id: &str, fields: Fields) -> Result<()>;

    /// Fetches a document by key.
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>>;

    /// Runs a query against one collection.
    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<Document>>;

    /// Merges top-level fields into an existing document.
    ///
    /// # Errors
    ///
    /// Returns `DashboardError::NotFound` if the document does not exist.
    async fn update(&self, collection: &str, id: &str, fields: Fields) -> Result<()>;

    /// Like [`DocumentStore::update`] but only if the precondition holds.
    ///
    /// # Errors
    ///
    /// Returns `DashboardError::Conflict` when the precondition fails.
    async fn update_if(
        &self,
        collection: &str,
        id: &str,
        precondition: &Precondition,
        fields: Fields,
    ) -> Result<()>;

    /// Removes a document. Removing a missing document is not an error.
    async fn delete(&self, collection: &str, id: &str) -> Result<()>;

    /// Applies all operations or none of them.
    async fn batch_write(&self, ops: Vec<WriteOp>) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Sample {
        id: String,
        name: String,
    }

    #[test]
    fn test_encode_strips_id_and_decode_restores_it() {
        let sample = Sample {
            id: "abc".to_string(),
            name: "Orbit".to_string(),
        };
        let fields = encode(&sample).expect("encode");
        assert!(!fields.contains_key("id"));

        let decoded: Sample = Document {
            id: "abc".to_string(),
            fields,
        }
        .decode()
        .expect("decode");
        assert_eq!(decoded, sample);
    }

    #[test]
    fn test_query_validation_rejects_oversized_contains_any() {
        let ids: Vec<String> = (0..11).map(|i| format!("g{i}")).collect();
        let query = Query::new().contains_any("assignedToGroups", ids);
        assert!(query.validate().unwrap_err().is_validation());

        let empty = Query::new().contains_any("assignedToGroups", Vec::<String>::new());
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_query_validation_rejects_path_like_fields() {
        assert!(Query::new().eq("a.b", 1).validate().is_err());
        assert!(Query::new().eq("topicId", "t").validate().is_ok());
        assert!(Query::new()
            .order_by("created at", Direction::Ascending)
            .validate()
            .is_err());
    }

    #[test]
    fn test_precondition_treats_missing_field_as_null() {
        let mut fields = Fields::new();
        assert!(Precondition::field_equals("version", Value::Null).holds(&fields));
        fields.insert("version".to_string(), json!(3));
        assert!(Precondition::field_equals("version", 3).holds(&fields));
        assert!(!Precondition::field_equals("version", 2).holds(&fields));
    }
}
