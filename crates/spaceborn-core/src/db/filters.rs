//! Translation of [`Query`] values into SQL over the JSON document body.

use rusqlite::types::Value as SqlValue;
use serde_json::Value;

use crate::{
    error::{DashboardError, Result},
    store::{Direction, Predicate, Query},
};

const SELECT_DOCUMENTS_SQL: &str = "SELECT id, body FROM documents WHERE collection = ?";

/// SQL text plus its positional parameters, in order.
#[derive(Debug, PartialEq)]
pub struct SqlQuery {
    pub sql: String,
    pub params: Vec<SqlValue>,
}

/// Builds the SELECT statement for a collection query.
///
/// Field paths are bound as parameters (`$.field`) rather than spliced into
/// the SQL text.
pub fn build_select(collection: &str, query: &Query) -> Result<SqlQuery> {
    query.validate()?;

    let mut sql = String::from(SELECT_DOCUMENTS_SQL);
    let mut params = vec![SqlValue::Text(collection.to_string())];

    for predicate in &query.predicates {
        match predicate {
            Predicate::Eq { field, value } => {
                params.push(SqlValue::Text(json_path(field)));
                if value.is_null() {
                    sql.push_str(" AND json_extract(body, ?) IS NULL");
                } else {
                    sql.push_str(" AND json_extract(body, ?) = ?");
                    params.push(scalar(field, value)?);
                }
            }
            Predicate::Contains { field, value } => {
                sql.push_str(
                    " AND EXISTS (SELECT 1 FROM json_each(body, ?) WHERE json_each.value = ?)",
                );
                params.push(SqlValue::Text(json_path(field)));
                params.push(scalar(field, value)?);
            }
            Predicate::ContainsAny { field, values } => {
                let placeholders = vec!["?"; values.len()].join(", ");
                sql.push_str(&format!(
                    " AND EXISTS (SELECT 1 FROM json_each(body, ?) WHERE json_each.value IN ({placeholders}))"
                ));
                params.push(SqlValue::Text(json_path(field)));
                for value in values {
                    params.push(scalar(field, value)?);
                }
            }
        }
    }

    match &query.order_by {
        Some(order) => {
            let direction = match order.direction {
                Direction::Ascending => "ASC",
                Direction::Descending => "DESC",
            };
            sql.push_str(&format!(" ORDER BY json_extract(body, ?) {direction}, seq ASC"));
            params.push(SqlValue::Text(json_path(&order.field)));
        }
        None => sql.push_str(" ORDER BY seq ASC"),
    }

    Ok(SqlQuery { sql, params })
}

fn json_path(field: &str) -> String {
    format!("$.{field}")
}

/// Converts a JSON scalar to the value SQLite's JSON functions produce for it.
fn scalar(field: &str, value: &Value) -> Result<SqlValue> {
    match value {
        Value::Null => Ok(SqlValue::Null),
        Value::Bool(flag) => Ok(SqlValue::Integer(i64::from(*flag))),
        Value::String(text) => Ok(SqlValue::Text(text.clone())),
        Value::Number(number) => number
            .as_i64()
            .map(SqlValue::Integer)
            .or_else(|| number.as_f64().map(SqlValue::Real))
            .ok_or_else(|| {
                DashboardError::validation(field)
                    .with_reason(format!("number {number} cannot be compared"))
            }),
        Value::Array(_) | Value::Object(_) => Err(DashboardError::validation(field)
            .with_reason("predicate values must be scalars")),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_unfiltered_query_orders_by_insertion() {
        let built = build_select("topics", &Query::new()).expect("build");
        assert_eq!(
            built.sql,
            "SELECT id, body FROM documents WHERE collection = ? ORDER BY seq ASC"
        );
        assert_eq!(built.params, vec![SqlValue::Text("topics".to_string())]);
    }

    #[test]
    fn test_predicates_bind_paths_and_values_in_order() {
        let query = Query::new()
            .eq("topicId", "t1")
            .contains("members", "u1")
            .order_by("createdAt", Direction::Descending);
        let built = build_select("subtopics", &query).expect("build");

        assert!(built.sql.contains("json_extract(body, ?) = ?"));
        assert!(built.sql.contains("json_each(body, ?) WHERE json_each.value = ?"));
        assert!(built.sql.ends_with("ORDER BY json_extract(body, ?) DESC, seq ASC"));
        assert_eq!(
            built.params,
            vec![
                SqlValue::Text("subtopics".to_string()),
                SqlValue::Text("$.topicId".to_string()),
                SqlValue::Text("t1".to_string()),
                SqlValue::Text("$.members".to_string()),
                SqlValue::Text("u1".to_string()),
                SqlValue::Text("$.createdAt".to_string()),
            ]
        );
    }

    #[test]
    fn test_contains_any_expands_placeholders() {
        let query = Query::new().contains_any("assignedToGroups", ["g1", "g2", "g3"]);
        let built = build_select("resources", &query).expect("build");
        assert!(built.sql.contains("IN (?, ?, ?)"));
        assert_eq!(built.params.len(), 5);
    }

    #[test]
    fn test_null_equality_uses_is_null() {
        let built = build_select("tasks", &Query::new().eq("verifiedBy", Value::Null))
            .expect("build");
        assert!(built.sql.contains("json_extract(body, ?) IS NULL"));
        assert_eq!(built.params.len(), 2);
    }

    #[test]
    fn test_bool_and_composite_values() {
        assert_eq!(scalar("flag", &json!(true)).unwrap(), SqlValue::Integer(1));
        assert_eq!(scalar("n", &json!(2.5)).unwrap(), SqlValue::Real(2.5));
        assert!(scalar("list", &json!(["a"])).is_err());
    }
}
