//! Topic aggregator: owns the progress rollup of every topic.

use std::sync::Arc;

use log::{debug, info, warn};
use serde_json::{json, Map, Value};

use super::{
    directory::Directory,
    locks::{KeyedGuard, KeyedLocks},
};
use crate::{
    error::{require_non_blank, DashboardError, Result},
    models::{fields, now, Rollup, Subtopic, Topic},
    params::{CreateTopic, EditTopic},
    store::{
        collections::{SUBTOPICS, TOPICS},
        encode, Direction, GuardedStore, Precondition, Query, WriteOp,
    },
};

/// Creates, edits, recomputes and deletes topics.
///
/// `recompute` is the only writer of a topic's status, progress and counts.
/// Recomputes of one topic are serialized in-process, and each one is a
/// conditional write on the `version` read at its start, so a concurrent
/// writer elsewhere causes a retry instead of a lost update.
#[derive(Clone)]
pub struct TopicAggregator {
    store: GuardedStore,
    directory: Directory,
    locks: Arc<KeyedLocks>,
    recompute_retries: u32,
}

impl TopicAggregator {
    pub(crate) fn new(
        store: GuardedStore,
        directory: Directory,
        locks: Arc<KeyedLocks>,
        recompute_retries: u32,
    ) -> Self {
        Self {
            store,
            directory,
            locks,
            recompute_retries,
        }
    }

    /// Exclusive access to a topic's rollup.
    async fn lock(&self, topic_id: &str) -> KeyedGuard {
        self.locks.lock(topic_id).await
    }

    /// Creates a topic with no subtopics. Group names are copied from the
    /// directory so lists can show them without extra lookups.
    pub async fn create(&self, params: &CreateTopic, created_by: Option<&str>) -> Result<Topic> {
        require_non_blank("title", &params.title)?;

        let mut assigned_groups = Vec::new();
        let mut assigned_group_names = Vec::new();
        for group_id in &params.assigned_groups {
            if assigned_groups.contains(group_id) {
                continue;
            }
            let group = self.directory.get_group(group_id).await?;
            assigned_groups.push(group.id);
            assigned_group_names.push(group.name);
        }

        let timestamp = now();
        let mut topic = Topic {
            id: String::new(),
            title: params.title.trim().to_string(),
            description: non_blank(params.description.as_deref()),
            assigned_groups,
            assigned_group_names,
            rollup: Rollup::default(),
            version: 0,
            created_by: created_by.map(String::from),
            created_at: timestamp,
            updated_at: timestamp,
        };
        topic.id = self.store.insert(TOPICS, encode(&topic)?).await?;

        info!("Created topic {} '{}'", topic.id, topic.title);
        Ok(topic)
    }

    pub async fn get(&self, topic_id: &str) -> Result<Topic> {
        self.store.fetch(TOPICS, topic_id, "Topic").await
    }

    /// All topics, newest first.
    pub async fn list(&self) -> Result<Vec<Topic>> {
        self.store
            .query_as(
                TOPICS,
                &Query::new().order_by(fields::CREATED_AT, Direction::Descending),
            )
            .await
    }

    /// Topics assigned to a group, newest first.
    pub async fn list_for_group(&self, group_id: &str) -> Result<Vec<Topic>> {
        self.store
            .query_as(
                TOPICS,
                &Query::new()
                    .contains(fields::ASSIGNED_GROUPS, group_id)
                    .order_by(fields::CREATED_AT, Direction::Descending),
            )
            .await
    }

    /// Edits title and/or description. Rollup fields are never touched here.
    pub async fn edit(&self, params: &EditTopic) -> Result<Topic> {
        let mut topic = self.get(&params.id).await?;
        let mut update = Map::new();

        if let Some(title) = &params.title {
            require_non_blank("title", title)?;
            topic.title = title.trim().to_string();
            update.insert("title".to_string(), json!(topic.title));
        }
        if let Some(description) = &params.description {
            topic.description = non_blank(Some(description));
            update.insert(
                "description".to_string(),
                topic.description.clone().map_or(Value::Null, Value::String),
            );
        }
        if update.is_empty() {
            return Ok(topic);
        }

        topic.updated_at = now();
        update.insert(
            fields::UPDATED_AT.to_string(),
            json!(topic.updated_at.as_millisecond()),
        );
        self.store.update(TOPICS, &topic.id, update).await?;
        Ok(topic)
    }

    /// Re-derives the topic's rollup from its current subtopics and persists
    /// it in one conditional write.
    ///
    /// # Errors
    ///
    /// Returns `DashboardError::NotFound` if the topic does not exist and
    /// `DashboardError::Conflict` if every retry lost a version race.
    pub async fn recompute(&self, topic_id: &str) -> Result<Topic> {
        let _guard = self.lock(topic_id).await;

        let mut attempt = 0;
        loop {
            let topic = self.get(topic_id).await?;
            let subtopics: Vec<Subtopic> = self
                .store
                .query_as(SUBTOPICS, &Query::new().eq(fields::TOPIC_ID, topic_id))
                .await?;
            let rollup = Rollup::from_statuses(subtopics.iter().map(|s| s.status));

            let updated_at = now();
            let version = topic.version + 1;
            let mut update = encode(&rollup)?;
            update.insert(fields::VERSION.to_string(), json!(version));
            update.insert(
                fields::UPDATED_AT.to_string(),
                json!(updated_at.as_millisecond()),
            );

            let outcome = self
                .store
                .update_if(
                    TOPICS,
                    topic_id,
                    &Precondition::field_equals(fields::VERSION, topic.version),
                    update,
                )
                .await;

            match outcome {
                Ok(()) => {
                    debug!(
                        "Recomputed topic {topic_id}: {}/{} completed, {}% ({})",
                        rollup.completed_subtopics(),
                        rollup.total_subtopics(),
                        rollup.progress(),
                        rollup.status().as_str()
                    );
                    return Ok(Topic {
                        rollup,
                        version,
                        updated_at,
                        ..topic
                    });
                }
                Err(DashboardError::Conflict { .. }) if attempt < self.recompute_retries => {
                    attempt += 1;
                    warn!("Topic {topic_id} changed during recompute, retrying ({attempt})");
                }
                Err(DashboardError::Conflict { .. }) => {
                    return Err(DashboardError::Conflict {
                        kind: "Topic",
                        id: topic_id.to_string(),
                    });
                }
                Err(DashboardError::NotFound { .. }) => {
                    return Err(DashboardError::not_found("Topic", topic_id));
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Recompute issued after a subtopic mutation. A topic deleted in the
    /// meantime is not an error.
    pub(crate) async fn refresh_after_child_change(&self, topic_id: &str) -> Result<Option<Topic>> {
        match self.recompute(topic_id).await {
            Ok(topic) => Ok(Some(topic)),
            Err(e) if e.is_not_found() => {
                debug!("Topic {topic_id} is gone, skipping recompute");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Deletes the topic and every subtopic referencing it in one atomic
    /// batch. Returns the deleted topic.
    pub async fn delete(&self, topic_id: &str) -> Result<Topic> {
        let _guard = self.lock(topic_id).await;

        let topic = self.get(topic_id).await?;
        let children = self
            .store
            .query(SUBTOPICS, &Query::new().eq(fields::TOPIC_ID, topic_id))
            .await?;

        let mut ops: Vec<WriteOp> = children
            .into_iter()
            .map(|doc| WriteOp::delete(SUBTOPICS, doc.id))
            .collect();
        let removed_subtopics = ops.len();
        ops.push(WriteOp::delete(TOPICS, topic_id));
        self.store.batch_write(ops).await?;

        info!("Deleted topic {topic_id} and {removed_subtopics} subtopics");
        Ok(topic)
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use crate::{params::CreateSubtopic, DashboardBuilder};

    #[tokio::test]
    async fn test_calls_on_missing_topics_leave_no_lock_entries() {
        let temp_dir = TempDir::new().unwrap();
        let dashboard = DashboardBuilder::new()
            .with_database_path(Some(temp_dir.path().join("dash.db")))
            .build()
            .await
            .unwrap();

        for n in 0..50 {
            let err = dashboard
                .topics()
                .recompute(&format!("nope-{n}"))
                .await
                .unwrap_err();
            assert!(err.is_not_found());

            let err = dashboard
                .subtopics()
                .create(&CreateSubtopic {
                    topic_id: format!("ghost-{n}"),
                    title: "Orphan".to_string(),
                    assigned_to: None,
                })
                .await
                .unwrap_err();
            assert!(err.is_not_found());
        }

        assert_eq!(dashboard.topics().locks.len(), 0);
    }
}
