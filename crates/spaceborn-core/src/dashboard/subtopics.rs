//! Subtopic repository.
//!
//! Every mutation here is a two-step sequence: write the subtopic, then
//! recompute the parent topic through [`TopicAggregator`]. Both steps finish
//! before the method returns, so callers never observe a stale rollup after
//! a successful call.

use log::info;
use serde_json::{json, Map, Value};
use uuid::Uuid;

use super::topics::TopicAggregator;
use crate::{
    error::{require_non_blank, DashboardError, Result},
    models::{fields, now, Subtopic, SubtopicStatus},
    params::{CreateSubtopic, RemoveSubtopic, ToggleSubtopic},
    store::{
        collections::{SUBTOPICS, TOPICS},
        encode, Direction, GuardedStore, Query, WriteOp,
    },
};

/// CRUD over subtopics scoped to a topic.
#[derive(Clone)]
pub struct SubtopicRepository {
    store: GuardedStore,
    aggregator: TopicAggregator,
}

impl SubtopicRepository {
    pub(crate) fn new(store: GuardedStore, aggregator: TopicAggregator) -> Self {
        Self { store, aggregator }
    }

    /// Adds a pending subtopic, then recomputes the topic.
    ///
    /// # Errors
    ///
    /// `Validation` for a blank title, `NotFound` if the topic does not exist.
    pub async fn create(&self, params: &CreateSubtopic) -> Result<Subtopic> {
        require_non_blank("title", &params.title)?;

        let subtopic = Subtopic {
            id: Uuid::new_v4().simple().to_string(),
            topic_id: params.topic_id.clone(),
            title: params.title.trim().to_string(),
            status: SubtopicStatus::Pending,
            assigned_to: params.assigned_to.clone(),
            created_at: now(),
        };

        // The topic update fails the batch if the topic is gone, so the
        // subtopic is never written without its parent.
        let mut touch = Map::new();
        touch.insert(
            fields::UPDATED_AT.to_string(),
            json!(subtopic.created_at.as_millisecond()),
        );
        let ops = vec![
            WriteOp::Update {
                collection: TOPICS.to_string(),
                id: subtopic.topic_id.clone(),
                fields: touch,
            },
            WriteOp::Set {
                collection: SUBTOPICS.to_string(),
                id: subtopic.id.clone(),
                fields: encode(&subtopic)?,
            },
        ];
        self.store.batch_write(ops).await.map_err(|e| {
            if e.is_not_found() {
                DashboardError::not_found("Topic", &subtopic.topic_id)
            } else {
                e
            }
        })?;

        self.aggregator
            .refresh_after_child_change(&subtopic.topic_id)
            .await?;

        info!(
            "Added subtopic {} to topic {}",
            subtopic.id, subtopic.topic_id
        );
        Ok(subtopic)
    }

    /// All subtopics of a topic in creation order. A missing topic simply
    /// has none.
    pub async fn list(&self, topic_id: &str) -> Result<Vec<Subtopic>> {
        self.store
            .query_as(
                SUBTOPICS,
                &Query::new()
                    .eq(fields::TOPIC_ID, topic_id)
                    .order_by(fields::CREATED_AT, Direction::Ascending),
            )
            .await
    }

    pub async fn get(&self, subtopic_id: &str) -> Result<Subtopic> {
        self.store.fetch(SUBTOPICS, subtopic_id, "Subtopic").await
    }

    /// Moves the subtopic to the opposite of `current_status`, then
    /// recomputes the topic.
    ///
    /// The caller's `current_status` is taken as intent: the stored value is
    /// set to `current_status.toggled()` rather than flipped, so two callers
    /// acting on the same stale view converge on the state they both asked
    /// for.
    pub async fn toggle_status(&self, params: &ToggleSubtopic) -> Result<Subtopic> {
        let mut subtopic = self.get_in_topic(&params.id, &params.topic_id).await?;

        let next = params.current_status.toggled();
        let mut update = Map::new();
        update.insert(fields::STATUS.to_string(), json!(next.as_str()));
        self.store.update(SUBTOPICS, &subtopic.id, update).await?;
        subtopic.status = next;

        self.aggregator
            .refresh_after_child_change(&params.topic_id)
            .await?;
        Ok(subtopic)
    }

    /// Sets or clears the assignee. Does not affect the rollup.
    pub async fn assign(&self, subtopic_id: &str, user_id: Option<&str>) -> Result<Subtopic> {
        let mut subtopic = self.get(subtopic_id).await?;
        subtopic.assigned_to = user_id.map(String::from);

        let mut update = Map::new();
        update.insert(
            "assignedTo".to_string(),
            subtopic
                .assigned_to
                .clone()
                .map_or(Value::Null, Value::String),
        );
        self.store.update(SUBTOPICS, subtopic_id, update).await?;
        Ok(subtopic)
    }

    /// Removes the subtopic, then recomputes the topic. Returns the removed
    /// subtopic.
    pub async fn delete(&self, params: &RemoveSubtopic) -> Result<Subtopic> {
        let subtopic = self.get_in_topic(&params.id, &params.topic_id).await?;
        self.store.delete(SUBTOPICS, &subtopic.id).await?;

        self.aggregator
            .refresh_after_child_change(&params.topic_id)
            .await?;

        info!(
            "Removed subtopic {} from topic {}",
            subtopic.id, subtopic.topic_id
        );
        Ok(subtopic)
    }

    async fn get_in_topic(&self, subtopic_id: &str, topic_id: &str) -> Result<Subtopic> {
        let subtopic = self.get(subtopic_id).await?;
        if subtopic.topic_id != topic_id {
            return Err(DashboardError::validation("topic_id").with_reason(format!(
                "subtopic {subtopic_id} belongs to topic {}, not {topic_id}",
                subtopic.topic_id
            )));
        }
        Ok(subtopic)
    }
}
