//! Task lifecycle: creation, assignee transitions and the verification gate.

use log::{info, warn};
use serde_json::json;

use super::assignment::{created_by, fetch_addressed, AssignmentResolver};
use crate::{
    error::{require_non_blank, DashboardError, Result},
    identity::AccessControl,
    models::{fields, now, Actor, Task, TaskStatus, TaskTarget},
    params::CreateTask,
    store::{collections::TASKS, encode, Fields, GuardedStore, Precondition},
};

#[derive(Clone)]
pub struct TaskLifecycle {
    store: GuardedStore,
    resolver: AssignmentResolver,
}

impl TaskLifecycle {
    pub(crate) fn new(store: GuardedStore, resolver: AssignmentResolver) -> Self {
        Self { store, resolver }
    }

    /// Creates a pending task with recipients resolved now.
    pub async fn create(&self, params: &CreateTask, actor: &Actor) -> Result<Task> {
        require_non_blank("title", &params.title)?;
        let recipients = self
            .resolver
            .resolve(&params.target.to_target(), actor)
            .await?;

        let group_id = params.group_id.clone().or_else(|| match &params.target {
            TaskTarget::Group { group_id } => Some(group_id.trim().to_string()),
            TaskTarget::Individual { .. } => None,
        });

        let timestamp = now();
        let mut task = Task {
            id: String::new(),
            title: params.title.trim().to_string(),
            description: params.description.clone().filter(|d| !d.trim().is_empty()),
            status: TaskStatus::Pending,
            priority: params.priority,
            deadline: params.deadline,
            target_audience: params.target.mode(),
            recipients,
            group_id,
            created_by: actor.id.clone(),
            verified_by: None,
            verified_by_name: None,
            created_at: timestamp,
            updated_at: timestamp,
            completed_at: None,
        };
        task.id = self.store.insert(TASKS, encode(&task)?).await?;

        info!("{} created task {} '{}'", actor.id, task.id, task.title);
        Ok(task)
    }

    pub async fn get(&self, task_id: &str) -> Result<Task> {
        self.store.fetch(TASKS, task_id, "Task").await
    }

    /// Tasks assigned to the actor directly or through their groups, newest
    /// first.
    pub async fn list_for(&self, actor: &Actor) -> Result<Vec<Task>> {
        let groups: Vec<String> = self
            .resolver
            .directory()
            .groups_for(&actor.id)
            .await?
            .into_iter()
            .map(|group| group.id)
            .collect();
        fetch_addressed(&self.store, TASKS, &actor.id, &groups).await
    }

    pub async fn list_created_by(&self, actor: &Actor) -> Result<Vec<Task>> {
        self.store.query_as(TASKS, &created_by(&actor.id)).await
    }

    /// Moves a task along an assignee transition.
    ///
    /// # Errors
    ///
    /// `Validation` for any move outside the assignee table, which includes
    /// every move to `completed`. `Conflict` when the task changed status
    /// since it was read.
    pub async fn advance(&self, task_id: &str, next: TaskStatus) -> Result<Task> {
        let mut task = self.get(task_id).await?;
        if !task.status.can_advance_to(next) {
            return Err(DashboardError::validation("status").with_reason(format!(
                "cannot move a task from {} to {}",
                task.status.as_str(),
                next.as_str()
            )));
        }

        let mut update = Fields::new();
        update.insert(fields::STATUS.to_string(), json!(next.as_str()));
        self.transition(&mut task, next, update).await?;
        Ok(task)
    }

    /// [`advance`](TaskLifecycle::advance) with a status given as text.
    pub async fn advance_str(&self, task_id: &str, next: &str) -> Result<Task> {
        let next: TaskStatus = next
            .parse()
            .map_err(|e: String| DashboardError::validation("status").with_reason(e))?;
        self.advance(task_id, next).await
    }

    pub async fn start(&self, task_id: &str) -> Result<Task> {
        self.advance(task_id, TaskStatus::InProgress).await
    }

    pub async fn submit(&self, task_id: &str) -> Result<Task> {
        self.advance(task_id, TaskStatus::Review).await
    }

    /// Completes a task in review on behalf of an authorised verifier.
    pub async fn verify(
        &self,
        task_id: &str,
        verifier: &Actor,
        access: &dyn AccessControl,
    ) -> Result<Task> {
        let mut task = self.reviewable(task_id, verifier, access, "verify tasks").await?;

        let completed_at = now();
        let mut update = Fields::new();
        update.insert(
            fields::STATUS.to_string(),
            json!(TaskStatus::Completed.as_str()),
        );
        update.insert("verifiedBy".to_string(), json!(verifier.id));
        update.insert("verifiedByName".to_string(), json!(verifier.name));
        update.insert(
            "completedAt".to_string(),
            json!(completed_at.as_millisecond()),
        );
        self.transition(&mut task, TaskStatus::Completed, update)
            .await?;

        task.verified_by = Some(verifier.id.clone());
        task.verified_by_name = Some(verifier.name.clone());
        task.completed_at = Some(completed_at);
        info!("{} verified task {task_id}", verifier.id);
        Ok(task)
    }

    /// Returns a task in review to the assignee.
    pub async fn send_back(
        &self,
        task_id: &str,
        verifier: &Actor,
        access: &dyn AccessControl,
    ) -> Result<Task> {
        let mut task = self
            .reviewable(task_id, verifier, access, "send back tasks")
            .await?;

        let mut update = Fields::new();
        update.insert(
            fields::STATUS.to_string(),
            json!(TaskStatus::InProgress.as_str()),
        );
        self.transition(&mut task, TaskStatus::InProgress, update)
            .await?;

        info!("{} sent task {task_id} back", verifier.id);
        Ok(task)
    }

    /// Deletes a task and returns it.
    pub async fn delete(&self, task_id: &str) -> Result<Task> {
        let task = self.get(task_id).await?;
        self.store.delete(TASKS, task_id).await?;
        info!("Deleted task {task_id}");
        Ok(task)
    }

    async fn reviewable(
        &self,
        task_id: &str,
        verifier: &Actor,
        access: &dyn AccessControl,
        action: &'static str,
    ) -> Result<Task> {
        let task = self.get(task_id).await?;
        if task.status != TaskStatus::Review {
            return Err(DashboardError::validation("status").with_reason(format!(
                "task is {}, not awaiting review",
                task.status.as_str()
            )));
        }
        if !access.can_verify(verifier, &task) {
            warn!("{} may not {action}", verifier.id);
            return Err(DashboardError::PermissionDenied {
                actor: verifier.id.clone(),
                action,
            });
        }
        Ok(task)
    }

    /// Writes `update` only if the stored status is still the one on `task`.
    async fn transition(
        &self,
        task: &mut Task,
        next: TaskStatus,
        mut update: Fields,
    ) -> Result<()> {
        let updated_at = now();
        update.insert(
            fields::UPDATED_AT.to_string(),
            json!(updated_at.as_millisecond()),
        );

        self.store
            .update_if(
                TASKS,
                &task.id,
                &Precondition::field_equals(fields::STATUS, task.status.as_str()),
                update,
            )
            .await
            .map_err(|e| match e {
                DashboardError::Conflict { .. } => DashboardError::Conflict {
                    kind: "Task",
                    id: task.id.clone(),
                },
                DashboardError::NotFound { .. } => DashboardError::not_found("Task", &task.id),
                other => other,
            })?;

        task.status = next;
        task.updated_at = updated_at;
        Ok(())
    }
}
