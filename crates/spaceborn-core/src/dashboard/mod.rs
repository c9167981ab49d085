//! High-level dashboard API.
//!
//! [`Dashboard`] wires the document store, the identity provider and the
//! access-control policy into the components that implement the dashboard:
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │   Dashboard     │    │   Components    │    │  GuardedStore   │
//! │ (actor-aware    │───▶│ (topics, tasks, │───▶│ (any backend)   │
//! │  convenience)   │    │  resources ...) │    │                 │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! ## Submodules
//!
//! - [`builder`]: Factory for [`Dashboard`] instances
//! - [`topics`]: Topic creation, rollup recompute and cascade delete
//! - [`subtopics`]: Subtopic CRUD, each mutation followed by a recompute
//! - [`assignment`]: Target resolution for resources and tasks
//! - [`resources`]: Resource sharing
//! - [`tasks`]: Task lifecycle and verification gate
//! - [`directory`]: Users and groups
//!
//! # Usage
//!
//! ```rust
//! use spaceborn_core::{DashboardBuilder, params::{CreateSubtopic, CreateTopic}};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let dashboard = DashboardBuilder::new()
//!     .with_database_path(Some("dashboard.db"))
//!     .build()
//!     .await?;
//!
//! let topic = dashboard
//!     .create_topic(&CreateTopic {
//!         title: "Auth Module".to_string(),
//!         ..Default::default()
//!     })
//!     .await?;
//!
//! dashboard
//!     .subtopics()
//!     .create(&CreateSubtopic {
//!         topic_id: topic.id.clone(),
//!         title: "Login form".to_string(),
//!         assigned_to: None,
//!     })
//!     .await?;
//!
//! let topic = dashboard.topics().get(&topic.id).await?;
//! assert_eq!(topic.rollup.total_subtopics(), 1);
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

pub mod assignment;
pub mod builder;
pub mod directory;
mod locks;
pub mod resources;
pub mod subtopics;
pub mod tasks;
pub mod topics;

pub use assignment::AssignmentResolver;
pub use builder::DashboardBuilder;
pub use directory::Directory;
pub use resources::ResourceSharing;
pub use subtopics::SubtopicRepository;
pub use tasks::TaskLifecycle;
pub use topics::TopicAggregator;

use crate::{
    config::DashboardConfig,
    error::Result,
    identity::{AccessControl, IdentityProvider},
    models::{Actor, Resource, Task, Topic},
    params::{CreateTask, CreateTopic, ShareResource},
    store::GuardedStore,
};

/// Entry point to every dashboard component.
pub struct Dashboard {
    store: GuardedStore,
    config: DashboardConfig,
    identity: Arc<dyn IdentityProvider>,
    access: Arc<dyn AccessControl>,
    directory: Directory,
    topics: TopicAggregator,
    subtopics: SubtopicRepository,
    assignments: AssignmentResolver,
    resources: ResourceSharing,
    tasks: TaskLifecycle,
}

impl Dashboard {
    pub(crate) fn new(
        store: GuardedStore,
        config: DashboardConfig,
        identity: Arc<dyn IdentityProvider>,
        access: Arc<dyn AccessControl>,
    ) -> Self {
        let directory = Directory::new(store.clone());
        let topics = TopicAggregator::new(
            store.clone(),
            directory.clone(),
            Arc::default(),
            config.recompute_retries,
        );
        let subtopics = SubtopicRepository::new(store.clone(), topics.clone());
        let assignments = AssignmentResolver::new(directory.clone(), config.empty_fanout);
        let resources = ResourceSharing::new(store.clone(), assignments.clone());
        let tasks = TaskLifecycle::new(store.clone(), assignments.clone());

        Self {
            store,
            config,
            identity,
            access,
            directory,
            topics,
            subtopics,
            assignments,
            resources,
            tasks,
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// The guarded store shared by all components.
    pub fn store(&self) -> &GuardedStore {
        &self.store
    }

    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    pub fn topics(&self) -> &TopicAggregator {
        &self.topics
    }

    pub fn subtopics(&self) -> &SubtopicRepository {
        &self.subtopics
    }

    pub fn assignments(&self) -> &AssignmentResolver {
        &self.assignments
    }

    pub fn resources(&self) -> &ResourceSharing {
        &self.resources
    }

    pub fn tasks(&self) -> &TaskLifecycle {
        &self.tasks
    }

    /// Cancels every in-flight and future store call made through this
    /// dashboard.
    pub fn cancel(&self) {
        self.store.cancellation_token().cancel();
    }

    /// The principal the identity provider reports for this session.
    pub async fn current_actor(&self) -> Result<Actor> {
        self.identity.current_actor().await
    }

    /// Creates a topic attributed to the current actor.
    pub async fn create_topic(&self, params: &CreateTopic) -> Result<Topic> {
        let actor = self.current_actor().await?;
        self.topics.create(params, Some(&actor.id)).await
    }

    pub async fn share_resource(&self, params: &ShareResource) -> Result<Resource> {
        let actor = self.current_actor().await?;
        self.resources.share(params, &actor).await
    }

    /// Resources addressed to the current actor.
    pub async fn my_resources(&self) -> Result<Vec<Resource>> {
        let actor = self.current_actor().await?;
        self.resources.list_for(&actor).await
    }

    pub async fn create_task(&self, params: &CreateTask) -> Result<Task> {
        let actor = self.current_actor().await?;
        self.tasks.create(params, &actor).await
    }

    /// Tasks assigned to the current actor.
    pub async fn my_tasks(&self) -> Result<Vec<Task>> {
        let actor = self.current_actor().await?;
        self.tasks.list_for(&actor).await
    }

    /// Verifies a task as the current actor under the configured policy.
    pub async fn verify_task(&self, task_id: &str) -> Result<Task> {
        let actor = self.current_actor().await?;
        self.tasks.verify(task_id, &actor, self.access.as_ref()).await
    }

    pub async fn send_back_task(&self, task_id: &str) -> Result<Task> {
        let actor = self.current_actor().await?;
        self.tasks
            .send_back(task_id, &actor, self.access.as_ref())
            .await
    }
}
