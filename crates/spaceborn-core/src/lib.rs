//! Core library for the SPACE BORN team dashboard.
//!
//! The dashboard tracks topics broken into subtopics, shares resources and
//! assigns tasks to individuals or groups. This crate holds the business
//! logic on top of an abstract [`store::DocumentStore`]:
//!
//! - **Topics** ([`dashboard::topics`]) carry a progress rollup that is only
//!   ever written by a recompute over their subtopics.
//! - **Subtopics** ([`dashboard::subtopics`]) trigger that recompute after
//!   every mutation.
//! - **Resources and tasks** resolve their audience once, at creation, via
//!   [`dashboard::assignment`].
//! - **Tasks** move through a fixed lifecycle with a verification gate
//!   delegated to an [`identity::AccessControl`] policy.
//!
//! Output formatting lives in [`display`] as markdown `Display`
//! implementations, rendered by the CLI.
//!
//! # Quick Start
//!
//! ```rust
//! use spaceborn_core::{
//!     models::{Actor, Role, SubtopicStatus},
//!     params::{CreateSubtopic, CreateTopic, ToggleSubtopic},
//!     DashboardBuilder,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let dashboard = DashboardBuilder::new()
//!     .with_database_path(Some("dashboard.db"))
//!     .with_actor(Actor::new("u1", "Ada", Role::Admin))
//!     .build()
//!     .await?;
//!
//! let topic = dashboard
//!     .create_topic(&CreateTopic {
//!         title: "Auth Module".to_string(),
//!         description: Some("Login, sessions and tokens".to_string()),
//!         assigned_groups: vec![],
//!     })
//!     .await?;
//!
//! let subtopic = dashboard
//!     .subtopics()
//!     .create(&CreateSubtopic {
//!         topic_id: topic.id.clone(),
//!         title: "Login form".to_string(),
//!         assigned_to: None,
//!     })
//!     .await?;
//!
//! dashboard
//!     .subtopics()
//!     .toggle_status(&ToggleSubtopic {
//!         id: subtopic.id,
//!         topic_id: topic.id.clone(),
//!         current_status: SubtopicStatus::Pending,
//!     })
//!     .await?;
//!
//! let topic = dashboard.topics().get(&topic.id).await?;
//! println!("{topic}");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod dashboard;
pub mod db;
pub mod display;
pub mod error;
pub mod identity;
pub mod models;
pub mod params;
pub mod store;

// Re-export commonly used types
pub use config::{DashboardConfig, EmptyFanoutPolicy};
pub use dashboard::{Dashboard, DashboardBuilder};
pub use display::{
    CreateResult, DeleteResult, Groups, OperationStatus, Resources, Subtopics, Tasks, Topics,
    UpdateResult,
};
pub use error::{DashboardError, Result};
pub use identity::{AccessControl, IdentityProvider, RolePolicy, StaticIdentity};
pub use models::{
    Actor, Group, Priority, Recipients, Resource, Role, Rollup, Subtopic, SubtopicStatus, Target,
    Task, TaskStatus, TaskTarget, Topic, TopicStatus, User,
};
pub use store::{DocumentStore, GuardedStore, SqliteStore};
