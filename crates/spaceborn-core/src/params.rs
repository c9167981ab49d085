//! Parameter structures for dashboard operations.
//!
//! These structures are shared by every interface (the CLI today) and carry
//! no framework-specific derives. Interface layers define their own argument
//! types and convert into these with `From` implementations:
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐
//! │   CLI Args      │    │  Core Params    │
//! │  (clap derives) │───▶│ (minimal deps)  │
//! └─────────────────┘    └─────────────────┘
//! ```

use jiff::Timestamp;

use crate::models::{Priority, Role, SubtopicStatus, Target, TaskTarget};

/// Generic parameters for operations requiring just an ID.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Id {
    pub id: String,
}

impl Id {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Parameters for creating a topic.
#[derive(Debug, Clone, Default)]
pub struct CreateTopic {
    /// Title of the topic (required)
    pub title: String,
    pub description: Option<String>,
    /// Groups the topic is assigned to; names are looked up on creation
    pub assigned_groups: Vec<String>,
}

/// Parameters for editing a topic's descriptive fields.
///
/// Progress, status and counts are deliberately absent: they only change
/// through a recompute.
#[derive(Debug, Clone, Default)]
pub struct EditTopic {
    pub id: String,
    pub title: Option<String>,
    /// `Some("")` clears the description
    pub description: Option<String>,
}

/// Parameters for adding a subtopic to a topic.
#[derive(Debug, Clone, Default)]
pub struct CreateSubtopic {
    pub topic_id: String,
    pub title: String,
    pub assigned_to: Option<String>,
}

/// Parameters for flipping a subtopic between pending and completed.
#[derive(Debug, Clone)]
pub struct ToggleSubtopic {
    pub id: String,
    pub topic_id: String,
    /// Status the caller last saw; the subtopic ends up in the other one
    pub current_status: SubtopicStatus,
}

/// Parameters for removing a subtopic.
#[derive(Debug, Clone, Default)]
pub struct RemoveSubtopic {
    pub id: String,
    pub topic_id: String,
}

/// Parameters for sharing a resource.
#[derive(Debug, Clone)]
pub struct ShareResource {
    pub title: String,
    pub description: Option<String>,
    pub link: Option<String>,
    pub target: Target,
}

/// Parameters for creating a task.
#[derive(Debug, Clone)]
pub struct CreateTask {
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub deadline: Option<Timestamp>,
    pub target: TaskTarget,
    /// Group context; defaults to the target group for group tasks
    pub group_id: Option<String>,
}

/// Parameters for registering a user.
#[derive(Debug, Clone, Default)]
pub struct AddUser {
    /// Identity-provider key; generated when absent
    pub id: Option<String>,
    pub name: String,
    pub role: Role,
}

/// Parameters for creating a group.
#[derive(Debug, Clone, Default)]
pub struct CreateGroup {
    pub name: String,
    pub members: Vec<String>,
    /// Lead is added to the members if missing
    pub lead_id: Option<String>,
}
