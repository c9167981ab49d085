//! Data models for topics, subtopics, shareable entities and the directory.
//!
//! All models serialize with camelCase field names, which is the shape they
//! take inside the document store. Timestamps are stored as integer
//! milliseconds since the Unix epoch so that ordering by them is numeric.
//! Display implementations live in [`crate::display::models`].

use jiff::Timestamp;

pub mod actor;
pub mod audience;
pub mod directory;
pub mod resource;
pub mod subtopic;
pub mod task;
pub mod topic;


pub use actor::{Actor, Role};
pub use audience::{Recipients, Target, TargetMode, TaskTarget, TaskTargetMode};
pub use directory::{Group, User};
pub use resource::Resource;
pub use subtopic::{Subtopic, SubtopicStatus};
pub use task::{Priority, Task, TaskStatus};
pub use topic::{Rollup, Topic, TopicStatus};

/// Field names shared by several collections.
pub mod fields {
    pub const TOPIC_ID: &str = "topicId";
    pub const STATUS: &str = "status";
    pub const VERSION: &str = "version";
    pub const CREATED_AT: &str = "createdAt";
    pub const CREATED_BY: &str = "createdBy";
    pub const UPDATED_AT: &str = "updatedAt";
    pub const ASSIGNED_TO: &str = "assignedTo";
    pub const ASSIGNED_TO_GROUPS: &str = "assignedToGroups";
    pub const ASSIGNED_GROUPS: &str = "assignedGroups";
    pub const MEMBERS: &str = "members";
    pub const NAME: &str = "name";
}

/// Current time truncated to the millisecond precision used in storage, so
/// that freshly built models compare equal to their stored form.
pub(crate) fn now() -> Timestamp {
    let now = Timestamp::now();
    Timestamp::from_millisecond(now.as_millisecond()).unwrap_or(now)
}
