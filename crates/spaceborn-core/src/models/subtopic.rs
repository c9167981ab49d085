//! Subtopic model definition.

use std::str::FromStr;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Binary status of a subtopic.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SubtopicStatus {
    #[default]
    Pending,
    Completed,
}

impl FromStr for SubtopicStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(SubtopicStatus::Pending),
            "completed" | "done" => Ok(SubtopicStatus::Completed),
            _ => Err(format!("Invalid subtopic status: {s}")),
        }
    }
}

impl SubtopicStatus {
    /// Storage string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            SubtopicStatus::Pending => "pending",
            SubtopicStatus::Completed => "completed",
        }
    }

    /// The other status.
    pub fn toggled(self) -> Self {
        match self {
            SubtopicStatus::Pending => SubtopicStatus::Completed,
            SubtopicStatus::Completed => SubtopicStatus::Pending,
        }
    }

    /// Status with a check-box marker for display.
    pub fn with_icon(&self) -> &'static str {
        match self {
            SubtopicStatus::Completed => "✓ Completed",
            SubtopicStatus::Pending => "○ Pending",
        }
    }
}

/// An atomic work item under a topic.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Subtopic {
    /// Unique identifier for the subtopic
    pub id: String,

    /// ID of the parent topic
    pub topic_id: String,

    /// Short title
    pub title: String,

    /// Current status
    pub status: SubtopicStatus,

    /// Optional assignee
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,

    /// Timestamp when the subtopic was created (UTC)
    #[serde(with = "jiff::fmt::serde::timestamp::millisecond::required")]
    pub created_at: Timestamp,
}
