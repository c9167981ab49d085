//! Topic model and its derived progress rollup.

use std::str::FromStr;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::SubtopicStatus;

/// Derived status of a topic.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TopicStatus {
    /// No subtopics, or none completed
    #[default]
    Pending,

    /// Some but not all subtopics completed
    InProgress,

    /// Every subtopic completed
    Completed,
}

impl FromStr for TopicStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(TopicStatus::Pending),
            "in_progress" | "inprogress" => Ok(TopicStatus::InProgress),
            "completed" => Ok(TopicStatus::Completed),
            _ => Err(format!("Invalid topic status: {s}")),
        }
    }
}

impl TopicStatus {
    /// Storage string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            TopicStatus::Pending => "pending",
            TopicStatus::InProgress => "in_progress",
            TopicStatus::Completed => "completed",
        }
    }
}

/// Rounded completion percentage, half-up, in integer arithmetic.
///
/// `completed` is clamped to `total`; an empty topic is 0%.
pub fn progress_percent(completed: u32, total: u32) -> u8 {
    if total == 0 {
        return 0;
    }
    let completed = u64::from(completed.min(total));
    let total = u64::from(total);
    // round(100c/t) == floor((200c + t) / 2t)
    ((200 * completed + total) / (2 * total)) as u8
}

/// Aggregate fields of a topic, always derived from subtopic counts.
///
/// The fields are private: the only way to obtain a rollup is from counts,
/// which keeps `progress` and `status` consistent with them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Rollup {
    status: TopicStatus,
    progress: u8,
    total_subtopics: u32,
    completed_subtopics: u32,
}

impl Rollup {
    /// Builds the rollup for `completed` out of `total` subtopics.
    pub fn from_counts(completed: u32, total: u32) -> Self {
        let completed = completed.min(total);
        let progress = progress_percent(completed, total);
        let status = if total == 0 || progress == 0 {
            TopicStatus::Pending
        } else if progress == 100 {
            TopicStatus::Completed
        } else {
            TopicStatus::InProgress
        };

        Self {
            status,
            progress,
            total_subtopics: total,
            completed_subtopics: completed,
        }
    }

    /// Builds the rollup from the statuses of every subtopic of a topic.
    pub fn from_statuses<I>(statuses: I) -> Self
    where
        I: IntoIterator<Item = SubtopicStatus>,
    {
        let (completed, total) = statuses.into_iter().fold((0u32, 0u32), |(done, all), status| {
            let done = if status == SubtopicStatus::Completed {
                done + 1
            } else {
                done
            };
            (done, all + 1)
        });
        Self::from_counts(completed, total)
    }

    pub fn status(&self) -> TopicStatus {
        self.status
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn total_subtopics(&self) -> u32 {
        self.total_subtopics
    }

    pub fn completed_subtopics(&self) -> u32 {
        self.completed_subtopics
    }

    /// Number of subtopics still pending.
    pub fn pending_subtopics(&self) -> u32 {
        self.total_subtopics.saturating_sub(self.completed_subtopics)
    }
}

/// A trackable unit of work whose progress is derived from its subtopics.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    /// Unique identifier for the topic
    pub id: String,

    /// Title of the topic
    pub title: String,

    /// Optional longer description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Groups the topic is assigned to
    #[serde(default)]
    pub assigned_groups: Vec<String>,

    /// Display names of `assigned_groups`, same order
    #[serde(default)]
    pub assigned_group_names: Vec<String>,

    /// Derived progress fields
    #[serde(flatten)]
    pub rollup: Rollup,

    /// Incremented on every recompute; guards against lost updates
    #[serde(default)]
    pub version: u64,

    /// Identifier of the creating actor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,

    /// Timestamp when the topic was created (UTC)
    #[serde(with = "jiff::fmt::serde::timestamp::millisecond::required")]
    pub created_at: Timestamp,

    /// Timestamp of the last edit or recompute (UTC)
    #[serde(with = "jiff::fmt::serde::timestamp::millisecond::required")]
    pub updated_at: Timestamp,
}
