//! Targeting modes and resolved recipient sets for shareable entities.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Who a resource is addressed to, with exactly the data each mode needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Hand-picked members
    Individuals { member_ids: Vec<String> },
    /// One group, usually the one currently open in the UI
    Group { group_id: String },
    /// Every group the acting user belongs to, looked up at creation time
    AllMyGroups,
}

impl Target {
    /// The discriminator persisted alongside the resolved recipients.
    pub fn mode(&self) -> TargetMode {
        match self {
            Target::Individuals { .. } => TargetMode::Individuals,
            Target::Group { .. } => TargetMode::Group,
            Target::AllMyGroups => TargetMode::AllMyGroups,
        }
    }
}

/// Persisted targeting discriminator for resources.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TargetMode {
    Individuals,
    Group,
    AllMyGroups,
}

impl FromStr for TargetMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "individuals" => Ok(TargetMode::Individuals),
            "group" => Ok(TargetMode::Group),
            "all_my_groups" => Ok(TargetMode::AllMyGroups),
            _ => Err(format!("Invalid target audience: {s}")),
        }
    }
}

impl TargetMode {
    /// Storage string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetMode::Individuals => "individuals",
            TargetMode::Group => "group",
            TargetMode::AllMyGroups => "all_my_groups",
        }
    }
}

/// Who a task is assigned to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskTarget {
    Individual { user_id: String },
    Group { group_id: String },
}

impl TaskTarget {
    pub fn mode(&self) -> TaskTargetMode {
        match self {
            TaskTarget::Individual { .. } => TaskTargetMode::Individual,
            TaskTarget::Group { .. } => TaskTargetMode::Group,
        }
    }

    /// The equivalent resource target, so tasks share the resolver.
    pub fn to_target(&self) -> Target {
        match self {
            TaskTarget::Individual { user_id } => Target::Individuals {
                member_ids: vec![user_id.clone()],
            },
            TaskTarget::Group { group_id } => Target::Group {
                group_id: group_id.clone(),
            },
        }
    }
}

/// Persisted targeting discriminator for tasks.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TaskTargetMode {
    Individual,
    Group,
}

impl TaskTargetMode {
    /// Storage string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskTargetMode::Individual => "individual",
            TaskTargetMode::Group => "group",
        }
    }
}

/// Concrete recipients resolved at creation time and never recomputed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Recipients {
    #[serde(default)]
    pub assigned_to: Vec<String>,
    #[serde(default)]
    pub assigned_to_groups: Vec<String>,
}

impl Recipients {
    pub fn users(ids: Vec<String>) -> Self {
        Self {
            assigned_to: ids,
            assigned_to_groups: Vec::new(),
        }
    }

    pub fn groups(ids: Vec<String>) -> Self {
        Self {
            assigned_to: Vec::new(),
            assigned_to_groups: ids,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.assigned_to.is_empty() && self.assigned_to_groups.is_empty()
    }

    /// Whether a user is addressed directly or through one of their groups.
    pub fn reaches(&self, user_id: &str, user_groups: &[String]) -> bool {
        self.assigned_to.iter().any(|id| id == user_id)
            || self
                .assigned_to_groups
                .iter()
                .any(|group| user_groups.contains(group))
    }
}
