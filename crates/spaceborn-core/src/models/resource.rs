//! Shared resource model.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{Recipients, TargetMode};

/// A link or document shared with an audience.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: String,

    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Where the resource lives (URL or path)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,

    /// How recipients were chosen
    pub target_audience: TargetMode,

    /// Resolved at creation, immutable afterwards
    #[serde(flatten)]
    pub recipients: Recipients,

    pub created_by: String,

    #[serde(with = "jiff::fmt::serde::timestamp::millisecond::required")]
    pub created_at: Timestamp,
}
