//! Display implementations for domain models.
//!
//! Kept apart from the model definitions so that `models` stays a plain data
//! layer. Every implementation writes markdown.

use std::fmt;

use super::datetime::LocalDateTime;
use crate::models::{
    Group, Priority, Resource, Role, Subtopic, SubtopicStatus, TargetMode, Task, TaskStatus,
    TaskTargetMode, Topic, TopicStatus, User,
};

impl fmt::Display for TopicStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for SubtopicStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for TargetMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for TaskTargetMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Ten-cell text progress bar followed by the percentage, e.g.
/// `███████░░░ 67%`.
pub struct ProgressBar(pub u8);

impl fmt::Display for ProgressBar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let percent = self.0.min(100);
        let filled = usize::from((percent + 5) / 10);
        write!(
            f,
            "{}{} {percent}%",
            "█".repeat(filled),
            "░".repeat(10 - filled)
        )
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rollup = &self.rollup;
        writeln!(f, "## {} (ID: {})", self.title, self.id)?;
        writeln!(f)?;
        writeln!(f, "- **Status**: {}", rollup.status())?;
        writeln!(f, "- **Progress**: {}", ProgressBar(rollup.progress()))?;
        writeln!(
            f,
            "- **Subtopics**: {}/{} completed",
            rollup.completed_subtopics(),
            rollup.total_subtopics()
        )?;
        if !self.assigned_group_names.is_empty() {
            writeln!(f, "- **Groups**: {}", self.assigned_group_names.join(", "))?;
        }
        writeln!(f, "- **Created**: {}", LocalDateTime(&self.created_at))?;
        writeln!(f, "- **Updated**: {}", LocalDateTime(&self.updated_at))?;

        if let Some(desc) = &self.description {
            writeln!(f)?;
            writeln!(f, "{desc}")?;
        }
        writeln!(f)
    }
}

impl fmt::Display for Subtopic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "- {} {} (ID: {})",
            self.status.with_icon(),
            self.title,
            self.id
        )?;
        if let Some(assignee) = &self.assigned_to {
            write!(f, " @{assignee}")?;
        }
        writeln!(f)
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "### {} ({}) (ID: {})",
            self.title,
            self.status.with_icon(),
            self.id
        )?;
        writeln!(f)?;
        writeln!(f, "- **Priority**: {}", self.priority)?;
        if let Some(deadline) = &self.deadline {
            writeln!(f, "- **Deadline**: {}", LocalDateTime(deadline))?;
        }
        match self.target_audience {
            TaskTargetMode::Individual => {
                writeln!(f, "- **Assigned to**: {}", self.recipients.assigned_to.join(", "))?
            }
            TaskTargetMode::Group => writeln!(
                f,
                "- **Assigned to groups**: {}",
                self.recipients.assigned_to_groups.join(", ")
            )?,
        }
        writeln!(f, "- **Created by**: {}", self.created_by)?;
        if let (TaskStatus::Completed, Some(name)) = (self.status, &self.verified_by_name) {
            writeln!(f, "- **Verified by**: {name}")?;
        }
        if let Some(completed_at) = &self.completed_at {
            writeln!(f, "- **Completed**: {}", LocalDateTime(completed_at))?;
        }

        if let Some(desc) = &self.description {
            writeln!(f)?;
            writeln!(f, "{desc}")?;
        }
        writeln!(f)
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "### {} (ID: {})", self.title, self.id)?;
        writeln!(f)?;
        if let Some(link) = &self.link {
            writeln!(f, "- **Link**: {link}")?;
        }
        let audience = match self.target_audience {
            TargetMode::Individuals => self.recipients.assigned_to.join(", "),
            TargetMode::Group | TargetMode::AllMyGroups
                if self.recipients.assigned_to_groups.is_empty() =>
            {
                "nobody".to_string()
            }
            TargetMode::Group | TargetMode::AllMyGroups => {
                format!("groups {}", self.recipients.assigned_to_groups.join(", "))
            }
        };
        writeln!(f, "- **Shared with**: {audience} ({})", self.target_audience)?;
        writeln!(f, "- **Shared by**: {}", self.created_by)?;
        writeln!(f, "- **Created**: {}", LocalDateTime(&self.created_at))?;

        if let Some(desc) = &self.description {
            writeln!(f)?;
            writeln!(f, "{desc}")?;
        }
        writeln!(f)
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "- **{}** (ID: {}, {})", self.name, self.id, self.role)
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "### {} (ID: {})", self.name, self.id)?;
        writeln!(f)?;
        if let Some(lead) = &self.lead_id {
            writeln!(f, "- **Lead**: {lead}")?;
        }
        if self.members.is_empty() {
            writeln!(f, "- **Members**: none")?;
        } else {
            writeln!(f, "- **Members**: {}", self.members.join(", "))?;
        }
        writeln!(f)
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;

    use super::*;
    use crate::models::{Recipients, Rollup};

    fn timestamp() -> Timestamp {
        Timestamp::from_second(1640995200).unwrap()
    }

    #[test]
    fn test_progress_bar() {
        assert_eq!(ProgressBar(0).to_string(), "░░░░░░░░░░ 0%");
        assert_eq!(ProgressBar(67).to_string(), "███████░░░ 67%");
        assert_eq!(ProgressBar(100).to_string(), "██████████ 100%");
    }

    #[test]
    fn test_topic_display() {
        let topic = Topic {
            id: "t1".to_string(),
            title: "Auth Module".to_string(),
            description: Some("Login and sessions".to_string()),
            assigned_groups: vec!["g1".to_string()],
            assigned_group_names: vec!["Backend".to_string()],
            rollup: Rollup::from_counts(1, 4),
            version: 3,
            created_by: None,
            created_at: timestamp(),
            updated_at: timestamp(),
        };

        let output = topic.to_string();
        assert!(output.contains("## Auth Module (ID: t1)"));
        assert!(output.contains("- **Status**: in_progress"));
        assert!(output.contains("25%"));
        assert!(output.contains("1/4 completed"));
        assert!(output.contains("- **Groups**: Backend"));
        assert!(output.contains("Login and sessions"));
    }

    #[test]
    fn test_subtopic_display() {
        let subtopic = Subtopic {
            id: "s1".to_string(),
            topic_id: "t1".to_string(),
            title: "Login form".to_string(),
            status: SubtopicStatus::Completed,
            assigned_to: Some("u1".to_string()),
            created_at: timestamp(),
        };
        assert_eq!(
            subtopic.to_string(),
            "- ✓ Completed Login form (ID: s1) @u1\n"
        );
    }

    #[test]
    fn test_task_display_shows_verifier_only_when_completed() {
        let mut task = Task {
            id: "k1".to_string(),
            title: "Write tests".to_string(),
            description: None,
            status: TaskStatus::Review,
            priority: Priority::High,
            deadline: None,
            target_audience: TaskTargetMode::Group,
            recipients: Recipients::groups(vec!["g1".to_string()]),
            group_id: Some("g1".to_string()),
            created_by: "lead".to_string(),
            verified_by: None,
            verified_by_name: Some("Ada".to_string()),
            created_at: timestamp(),
            updated_at: timestamp(),
            completed_at: None,
        };

        let output = task.to_string();
        assert!(output.contains("◎ Review"));
        assert!(output.contains("- **Assigned to groups**: g1"));
        assert!(!output.contains("Verified by"));

        task.status = TaskStatus::Completed;
        assert!(task.to_string().contains("- **Verified by**: Ada"));
    }

    #[test]
    fn test_resource_display_with_no_recipients() {
        let resource = Resource {
            id: "r1".to_string(),
            title: "Style guide".to_string(),
            description: None,
            link: Some("https://example.com/style".to_string()),
            target_audience: TargetMode::AllMyGroups,
            recipients: Recipients::default(),
            created_by: "u1".to_string(),
            created_at: timestamp(),
        };

        let output = resource.to_string();
        assert!(output.contains("- **Link**: https://example.com/style"));
        assert!(output.contains("- **Shared with**: nobody (all_my_groups)"));
    }
}
