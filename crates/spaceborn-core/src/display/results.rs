//! Result wrapper types for displaying operation outcomes.

use std::fmt;

use crate::models::{Group, Resource, Subtopic, Task, Topic, User};

/// Models that can be announced in an operation result.
pub trait Labeled {
    /// Lower-case noun used in messages, e.g. `topic`
    const KIND: &'static str;

    fn id(&self) -> &str;

    /// Human-facing name of the item
    fn label(&self) -> &str;
}

macro_rules! labeled {
    ($item:ty, $kind:literal, $label:ident) => {
        impl Labeled for $item {
            const KIND: &'static str = $kind;

            fn id(&self) -> &str {
                &self.id
            }

            fn label(&self) -> &str {
                &self.$label
            }
        }
    };
}

labeled!(Topic, "topic", title);
labeled!(Subtopic, "subtopic", title);
labeled!(Task, "task", title);
labeled!(Resource, "resource", title);
labeled!(Group, "group", name);
labeled!(User, "user", name);

/// Wrapper type for displaying the result of create operations: a one-line
/// confirmation followed by the created item.
///
/// ```rust
/// use spaceborn_core::{display::CreateResult, models::{Role, User}};
///
/// let user = User {
///     id: "u1".to_string(),
///     name: "Ada".to_string(),
///     role: Role::CoreEmployee,
/// };
/// let output = CreateResult::new(user).to_string();
/// assert!(output.starts_with("Created user with ID: u1"));
/// ```
pub struct CreateResult<T> {
    pub resource: T,
}

impl<T> CreateResult<T> {
    pub fn new(resource: T) -> Self {
        Self { resource }
    }
}

impl<T: Labeled + fmt::Display> fmt::Display for CreateResult<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Created {} with ID: {}", T::KIND, self.resource.id())?;
        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

/// Wrapper type for displaying the result of update operations, optionally
/// listing what changed.
pub struct UpdateResult<T> {
    pub resource: T,
    pub changes: Vec<String>,
}

impl<T> UpdateResult<T> {
    pub fn new(resource: T) -> Self {
        Self {
            resource,
            changes: Vec::new(),
        }
    }

    pub fn with_changes(resource: T, changes: Vec<String>) -> Self {
        Self { resource, changes }
    }
}

impl<T: Labeled + fmt::Display> fmt::Display for UpdateResult<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Updated {} with ID: {}", T::KIND, self.resource.id())?;

        if !self.changes.is_empty() {
            writeln!(f)?;
            writeln!(f, "Changes made:")?;
            for change in &self.changes {
                writeln!(f, "- {change}")?;
            }
        }

        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

/// Wrapper type for displaying the result of delete operations.
pub struct DeleteResult<T> {
    pub resource: T,
}

impl<T> DeleteResult<T> {
    pub fn new(resource: T) -> Self {
        Self { resource }
    }
}

impl<T: Labeled> fmt::Display for DeleteResult<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Deleted {} '{}' (ID: {})",
            T::KIND,
            self.resource.label(),
            self.resource.id()
        )
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;

    use super::*;
    use crate::models::{Rollup, SubtopicStatus};

    fn topic() -> Topic {
        Topic {
            id: "t1".to_string(),
            title: "Auth Module".to_string(),
            description: None,
            assigned_groups: vec![],
            assigned_group_names: vec![],
            rollup: Rollup::from_counts(2, 3),
            version: 4,
            created_by: None,
            created_at: Timestamp::from_second(1640995200).unwrap(),
            updated_at: Timestamp::from_second(1640995200).unwrap(),
        }
    }

    #[test]
    fn test_update_result_lists_changes() {
        let result = UpdateResult::with_changes(topic(), vec!["Recomputed rollup".to_string()]);
        let output = result.to_string();
        assert!(output.starts_with("Updated topic with ID: t1"));
        assert!(output.contains("Changes made:\n- Recomputed rollup"));
        assert!(output.contains("67%"));

        let plain = UpdateResult::new(topic()).to_string();
        assert!(!plain.contains("Changes made:"));
    }

    #[test]
    fn test_delete_result() {
        let subtopic = Subtopic {
            id: "s9".to_string(),
            topic_id: "t1".to_string(),
            title: "Logout".to_string(),
            status: SubtopicStatus::Pending,
            assigned_to: None,
            created_at: Timestamp::from_second(1640995200).unwrap(),
        };
        assert_eq!(
            DeleteResult::new(subtopic).to_string(),
            "Deleted subtopic 'Logout' (ID: s9)\n"
        );
        assert_eq!(
            DeleteResult::new(topic()).to_string(),
            "Deleted topic 'Auth Module' (ID: t1)\n"
        );
    }
}
