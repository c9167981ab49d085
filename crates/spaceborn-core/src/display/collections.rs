//! Collection wrapper types for displaying groups of domain objects.
//!
//! Each wrapper formats its items with their own `Display` implementation and
//! prints a fixed message when empty.

use std::{fmt, ops::Index};

use crate::models::{Group, Resource, Subtopic, Task, Topic};

macro_rules! collection {
    ($(#[$meta:meta])* $name:ident, $item:ty, $empty:literal) => {
        $(#[$meta])*
        pub struct $name(pub Vec<$item>);

        impl $name {
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }

            pub fn len(&self) -> usize {
                self.0.len()
            }

            pub fn get(&self, index: usize) -> Option<&$item> {
                self.0.get(index)
            }

            pub fn iter(&self) -> std::slice::Iter<'_, $item> {
                self.0.iter()
            }
        }

        impl Index<usize> for $name {
            type Output = $item;

            fn index(&self, index: usize) -> &Self::Output {
                &self.0[index]
            }
        }

        impl IntoIterator for $name {
            type Item = $item;
            type IntoIter = std::vec::IntoIter<Self::Item>;

            fn into_iter(self) -> Self::IntoIter {
                self.0.into_iter()
            }
        }

        impl<'a> IntoIterator for &'a $name {
            type Item = &'a $item;
            type IntoIter = std::slice::Iter<'a, $item>;

            fn into_iter(self) -> Self::IntoIter {
                self.0.iter()
            }
        }

        impl From<Vec<$item>> for $name {
            fn from(items: Vec<$item>) -> Self {
                Self(items)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.0.is_empty() {
                    writeln!(f, "{}", $empty)
                } else {
                    for item in &self.0 {
                        write!(f, "{item}")?;
                    }
                    Ok(())
                }
            }
        }
    };
}

collection!(
    /// Topics, usually newest first.
    Topics,
    Topic,
    "No topics found."
);

collection!(
    /// Subtopics of one topic, rendered as a checklist.
    Subtopics,
    Subtopic,
    "No subtopics yet."
);

collection!(Tasks, Task, "No tasks found.");

collection!(Resources, Resource, "No resources found.");

collection!(Groups, Group, "No groups found.");

#[cfg(test)]
mod tests {
    use jiff::Timestamp;

    use super::*;
    use crate::models::{Rollup, SubtopicStatus};

    fn topic(id: &str, title: &str) -> Topic {
        Topic {
            id: id.to_string(),
            title: title.to_string(),
            description: None,
            assigned_groups: vec![],
            assigned_group_names: vec![],
            rollup: Rollup::default(),
            version: 0,
            created_by: None,
            created_at: Timestamp::from_second(1640995200).unwrap(),
            updated_at: Timestamp::from_second(1640995200).unwrap(),
        }
    }

    #[test]
    fn test_empty_collections() {
        assert_eq!(Topics(vec![]).to_string(), "No topics found.\n");
        assert_eq!(Subtopics(vec![]).to_string(), "No subtopics yet.\n");
        assert_eq!(Tasks(vec![]).to_string(), "No tasks found.\n");
        assert_eq!(Resources(vec![]).to_string(), "No resources found.\n");
        assert_eq!(Groups(vec![]).to_string(), "No groups found.\n");
    }

    #[test]
    fn test_topics_display() {
        let topics = Topics(vec![topic("t1", "Auth Module"), topic("t2", "Billing")]);
        assert_eq!(topics.len(), 2);
        assert_eq!(topics[1].title, "Billing");

        let output = topics.to_string();
        assert!(output.contains("## Auth Module (ID: t1)"));
        assert!(output.contains("## Billing (ID: t2)"));
        assert!(!output.starts_with("# "));
    }

    #[test]
    fn test_subtopics_checklist() {
        let subtopic = |id: &str, status| Subtopic {
            id: id.to_string(),
            topic_id: "t1".to_string(),
            title: format!("Item {id}"),
            status,
            assigned_to: None,
            created_at: Timestamp::from_second(1640995200).unwrap(),
        };
        let subtopics = Subtopics::from(vec![
            subtopic("s1", SubtopicStatus::Completed),
            subtopic("s2", SubtopicStatus::Pending),
        ]);

        let lines: Vec<String> = subtopics.to_string().lines().map(String::from).collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("✓ Completed Item s1"));
        assert!(lines[1].contains("○ Pending Item s2"));
    }
}
