//! Command-line argument definitions using clap.
//!
//! Argument structs carry the clap derives; core parameter types stay free of
//! them. Each struct converts into its core counterpart with `From`:
//!
//! ```text
//! User Input → CLI Args (clap) → Core Params → Dashboard
//! ```

use std::path::PathBuf;

use clap::{ArgGroup, Args as ClapArgs, Parser, Subcommand, ValueEnum};
use jiff::Timestamp;
use spaceborn_core::{
    models::{Actor, Priority, Role, SubtopicStatus, Target, TaskTarget},
    params::{
        AddUser, CreateGroup, CreateSubtopic, CreateTask, CreateTopic, EditTopic, Id,
        RemoveSubtopic, ShareResource,
    },
};

/// Team dashboard for topics, shared resources and tasks
///
/// Topics are broken into subtopics whose completion rolls up into the
/// topic's progress. Resources and tasks are addressed to individuals or
/// groups. The acting user is given with `--actor` and `--role`.
#[derive(Parser)]
#[command(version, about, name = "sb")]
pub struct Args {
    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/spaceborn/spaceborn.db
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    /// ID of the acting user
    #[arg(long, global = true, default_value = "guest")]
    pub actor: String,

    /// Display name of the acting user, stamped on verifications
    #[arg(long, global = true)]
    pub actor_name: Option<String>,

    /// Role of the acting user
    #[arg(long, global = true, value_enum, default_value_t = RoleArg::Guest)]
    pub role: RoleArg,

    /// Seconds to wait for each database call
    #[arg(long, global = true, default_value_t = 10)]
    pub timeout_secs: u64,

    /// Fail instead of sharing with nobody when the actor has no groups
    #[arg(long, global = true)]
    pub reject_empty_fanout: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Args {
    /// The principal described by the global flags.
    pub fn acting_user(&self) -> Actor {
        let name = self.actor_name.clone().unwrap_or_else(|| self.actor.clone());
        Actor::new(self.actor.clone(), name, self.role.into())
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage topics and their progress
    #[command(alias = "t")]
    Topic {
        #[command(subcommand)]
        command: TopicCommands,
    },
    /// Manage subtopics within topics
    #[command(alias = "st")]
    Subtopic {
        #[command(subcommand)]
        command: SubtopicCommands,
    },
    /// Share and browse resources
    #[command(alias = "r")]
    Resource {
        #[command(subcommand)]
        command: ResourceCommands,
    },
    /// Assign, progress and verify tasks
    #[command(alias = "k")]
    Task {
        #[command(subcommand)]
        command: TaskCommands,
    },
    /// Manage users
    #[command(alias = "u")]
    User {
        #[command(subcommand)]
        command: UserCommands,
    },
    /// Manage groups
    #[command(alias = "g")]
    Group {
        #[command(subcommand)]
        command: GroupCommands,
    },
}

/// Arguments for commands that act on a single item.
#[derive(ClapArgs)]
pub struct IdArgs {
    #[arg(help = "Unique identifier of the item")]
    pub id: String,
}

impl From<IdArgs> for Id {
    fn from(val: IdArgs) -> Self {
        Id { id: val.id }
    }
}

// ============================================================================
// Topics
// ============================================================================

/// Create a new topic
#[derive(ClapArgs)]
pub struct CreateTopicArgs {
    /// Title of the topic
    pub title: String,
    #[arg(short, long, help = "Optional description of the topic")]
    pub description: Option<String>,
    #[arg(
        short,
        long,
        value_delimiter = ',',
        help = "Group IDs the topic is assigned to, comma-separated"
    )]
    pub groups: Vec<String>,
}

impl From<CreateTopicArgs> for CreateTopic {
    fn from(val: CreateTopicArgs) -> Self {
        CreateTopic {
            title: val.title,
            description: val.description,
            assigned_groups: val.groups,
        }
    }
}

/// List topics, newest first
#[derive(ClapArgs)]
pub struct ListTopicsArgs {
    #[arg(long, help = "Only topics assigned to this group")]
    pub group: Option<String>,
}

/// Edit a topic's title or description
///
/// Progress, status and counts cannot be edited; they follow the subtopics.
#[derive(ClapArgs)]
pub struct EditTopicArgs {
    #[arg(help = "Unique identifier of the topic to edit")]
    pub id: String,
    #[arg(short, long, help = "New title")]
    pub title: Option<String>,
    #[arg(short, long, help = "New description; an empty string clears it")]
    pub description: Option<String>,
}

impl From<EditTopicArgs> for EditTopic {
    fn from(val: EditTopicArgs) -> Self {
        EditTopic {
            id: val.id,
            title: val.title,
            description: val.description,
        }
    }
}

/// Delete a topic and all of its subtopics
#[derive(ClapArgs)]
pub struct DeleteTopicArgs {
    #[arg(help = "Unique identifier of the topic to permanently delete")]
    pub id: String,
    /// Confirm the deletion (required to prevent accidental deletion)
    #[arg(long)]
    pub confirm: bool,
}

#[derive(Subcommand)]
pub enum TopicCommands {
    /// Create a new topic
    #[command(alias = "c")]
    Create(CreateTopicArgs),
    /// List topics
    #[command(aliases = ["l", "ls"])]
    List(ListTopicsArgs),
    /// Show a topic with its subtopics
    #[command(alias = "s")]
    Show(IdArgs),
    /// Edit a topic's title or description
    #[command(alias = "e")]
    Edit(EditTopicArgs),
    /// Recompute a topic's progress from its subtopics
    Recompute(IdArgs),
    /// Delete a topic and its subtopics
    #[command(aliases = ["d", "rm"])]
    Delete(DeleteTopicArgs),
}

// ============================================================================
// Subtopics
// ============================================================================

/// Add a subtopic to a topic
#[derive(ClapArgs)]
pub struct AddSubtopicArgs {
    #[arg(help = "Unique identifier of the topic to add this subtopic to")]
    pub topic_id: String,
    /// Title of the subtopic
    pub title: String,
    #[arg(short, long, help = "User ID to assign the subtopic to")]
    pub assign: Option<String>,
}

impl From<AddSubtopicArgs> for CreateSubtopic {
    fn from(val: AddSubtopicArgs) -> Self {
        CreateSubtopic {
            topic_id: val.topic_id,
            title: val.title,
            assigned_to: val.assign,
        }
    }
}

/// List the subtopics of a topic
#[derive(ClapArgs)]
pub struct ListSubtopicsArgs {
    #[arg(help = "Unique identifier of the topic")]
    pub topic_id: String,
}

/// Flip a subtopic between pending and completed
#[derive(ClapArgs)]
pub struct ToggleSubtopicArgs {
    #[arg(help = "Unique identifier of the topic the subtopic belongs to")]
    pub topic_id: String,
    #[arg(help = "Unique identifier of the subtopic to toggle")]
    pub id: String,
    #[arg(
        long,
        value_enum,
        help = "Status you last saw; defaults to the stored status"
    )]
    pub from: Option<SubtopicStatusArg>,
}

/// Assign a subtopic to a user, or clear the assignee
#[derive(ClapArgs)]
pub struct AssignSubtopicArgs {
    #[arg(help = "Unique identifier of the subtopic")]
    pub id: String,
    #[arg(help = "User ID to assign; omit to clear")]
    pub user_id: Option<String>,
}

/// Remove a subtopic from a topic
#[derive(ClapArgs)]
pub struct RemoveSubtopicArgs {
    #[arg(help = "Unique identifier of the topic the subtopic belongs to")]
    pub topic_id: String,
    #[arg(help = "Unique identifier of the subtopic to remove")]
    pub id: String,
}

impl From<RemoveSubtopicArgs> for RemoveSubtopic {
    fn from(val: RemoveSubtopicArgs) -> Self {
        RemoveSubtopic {
            id: val.id,
            topic_id: val.topic_id,
        }
    }
}

#[derive(Subcommand)]
pub enum SubtopicCommands {
    /// Add a subtopic to a topic
    #[command(alias = "a")]
    Add(AddSubtopicArgs),
    /// List the subtopics of a topic
    #[command(aliases = ["l", "ls"])]
    List(ListSubtopicsArgs),
    /// Flip a subtopic between pending and completed
    #[command(alias = "t")]
    Toggle(ToggleSubtopicArgs),
    /// Assign a subtopic to a user
    Assign(AssignSubtopicArgs),
    /// Remove a subtopic
    #[command(aliases = ["d", "rm"])]
    Delete(RemoveSubtopicArgs),
}

// ============================================================================
// Resources
// ============================================================================

/// Share a resource with members, a group, or all of your groups
#[derive(ClapArgs)]
#[command(group(ArgGroup::new("audience").args(["to", "group", "all_my_groups"])))]
pub struct ShareResourceArgs {
    /// Title of the resource
    pub title: String,
    #[arg(short, long, help = "Optional description")]
    pub description: Option<String>,
    #[arg(short, long, help = "URL or path of the resource")]
    pub link: Option<String>,
    #[arg(long, value_delimiter = ',', help = "Member IDs to share with, comma-separated")]
    pub to: Vec<String>,
    #[arg(long, help = "Group ID to share with")]
    pub group: Option<String>,
    #[arg(long, help = "Share with every group you belong to")]
    pub all_my_groups: bool,
}

impl From<ShareResourceArgs> for ShareResource {
    fn from(val: ShareResourceArgs) -> Self {
        let target = if val.all_my_groups {
            Target::AllMyGroups
        } else if let Some(group_id) = val.group {
            Target::Group { group_id }
        } else {
            Target::Individuals { member_ids: val.to }
        };

        ShareResource {
            title: val.title,
            description: val.description,
            link: val.link,
            target,
        }
    }
}

/// List resources shared with you
#[derive(ClapArgs)]
pub struct ListResourcesArgs {
    #[arg(long, help = "List resources you shared instead")]
    pub mine: bool,
}

#[derive(Subcommand)]
pub enum ResourceCommands {
    /// Share a resource
    #[command(alias = "s")]
    Share(ShareResourceArgs),
    /// List resources
    #[command(aliases = ["l", "ls"])]
    List(ListResourcesArgs),
    /// Delete a resource
    #[command(aliases = ["d", "rm"])]
    Delete(IdArgs),
}

// ============================================================================
// Tasks
// ============================================================================

/// Create a task for one member or a whole group
#[derive(ClapArgs)]
#[command(group(ArgGroup::new("assignee").required(true).args(["to", "group"])))]
pub struct CreateTaskArgs {
    /// Title of the task
    pub title: String,
    #[arg(short, long, help = "Optional description")]
    pub description: Option<String>,
    #[arg(short, long, value_enum, default_value_t = PriorityArg::Medium)]
    pub priority: PriorityArg,
    #[arg(long, help = "Deadline as an RFC 3339 timestamp, e.g. 2030-01-31T17:00:00Z")]
    pub deadline: Option<Timestamp>,
    #[arg(long, help = "User ID to assign the task to")]
    pub to: Option<String>,
    #[arg(long, help = "Group ID to assign the task to")]
    pub group: Option<String>,
}

impl From<CreateTaskArgs> for CreateTask {
    fn from(val: CreateTaskArgs) -> Self {
        let target = match val.to {
            Some(user_id) => TaskTarget::Individual { user_id },
            None => TaskTarget::Group {
                group_id: val.group.unwrap_or_default(),
            },
        };

        CreateTask {
            title: val.title,
            description: val.description,
            priority: val.priority.into(),
            deadline: val.deadline,
            target,
            group_id: None,
        }
    }
}

/// List tasks assigned to you
#[derive(ClapArgs)]
pub struct ListTasksArgs {
    #[arg(long, help = "List tasks you created instead")]
    pub created: bool,
}

#[derive(Subcommand)]
pub enum TaskCommands {
    /// Create a task
    #[command(alias = "c")]
    Create(CreateTaskArgs),
    /// Show a task
    #[command(alias = "s")]
    Show(IdArgs),
    /// List tasks
    #[command(aliases = ["l", "ls"])]
    List(ListTasksArgs),
    /// Start working on a task
    Start(IdArgs),
    /// Submit a task for review
    Submit(IdArgs),
    /// Verify a task in review, completing it
    Verify(IdArgs),
    /// Send a task in review back to the assignee
    SendBack(IdArgs),
    /// Delete a task
    #[command(aliases = ["d", "rm"])]
    Delete(IdArgs),
}

// ============================================================================
// Users and groups
// ============================================================================

/// Register a user
#[derive(ClapArgs)]
pub struct AddUserArgs {
    /// Display name
    pub name: String,
    #[arg(long, help = "User ID; generated when omitted")]
    pub id: Option<String>,
    #[arg(long, value_enum, default_value_t = RoleArg::Guest)]
    pub role: RoleArg,
}

impl From<AddUserArgs> for AddUser {
    fn from(val: AddUserArgs) -> Self {
        AddUser {
            id: val.id,
            name: val.name,
            role: val.role.into(),
        }
    }
}

#[derive(Subcommand)]
pub enum UserCommands {
    /// Register a user
    #[command(alias = "a")]
    Add(AddUserArgs),
    /// Show a user
    #[command(alias = "s")]
    Show(IdArgs),
}

/// Create a group
#[derive(ClapArgs)]
pub struct CreateGroupArgs {
    /// Name of the group
    pub name: String,
    #[arg(short, long, value_delimiter = ',', help = "Member IDs, comma-separated")]
    pub members: Vec<String>,
    #[arg(long, help = "User ID of the group lead")]
    pub lead: Option<String>,
}

impl From<CreateGroupArgs> for CreateGroup {
    fn from(val: CreateGroupArgs) -> Self {
        CreateGroup {
            name: val.name,
            members: val.members,
            lead_id: val.lead,
        }
    }
}

/// Add a member to a group
#[derive(ClapArgs)]
pub struct AddMemberArgs {
    #[arg(help = "Unique identifier of the group")]
    pub group_id: String,
    #[arg(help = "User ID to add")]
    pub user_id: String,
}

/// List groups
#[derive(ClapArgs)]
pub struct ListGroupsArgs {
    #[arg(long, help = "Only groups you belong to")]
    pub mine: bool,
}

#[derive(Subcommand)]
pub enum GroupCommands {
    /// Create a group
    #[command(alias = "c")]
    Create(CreateGroupArgs),
    /// Add a member to a group
    AddMember(AddMemberArgs),
    /// List groups
    #[command(aliases = ["l", "ls"])]
    List(ListGroupsArgs),
    /// Members of a group you can hand-pick for sharing
    Eligible(IdArgs),
}

// ============================================================================
// Value enums
// ============================================================================

#[derive(Clone, Copy, ValueEnum)]
pub enum RoleArg {
    Admin,
    CoreEmployee,
    NormalEmployee,
    Intern,
    Guest,
}

impl From<RoleArg> for Role {
    fn from(val: RoleArg) -> Self {
        match val {
            RoleArg::Admin => Role::Admin,
            RoleArg::CoreEmployee => Role::CoreEmployee,
            RoleArg::NormalEmployee => Role::NormalEmployee,
            RoleArg::Intern => Role::Intern,
            RoleArg::Guest => Role::Guest,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum PriorityArg {
    Low,
    Medium,
    High,
}

impl From<PriorityArg> for Priority {
    fn from(val: PriorityArg) -> Self {
        match val {
            PriorityArg::Low => Priority::Low,
            PriorityArg::Medium => Priority::Medium,
            PriorityArg::High => Priority::High,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum SubtopicStatusArg {
    /// Not done yet
    Pending,
    /// Done
    Completed,
}

impl From<SubtopicStatusArg> for SubtopicStatus {
    fn from(val: SubtopicStatusArg) -> Self {
        match val {
            SubtopicStatusArg::Pending => SubtopicStatus::Pending,
            SubtopicStatusArg::Completed => SubtopicStatus::Completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_share_target_selection() {
        let parse = |extra: &[&str]| {
            let mut argv = vec!["sb", "resource", "share", "Guide"];
            argv.extend_from_slice(extra);
            match Args::parse_from(argv).command {
                Some(Commands::Resource {
                    command: ResourceCommands::Share(args),
                }) => ShareResource::from(args).target,
                _ => panic!("expected resource share"),
            }
        };

        assert_eq!(parse(&["--all-my-groups"]), Target::AllMyGroups);
        assert_eq!(
            parse(&["--group", "g1"]),
            Target::Group {
                group_id: "g1".to_string()
            }
        );
        assert_eq!(
            parse(&["--to", "u1,u2"]),
            Target::Individuals {
                member_ids: vec!["u1".to_string(), "u2".to_string()]
            }
        );
        assert_eq!(parse(&[]), Target::Individuals { member_ids: vec![] });
    }

    #[test]
    fn test_share_audience_flags_conflict() {
        let result = Args::try_parse_from([
            "sb",
            "resource",
            "share",
            "Guide",
            "--group",
            "g1",
            "--all-my-groups",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_task_requires_assignee() {
        assert!(Args::try_parse_from(["sb", "task", "create", "Docs"]).is_err());

        let args = Args::try_parse_from([
            "sb",
            "--actor",
            "core",
            "--role",
            "core-employee",
            "task",
            "create",
            "Docs",
            "--to",
            "emp",
            "--deadline",
            "2030-01-31T17:00:00Z",
        ])
        .unwrap();
        let actor = args.acting_user();
        assert_eq!(actor.role, Role::CoreEmployee);
        assert_eq!(actor.name, "core");

        match args.command {
            Some(Commands::Task {
                command: TaskCommands::Create(create),
            }) => {
                let params = CreateTask::from(create);
                assert_eq!(
                    params.target,
                    TaskTarget::Individual {
                        user_id: "emp".to_string()
                    }
                );
                assert!(params.deadline.is_some());
            }
            _ => panic!("expected task create"),
        }
    }
}
