//! Command handlers.
//!
//! Each handler converts CLI arguments into core parameters, calls the
//! dashboard, and renders the result's markdown `Display` output.

use anyhow::{Context, Result};
use log::debug;
use spaceborn_core::{
    display::{
        CreateResult, DeleteResult, Groups, OperationStatus, Resources, Subtopics, Tasks, Topics,
        UpdateResult,
    },
    params::{EditTopic, Id, ToggleSubtopic},
    Dashboard,
};

use crate::{
    args::{
        GroupCommands, ResourceCommands, SubtopicCommands, TaskCommands, TopicCommands,
        UserCommands,
    },
    renderer::TerminalRenderer,
};

pub struct Cli {
    dashboard: Dashboard,
    renderer: TerminalRenderer,
}

impl Cli {
    pub fn new(dashboard: Dashboard, renderer: TerminalRenderer) -> Self {
        Self {
            dashboard,
            renderer,
        }
    }

    /// Default view when no command is given.
    pub async fn list_topics(&self, group: Option<&str>) -> Result<()> {
        let topics = match group {
            Some(group_id) => self.dashboard.topics().list_for_group(group_id).await,
            None => self.dashboard.topics().list().await,
        }
        .context("Failed to list topics")?;

        self.renderer.render("# Topics\n\n");
        self.renderer.show(&Topics(topics));
        Ok(())
    }

    pub async fn handle_topic_command(&self, command: TopicCommands) -> Result<()> {
        let topics = self.dashboard.topics();
        match command {
            TopicCommands::Create(args) => {
                let topic = self
                    .dashboard
                    .create_topic(&args.into())
                    .await
                    .context("Failed to create topic")?;
                self.renderer.show(&CreateResult::new(topic));
            }
            TopicCommands::List(args) => self.list_topics(args.group.as_deref()).await?,
            TopicCommands::Show(args) => {
                let Id { id } = args.into();
                let topic = topics.get(&id).await.context("Failed to load topic")?;
                let subtopics = self
                    .dashboard
                    .subtopics()
                    .list(&id)
                    .await
                    .context("Failed to load subtopics")?;

                self.renderer.show(&topic);
                self.renderer.render("### Subtopics\n\n");
                self.renderer.show(&Subtopics(subtopics));
            }
            TopicCommands::Edit(args) => {
                let params: EditTopic = args.into();
                let topic = topics.edit(&params).await.context("Failed to edit topic")?;

                let mut changes = Vec::new();
                if params.title.is_some() {
                    changes.push("Updated title".to_string());
                }
                if params.description.is_some() {
                    changes.push("Updated description".to_string());
                }
                self.renderer.show(&UpdateResult::with_changes(topic, changes));
            }
            TopicCommands::Recompute(args) => {
                let Id { id } = args.into();
                let topic = topics
                    .recompute(&id)
                    .await
                    .context("Failed to recompute topic")?;
                let change = format!(
                    "Progress recomputed from {} subtopics",
                    topic.rollup.total_subtopics()
                );
                self.renderer
                    .show(&UpdateResult::with_changes(topic, vec![change]));
            }
            TopicCommands::Delete(args) => {
                if !args.confirm {
                    self.renderer.show(&OperationStatus::failure(format!(
                        "Deleting topic {} removes all of its subtopics. Re-run with --confirm to proceed.",
                        args.id
                    )));
                    return Ok(());
                }
                let topic = topics
                    .delete(&args.id)
                    .await
                    .context("Failed to delete topic")?;
                self.renderer.show(&DeleteResult::new(topic));
            }
        }
        Ok(())
    }

    pub async fn handle_subtopic_command(&self, command: SubtopicCommands) -> Result<()> {
        let subtopics = self.dashboard.subtopics();
        match command {
            SubtopicCommands::Add(args) => {
                let subtopic = subtopics
                    .create(&args.into())
                    .await
                    .context("Failed to add subtopic")?;
                self.renderer.show(&CreateResult::new(subtopic));
            }
            SubtopicCommands::List(args) => {
                let items = subtopics
                    .list(&args.topic_id)
                    .await
                    .context("Failed to list subtopics")?;
                self.renderer.show(&Subtopics(items));
            }
            SubtopicCommands::Toggle(args) => {
                let current_status = match args.from {
                    Some(status) => status.into(),
                    None => {
                        subtopics
                            .get(&args.id)
                            .await
                            .context("Failed to load subtopic")?
                            .status
                    }
                };
                debug!("Toggling subtopic {} from {current_status}", args.id);

                let subtopic = subtopics
                    .toggle_status(&ToggleSubtopic {
                        id: args.id,
                        topic_id: args.topic_id.clone(),
                        current_status,
                    })
                    .await
                    .context("Failed to toggle subtopic")?;
                let topic = self
                    .dashboard
                    .topics()
                    .get(&args.topic_id)
                    .await
                    .context("Failed to load topic")?;

                let change = format!("Marked {}", subtopic.status);
                self.renderer
                    .show(&UpdateResult::with_changes(subtopic, vec![change]));
                self.renderer.show(&topic);
            }
            SubtopicCommands::Assign(args) => {
                let subtopic = subtopics
                    .assign(&args.id, args.user_id.as_deref())
                    .await
                    .context("Failed to assign subtopic")?;
                let change = match &subtopic.assigned_to {
                    Some(user) => format!("Assigned to {user}"),
                    None => "Cleared assignee".to_string(),
                };
                self.renderer
                    .show(&UpdateResult::with_changes(subtopic, vec![change]));
            }
            SubtopicCommands::Delete(args) => {
                let subtopic = subtopics
                    .delete(&args.into())
                    .await
                    .context("Failed to delete subtopic")?;
                self.renderer.show(&DeleteResult::new(subtopic));
            }
        }
        Ok(())
    }

    pub async fn handle_resource_command(&self, command: ResourceCommands) -> Result<()> {
        match command {
            ResourceCommands::Share(args) => {
                let resource = self
                    .dashboard
                    .share_resource(&args.into())
                    .await
                    .context("Failed to share resource")?;
                self.renderer.show(&CreateResult::new(resource));
            }
            ResourceCommands::List(args) => {
                let resources = if args.mine {
                    let actor = self.dashboard.current_actor().await?;
                    self.dashboard.resources().list_created_by(&actor).await
                } else {
                    self.dashboard.my_resources().await
                }
                .context("Failed to list resources")?;
                self.renderer.show(&Resources(resources));
            }
            ResourceCommands::Delete(args) => {
                let Id { id } = args.into();
                let resource = self
                    .dashboard
                    .resources()
                    .delete(&id)
                    .await
                    .context("Failed to delete resource")?;
                self.renderer.show(&DeleteResult::new(resource));
            }
        }
        Ok(())
    }

    pub async fn handle_task_command(&self, command: TaskCommands) -> Result<()> {
        let tasks = self.dashboard.tasks();
        match command {
            TaskCommands::Create(args) => {
                let task = self
                    .dashboard
                    .create_task(&args.into())
                    .await
                    .context("Failed to create task")?;
                self.renderer.show(&CreateResult::new(task));
            }
            TaskCommands::Show(args) => {
                let task = tasks.get(&args.id).await.context("Failed to load task")?;
                self.renderer.show(&task);
            }
            TaskCommands::List(args) => {
                let items = if args.created {
                    let actor = self.dashboard.current_actor().await?;
                    tasks.list_created_by(&actor).await
                } else {
                    self.dashboard.my_tasks().await
                }
                .context("Failed to list tasks")?;
                self.renderer.show(&Tasks(items));
            }
            TaskCommands::Start(args) => {
                let task = tasks.start(&args.id).await.context("Failed to start task")?;
                self.renderer.show(&UpdateResult::with_changes(
                    task,
                    vec!["Started work".to_string()],
                ));
            }
            TaskCommands::Submit(args) => {
                let task = tasks
                    .submit(&args.id)
                    .await
                    .context("Failed to submit task")?;
                self.renderer.show(&UpdateResult::with_changes(
                    task,
                    vec!["Submitted for review".to_string()],
                ));
            }
            TaskCommands::Verify(args) => {
                let task = self
                    .dashboard
                    .verify_task(&args.id)
                    .await
                    .context("Failed to verify task")?;
                self.renderer.show(&UpdateResult::with_changes(
                    task,
                    vec!["Verified and completed".to_string()],
                ));
            }
            TaskCommands::SendBack(args) => {
                let task = self
                    .dashboard
                    .send_back_task(&args.id)
                    .await
                    .context("Failed to send task back")?;
                self.renderer.show(&UpdateResult::with_changes(
                    task,
                    vec!["Sent back for more work".to_string()],
                ));
            }
            TaskCommands::Delete(args) => {
                let task = tasks
                    .delete(&args.id)
                    .await
                    .context("Failed to delete task")?;
                self.renderer.show(&DeleteResult::new(task));
            }
        }
        Ok(())
    }

    pub async fn handle_user_command(&self, command: UserCommands) -> Result<()> {
        let directory = self.dashboard.directory();
        match command {
            UserCommands::Add(args) => {
                let user = directory
                    .add_user(&args.into())
                    .await
                    .context("Failed to add user")?;
                self.renderer.show(&CreateResult::new(user));
            }
            UserCommands::Show(args) => {
                let user = directory
                    .get_user(&args.id)
                    .await
                    .context("Failed to load user")?;
                let groups = directory
                    .groups_for(&user.id)
                    .await
                    .context("Failed to load groups")?;

                self.renderer.show(&user);
                self.renderer.render("\n### Groups\n\n");
                self.renderer.show(&Groups(groups));
            }
        }
        Ok(())
    }

    pub async fn handle_group_command(&self, command: GroupCommands) -> Result<()> {
        let directory = self.dashboard.directory();
        match command {
            GroupCommands::Create(args) => {
                let group = directory
                    .create_group(&args.into())
                    .await
                    .context("Failed to create group")?;
                self.renderer.show(&CreateResult::new(group));
            }
            GroupCommands::AddMember(args) => {
                let group = directory
                    .add_member(&args.group_id, &args.user_id)
                    .await
                    .context("Failed to add member")?;
                self.renderer.show(&UpdateResult::with_changes(
                    group,
                    vec![format!("Added member {}", args.user_id)],
                ));
            }
            GroupCommands::List(args) => {
                let groups = if args.mine {
                    let actor = self.dashboard.current_actor().await?;
                    directory.groups_for(&actor.id).await
                } else {
                    directory.list_groups().await
                }
                .context("Failed to list groups")?;
                self.renderer.show(&Groups(groups));
            }
            GroupCommands::Eligible(args) => {
                let actor = self.dashboard.current_actor().await?;
                let members = self
                    .dashboard
                    .assignments()
                    .eligible_members(&args.id, &actor)
                    .await
                    .context("Failed to load group members")?;

                if members.is_empty() {
                    self.renderer.render("No eligible members.\n");
                }
                for member in &members {
                    self.renderer.show(member);
                }
            }
        }
        Ok(())
    }
}
