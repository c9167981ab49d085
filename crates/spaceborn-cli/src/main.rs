//! SPACE BORN dashboard CLI.

mod args;
mod cli;
mod renderer;

use std::time::Duration;

use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use cli::Cli;
use log::info;
use renderer::TerminalRenderer;
use spaceborn_core::{DashboardBuilder, EmptyFanoutPolicy};
use Commands::*;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let actor = args.acting_user();
    let empty_fanout = if args.reject_empty_fanout {
        EmptyFanoutPolicy::Reject
    } else {
        EmptyFanoutPolicy::Allow
    };

    let dashboard = DashboardBuilder::new()
        .with_database_path(args.database_file)
        .with_actor(actor)
        .with_call_timeout(Duration::from_secs(args.timeout_secs))
        .with_empty_fanout(empty_fanout)
        .build()
        .await
        .context("Failed to initialize dashboard")?;

    let cli = Cli::new(dashboard, TerminalRenderer::new(!args.no_color));

    info!("Space Born dashboard started as {}", args.actor);

    match args.command {
        Some(Topic { command }) => cli.handle_topic_command(command).await,
        Some(Subtopic { command }) => cli.handle_subtopic_command(command).await,
        Some(Resource { command }) => cli.handle_resource_command(command).await,
        Some(Task { command }) => cli.handle_task_command(command).await,
        Some(User { command }) => cli.handle_user_command(command).await,
        Some(Group { command }) => cli.handle_group_command(command).await,
        None => cli.list_topics(None).await,
    }
}
