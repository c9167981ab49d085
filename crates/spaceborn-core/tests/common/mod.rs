#![allow(dead_code)]

use std::path::{Path, PathBuf};

use spaceborn_core::{
    models::{Actor, Role},
    params::{AddUser, CreateGroup},
    Dashboard, DashboardBuilder, EmptyFanoutPolicy, Group,
};
use tempfile::TempDir;

/// Temporary directory holding a fresh database path.
pub fn create_test_environment() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    (temp_dir, db_path)
}

/// Dashboard acting as `actor` on the database at `db_path`.
pub async fn dashboard_as(db_path: &Path, actor: Actor) -> Dashboard {
    DashboardBuilder::new()
        .with_database_path(Some(db_path))
        .with_actor(actor)
        .build()
        .await
        .expect("Failed to create dashboard")
}

/// Dashboard acting as `actor` that rejects fan-out to no groups.
pub async fn strict_dashboard_as(db_path: &Path, actor: Actor) -> Dashboard {
    DashboardBuilder::new()
        .with_database_path(Some(db_path))
        .with_actor(actor)
        .with_empty_fanout(EmptyFanoutPolicy::Reject)
        .build()
        .await
        .expect("Failed to create dashboard")
}

/// Fresh dashboard acting as an admin.
pub async fn create_test_dashboard() -> (TempDir, Dashboard) {
    let (temp_dir, db_path) = create_test_environment();
    let dashboard = dashboard_as(&db_path, admin()).await;
    (temp_dir, dashboard)
}

pub fn admin() -> Actor {
    Actor::new("admin", "Grace", Role::Admin)
}

pub fn core_employee() -> Actor {
    Actor::new("core", "Ada", Role::CoreEmployee)
}

pub fn employee() -> Actor {
    Actor::new("emp", "Linus", Role::NormalEmployee)
}

pub fn intern() -> Actor {
    Actor::new("intern", "Ken", Role::Intern)
}

/// Registers the actors above and a "Backend" group containing all of them.
pub async fn seed_directory(dashboard: &Dashboard) -> Group {
    for actor in [admin(), core_employee(), employee(), intern()] {
        dashboard
            .directory()
            .add_user(&AddUser {
                id: Some(actor.id.clone()),
                name: actor.name.clone(),
                role: actor.role,
            })
            .await
            .expect("Failed to add user");
    }

    dashboard
        .directory()
        .create_group(&CreateGroup {
            name: "Backend".to_string(),
            members: vec![
                admin().id,
                core_employee().id,
                employee().id,
                intern().id,
            ],
            lead_id: Some(core_employee().id),
        })
        .await
        .expect("Failed to create group")
}
