//! Identity and access-control collaborators.
//!
//! The core does not authenticate anyone. It asks an [`IdentityProvider`] who
//! is acting and an [`AccessControl`] policy whether that actor may pass the
//! task verification gate.

use async_trait::async_trait;

use crate::{
    error::Result,
    models::{Actor, Role, Task},
};

/// Yields the authenticated principal for the current request.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn current_actor(&self) -> Result<Actor>;
}

/// Identity fixed at construction, used by the CLI and tests.
#[derive(Debug, Clone)]
pub struct StaticIdentity {
    actor: Actor,
}

impl StaticIdentity {
    pub fn new(actor: Actor) -> Self {
        Self { actor }
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentity {
    async fn current_actor(&self) -> Result<Actor> {
        Ok(self.actor.clone())
    }
}

/// Authorization decisions delegated out of the core.
pub trait AccessControl: Send + Sync {
    /// Whether `actor` may move `task` from review to completed (or send it
    /// back).
    fn can_verify(&self, actor: &Actor, task: &Task) -> bool;
}

/// Role-based policy: admins and core employees verify tasks.
#[derive(Debug, Clone, Copy, Default)]
pub struct RolePolicy;

impl AccessControl for RolePolicy {
    fn can_verify(&self, actor: &Actor, _task: &Task) -> bool {
        matches!(actor.role, Role::Admin | Role::CoreEmployee)
    }
}
