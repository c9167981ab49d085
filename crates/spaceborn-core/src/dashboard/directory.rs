//! Users and groups.

use log::info;
use serde_json::{json, Map};

use crate::{
    error::{require_non_blank, Result},
    models::{fields, now, Group, User},
    params::{AddUser, CreateGroup},
    store::{collections::GROUPS, collections::USERS, encode, Direction, GuardedStore, Query},
};

/// Account and group membership lookups.
#[derive(Clone)]
pub struct Directory {
    store: GuardedStore,
}

impl Directory {
    pub fn new(store: GuardedStore) -> Self {
        Self { store }
    }

    /// Registers a user, under the identity-provider key when one is given.
    pub async fn add_user(&self, params: &AddUser) -> Result<User> {
        require_non_blank("name", &params.name)?;

        let mut user = User {
            id: String::new(),
            name: params.name.trim().to_string(),
            role: params.role,
        };
        let body = encode(&user)?;
        user.id = match &params.id {
            Some(id) => {
                require_non_blank("id", id)?;
                self.store.set(USERS, id, body).await?;
                id.clone()
            }
            None => self.store.insert(USERS, body).await?,
        };

        info!("Added user {} ({})", user.id, user.role.as_str());
        Ok(user)
    }

    pub async fn get_user(&self, id: &str) -> Result<User> {
        self.store.fetch(USERS, id, "User").await
    }

    /// Looks up a user, returning `None` when unknown.
    pub async fn find_user(&self, id: &str) -> Result<Option<User>> {
        self.store
            .get(USERS, id)
            .await?
            .map(|doc| doc.decode())
            .transpose()
    }

    /// Creates a group. Members are deduplicated and the lead is always a
    /// member.
    pub async fn create_group(&self, params: &CreateGroup) -> Result<Group> {
        require_non_blank("name", &params.name)?;

        let mut members: Vec<String> = Vec::new();
        for member in params.members.iter().chain(params.lead_id.iter()) {
            if !members.contains(member) {
                members.push(member.clone());
            }
        }

        let mut group = Group {
            id: String::new(),
            name: params.name.trim().to_string(),
            members,
            lead_id: params.lead_id.clone(),
            created_at: now(),
        };
        group.id = self.store.insert(GROUPS, encode(&group)?).await?;

        info!("Created group {} with {} members", group.id, group.members.len());
        Ok(group)
    }

    pub async fn get_group(&self, id: &str) -> Result<Group> {
        self.store.fetch(GROUPS, id, "Group").await
    }

    /// Adds a user to a group; adding an existing member is a no-op.
    pub async fn add_member(&self, group_id: &str, user_id: &str) -> Result<Group> {
        require_non_blank("user_id", user_id)?;

        let mut group = self.get_group(group_id).await?;
        if group.has_member(user_id) {
            return Ok(group);
        }
        group.members.push(user_id.to_string());

        let mut update = Map::new();
        update.insert(fields::MEMBERS.to_string(), json!(group.members));
        self.store.update(GROUPS, group_id, update).await?;
        Ok(group)
    }

    /// Every group the user belongs to, read fresh from the store.
    pub async fn groups_for(&self, user_id: &str) -> Result<Vec<Group>> {
        self.store
            .query_as(
                GROUPS,
                &Query::new()
                    .contains(fields::MEMBERS, user_id)
                    .order_by(fields::NAME, Direction::Ascending),
            )
            .await
    }

    pub async fn list_groups(&self) -> Result<Vec<Group>> {
        self.store
            .query_as(
                GROUPS,
                &Query::new().order_by(fields::NAME, Direction::Ascending),
            )
            .await
    }
}
