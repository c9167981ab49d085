//! Assignment resolution for shareable entities.

use std::collections::HashSet;

use log::{debug, warn};
use serde::de::DeserializeOwned;

use super::directory::Directory;
use crate::{
    config::EmptyFanoutPolicy,
    error::{DashboardError, Result},
    models::{fields, Actor, Recipients, Target, User},
    store::{Direction, Document, GuardedStore, Query, CONTAINS_ANY_LIMIT},
};

/// Turns a [`Target`] into the concrete recipients stored on a resource or
/// task.
#[derive(Clone)]
pub struct AssignmentResolver {
    directory: Directory,
    empty_fanout: EmptyFanoutPolicy,
}

impl AssignmentResolver {
    pub(crate) fn new(directory: Directory, empty_fanout: EmptyFanoutPolicy) -> Self {
        Self {
            directory,
            empty_fanout,
        }
    }

    /// Resolves recipients for `target` on behalf of `actor`.
    ///
    /// Individual members are not checked against role rules here; the
    /// caller is expected to offer only [`eligible_members`].
    ///
    /// [`eligible_members`]: AssignmentResolver::eligible_members
    pub async fn resolve(&self, target: &Target, actor: &Actor) -> Result<Recipients> {
        match target {
            Target::Individuals { member_ids } => {
                let mut seen = HashSet::new();
                let members: Vec<String> = member_ids
                    .iter()
                    .map(|id| id.trim())
                    .filter(|id| !id.is_empty() && seen.insert(*id))
                    .map(String::from)
                    .collect();
                if members.is_empty() {
                    return Err(DashboardError::validation("member_ids")
                        .with_reason("select at least one member"));
                }
                Ok(Recipients::users(members))
            }
            Target::Group { group_id } => {
                let group_id = group_id.trim();
                if group_id.is_empty() {
                    return Err(DashboardError::validation("group_id")
                        .with_reason("no group selected"));
                }
                Ok(Recipients::groups(vec![group_id.to_string()]))
            }
            Target::AllMyGroups => {
                let groups: Vec<String> = self
                    .directory
                    .groups_for(&actor.id)
                    .await?
                    .into_iter()
                    .map(|group| group.id)
                    .collect();
                debug!("{} belongs to {} groups", actor.id, groups.len());

                if groups.is_empty() {
                    match self.empty_fanout {
                        EmptyFanoutPolicy::Allow => {
                            warn!("{} belongs to no group, sharing with nobody", actor.id);
                        }
                        EmptyFanoutPolicy::Reject => {
                            return Err(DashboardError::validation("target")
                                .with_reason("you do not belong to any group"));
                        }
                    }
                }
                Ok(Recipients::groups(groups))
            }
        }
    }

    /// Members of a group that `actor` may hand-pick: everyone except the
    /// actor and admins. Member ids with no directory entry are skipped.
    pub async fn eligible_members(&self, group_id: &str, actor: &Actor) -> Result<Vec<User>> {
        let group = self.directory.get_group(group_id).await?;

        let mut eligible = Vec::new();
        for member_id in group.members.iter().filter(|id| **id != actor.id) {
            match self.directory.find_user(member_id).await? {
                Some(user) if !user.role.is_admin() => eligible.push(user),
                Some(_) => {}
                None => debug!("Group {group_id} lists unknown member {member_id}"),
            }
        }
        Ok(eligible)
    }

    pub(crate) fn directory(&self) -> &Directory {
        &self.directory
    }
}

/// Every document in `collection` addressed to `user_id` directly or through
/// one of `group_ids`, newest first.
///
/// Group ids are queried in chunks of [`CONTAINS_ANY_LIMIT`]; a document
/// matching several queries appears once.
pub(crate) async fn fetch_addressed<T: DeserializeOwned>(
    store: &GuardedStore,
    collection: &str,
    user_id: &str,
    group_ids: &[String],
) -> Result<Vec<T>> {
    let mut documents: Vec<Document> = store
        .query(collection, &Query::new().contains(fields::ASSIGNED_TO, user_id))
        .await?;

    for chunk in group_ids.chunks(CONTAINS_ANY_LIMIT) {
        let query = Query::new().contains_any(fields::ASSIGNED_TO_GROUPS, chunk.iter().cloned());
        documents.extend(store.query(collection, &query).await?);
    }

    let mut seen = HashSet::new();
    documents.retain(|doc| seen.insert(doc.id.clone()));
    documents.sort_by(|a, b| created_at(b).cmp(&created_at(a)));

    documents.into_iter().map(Document::decode).collect()
}

fn created_at(doc: &Document) -> i64 {
    doc.fields
        .get(fields::CREATED_AT)
        .and_then(|v| v.as_i64())
        .unwrap_or_default()
}

/// Query for documents created by `user_id`, newest first.
pub(crate) fn created_by(user_id: &str) -> Query {
    Query::new()
        .eq(fields::CREATED_BY, user_id)
        .order_by(fields::CREATED_AT, Direction::Descending)
}
