//! Resource sharing.

use log::info;

use super::assignment::{created_by, fetch_addressed, AssignmentResolver};
use crate::{
    error::{require_non_blank, Result},
    models::{now, Actor, Resource},
    params::ShareResource,
    store::{collections::RESOURCES, encode, GuardedStore},
};

#[derive(Clone)]
pub struct ResourceSharing {
    store: GuardedStore,
    resolver: AssignmentResolver,
}

impl ResourceSharing {
    pub(crate) fn new(store: GuardedStore, resolver: AssignmentResolver) -> Self {
        Self { store, resolver }
    }

    /// Resolves the audience and stores the resource.
    pub async fn share(&self, params: &ShareResource, actor: &Actor) -> Result<Resource> {
        require_non_blank("title", &params.title)?;
        let recipients = self.resolver.resolve(&params.target, actor).await?;

        let mut resource = Resource {
            id: String::new(),
            title: params.title.trim().to_string(),
            description: params.description.clone().filter(|d| !d.trim().is_empty()),
            link: params.link.clone().filter(|l| !l.trim().is_empty()),
            target_audience: params.target.mode(),
            recipients,
            created_by: actor.id.clone(),
            created_at: now(),
        };
        resource.id = self.store.insert(RESOURCES, encode(&resource)?).await?;

        info!(
            "{} shared resource {} ({})",
            actor.id,
            resource.id,
            resource.target_audience.as_str()
        );
        Ok(resource)
    }

    pub async fn get(&self, resource_id: &str) -> Result<Resource> {
        self.store.fetch(RESOURCES, resource_id, "Resource").await
    }

    /// Resources addressed to the actor directly or through any of their
    /// groups, newest first.
    pub async fn list_for(&self, actor: &Actor) -> Result<Vec<Resource>> {
        let groups: Vec<String> = self
            .resolver
            .directory()
            .groups_for(&actor.id)
            .await?
            .into_iter()
            .map(|group| group.id)
            .collect();
        fetch_addressed(&self.store, RESOURCES, &actor.id, &groups).await
    }

    /// Resources the actor shared, newest first.
    pub async fn list_created_by(&self, actor: &Actor) -> Result<Vec<Resource>> {
        self.store
            .query_as(RESOURCES, &created_by(&actor.id))
            .await
    }

    /// Deletes a resource and returns it.
    pub async fn delete(&self, resource_id: &str) -> Result<Resource> {
        let resource = self.get(resource_id).await?;
        self.store.delete(RESOURCES, resource_id).await?;
        info!("Deleted resource {resource_id}");
        Ok(resource)
    }
}
