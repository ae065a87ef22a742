//! Resource catalog service.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use super::port_error_mapping::map_resource_repository_error;
use super::ports::{ResourceCatalog, ResourceRepository};
use super::{Error, Resource, ResourceDraft, ResourceId, ResourceListing, UserId};

/// [`ResourceCatalog`] backed by a resource repository.
#[derive(Clone)]
pub struct CatalogService<R> {
    resources: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> CatalogService<R> {
    /// Catalog over `resources`, stamping new listings with `clock`.
    pub fn new(resources: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { resources, clock }
    }
}

#[async_trait]
impl<R> ResourceCatalog for CatalogService<R>
where
    R: ResourceRepository,
{
    async fn list(&self) -> Result<Vec<ResourceListing>, Error> {
        self.resources
            .list_listings()
            .await
            .map_err(map_resource_repository_error)
    }

    async fn create(&self, owner_id: &UserId, draft: ResourceDraft) -> Result<Resource, Error> {
        let resource = Resource::from_draft(ResourceId::random(), *owner_id, draft, self.clock.utc());
        self.resources
            .insert(&resource)
            .await
            .map_err(map_resource_repository_error)?;
        info!(resource_id = %resource.id, owner_id = %owner_id, "resource listed");
        Ok(resource)
    }
}
