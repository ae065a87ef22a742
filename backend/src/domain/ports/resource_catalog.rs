//! Driving port for browsing and listing resources.

use async_trait::async_trait;

use crate::domain::{Error, Resource, ResourceDraft, ResourceListing, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResourceCatalog: Send + Sync {
    /// Every listing with owner name, newest first.
    async fn list(&self) -> Result<Vec<ResourceListing>, Error>;

    /// List a new resource owned by `owner_id`.
    async fn create(&self, owner_id: &UserId, draft: ResourceDraft) -> Result<Resource, Error>;
}
