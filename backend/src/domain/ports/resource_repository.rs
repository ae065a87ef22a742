//! Port abstraction for the resource catalog store.

use async_trait::async_trait;

use crate::domain::{Resource, ResourceId, ResourceListing};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by resource repository adapters.
    pub enum ResourceRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "resource repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "resource repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResourceRepository: Send + Sync {
    /// Persist a newly listed resource.
    async fn insert(&self, resource: &Resource) -> Result<(), ResourceRepositoryError>;

    /// Fetch a resource by identifier.
    async fn find_by_id(&self, id: &ResourceId)
    -> Result<Option<Resource>, ResourceRepositoryError>;

    /// All listings joined with owner display names, newest first.
    async fn list_listings(&self) -> Result<Vec<ResourceListing>, ResourceRepositoryError>;
}
