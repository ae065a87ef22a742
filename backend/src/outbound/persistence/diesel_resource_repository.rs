//! PostgreSQL-backed `ResourceRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ResourceRepository, ResourceRepositoryError};
use crate::domain::{DisplayName, Resource, ResourceId, ResourceListing, UserId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewResourceRow, ResourceRow};
use super::pool::{DbPool, PoolError};
use super::schema::{resources, users};

/// Diesel-backed implementation of the `ResourceRepository` port.
#[derive(Clone)]
pub struct DieselResourceRepository {
    pool: DbPool,
}

impl DieselResourceRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ResourceRepositoryError {
    map_basic_pool_error(error, ResourceRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ResourceRepositoryError {
    map_basic_diesel_error(
        error,
        ResourceRepositoryError::query,
        ResourceRepositoryError::connection,
    )
}

pub(crate) fn row_to_resource(row: ResourceRow) -> Resource {
    Resource {
        id: ResourceId::from_uuid(row.id),
        owner_id: UserId::from_uuid(row.owner_id),
        title: row.title,
        description: row.description,
        category: row.category,
        image_filename: row.image_filename,
        created_at: row.created_at,
    }
}

fn row_to_listing(
    (row, owner_name): (ResourceRow, String),
) -> Result<ResourceListing, ResourceRepositoryError> {
    let owner_name = DisplayName::new(owner_name).map_err(|err| {
        ResourceRepositoryError::query(format!("invalid owner name in database: {err}"))
    })?;
    Ok(ResourceListing {
        resource: row_to_resource(row),
        owner_name,
    })
}

#[async_trait]
impl ResourceRepository for DieselResourceRepository {
    async fn insert(&self, resource: &Resource) -> Result<(), ResourceRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewResourceRow {
            id: *resource.id.as_uuid(),
            owner_id: *resource.owner_id.as_uuid(),
            title: &resource.title,
            description: &resource.description,
            category: &resource.category,
            image_filename: resource.image_filename.as_deref(),
            created_at: resource.created_at,
        };

        diesel::insert_into(resources::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(
        &self,
        id: &ResourceId,
    ) -> Result<Option<Resource>, ResourceRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<ResourceRow> = resources::table
            .filter(resources::id.eq(id.as_uuid()))
            .select(ResourceRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(row_to_resource))
    }

    async fn list_listings(&self) -> Result<Vec<ResourceListing>, ResourceRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<(ResourceRow, String)> = resources::table
            .inner_join(users::table)
            .order((resources::created_at.desc(), resources::id.desc()))
            .select((ResourceRow::as_select(), users::display_name))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_listing).collect()
    }
}
