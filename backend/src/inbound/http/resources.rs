//! Resource catalog HTTP handlers.
//!
//! ```text
//! GET /api/v1/resources
//! POST /api/v1/resources {"title":"Sofa","description":"Two seats","category":"furniture"}
//! ```

use actix_web::{HttpResponse, get, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Resource, ResourceDraft, ResourceListing};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::map_resource_validation_error;

/// Body for `POST /api/v1/resources`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateResourceRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
}

/// A listed resource.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResourceBody {
    #[schema(format = "uuid")]
    pub id: String,
    #[schema(format = "uuid")]
    pub owner_id: String,
    /// Owner display name; present in catalog listings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_name: Option<String>,
    pub title: String,
    pub description: String,
    pub category: String,
    #[schema(example = "/images/furniture.svg")]
    pub image_url: String,
    #[schema(format = "date-time")]
    pub created_at: DateTime<Utc>,
}

impl From<Resource> for ResourceBody {
    fn from(value: Resource) -> Self {
        let image_url = value.image_url();
        Self {
            id: value.id.to_string(),
            owner_id: value.owner_id.to_string(),
            owner_name: None,
            title: value.title,
            description: value.description,
            category: value.category,
            image_url,
            created_at: value.created_at,
        }
    }
}

impl From<ResourceListing> for ResourceBody {
    fn from(value: ResourceListing) -> Self {
        Self {
            owner_name: Some(value.owner_name.to_string()),
            ..Self::from(value.resource)
        }
    }
}

/// Browse every listing, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/resources",
    responses(
        (status = 200, description = "Listings", body = [ResourceBody]),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["resources"],
    operation_id = "listResources",
    security([])
)]
#[get("/resources")]
pub async fn list_resources(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<ResourceBody>>> {
    let listings = state.catalog.list().await?;
    Ok(web::Json(listings.into_iter().map(ResourceBody::from).collect()))
}

/// List a new resource owned by the caller.
#[utoipa::path(
    post,
    path = "/api/v1/resources",
    request_body = CreateResourceRequest,
    responses(
        (status = 201, description = "Resource listed", body = ResourceBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["resources"],
    operation_id = "createResource",
    security(("BearerToken" = []))
)]
#[post("/resources")]
pub async fn create_resource(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    payload: web::Json<CreateResourceRequest>,
) -> ApiResult<HttpResponse> {
    let CreateResourceRequest {
        title,
        description,
        category,
    } = payload.into_inner();
    let draft = ResourceDraft::new(&title, &description, &category)
        .map_err(map_resource_validation_error)?;
    let resource = state.catalog.create(&caller.id(), draft).await?;
    Ok(HttpResponse::Created().json(ResourceBody::from(resource)))
}
