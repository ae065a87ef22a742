//! Exchange request HTTP handlers.
//!
//! ```text
//! POST /api/v1/requests {"resourceId":"..."}
//! GET /api/v1/requests
//! GET /api/v1/requests/owner
//! PATCH /api/v1/requests/{id} {"action":"approve"}
//! ```

use actix_web::{HttpResponse, get, patch, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{
    Decision, Error, ExchangeRequest, OwnerRequestView, RequestId, RequesterRequestView,
    ResourceId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, missing_field_error, parse_identifier};

/// Body for `POST /api/v1/requests`. `resource_id` is accepted as an alias.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequestBody {
    #[serde(alias = "resource_id")]
    #[schema(format = "uuid")]
    pub resource_id: Option<String>,
}

/// Body for `PATCH /api/v1/requests/{id}`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DecideRequestBody {
    /// `approve` or `deny`.
    #[schema(example = "approve")]
    pub action: Option<String>,
}

/// A freshly created request.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRequestBody {
    #[schema(format = "uuid")]
    pub id: String,
    #[schema(format = "uuid")]
    pub resource_id: String,
    #[schema(format = "uuid")]
    pub requester_id: String,
    #[schema(example = "pending")]
    pub status: String,
    #[schema(format = "date-time")]
    pub created_at: DateTime<Utc>,
}

impl From<ExchangeRequest> for ExchangeRequestBody {
    fn from(value: ExchangeRequest) -> Self {
        Self {
            id: value.id.to_string(),
            resource_id: value.resource_id.to_string(),
            requester_id: value.requester_id.to_string(),
            status: value.status.as_str().to_owned(),
            created_at: value.created_at,
        }
    }
}

/// Request on one of the caller's resources.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OwnerRequestBody {
    #[serde(flatten)]
    pub request: ExchangeRequestBody,
    pub resource_title: String,
    pub requester_name: String,
}

impl From<OwnerRequestView> for OwnerRequestBody {
    fn from(value: OwnerRequestView) -> Self {
        Self {
            request: value.request.into(),
            resource_title: value.resource_title,
            requester_name: value.requester_name.to_string(),
        }
    }
}

/// One of the caller's own requests.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RequesterRequestBody {
    #[serde(flatten)]
    pub request: ExchangeRequestBody,
    pub resource_title: String,
    pub owner_name: String,
}

impl From<RequesterRequestView> for RequesterRequestBody {
    fn from(value: RequesterRequestView) -> Self {
        Self {
            request: value.request.into(),
            resource_title: value.resource_title,
            owner_name: value.owner_name.to_string(),
        }
    }
}

/// Outcome of an owner decision.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DecisionResponse {
    pub ok: bool,
    #[schema(example = "approved")]
    pub status: String,
}

fn parse_action(action: Option<String>) -> Result<Decision, Error> {
    let field = FieldName::new("action");
    let raw = action.ok_or_else(|| missing_field_error(field))?;
    match raw.trim() {
        "approve" => Ok(Decision::Approve),
        "deny" => Ok(Decision::Deny),
        _ => Err(
            Error::invalid_request("action must be approve or deny").with_details(json!({
                "field": "action",
                "value": raw,
                "code": "invalid_action",
            })),
        ),
    }
}

/// Request another user's resource. Requires a positive credit balance.
#[utoipa::path(
    post,
    path = "/api/v1/requests",
    request_body = CreateRequestBody,
    responses(
        (status = 201, description = "Request created", body = ExchangeRequestBody),
        (status = 400, description = "Invalid request or insufficient credits", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Resource not found", body = ErrorSchema)
    ),
    tags = ["requests"],
    operation_id = "createRequest",
    security(("BearerToken" = []))
)]
#[post("/requests")]
pub async fn create_request(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    payload: web::Json<CreateRequestBody>,
) -> ApiResult<HttpResponse> {
    let field = FieldName::new("resourceId");
    let raw = payload
        .into_inner()
        .resource_id
        .ok_or_else(|| missing_field_error(field))?;
    let resource_id = parse_identifier(&raw, field, ResourceId::new)?;
    let request = state.requests.create_request(&caller.id(), &resource_id).await?;
    Ok(HttpResponse::Created().json(ExchangeRequestBody::from(request)))
}

/// Requests made by the caller, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/requests",
    responses(
        (status = 200, description = "Caller's requests", body = [RequesterRequestBody]),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["requests"],
    operation_id = "listMyRequests",
    security(("BearerToken" = []))
)]
#[get("/requests")]
pub async fn list_my_requests(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
) -> ApiResult<web::Json<Vec<RequesterRequestBody>>> {
    let views = state.requests_query.list_requester_requests(&caller.id()).await?;
    Ok(web::Json(views.into_iter().map(Into::into).collect()))
}

/// Requests on resources the caller owns, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/requests/owner",
    responses(
        (status = 200, description = "Incoming requests", body = [OwnerRequestBody]),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["requests"],
    operation_id = "listOwnerRequests",
    security(("BearerToken" = []))
)]
#[get("/requests/owner")]
pub async fn list_owner_requests(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
) -> ApiResult<web::Json<Vec<OwnerRequestBody>>> {
    let views = state.requests_query.list_owner_requests(&caller.id()).await?;
    Ok(web::Json(views.into_iter().map(Into::into).collect()))
}

/// Approve or deny a pending request on one of the caller's resources.
#[utoipa::path(
    patch,
    path = "/api/v1/requests/{id}",
    params(("id" = String, Path, description = "Request identifier", format = "uuid")),
    request_body = DecideRequestBody,
    responses(
        (status = 200, description = "Decision recorded", body = DecisionResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Caller does not own the resource", body = ErrorSchema),
        (status = 404, description = "Request not found", body = ErrorSchema),
        (status = 409, description = "Request already decided", body = ErrorSchema),
        (status = 500, description = "Transaction rolled back", body = ErrorSchema)
    ),
    tags = ["requests"],
    operation_id = "decideRequest",
    security(("BearerToken" = []))
)]
#[patch("/requests/{id}")]
pub async fn decide_request(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<String>,
    payload: web::Json<DecideRequestBody>,
) -> ApiResult<web::Json<DecisionResponse>> {
    let request_id = parse_identifier(&path.into_inner(), FieldName::new("id"), RequestId::new)?;
    let decision = parse_action(payload.into_inner().action)?;
    let decided = state
        .requests
        .decide_request(&request_id, &caller.id(), decision)
        .await?;
    Ok(web::Json(DecisionResponse {
        ok: true,
        status: decided.status.as_str().to_owned(),
    }))
}
