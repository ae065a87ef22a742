//! Account HTTP handlers.
//!
//! ```text
//! POST /api/v1/auth/register {"displayName":"Ada","email":"ada@campus.edu","password":"pw"}
//! POST /api/v1/auth/login {"email":"ada@campus.edu","password":"pw"}
//! GET /api/v1/me
//! ```

use actix_web::{HttpResponse, get, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{LoginCredentials, Registration, User};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::{AuthenticatedUser, IssuedToken};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::map_credentials_error;

/// Registration body for `POST /api/v1/auth/register`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub display_name: String,
    pub email: String,
    pub password: String,
}

/// Login body for `POST /api/v1/auth/login`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Public view of an account, including its credit balance.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserBody {
    #[schema(format = "uuid")]
    pub id: String,
    pub display_name: String,
    pub email: String,
    pub credits: i32,
}

impl From<User> for UserBody {
    fn from(value: User) -> Self {
        Self {
            id: value.id().to_string(),
            display_name: value.display_name().to_string(),
            email: value.email().to_string(),
            credits: value.credits().value(),
        }
    }
}

/// Account plus a bearer token for subsequent calls.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionBody {
    pub user: UserBody,
    pub token: String,
    #[schema(format = "date-time")]
    pub expires_at: DateTime<Utc>,
}

impl SessionBody {
    fn new(user: User, issued: IssuedToken) -> Self {
        Self {
            user: user.into(),
            token: issued.token,
            expires_at: issued.expires_at,
        }
    }
}

/// Create an account with the starting credit balance.
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = SessionBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 409, description = "Email already registered", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["accounts"],
    operation_id = "register",
    security([])
)]
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let RegisterRequest {
        display_name,
        email,
        password,
    } = payload.into_inner();
    let registration = Registration::try_from_parts(&display_name, &email, &password)
        .map_err(map_credentials_error)?;
    let user = state.accounts.register(registration).await?;
    let issued = state.tokens.issue(user.id())?;
    Ok(HttpResponse::Created().json(SessionBody::new(user, issued)))
}

/// Exchange credentials for a bearer token.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = SessionBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["accounts"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<SessionBody>> {
    let credentials = LoginCredentials::try_from_parts(&payload.email, &payload.password)
        .map_err(map_credentials_error)?;
    let user = state.accounts.login(credentials).await?;
    let issued = state.tokens.issue(user.id())?;
    Ok(web::Json(SessionBody::new(user, issued)))
}

/// Caller's profile and current balance.
#[utoipa::path(
    get,
    path = "/api/v1/me",
    responses(
        (status = 200, description = "Profile", body = UserBody),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Account no longer exists", body = ErrorSchema)
    ),
    tags = ["accounts"],
    operation_id = "currentUser",
    security(("BearerToken" = []))
)]
#[get("/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
) -> ApiResult<web::Json<UserBody>> {
    let user = state.accounts.profile(&caller.id()).await?;
    Ok(web::Json(user.into()))
}
