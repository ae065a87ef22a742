//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint, the error schema wrappers and
//! the bearer token security scheme. The document backs Swagger UI in debug
//! builds and is exported by the `openapi-dump` binary.

use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Name of the bearer token security scheme referenced by handlers.
pub const BEARER_SCHEME: &str = "BearerToken";

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            BEARER_SCHEME,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .description(Some(
                        "Signed token returned by POST /api/v1/auth/register or /api/v1/auth/login.",
                    ))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the marketplace REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Campus marketplace API",
        description = "Peer-to-peer item exchange: listings, credit-backed requests and notifications.",
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::accounts::register,
        crate::inbound::http::accounts::login,
        crate::inbound::http::accounts::current_user,
        crate::inbound::http::resources::list_resources,
        crate::inbound::http::resources::create_resource,
        crate::inbound::http::requests::create_request,
        crate::inbound::http::requests::list_my_requests,
        crate::inbound::http::requests::list_owner_requests,
        crate::inbound::http::requests::decide_request,
        crate::inbound::http::notifications::list_notifications,
        crate::inbound::http::notifications::mark_notification_read,
        crate::inbound::http::notifications::delete_notification,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(ErrorSchema, ErrorCodeSchema)),
    tags(
        (name = "accounts", description = "Registration, login and profile"),
        (name = "resources", description = "Listed items"),
        (name = "requests", description = "Exchange requests and owner decisions"),
        (name = "notifications", description = "Per-user notification inbox"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
