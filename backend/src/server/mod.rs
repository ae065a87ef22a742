//! Server construction and middleware wiring.

mod config;
mod settings;
mod state_builders;

pub use config::ServerConfig;
pub use settings::ServerSettings;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tokio::task::JoinHandle;

use marketplace::Trace;
#[cfg(debug_assertions)]
use marketplace::doc::ApiDoc;
use marketplace::inbound::http::accounts::{current_user, login, register};
use marketplace::inbound::http::health::{HealthState, live, ready};
use marketplace::inbound::http::notifications::{
    delete_notification, list_notifications, mark_notification_read,
};
use marketplace::inbound::http::requests::{
    create_request, decide_request, list_my_requests, list_owner_requests,
};
use marketplace::inbound::http::resources::{create_resource, list_resources};
use marketplace::inbound::http::state::HttpState;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use state_builders::build_http_state;

fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let api = web::scope("/api/v1")
        .service(register)
        .service(login)
        .service(current_user)
        .service(list_resources)
        .service(create_resource)
        .service(create_request)
        .service(list_my_requests)
        .service(list_owner_requests)
        .service(decide_request)
        .service(list_notifications)
        .service(mark_notification_read)
        .service(delete_notification);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Bind the HTTP server and start the notification delivery worker.
///
/// The returned worker handle finishes once the server, and with it every
/// notification dispatcher, has been dropped.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<(Server, JoinHandle<()>)> {
    let (http_state, worker) = build_http_state(&config);
    let http_state = web::Data::new(http_state);
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || build_app(server_health_state.clone(), http_state.clone()))
        .bind(config.bind_addr)?
        .run();

    health_state.mark_ready();
    Ok((server, worker))
}
