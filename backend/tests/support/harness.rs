//! Marketplace wired over the in-memory store for HTTP-level tests.

use std::sync::Arc;
use std::time::Duration;

use actix_http::Request;
use actix_web::cookie::Key;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::header::AUTHORIZATION;
use actix_web::{App, test as actix_test, web};
use chrono::TimeDelta;
use mockable::{Clock, DefaultClock};
use serde_json::Value;
use tokio::task::JoinHandle;

use marketplace::Trace;
use marketplace::domain::ports::{CredentialHasher, UserRecord, UserRepository};
use marketplace::domain::{
    AccountsService, CatalogService, Credits, DisplayName, EmailAddress, ExchangeRequestService,
    NotificationInboxService, STARTING_CREDITS, User, UserId,
};
use marketplace::inbound::http::auth::BearerTokens;
use marketplace::inbound::http::state::{HttpState, HttpStatePorts};
use marketplace::inbound::http::{accounts, notifications, requests, resources};
use marketplace::outbound::credentials::Argon2CredentialHasher;
use marketplace::outbound::memory::InMemoryMarketplace;
use marketplace::outbound::notifications::{NotificationDeliveryWorker, notification_channel};

pub struct Harness {
    pub store: Arc<InMemoryMarketplace>,
    pub hasher: Arc<Argon2CredentialHasher>,
    pub state: HttpState,
    pub worker: JoinHandle<()>,
}

/// Build the state and spawn the delivery worker. Call inside a runtime.
pub fn harness() -> Harness {
    let store = Arc::new(InMemoryMarketplace::new());
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let hasher = Arc::new(Argon2CredentialHasher::new());
    let (dispatcher, queue) = notification_channel();
    let worker = NotificationDeliveryWorker::new(store.clone(), clock.clone()).spawn(queue);
    let lifecycle = Arc::new(ExchangeRequestService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        Arc::new(dispatcher),
        clock.clone(),
    ));
    let state = HttpState::new(
        HttpStatePorts {
            accounts: Arc::new(AccountsService::new(
                store.clone(),
                hasher.clone(),
                STARTING_CREDITS,
            )),
            catalog: Arc::new(CatalogService::new(store.clone(), clock.clone())),
            requests: lifecycle.clone(),
            requests_query: lifecycle,
            notifications: Arc::new(NotificationInboxService::new(store.clone())),
        },
        BearerTokens::new(Key::generate(), TimeDelta::hours(1), clock),
    );
    Harness {
        store,
        hasher,
        state,
        worker,
    }
}

impl Harness {
    pub fn app(
        &self,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        App::new()
            .app_data(web::Data::new(self.state.clone()))
            .wrap(Trace)
            .service(
                web::scope("/api/v1")
                    .service(accounts::register)
                    .service(accounts::login)
                    .service(accounts::current_user)
                    .service(resources::list_resources)
                    .service(resources::create_resource)
                    .service(requests::create_request)
                    .service(requests::list_my_requests)
                    .service(requests::list_owner_requests)
                    .service(requests::decide_request)
                    .service(notifications::list_notifications)
                    .service(notifications::mark_notification_read)
                    .service(notifications::delete_notification),
            )
    }

    /// Store an account with a chosen balance, bypassing registration.
    pub async fn seed_user(&self, name: &str, email: &str, password: &str, credits: i32) -> User {
        let user = User::new(
            UserId::random(),
            DisplayName::new(name).expect("display name"),
            EmailAddress::new(email).expect("email"),
            Credits::new(credits),
        );
        let password_hash = self.hasher.hash(password).expect("hash");
        UserRepository::insert(
            self.store.as_ref(),
            &UserRecord {
                user: user.clone(),
                password_hash,
            },
        )
        .await
        .expect("user stored");
        user
    }
}

/// Issue a JSON request and return the status and decoded body.
pub async fn call<S>(
    app: &S,
    method: actix_web::http::Method,
    uri: &str,
    bearer: Option<&str>,
    body: Option<Value>,
) -> (actix_web::http::StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let mut request = actix_test::TestRequest::default().method(method).uri(uri);
    if let Some(token) = bearer {
        request = request.insert_header((AUTHORIZATION, format!("Bearer {token}")));
    }
    if let Some(json) = body {
        request = request.set_json(json);
    }
    let response = actix_test::call_service(app, request.to_request()).await;
    let status = response.status();
    let bytes = actix_test::read_body(response).await;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, value)
}

/// Poll the caller's inbox until `expected` appears; delivery is asynchronous.
pub async fn await_notification<S>(app: &S, token: &str, expected: &str) -> Value
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    for _ in 0..100 {
        let (_, listed) = call(
            app,
            actix_web::http::Method::GET,
            "/api/v1/notifications",
            Some(token),
            None,
        )
        .await;
        let found = listed
            .as_array()
            .and_then(|items| items.iter().find(|item| item["message"] == expected))
            .cloned();
        if let Some(notification) = found {
            return notification;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("notification {expected:?} never arrived");
}
