//! Wire domain services over the configured storage backend.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use tokio::task::JoinHandle;
use tracing::info;

use marketplace::domain::ports::{
    ExchangeRequestRepository, NotificationRepository, ResourceRepository, UserRepository,
};
use marketplace::domain::{
    AccountsService, CatalogService, ExchangeRequestService, NotificationInboxService,
    STARTING_CREDITS,
};
use marketplace::inbound::http::auth::BearerTokens;
use marketplace::inbound::http::state::{HttpState, HttpStatePorts};
use marketplace::outbound::credentials::Argon2CredentialHasher;
use marketplace::outbound::memory::InMemoryMarketplace;
use marketplace::outbound::notifications::{NotificationDeliveryWorker, notification_channel};
use marketplace::outbound::persistence::{
    DieselExchangeRequestRepository, DieselNotificationRepository, DieselResourceRepository,
    DieselUserRepository,
};

use super::ServerConfig;

/// Repository adapters backing one running server.
struct Repositories<U, R, Q, N> {
    users: Arc<U>,
    resources: Arc<R>,
    requests: Arc<Q>,
    notifications: Arc<N>,
}

fn wire<U, R, Q, N>(
    repos: Repositories<U, R, Q, N>,
    tokens: BearerTokens,
    clock: Arc<dyn Clock>,
) -> (HttpState, JoinHandle<()>)
where
    U: UserRepository + 'static,
    R: ResourceRepository + 'static,
    Q: ExchangeRequestRepository + 'static,
    N: NotificationRepository + 'static,
{
    let Repositories {
        users,
        resources,
        requests,
        notifications,
    } = repos;

    let (dispatcher, queue) = notification_channel();
    let worker = NotificationDeliveryWorker::new(notifications.clone(), clock.clone()).spawn(queue);

    let lifecycle = Arc::new(ExchangeRequestService::new(
        users.clone(),
        resources.clone(),
        requests,
        Arc::new(dispatcher),
        clock.clone(),
    ));
    let ports = HttpStatePorts {
        accounts: Arc::new(AccountsService::new(
            users,
            Arc::new(Argon2CredentialHasher::new()),
            STARTING_CREDITS,
        )),
        catalog: Arc::new(CatalogService::new(resources, clock)),
        requests: lifecycle.clone(),
        requests_query: lifecycle,
        notifications: Arc::new(NotificationInboxService::new(notifications)),
    };
    (HttpState::new(ports, tokens), worker)
}

/// Build the HTTP state and start the notification delivery worker.
///
/// Uses the Diesel adapters when a pool is configured, otherwise one shared
/// in-memory store. Must be called from within a Tokio runtime.
pub fn build_http_state(config: &ServerConfig) -> (HttpState, JoinHandle<()>) {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let tokens = BearerTokens::new(config.key.clone(), config.token_ttl, clock.clone());

    match &config.db_pool {
        Some(pool) => {
            info!("using PostgreSQL persistence");
            wire(
                Repositories {
                    users: Arc::new(DieselUserRepository::new(pool.clone())),
                    resources: Arc::new(DieselResourceRepository::new(pool.clone())),
                    requests: Arc::new(DieselExchangeRequestRepository::new(pool.clone())),
                    notifications: Arc::new(DieselNotificationRepository::new(pool.clone())),
                },
                tokens,
                clock,
            )
        }
        None => {
            info!("no database configured; using in-memory persistence");
            let store = Arc::new(InMemoryMarketplace::new());
            wire(
                Repositories {
                    users: store.clone(),
                    resources: store.clone(),
                    requests: store.clone(),
                    notifications: store,
                },
                tokens,
                clock,
            )
        }
    }
}
