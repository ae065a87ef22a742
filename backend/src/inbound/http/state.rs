//! Shared HTTP adapter state.
//!
//! Handlers receive this through `actix_web::web::Data` and depend only on
//! driving ports, so they can be exercised without any I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AccountService, ExchangeRequestCommand, ExchangeRequestQuery, NotificationInbox,
    ResourceCatalog,
};

use super::auth::BearerTokens;

/// Parameter object bundling the driving ports used by handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub accounts: Arc<dyn AccountService>,
    pub catalog: Arc<dyn ResourceCatalog>,
    pub requests: Arc<dyn ExchangeRequestCommand>,
    pub requests_query: Arc<dyn ExchangeRequestQuery>,
    pub notifications: Arc<dyn NotificationInbox>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn AccountService>,
    pub catalog: Arc<dyn ResourceCatalog>,
    pub requests: Arc<dyn ExchangeRequestCommand>,
    pub requests_query: Arc<dyn ExchangeRequestQuery>,
    pub notifications: Arc<dyn NotificationInbox>,
    pub tokens: Arc<BearerTokens>,
}

impl HttpState {
    /// Construct state from the port bundle and the token signer.
    pub fn new(ports: HttpStatePorts, tokens: BearerTokens) -> Self {
        let HttpStatePorts {
            accounts,
            catalog,
            requests,
            requests_query,
            notifications,
        } = ports;
        Self {
            accounts,
            catalog,
            requests,
            requests_query,
            notifications,
            tokens: Arc::new(tokens),
        }
    }
}
