//! HTTP server configuration object.

use std::net::SocketAddr;

use actix_web::cookie::Key;
use chrono::TimeDelta;
use marketplace::outbound::persistence::DbPool;

/// Everything `create_server` needs besides the health state.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) token_ttl: TimeDelta,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    #[must_use]
    /// In-memory configuration; add a pool with [`Self::with_db_pool`].
    pub fn new(key: Key, token_ttl: TimeDelta, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            token_ttl,
            bind_addr,
            db_pool: None,
        }
    }

    /// Back the repositories with PostgreSQL instead of the in-memory store.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }
}
