//! Marketplace entry-point: loads settings, prepares storage and runs the
//! HTTP server.

mod server;

use std::io;
use std::time::Duration;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use marketplace::inbound::http::health::HealthState;
use marketplace::inbound::http::token_config::fingerprint::key_fingerprint;
use marketplace::inbound::http::token_config::{BuildMode, token_key_from_env};
use marketplace::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};

use server::{ServerConfig, ServerSettings, create_server};

const WORKER_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load().map_err(|e| io::Error::other(e.to_string()))?;
    let bind_addr = settings.bind_addr().map_err(|e| {
        io::Error::new(io::ErrorKind::InvalidInput, format!("invalid bind address: {e}"))
    })?;

    let key = token_key_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(io::Error::other)?;
    info!(fingerprint = %key_fingerprint(&key), "token signing key loaded");

    let mut config = ServerConfig::new(key, settings.token_ttl(), bind_addr);
    if let Some(database_url) = settings.database_url() {
        run_pending_migrations(database_url)
            .await
            .map_err(io::Error::other)?;
        let pool = DbPool::new(
            PoolConfig::new(database_url).with_max_size(settings.db_max_connections()),
        )
        .await
        .map_err(io::Error::other)?;
        config = config.with_db_pool(pool);
    }

    let health_state = web::Data::new(HealthState::new());
    let (server, worker) = create_server(health_state.clone(), config)?;
    info!(%bind_addr, "marketplace listening");

    let result = server.await;
    health_state.mark_unhealthy();
    match tokio::time::timeout(WORKER_DRAIN_TIMEOUT, worker).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!(error = %e, "notification worker ended abnormally"),
        Err(_) => warn!("notification worker still draining at shutdown"),
    }
    result
}
