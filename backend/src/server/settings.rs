//! Server settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `MARKETPLACE_*` environment variables or a
//! configuration file. Absent values fall back to the defaults below.

use std::net::{AddrParseError, SocketAddr};

use chrono::TimeDelta;
use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Runtime settings for the HTTP server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "MARKETPLACE")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL. The in-memory store is used when absent.
    pub database_url: Option<String>,
    /// Upper bound for pooled database connections.
    #[ortho_config(default = 10)]
    pub db_max_connections: u32,
    /// Lifetime of issued bearer tokens, in hours.
    #[ortho_config(default = 24)]
    pub token_ttl_hours: i64,
}

impl ServerSettings {
    /// Configured listen address, defaulting to all interfaces on 8080.
    pub fn bind_addr(&self) -> Result<SocketAddr, AddrParseError> {
        self.bind_addr
            .as_deref()
            .unwrap_or(DEFAULT_BIND_ADDR)
            .trim()
            .parse()
    }

    /// Database URL when one is configured and non-blank.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Pool size, at least one connection.
    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections.max(1)
    }

    /// Bearer token lifetime; never shorter than one hour.
    pub fn token_ttl(&self) -> TimeDelta {
        TimeDelta::hours(self.token_ttl_hours.max(1))
    }
}
