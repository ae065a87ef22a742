//! HTTP inbound adapter exposing REST endpoints.

pub mod accounts;
pub mod auth;
pub mod error;
pub mod health;
pub mod notifications;
pub mod requests;
pub mod resources;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod token_config;
pub mod validation;

pub use error::ApiResult;
