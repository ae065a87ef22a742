//! Driving port for account registration, login and profile reads.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, Registration, User, UserId};

/// Account use-cases consumed by inbound adapters.
///
/// Token issuance is left to the adapter; this port only establishes who the
/// caller is.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountService: Send + Sync {
    /// Create an account with the starting credit balance.
    ///
    /// # Errors
    /// [`crate::domain::ErrorCode::Conflict`] when the email is taken.
    async fn register(&self, registration: Registration) -> Result<User, Error>;

    /// Authenticate by email and password.
    ///
    /// # Errors
    /// [`crate::domain::ErrorCode::Unauthorized`] for an unknown email or a
    /// wrong password, without distinguishing the two.
    async fn login(&self, credentials: LoginCredentials) -> Result<User, Error>;

    /// Current profile, including the live credit balance.
    async fn profile(&self, user_id: &UserId) -> Result<User, Error>;
}
