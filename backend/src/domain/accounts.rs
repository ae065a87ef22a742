//! Account registration and authentication service.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use super::port_error_mapping::map_user_repository_error;
use super::ports::{AccountService, CredentialHasher, CredentialHasherError, UserRecord, UserRepository};
use super::{Credits, Error, LoginCredentials, Registration, User, UserId};

const INVALID_CREDENTIALS: &str = "invalid credentials";

/// [`AccountService`] backed by a user repository and a credential hasher.
#[derive(Clone)]
pub struct AccountsService<U> {
    users: Arc<U>,
    hasher: Arc<dyn CredentialHasher>,
    starting_credits: Credits,
}

impl<U> AccountsService<U> {
    /// Create a new service granting `starting_credits` to new accounts.
    pub fn new(users: Arc<U>, hasher: Arc<dyn CredentialHasher>, starting_credits: Credits) -> Self {
        Self {
            users,
            hasher,
            starting_credits,
        }
    }
}

fn map_hasher_error(error: CredentialHasherError) -> Error {
    Error::internal(format!("credential hasher failed: {error}"))
}

#[async_trait]
impl<U> AccountService for AccountsService<U>
where
    U: UserRepository,
{
    async fn register(&self, registration: Registration) -> Result<User, Error> {
        let password_hash = self
            .hasher
            .hash(registration.password())
            .map_err(map_hasher_error)?;
        let user = User::new(
            UserId::random(),
            registration.display_name().clone(),
            registration.email().clone(),
            self.starting_credits,
        );
        let record = UserRecord {
            user: user.clone(),
            password_hash,
        };
        self.users
            .insert(&record)
            .await
            .map_err(map_user_repository_error)?;
        info!(user_id = %user.id(), "account registered");
        Ok(user)
    }

    async fn login(&self, credentials: LoginCredentials) -> Result<User, Error> {
        let Some(record) = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(map_user_repository_error)?
        else {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };

        match self
            .hasher
            .verify(credentials.password(), &record.password_hash)
        {
            Ok(true) => Ok(record.user),
            Ok(false) => Err(Error::unauthorized(INVALID_CREDENTIALS)),
            Err(error) => {
                warn!(user_id = %record.user.id(), %error, "stored credential unusable");
                Err(Error::unauthorized(INVALID_CREDENTIALS))
            }
        }
    }

    async fn profile(&self, user_id: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(user_id)
            .await
            .map_err(map_user_repository_error)?
            .ok_or_else(|| Error::not_found("user not found"))
    }
}
