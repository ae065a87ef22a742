//! Port for password hashing and verification.

use crate::domain::PasswordHash;

use super::define_port_error;

define_port_error! {
    /// Errors raised by credential hashing adapters.
    pub enum CredentialHasherError {
        /// Hashing the password failed.
        Hash { message: String } => "password hashing failed: {message}",
        /// The stored hash could not be parsed.
        MalformedHash { message: String } => "stored password hash is malformed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait CredentialHasher: Send + Sync {
    /// Produce an encoded hash for a new password.
    fn hash(&self, password: &str) -> Result<PasswordHash, CredentialHasherError>;

    /// Check a candidate password against a stored hash.
    fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, CredentialHasherError>;
}
