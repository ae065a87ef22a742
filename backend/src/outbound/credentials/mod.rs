//! Argon2id implementation of the credential hasher port.

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{
    Error as PhcError, PasswordHash as PhcString, PasswordHasher, PasswordVerifier, SaltString,
};

use crate::domain::PasswordHash;
use crate::domain::ports::{CredentialHasher, CredentialHasherError};

/// Hashes passwords with Argon2id and a random salt, stored as PHC strings.
#[derive(Default, Clone)]
pub struct Argon2CredentialHasher {
    argon2: Argon2<'static>,
}

impl Argon2CredentialHasher {
    /// Hasher with the Argon2id default parameters.
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialHasher for Argon2CredentialHasher {
    fn hash(&self, password: &str) -> Result<PasswordHash, CredentialHasherError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|phc| PasswordHash::new(phc.to_string()))
            .map_err(|err| CredentialHasherError::hash(err.to_string()))
    }

    fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, CredentialHasherError> {
        let parsed = PhcString::new(hash.as_ref())
            .map_err(|err| CredentialHasherError::malformed_hash(err.to_string()))?;
        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(PhcError::Password) => Ok(false),
            Err(err) => Err(CredentialHasherError::malformed_hash(err.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn hashes_verify_only_the_original_password() {
        let hasher = Argon2CredentialHasher::new();
        let hash = hasher.hash("correct horse").expect("hash");

        assert!(hash.as_ref().starts_with("$argon2id$"));
        assert!(hasher.verify("correct horse", &hash).expect("verify"));
        assert!(!hasher.verify("battery staple", &hash).expect("verify"));
    }

    #[rstest]
    fn salts_differ_between_hashes() {
        let hasher = Argon2CredentialHasher::new();
        let first = hasher.hash("pw").expect("hash");
        let second = hasher.hash("pw").expect("hash");

        assert_ne!(first.as_ref(), second.as_ref());
    }

    #[rstest]
    fn malformed_stored_hash_is_an_error() {
        let hasher = Argon2CredentialHasher::new();
        let err = hasher
            .verify("pw", &PasswordHash::new("plaintext"))
            .expect_err("malformed");

        assert!(matches!(err, CredentialHasherError::MalformedHash { .. }));
    }
}
