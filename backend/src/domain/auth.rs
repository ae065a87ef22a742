//! Authentication primitives: login credentials and registrations.
//!
//! Inbound adapters build these from raw request bodies; the password is held
//! in zeroizing storage until the credential hasher has consumed it.

use thiserror::Error;
use zeroize::Zeroizing;

use super::{DisplayName, EmailAddress, UserValidationError};

/// Domain error returned when account payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialsValidationError {
    /// Password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
    /// Email or display name failed validation.
    #[error(transparent)]
    User(#[from] UserValidationError),
}

/// Validated login credentials.
///
/// ## Invariants
/// - `email` is normalised by [`EmailAddress::new`].
/// - `password` is non-empty but keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use marketplace::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("Ada@campus.edu", "hunter22").unwrap();
/// assert_eq!(creds.email().as_ref(), "ada@campus.edu");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, CredentialsValidationError> {
        let email = EmailAddress::new(email)?;
        if password.is_empty() {
            return Err(CredentialsValidationError::EmptyPassword);
        }
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email used to look the account up.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Password provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated sign-up payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    display_name: DisplayName,
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl Registration {
    /// Construct a registration from raw inputs.
    pub fn try_from_parts(
        display_name: &str,
        email: &str,
        password: &str,
    ) -> Result<Self, CredentialsValidationError> {
        let display_name = DisplayName::new(display_name)?;
        let email = EmailAddress::new(email)?;
        if password.is_empty() {
            return Err(CredentialsValidationError::EmptyPassword);
        }
        Ok(Self {
            display_name,
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Requested display name.
    pub fn display_name(&self) -> &DisplayName {
        &self.display_name
    }

    /// Login email.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Plain-text password awaiting hashing.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Opaque password hash as produced by a [`super::ports::CredentialHasher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap an encoded hash string.
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }
}

impl AsRef<str> for PasswordHash {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw", CredentialsValidationError::User(UserValidationError::EmptyEmail))]
    #[case("nobody", "pw", CredentialsValidationError::User(UserValidationError::MalformedEmail))]
    #[case("ada@campus.edu", "", CredentialsValidationError::EmptyPassword)]
    fn invalid_login_credentials(
        #[case] email: &str,
        #[case] password: &str,
        #[case] expected: CredentialsValidationError,
    ) {
        let err = LoginCredentials::try_from_parts(email, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn password_whitespace_is_preserved() {
        let creds =
            LoginCredentials::try_from_parts("ada@campus.edu", " pw ").expect("valid credentials");
        assert_eq!(creds.password(), " pw ");
    }

    #[rstest]
    fn registration_validates_display_name() {
        let err = Registration::try_from_parts("x", "ada@campus.edu", "pw")
            .expect_err("short name must fail");
        assert_eq!(
            err,
            CredentialsValidationError::User(UserValidationError::DisplayNameTooShort { min: 3 })
        );
    }

    #[rstest]
    fn registration_normalises_fields() {
        let registration = Registration::try_from_parts(" Ada ", "ADA@campus.edu", "secret")
            .expect("valid registration");
        assert_eq!(registration.display_name().as_ref(), "Ada");
        assert_eq!(registration.email().as_ref(), "ada@campus.edu");
        assert_eq!(registration.password(), "secret");
    }
}
