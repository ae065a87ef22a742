//! Marketplace users and their credit balances.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::UserId;

/// Minimum allowed length for a display name.
pub const DISPLAY_NAME_MIN: usize = 3;
/// Maximum allowed length for a display name.
pub const DISPLAY_NAME_MAX: usize = 32;
/// Maximum allowed length for an email address.
pub const EMAIL_MAX: usize = 254;
/// Balance granted to newly registered accounts.
pub const STARTING_CREDITS: Credits = Credits(10);

/// Validation errors raised by user value types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserValidationError {
    #[error("display name must not be empty")]
    EmptyDisplayName,
    #[error("display name must be at least {min} characters")]
    DisplayNameTooShort { min: usize },
    #[error("display name must be at most {max} characters")]
    DisplayNameTooLong { max: usize },
    #[error("display name may only contain letters, numbers, spaces, or underscores")]
    DisplayNameInvalidCharacters,
    #[error("email must not be empty")]
    EmptyEmail,
    #[error("email must be a single address of the form local@domain")]
    MalformedEmail,
    #[error("email must be at most {max} characters")]
    EmailTooLong { max: usize },
}

/// Human readable display name for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DisplayName(String);

impl DisplayName {
    /// Validate and construct a [`DisplayName`], trimming outer whitespace.
    pub fn new(display_name: impl Into<String>) -> Result<Self, UserValidationError> {
        let raw = display_name.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyDisplayName);
        }

        let length = trimmed.chars().count();
        if length < DISPLAY_NAME_MIN {
            return Err(UserValidationError::DisplayNameTooShort {
                min: DISPLAY_NAME_MIN,
            });
        }
        if length > DISPLAY_NAME_MAX {
            return Err(UserValidationError::DisplayNameTooLong {
                max: DISPLAY_NAME_MAX,
            });
        }
        if !trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ' ')
        {
            return Err(UserValidationError::DisplayNameInvalidCharacters);
        }

        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for DisplayName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<DisplayName> for String {
    fn from(value: DisplayName) -> Self {
        value.0
    }
}

impl TryFrom<String> for DisplayName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Normalised (trimmed, lower-cased) email address used as the login key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and normalise an email address.
    ///
    /// # Examples
    /// ```
    /// use marketplace::domain::EmailAddress;
    ///
    /// let email = EmailAddress::new("  Ada@Campus.EDU ").unwrap();
    /// assert_eq!(email.as_ref(), "ada@campus.edu");
    /// ```
    pub fn new(email: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let normalised = email.as_ref().trim().to_lowercase();
        if normalised.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if normalised.chars().count() > EMAIL_MAX {
            return Err(UserValidationError::EmailTooLong { max: EMAIL_MAX });
        }
        let mut parts = normalised.split('@');
        let well_formed = matches!(
            (parts.next(), parts.next(), parts.next()),
            (Some(local), Some(domain), None) if !local.is_empty() && !domain.is_empty()
        );
        if !well_formed || normalised.chars().any(char::is_whitespace) {
            return Err(UserValidationError::MalformedEmail);
        }
        Ok(Self(normalised))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// A user's credit balance.
///
/// Balances are signed: eligibility is checked when a request is created,
/// not when it is approved, so a balance may legitimately dip below zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credits(i32);

impl Credits {
    /// Wrap a raw balance.
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// Raw balance value.
    pub const fn value(self) -> i32 {
        self.0
    }

    /// Whether the balance allows creating a new request.
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Balance after receiving `amount` credits, or `None` on overflow.
    #[must_use]
    pub const fn checked_plus(self, amount: i32) -> Option<Self> {
        match self.0.checked_add(amount) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }

    /// Balance after spending `amount` credits, or `None` on overflow.
    #[must_use]
    pub const fn checked_minus(self, amount: i32) -> Option<Self> {
        match self.0.checked_sub(amount) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }
}

impl fmt::Display for Credits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Marketplace account as seen by the domain.
///
/// The password hash is deliberately absent; it only exists in
/// [`super::ports::UserRecord`] at the persistence boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    id: UserId,
    display_name: DisplayName,
    email: EmailAddress,
    credits: Credits,
}

impl User {
    /// Build a user from validated components.
    pub fn new(id: UserId, display_name: DisplayName, email: EmailAddress, credits: Credits) -> Self {
        Self {
            id,
            display_name,
            email,
            credits,
        }
    }

    /// Stable user identifier.
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Display name shown to other users.
    pub fn display_name(&self) -> &DisplayName {
        &self.display_name
    }

    /// Login email.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Current credit balance.
    pub fn credits(&self) -> Credits {
        self.credits
    }

    /// Same user with a replaced balance.
    #[must_use]
    pub fn with_credits(self, credits: Credits) -> Self {
        Self { credits, ..self }
    }
}

#[cfg(test)]
mod tests;
