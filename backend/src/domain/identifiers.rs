//! UUID-backed identifiers for marketplace entities.
//!
//! Every entity key is a distinct newtype so a `ResourceId` can never be
//! passed where a `RequestId` is expected.

use thiserror::Error;

/// Error returned when an identifier string is not a valid UUID.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} must be a valid UUID")]
pub struct IdentifierError {
    kind: &'static str,
}

impl IdentifierError {
    /// Name of the identifier that failed to parse.
    pub fn kind(&self) -> &'static str {
        self.kind
    }
}

macro_rules! define_identifier {
    ($(#[$meta:meta])* $name:ident => $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[derive(::serde::Serialize, ::serde::Deserialize)]
        #[serde(transparent)]
        pub struct $name(::uuid::Uuid);

        impl $name {
            /// Parse an identifier from its string form.
            pub fn new(raw: &str) -> Result<Self, IdentifierError> {
                if raw.trim() != raw {
                    return Err(IdentifierError { kind: $kind });
                }
                ::uuid::Uuid::parse_str(raw)
                    .map(Self)
                    .map_err(|_| IdentifierError { kind: $kind })
            }

            /// Generate a new random identifier.
            pub fn random() -> Self {
                Self(::uuid::Uuid::new_v4())
            }

            /// Wrap an existing UUID.
            pub const fn from_uuid(uuid: ::uuid::Uuid) -> Self {
                Self(uuid)
            }

            /// Access the underlying UUID.
            pub const fn as_uuid(&self) -> &::uuid::Uuid {
                &self.0
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = IdentifierError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }
    };
}

define_identifier! {
    /// Stable user identifier.
    UserId => "user id"
}

define_identifier! {
    /// Identifier of a listed resource.
    ResourceId => "resource id"
}

define_identifier! {
    /// Identifier of an exchange request.
    RequestId => "request id"
}

define_identifier! {
    /// Identifier of a notification.
    NotificationId => "notification id"
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("")]
    #[case("not-a-uuid")]
    #[case(" 3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    fn invalid_strings_are_rejected(#[case] raw: &str) {
        let err = RequestId::new(raw).expect_err("invalid id");
        assert_eq!(err.kind(), "request id");
        assert_eq!(err.to_string(), "request id must be a valid UUID");
    }

    #[rstest]
    fn serialises_as_plain_string() {
        let id = UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("valid id");
        let value = serde_json::to_value(id).expect("serialise");
        assert_eq!(value, serde_json::json!("3fa85f64-5717-4562-b3fc-2c963f66afa6"));
    }

    #[rstest]
    fn ordering_follows_uuid_bytes() {
        let low = UserId::from_uuid(uuid::Uuid::nil());
        let high = UserId::from_uuid(uuid::Uuid::from_u128(u128::MAX));
        assert!(low < high);
    }
}
