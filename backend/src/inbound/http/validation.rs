//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every validation failure becomes `invalid_request` with a details object
//! naming the offending `field` and a machine-readable `code`.

use serde_json::json;

use crate::domain::{
    CredentialsValidationError, Error, IdentifierError, ResourceValidationError,
    UserValidationError,
};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValidationCode {
    MissingField,
    InvalidUuid,
    InvalidValue,
}

impl ValidationCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::InvalidUuid => "invalid_uuid",
            Self::InvalidValue => "invalid_value",
        }
    }
}

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

fn field_error(field: FieldName, code: ValidationCode, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": code.as_str(),
    }))
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    field_error(
        field,
        ValidationCode::MissingField,
        format!("missing required field: {}", field.as_str()),
    )
}

/// Parse a path or body identifier, reporting the raw value on failure.
pub(crate) fn parse_identifier<T>(
    raw: &str,
    field: FieldName,
    parse: impl FnOnce(&str) -> Result<T, IdentifierError>,
) -> Result<T, Error> {
    parse(raw).map_err(|err| {
        Error::invalid_request(err.to_string()).with_details(json!({
            "field": field.as_str(),
            "value": raw,
            "code": ValidationCode::InvalidUuid.as_str(),
        }))
    })
}

pub(crate) fn map_user_validation_error(err: UserValidationError) -> Error {
    let field = match err {
        UserValidationError::EmptyDisplayName
        | UserValidationError::DisplayNameTooShort { .. }
        | UserValidationError::DisplayNameTooLong { .. }
        | UserValidationError::DisplayNameInvalidCharacters => FieldName::new("displayName"),
        UserValidationError::EmptyEmail
        | UserValidationError::MalformedEmail
        | UserValidationError::EmailTooLong { .. } => FieldName::new("email"),
    };
    field_error(field, ValidationCode::InvalidValue, err.to_string())
}

pub(crate) fn map_credentials_error(err: CredentialsValidationError) -> Error {
    match err {
        CredentialsValidationError::EmptyPassword => field_error(
            FieldName::new("password"),
            ValidationCode::MissingField,
            err.to_string(),
        ),
        CredentialsValidationError::User(inner) => map_user_validation_error(inner),
    }
}

pub(crate) fn map_resource_validation_error(err: ResourceValidationError) -> Error {
    field_error(
        FieldName::new(err.field()),
        ValidationCode::InvalidValue,
        err.to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ErrorCode, NotificationId, RequestId, ResourceId};
    use rstest::rstest;

    #[rstest]
    fn bad_identifier_reports_field_and_value() {
        let err = parse_identifier("nope", FieldName::new("id"), RequestId::new)
            .expect_err("invalid uuid");

        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(
            err.details(),
            Some(&json!({"field": "id", "value": "nope", "code": "invalid_uuid"}))
        );
    }

    #[rstest]
    fn identifier_constructors_parse_borrowed_path_segments() {
        let raw = String::from("3fa85f64-5717-4562-b3fc-2c963f66afa6");

        let resource = parse_identifier(&raw, FieldName::new("resourceId"), ResourceId::new)
            .expect("resource id");
        let request =
            parse_identifier(&raw, FieldName::new("id"), RequestId::new).expect("request id");
        let notification = parse_identifier(&raw, FieldName::new("id"), NotificationId::new)
            .expect("notification id");

        assert_eq!(resource.to_string(), raw);
        assert_eq!(request.to_string(), raw);
        assert_eq!(notification.to_string(), raw);
    }

    #[rstest]
    #[case(UserValidationError::MalformedEmail, "email")]
    #[case(UserValidationError::DisplayNameTooShort { min: 3 }, "displayName")]
    fn user_errors_name_the_camel_case_field(
        #[case] err: UserValidationError,
        #[case] field: &str,
    ) {
        let mapped = map_user_validation_error(err);

        assert_eq!(
            mapped.details().and_then(|d| d.get("field")),
            Some(&json!(field))
        );
    }

    #[rstest]
    fn empty_password_is_a_missing_field() {
        let mapped = map_credentials_error(CredentialsValidationError::EmptyPassword);

        assert_eq!(
            mapped.details(),
            Some(&json!({"field": "password", "code": "missing_field"}))
        );
    }

    #[rstest]
    fn resource_errors_use_the_draft_field() {
        let mapped = map_resource_validation_error(ResourceValidationError::EmptyCategory);

        assert_eq!(mapped.message(), "category must not be empty");
        assert_eq!(
            mapped.details().and_then(|d| d.get("field")),
            Some(&json!("category"))
        );
    }
}
