//! Conversions from driven-port errors to the domain [`Error`].
//!
//! Connection failures are surfaced as `service_unavailable` so clients can
//! retry; query failures are internal and redacted by the HTTP adapter.

use serde_json::json;
use tracing::error;

use super::Error;
use super::ports::{
    ExchangeRequestRepositoryError, NotificationRepositoryError, ResourceRepositoryError,
    UserRepositoryError,
};

pub(crate) fn map_user_repository_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserRepositoryError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserRepositoryError::DuplicateEmail { email } => {
            Error::conflict("email already registered").with_details(json!({
                "field": "email",
                "value": email,
                "code": "duplicate_email",
            }))
        }
    }
}

pub(crate) fn map_resource_repository_error(error: ResourceRepositoryError) -> Error {
    match error {
        ResourceRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("resource repository unavailable: {message}"))
        }
        ResourceRepositoryError::Query { message } => {
            Error::internal(format!("resource repository error: {message}"))
        }
    }
}

/// Map request repository failures outside the decision transaction.
pub(crate) fn map_request_repository_error(error: ExchangeRequestRepositoryError) -> Error {
    match error {
        ExchangeRequestRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("request repository unavailable: {message}"))
        }
        ExchangeRequestRepositoryError::Missing { request_id } => {
            Error::not_found("request not found").with_details(json!({
                "requestId": request_id,
                "code": "request_not_found",
            }))
        }
        ExchangeRequestRepositoryError::AlreadyDecided { status } => already_decided(&status),
        ExchangeRequestRepositoryError::Query { message }
        | ExchangeRequestRepositoryError::Transaction { message } => {
            Error::internal(format!("request repository error: {message}"))
        }
    }
}

/// Map failures of [`super::ports::ExchangeRequestRepository::commit_decision`].
///
/// Anything other than a lost race or a vanished request means the unit of
/// work was rolled back and is reported as `transaction_failed`.
pub(crate) fn map_decision_commit_error(error: ExchangeRequestRepositoryError) -> Error {
    match error {
        ExchangeRequestRepositoryError::AlreadyDecided { status } => already_decided(&status),
        ExchangeRequestRepositoryError::Missing { request_id } => {
            map_request_repository_error(ExchangeRequestRepositoryError::Missing { request_id })
        }
        ExchangeRequestRepositoryError::Connection { message }
        | ExchangeRequestRepositoryError::Query { message }
        | ExchangeRequestRepositoryError::Transaction { message } => {
            error!(%message, "decision transaction failed");
            Error::transaction_failed("the decision could not be committed; please retry")
        }
    }
}

pub(crate) fn already_decided(status: &str) -> Error {
    Error::conflict(format!("request already {status}")).with_details(json!({
        "status": status,
        "code": "already_decided",
    }))
}

pub(crate) fn map_notification_repository_error(error: NotificationRepositoryError) -> Error {
    match error {
        NotificationRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("notification repository unavailable: {message}"))
        }
        NotificationRepositoryError::Query { message } => {
            Error::internal(format!("notification repository error: {message}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case(ExchangeRequestRepositoryError::transaction("deadlock"), ErrorCode::TransactionFailed)]
    #[case(ExchangeRequestRepositoryError::query("syntax"), ErrorCode::TransactionFailed)]
    #[case(ExchangeRequestRepositoryError::connection("reset"), ErrorCode::TransactionFailed)]
    #[case(ExchangeRequestRepositoryError::already_decided("approved"), ErrorCode::Conflict)]
    #[case(ExchangeRequestRepositoryError::missing("r-1"), ErrorCode::NotFound)]
    fn decision_commit_errors(
        #[case] error: ExchangeRequestRepositoryError,
        #[case] expected: ErrorCode,
    ) {
        assert_eq!(map_decision_commit_error(error).code(), expected);
    }

    #[rstest]
    fn duplicate_email_is_conflict() {
        let err = map_user_repository_error(UserRepositoryError::duplicate_email("a@b.c"));
        assert_eq!(err.code(), ErrorCode::Conflict);
        assert_eq!(
            err.details().and_then(|d| d.get("code")),
            Some(&json!("duplicate_email"))
        );
    }

    #[rstest]
    fn connection_errors_are_retryable() {
        let err = map_resource_repository_error(ResourceRepositoryError::connection("down"));
        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    }
}
