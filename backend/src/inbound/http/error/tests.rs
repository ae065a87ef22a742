//! Tests for HTTP error mapping.

use super::*;
use actix_web::body::to_bytes;
use actix_web::http::header::HeaderMap;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn internal_error() -> Error {
    Error::internal("connection string leaked here")
        .with_trace_id(TRACE_ID)
        .with_details(json!({"secret": "x"}))
}

#[rstest]
#[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
#[case(Error::insufficient_credits("Not enough credits"), StatusCode::BAD_REQUEST)]
#[case(Error::unauthorized("invalid credentials"), StatusCode::UNAUTHORIZED)]
#[case(Error::forbidden("not the owner"), StatusCode::FORBIDDEN)]
#[case(Error::not_found("missing"), StatusCode::NOT_FOUND)]
#[case(Error::conflict("already decided"), StatusCode::CONFLICT)]
#[case(Error::transaction_failed("rolled back"), StatusCode::INTERNAL_SERVER_ERROR)]
#[case(Error::service_unavailable("db down"), StatusCode::SERVICE_UNAVAILABLE)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] error: Error, #[case] status: StatusCode) {
    assert_eq!(ResponseError::status_code(&error), status);
}

async fn response_payload(error: &Error) -> (StatusCode, HeaderMap, Error) {
    let response = ResponseError::error_response(error);
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body())
        .await
        .expect("readable body");
    let payload: Error = serde_json::from_slice(&bytes).expect("error JSON");
    (status, headers, payload)
}

#[rstest]
#[actix_web::test]
async fn internal_errors_are_redacted_but_keep_trace(internal_error: Error) {
    let (status, headers, payload) = response_payload(&internal_error).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        headers
            .get(TRACE_ID_HEADER)
            .and_then(|v| v.to_str().ok()),
        Some(TRACE_ID)
    );
    assert_eq!(payload.code(), ErrorCode::InternalError);
    assert_eq!(payload.message(), REDACTED_MESSAGE);
    assert!(payload.details().is_none());
    assert_eq!(payload.trace_id(), Some(TRACE_ID));
}

#[rstest]
#[actix_web::test]
async fn transaction_failures_keep_their_retry_message() {
    let error = Error::transaction_failed("the decision could not be committed; please retry");

    let (status, headers, payload) = response_payload(&error).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(headers.get(TRACE_ID_HEADER).is_none());
    assert_eq!(payload.code(), ErrorCode::TransactionFailed);
    assert!(payload.message().contains("retry"));
}

#[rstest]
#[actix_web::test]
async fn client_errors_pass_details_through() {
    let error = Error::conflict("request already decided")
        .with_details(json!({"status": "approved", "code": "already_decided"}));

    let (_, _, payload) = response_payload(&error).await;

    assert_eq!(payload.code(), ErrorCode::Conflict);
    assert_eq!(
        payload.details(),
        Some(&json!({"status": "approved", "code": "already_decided"}))
    );
}

#[rstest]
fn actix_errors_become_redacted_internal_errors() {
    let err: Error = actix_web::error::ErrorBadRequest("boom").into();

    assert_eq!(err.code(), ErrorCode::InternalError);
    assert_eq!(err.message(), REDACTED_MESSAGE);
    assert_eq!(err.details(), None);
}
