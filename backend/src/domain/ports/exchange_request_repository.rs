//! Port abstraction for exchange request persistence.
//!
//! Besides plain reads and inserts, adapters own the decision transaction:
//! [`ExchangeRequestRepository::commit_decision`] must apply the whole
//! [`DecisionUnitOfWork`] atomically and re-check the pending guard inside
//! the same transaction.

use async_trait::async_trait;

use crate::domain::{
    DecisionUnitOfWork, ExchangeRequest, OwnerRequestView, RequestId, RequesterRequestView, UserId,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by exchange request repository adapters.
    pub enum ExchangeRequestRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "request repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "request repository query failed: {message}",
        /// The request vanished before the decision could be committed.
        Missing { request_id: String } => "request {request_id} not found",
        /// The request left `pending` before the decision committed.
        AlreadyDecided { status: String } => "request already {status}",
        /// The decision transaction failed and was rolled back.
        Transaction { message: String } => "decision transaction rolled back: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExchangeRequestRepository: Send + Sync {
    /// Persist a new pending request.
    async fn insert(&self, request: &ExchangeRequest) -> Result<(), ExchangeRequestRepositoryError>;

    /// Fetch a request by identifier.
    async fn find_by_id(
        &self,
        id: &RequestId,
    ) -> Result<Option<ExchangeRequest>, ExchangeRequestRepositoryError>;

    /// Requests on resources owned by `owner_id`, newest first.
    async fn list_for_owner(
        &self,
        owner_id: &UserId,
    ) -> Result<Vec<OwnerRequestView>, ExchangeRequestRepositoryError>;

    /// Requests created by `requester_id`, newest first.
    async fn list_for_requester(
        &self,
        requester_id: &UserId,
    ) -> Result<Vec<RequesterRequestView>, ExchangeRequestRepositoryError>;

    /// Apply a decision and its ledger movement as one all-or-nothing unit.
    ///
    /// Returns the request in its new state. On any error nothing has been
    /// written and the request is still `pending` (or was already decided).
    async fn commit_decision(
        &self,
        work: &DecisionUnitOfWork,
    ) -> Result<ExchangeRequest, ExchangeRequestRepositoryError>;
}
