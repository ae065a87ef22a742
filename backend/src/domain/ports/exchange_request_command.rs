//! Driving ports for the request lifecycle.
//!
//! [`ExchangeRequestCommand`] covers the two state-changing operations;
//! [`ExchangeRequestQuery`] covers the owner and requester listings.

use async_trait::async_trait;

use crate::domain::{
    Decision, Error, ExchangeRequest, OwnerRequestView, RequestId, RequesterRequestView,
    ResourceId, UserId,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExchangeRequestCommand: Send + Sync {
    /// Create a pending request by `requester_id` on `resource_id`.
    ///
    /// # Errors
    /// - `not_found` when the requester or resource does not exist.
    /// - `insufficient_credits` when the requester's balance is not positive;
    ///   no request is created.
    /// - `invalid_request` when the requester owns the resource.
    async fn create_request(
        &self,
        requester_id: &UserId,
        resource_id: &ResourceId,
    ) -> Result<ExchangeRequest, Error>;

    /// Approve or deny a pending request as `acting_user_id`.
    ///
    /// # Errors
    /// - `not_found` when the request or its resource does not exist.
    /// - `forbidden` when the actor does not own the resource.
    /// - `conflict` when the request is no longer pending.
    /// - `transaction_failed` when the atomic commit was rolled back.
    async fn decide_request(
        &self,
        request_id: &RequestId,
        acting_user_id: &UserId,
        decision: Decision,
    ) -> Result<ExchangeRequest, Error>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExchangeRequestQuery: Send + Sync {
    /// Requests on resources owned by `owner_id`, newest first.
    async fn list_owner_requests(&self, owner_id: &UserId) -> Result<Vec<OwnerRequestView>, Error>;

    /// Requests made by `requester_id`, newest first.
    async fn list_requester_requests(
        &self,
        requester_id: &UserId,
    ) -> Result<Vec<RequesterRequestView>, Error>;
}
