//! Request lifecycle engine.
//!
//! Implements [`ExchangeRequestCommand`] and [`ExchangeRequestQuery`]:
//! eligibility on creation, owner-only decisions, and the hand-off of the
//! atomic decision unit of work to the request repository. Notifications are
//! dispatched only after the primary write has succeeded and can never fail
//! the operation that produced them.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{debug, info};

use super::port_error_mapping::{
    already_decided, map_decision_commit_error, map_request_repository_error,
    map_resource_repository_error, map_user_repository_error,
};
use super::ports::{
    ExchangeRequestCommand, ExchangeRequestQuery, ExchangeRequestRepository,
    NotificationDispatcher, ResourceRepository, UserRepository,
};
use super::{
    Decision, DecisionUnitOfWork, Error, ExchangeRequest, NotificationDraft, NotificationMessage,
    OwnerRequestView, RequestId, RequesterRequestView, Resource, ResourceId, TransitionError, User,
    UserId,
};

/// Lifecycle service over the user, resource and request repositories.
#[derive(Clone)]
pub struct ExchangeRequestService<U, R, Q> {
    users: Arc<U>,
    resources: Arc<R>,
    requests: Arc<Q>,
    notifications: Arc<dyn NotificationDispatcher>,
    clock: Arc<dyn Clock>,
}

impl<U, R, Q> ExchangeRequestService<U, R, Q> {
    /// Create a new service.
    pub fn new(
        users: Arc<U>,
        resources: Arc<R>,
        requests: Arc<Q>,
        notifications: Arc<dyn NotificationDispatcher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            resources,
            requests,
            notifications,
            clock,
        }
    }
}

impl<U, R, Q> ExchangeRequestService<U, R, Q>
where
    U: UserRepository,
    R: ResourceRepository,
    Q: ExchangeRequestRepository,
{
    async fn load_user(&self, id: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(id)
            .await
            .map_err(map_user_repository_error)?
            .ok_or_else(|| {
                Error::not_found("user not found").with_details(json!({
                    "userId": id.to_string(),
                    "code": "user_not_found",
                }))
            })
    }

    async fn load_resource(&self, id: &ResourceId) -> Result<Resource, Error> {
        self.resources
            .find_by_id(id)
            .await
            .map_err(map_resource_repository_error)?
            .ok_or_else(|| {
                Error::not_found("resource not found").with_details(json!({
                    "resourceId": id.to_string(),
                    "code": "resource_not_found",
                }))
            })
    }

    async fn load_request(&self, id: &RequestId) -> Result<ExchangeRequest, Error> {
        self.requests
            .find_by_id(id)
            .await
            .map_err(map_request_repository_error)?
            .ok_or_else(|| {
                Error::not_found("request not found").with_details(json!({
                    "requestId": id.to_string(),
                    "code": "request_not_found",
                }))
            })
    }
}

fn decision_message(decision: Decision, resource_title: &str) -> NotificationMessage {
    match decision {
        Decision::Approve => NotificationMessage::request_approved(resource_title),
        Decision::Deny => NotificationMessage::request_denied(resource_title),
    }
}

#[async_trait]
impl<U, R, Q> ExchangeRequestCommand for ExchangeRequestService<U, R, Q>
where
    U: UserRepository,
    R: ResourceRepository,
    Q: ExchangeRequestRepository,
{
    async fn create_request(
        &self,
        requester_id: &UserId,
        resource_id: &ResourceId,
    ) -> Result<ExchangeRequest, Error> {
        let requester = self.load_user(requester_id).await?;
        if !requester.credits().is_positive() {
            debug!(
                requester_id = %requester_id,
                credits = requester.credits().value(),
                "request rejected: insufficient credits"
            );
            return Err(Error::insufficient_credits("Not enough credits").with_details(json!({
                "credits": requester.credits().value(),
                "code": "insufficient_credits",
            })));
        }

        let resource = self.load_resource(resource_id).await?;
        if resource.owner_id == *requester_id {
            return Err(
                Error::invalid_request("you cannot request your own resource").with_details(
                    json!({
                        "field": "resourceId",
                        "code": "self_request",
                    }),
                ),
            );
        }

        let request = ExchangeRequest::pending(
            RequestId::random(),
            resource.id,
            *requester_id,
            self.clock.utc(),
        );
        self.requests
            .insert(&request)
            .await
            .map_err(map_request_repository_error)?;
        info!(
            request_id = %request.id,
            resource_id = %resource.id,
            requester_id = %requester_id,
            "exchange request created"
        );

        self.notifications.dispatch(NotificationDraft::new(
            resource.owner_id,
            NotificationMessage::new_request(&resource.title),
        ));
        Ok(request)
    }

    async fn decide_request(
        &self,
        request_id: &RequestId,
        acting_user_id: &UserId,
        decision: Decision,
    ) -> Result<ExchangeRequest, Error> {
        let request = self.load_request(request_id).await?;
        let resource = self.load_resource(&request.resource_id).await?;
        if resource.owner_id != *acting_user_id {
            debug!(
                request_id = %request_id,
                acting_user_id = %acting_user_id,
                "decision rejected: caller does not own the resource"
            );
            return Err(Error::forbidden("only the resource owner can decide this request"));
        }

        let work = DecisionUnitOfWork::prepare(&request, resource.owner_id, decision).map_err(
            |err| match err {
                TransitionError::AlreadyDecided { current } => already_decided(current.as_str()),
            },
        )?;
        let decided = self
            .requests
            .commit_decision(&work)
            .await
            .map_err(map_decision_commit_error)?;
        info!(
            request_id = %decided.id,
            status = %decided.status,
            credits_moved = work.transfer().map_or(0, |t| t.amount()),
            "exchange request decided"
        );

        self.notifications.dispatch(NotificationDraft::new(
            decided.requester_id,
            decision_message(decision, &resource.title),
        ));
        Ok(decided)
    }
}

#[async_trait]
impl<U, R, Q> ExchangeRequestQuery for ExchangeRequestService<U, R, Q>
where
    U: UserRepository,
    R: ResourceRepository,
    Q: ExchangeRequestRepository,
{
    async fn list_owner_requests(&self, owner_id: &UserId) -> Result<Vec<OwnerRequestView>, Error> {
        self.requests
            .list_for_owner(owner_id)
            .await
            .map_err(map_request_repository_error)
    }

    async fn list_requester_requests(
        &self,
        requester_id: &UserId,
    ) -> Result<Vec<RequesterRequestView>, Error> {
        self.requests
            .list_for_requester(requester_id)
            .await
            .map_err(map_request_repository_error)
    }
}
