//! Exchange requests and their lifecycle state machine.
//!
//! ```text
//! pending --approve--> approved (terminal)
//! pending --deny-----> denied   (terminal)
//! ```

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{DisplayName, RequestId, ResourceId, UserId};

/// Lifecycle status of an exchange request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Approved,
    Denied,
}

impl RequestStatus {
    /// Storage and wire representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Denied => "denied",
        }
    }

    /// Whether no further transition is possible.
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Apply an owner decision, refusing to leave a terminal state.
    ///
    /// # Examples
    /// ```
    /// use marketplace::domain::{Decision, RequestStatus};
    ///
    /// let next = RequestStatus::Pending.apply(Decision::Approve).unwrap();
    /// assert_eq!(next, RequestStatus::Approved);
    /// assert!(next.apply(Decision::Deny).is_err());
    /// ```
    pub const fn apply(self, decision: Decision) -> Result<Self, TransitionError> {
        match self {
            Self::Pending => Ok(decision.target_status()),
            Self::Approved | Self::Denied => Err(TransitionError::AlreadyDecided { current: self }),
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error parsing a stored status string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown request status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for RequestStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "denied" => Ok(Self::Denied),
            other => Err(UnknownStatus(other.to_owned())),
        }
    }
}

/// Rejected state transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("request is already {current}")]
    AlreadyDecided { current: RequestStatus },
}

/// Owner action on a pending request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Approve,
    Deny,
}

impl Decision {
    /// Status a pending request moves to under this decision.
    pub const fn target_status(self) -> RequestStatus {
        match self {
            Self::Approve => RequestStatus::Approved,
            Self::Deny => RequestStatus::Denied,
        }
    }

    /// Whether the decision moves credit between the parties.
    pub const fn transfers_credit(self) -> bool {
        matches!(self, Self::Approve)
    }
}

/// A requester's claim on another user's resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRequest {
    pub id: RequestId,
    pub resource_id: ResourceId,
    pub requester_id: UserId,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
}

impl ExchangeRequest {
    /// Create a new request in the initial `pending` state.
    pub fn pending(
        id: RequestId,
        resource_id: ResourceId,
        requester_id: UserId,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            resource_id,
            requester_id,
            status: RequestStatus::Pending,
            created_at,
        }
    }
}

/// Owner-side view: a request on one of the caller's resources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerRequestView {
    pub request: ExchangeRequest,
    pub resource_title: String,
    pub requester_name: DisplayName,
}

/// Requester-side view: one of the caller's own requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequesterRequestView {
    pub request: ExchangeRequest,
    pub resource_title: String,
    pub owner_name: DisplayName,
}
