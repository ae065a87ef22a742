//! User mailbox entries produced by request lifecycle transitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{NotificationId, UserId};

/// Message text of a notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationMessage(String);

impl NotificationMessage {
    /// Owner-facing message for a newly created request.
    ///
    /// # Examples
    /// ```
    /// use marketplace::domain::NotificationMessage;
    ///
    /// let message = NotificationMessage::new_request("Sofa");
    /// assert_eq!(message.as_ref(), "New request for \"Sofa\"");
    /// ```
    pub fn new_request(resource_title: &str) -> Self {
        Self(format!("New request for \"{resource_title}\""))
    }

    /// Requester-facing message after approval.
    pub fn request_approved(resource_title: &str) -> Self {
        Self(format!("Your request for \"{resource_title}\" was approved."))
    }

    /// Requester-facing message after denial.
    pub fn request_denied(resource_title: &str) -> Self {
        Self(format!("Your request for \"{resource_title}\" was denied."))
    }

    /// Rehydrate a stored message.
    pub fn from_stored(text: impl Into<String>) -> Self {
        Self(text.into())
    }
}

impl AsRef<str> for NotificationMessage {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// A notification waiting to be written to a recipient's mailbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationDraft {
    pub recipient_id: UserId,
    pub message: NotificationMessage,
}

impl NotificationDraft {
    /// Notification addressed to `recipient_id`, not yet stored.
    pub fn new(recipient_id: UserId, message: NotificationMessage) -> Self {
        Self {
            recipient_id,
            message,
        }
    }
}

/// A stored notification. Only the `read` flag ever changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: NotificationId,
    pub recipient_id: UserId,
    pub message: NotificationMessage,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Materialise a draft as an unread notification.
    pub fn from_draft(id: NotificationId, draft: NotificationDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            recipient_id: draft.recipient_id,
            message: draft.message,
            read: false,
            created_at,
        }
    }
}
