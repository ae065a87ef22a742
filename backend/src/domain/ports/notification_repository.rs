//! Port abstraction for per-user notification mailboxes.

use async_trait::async_trait;

use crate::domain::{Notification, NotificationId, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by notification repository adapters.
    pub enum NotificationRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "notification repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "notification repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Append a notification to its recipient's mailbox.
    async fn insert(&self, notification: &Notification) -> Result<(), NotificationRepositoryError>;

    /// All notifications for `recipient_id`, newest first.
    async fn list_for_recipient(
        &self,
        recipient_id: &UserId,
    ) -> Result<Vec<Notification>, NotificationRepositoryError>;

    /// Set the read flag when the notification belongs to `recipient_id`.
    ///
    /// Returns `None` when no such notification exists for that recipient.
    async fn mark_read(
        &self,
        id: &NotificationId,
        recipient_id: &UserId,
    ) -> Result<Option<Notification>, NotificationRepositoryError>;

    /// Remove the notification when it belongs to `recipient_id`.
    ///
    /// Returns whether a row was removed.
    async fn delete(
        &self,
        id: &NotificationId,
        recipient_id: &UserId,
    ) -> Result<bool, NotificationRepositoryError>;
}
