//! Driving port for reading and acknowledging notifications.

use async_trait::async_trait;

use crate::domain::{Error, Notification, NotificationId, UserId};

/// Mailbox operations scoped to the calling user.
///
/// Ownership and existence are deliberately conflated: touching another
/// user's notification reports `not_found`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationInbox: Send + Sync {
    /// Caller's notifications, newest first.
    async fn list(&self, recipient_id: &UserId) -> Result<Vec<Notification>, Error>;

    /// Mark one of the caller's notifications as read.
    async fn mark_read(
        &self,
        id: &NotificationId,
        recipient_id: &UserId,
    ) -> Result<Notification, Error>;

    /// Delete one of the caller's notifications.
    async fn delete(&self, id: &NotificationId, recipient_id: &UserId) -> Result<(), Error>;
}
