//! Per-user notification mailbox service.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use super::port_error_mapping::map_notification_repository_error;
use super::ports::{NotificationInbox, NotificationRepository};
use super::{Error, Notification, NotificationId, UserId};

/// [`NotificationInbox`] backed by a notification repository.
#[derive(Clone)]
pub struct NotificationInboxService<N> {
    notifications: Arc<N>,
}

impl<N> NotificationInboxService<N> {
    /// Inbox backed by the notification repository.
    pub fn new(notifications: Arc<N>) -> Self {
        Self { notifications }
    }
}

fn notification_not_found(id: &NotificationId) -> Error {
    Error::not_found("notification not found").with_details(json!({
        "notificationId": id,
        "code": "notification_not_found",
    }))
}

#[async_trait]
impl<N> NotificationInbox for NotificationInboxService<N>
where
    N: NotificationRepository,
{
    async fn list(&self, recipient_id: &UserId) -> Result<Vec<Notification>, Error> {
        self.notifications
            .list_for_recipient(recipient_id)
            .await
            .map_err(map_notification_repository_error)
    }

    async fn mark_read(
        &self,
        id: &NotificationId,
        recipient_id: &UserId,
    ) -> Result<Notification, Error> {
        self.notifications
            .mark_read(id, recipient_id)
            .await
            .map_err(map_notification_repository_error)?
            .ok_or_else(|| notification_not_found(id))
    }

    async fn delete(&self, id: &NotificationId, recipient_id: &UserId) -> Result<(), Error> {
        let removed = self
            .notifications
            .delete(id, recipient_id)
            .await
            .map_err(map_notification_repository_error)?;
        if removed {
            Ok(())
        } else {
            Err(notification_not_found(id))
        }
    }
}
