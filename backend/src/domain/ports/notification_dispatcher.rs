//! Fire-and-forget side channel for lifecycle notifications.
//!
//! Lifecycle operations hand drafts to a [`NotificationDispatcher`] after
//! their primary write has committed. Dispatch has no return value: delivery
//! problems travel on their own channel ([`NotificationDeliveryError`]) and
//! are logged by the adapter, never surfaced to the caller.

use crate::domain::NotificationDraft;

use super::define_port_error;

define_port_error! {
    /// Failures observed while delivering a dispatched notification.
    pub enum NotificationDeliveryError {
        /// The delivery queue no longer accepts work.
        QueueClosed => "notification queue is closed",
        /// The mailbox write failed.
        Store { message: String } => "notification could not be stored: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait NotificationDispatcher: Send + Sync {
    /// Hand a notification off for best-effort delivery.
    fn dispatch(&self, draft: NotificationDraft);
}
