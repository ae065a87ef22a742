//! Queue-backed notification delivery.
//!
//! [`ChannelNotificationDispatcher`] pushes drafts onto an unbounded tokio
//! channel and returns immediately. [`NotificationDeliveryWorker`] drains the
//! channel on its own task and writes each draft to the mailbox store. The
//! trace identifier of the dispatching request travels with the draft so
//! delivery logs correlate with the request that caused them.

use std::sync::Arc;

use mockable::Clock;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::domain::ports::{
    NotificationDeliveryError, NotificationDispatcher, NotificationRepository,
};
use crate::domain::{Notification, NotificationDraft, NotificationId, TraceId};

/// A draft in flight, tagged with the trace of the request that produced it.
#[derive(Debug)]
struct Envelope {
    draft: NotificationDraft,
    trace_id: Option<TraceId>,
}

/// [`NotificationDispatcher`] that enqueues drafts for the delivery worker.
#[derive(Clone)]
pub struct ChannelNotificationDispatcher {
    sender: UnboundedSender<Envelope>,
}

/// Receiving half handed to [`NotificationDeliveryWorker::spawn`].
pub struct NotificationQueue {
    receiver: UnboundedReceiver<Envelope>,
}

/// Create a connected dispatcher and queue.
pub fn notification_channel() -> (ChannelNotificationDispatcher, NotificationQueue) {
    let (sender, receiver) = mpsc::unbounded_channel();
    (
        ChannelNotificationDispatcher { sender },
        NotificationQueue { receiver },
    )
}

impl NotificationDispatcher for ChannelNotificationDispatcher {
    fn dispatch(&self, draft: NotificationDraft) {
        let envelope = Envelope {
            draft,
            trace_id: TraceId::current(),
        };
        if let Err(rejected) = self.sender.send(envelope) {
            let Envelope { draft, trace_id } = rejected.0;
            let error = NotificationDeliveryError::queue_closed();
            warn!(
                %error,
                recipient_id = %draft.recipient_id,
                trace_id = trace_id.map(|id| id.to_string()),
                "dropping notification"
            );
        }
    }
}

/// Background task storing queued notifications.
pub struct NotificationDeliveryWorker<N> {
    notifications: Arc<N>,
    clock: Arc<dyn Clock>,
}

impl<N> NotificationDeliveryWorker<N>
where
    N: NotificationRepository + 'static,
{
    /// Worker writing drafts through `notifications`, timestamped by `clock`.
    pub fn new(notifications: Arc<N>, clock: Arc<dyn Clock>) -> Self {
        Self {
            notifications,
            clock,
        }
    }

    /// Drain `queue` on a new task until every dispatcher has been dropped.
    pub fn spawn(self, queue: NotificationQueue) -> JoinHandle<()> {
        tokio::spawn(self.run(queue))
    }

    async fn run(self, mut queue: NotificationQueue) {
        while let Some(Envelope { draft, trace_id }) = queue.receiver.recv().await {
            TraceId::scope_optional(trace_id, self.deliver(draft)).await;
        }
        info!("notification queue closed; delivery worker stopping");
    }

    async fn deliver(&self, draft: NotificationDraft) {
        let recipient_id = draft.recipient_id;
        let notification = Notification::from_draft(NotificationId::random(), draft, self.clock.utc());
        match self.notifications.insert(&notification).await {
            Ok(()) => debug!(
                notification_id = %notification.id,
                %recipient_id,
                "notification delivered"
            ),
            Err(source) => {
                let error = NotificationDeliveryError::store(source.to_string());
                warn!(
                    %error,
                    %recipient_id,
                    trace_id = TraceId::current().map(|id| id.to_string()),
                    "notification delivery failed"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockNotificationRepository, NotificationRepositoryError};
    use crate::domain::{NotificationMessage, UserId};
    use mockable::DefaultClock;
    use rstest::rstest;
    use tokio::sync::mpsc::unbounded_channel;

    fn draft(recipient: UserId) -> NotificationDraft {
        NotificationDraft::new(recipient, NotificationMessage::new_request("Sofa"))
    }

    #[rstest]
    #[tokio::test]
    async fn worker_stores_dispatched_drafts_in_order() {
        let (seen_tx, mut seen_rx) = unbounded_channel();
        let mut repo = MockNotificationRepository::new();
        repo.expect_insert().times(2).returning(move |notification| {
            let _ = seen_tx.send(notification.clone());
            Ok(())
        });
        let (dispatcher, queue) = notification_channel();
        let handle =
            NotificationDeliveryWorker::new(Arc::new(repo), Arc::new(DefaultClock)).spawn(queue);
        let first = UserId::random();
        let second = UserId::random();

        dispatcher.dispatch(draft(first));
        dispatcher.dispatch(draft(second));
        drop(dispatcher);
        handle.await.expect("worker exits once the queue closes");

        let stored_first = seen_rx.recv().await.expect("first");
        let stored_second = seen_rx.recv().await.expect("second");
        assert_eq!(stored_first.recipient_id, first);
        assert_eq!(stored_second.recipient_id, second);
        assert!(!stored_first.read);
    }

    #[rstest]
    #[tokio::test]
    async fn worker_survives_store_failures() {
        let mut repo = MockNotificationRepository::new();
        let mut calls = 0;
        repo.expect_insert().times(2).returning(move |_| {
            calls += 1;
            if calls == 1 {
                Err(NotificationRepositoryError::query("disk full"))
            } else {
                Ok(())
            }
        });
        let (dispatcher, queue) = notification_channel();
        let handle =
            NotificationDeliveryWorker::new(Arc::new(repo), Arc::new(DefaultClock)).spawn(queue);

        dispatcher.dispatch(draft(UserId::random()));
        dispatcher.dispatch(draft(UserId::random()));
        drop(dispatcher);

        handle.await.expect("worker keeps running after a failed write");
    }

    #[rstest]
    fn dispatch_after_worker_stops_is_dropped() {
        let (dispatcher, queue) = notification_channel();
        drop(queue);

        dispatcher.dispatch(draft(UserId::random()));
    }

    #[rstest]
    #[tokio::test]
    async fn dispatch_carries_the_callers_trace_id() {
        let (dispatcher, mut queue) = notification_channel();
        let trace_id = TraceId::generate();

        TraceId::scope(trace_id, async { dispatcher.dispatch(draft(UserId::random())) }).await;

        let envelope = queue.receiver.recv().await.expect("queued");
        assert_eq!(envelope.trace_id, Some(trace_id));
    }
}
