//! PostgreSQL-backed `NotificationRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{NotificationRepository, NotificationRepositoryError};
use crate::domain::{Notification, NotificationId, NotificationMessage, UserId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewNotificationRow, NotificationRow};
use super::pool::{DbPool, PoolError};
use super::schema::notifications;

/// Diesel-backed implementation of the `NotificationRepository` port.
#[derive(Clone)]
pub struct DieselNotificationRepository {
    pool: DbPool,
}

impl DieselNotificationRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> NotificationRepositoryError {
    map_basic_pool_error(error, NotificationRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> NotificationRepositoryError {
    map_basic_diesel_error(
        error,
        NotificationRepositoryError::query,
        NotificationRepositoryError::connection,
    )
}

fn row_to_notification(row: NotificationRow) -> Notification {
    Notification {
        id: NotificationId::from_uuid(row.id),
        recipient_id: UserId::from_uuid(row.recipient_id),
        message: NotificationMessage::from_stored(row.message),
        read: row.read,
        created_at: row.created_at,
    }
}

#[async_trait]
impl NotificationRepository for DieselNotificationRepository {
    async fn insert(&self, notification: &Notification) -> Result<(), NotificationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewNotificationRow {
            id: *notification.id.as_uuid(),
            recipient_id: *notification.recipient_id.as_uuid(),
            message: notification.message.as_ref(),
            read: notification.read,
            created_at: notification.created_at,
        };

        diesel::insert_into(notifications::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn list_for_recipient(
        &self,
        recipient_id: &UserId,
    ) -> Result<Vec<Notification>, NotificationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<NotificationRow> = notifications::table
            .filter(notifications::recipient_id.eq(recipient_id.as_uuid()))
            .order((notifications::created_at.desc(), notifications::id.desc()))
            .select(NotificationRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(row_to_notification).collect())
    }

    async fn mark_read(
        &self,
        id: &NotificationId,
        recipient_id: &UserId,
    ) -> Result<Option<Notification>, NotificationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<NotificationRow> = diesel::update(
            notifications::table
                .filter(notifications::id.eq(id.as_uuid()))
                .filter(notifications::recipient_id.eq(recipient_id.as_uuid())),
        )
        .set(notifications::read.eq(true))
        .returning(NotificationRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;

        Ok(row.map(row_to_notification))
    }

    async fn delete(
        &self,
        id: &NotificationId,
        recipient_id: &UserId,
    ) -> Result<bool, NotificationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let removed = diesel::delete(
            notifications::table
                .filter(notifications::id.eq(id.as_uuid()))
                .filter(notifications::recipient_id.eq(recipient_id.as_uuid())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        Ok(removed > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rstest::rstest;
    use uuid::Uuid;

    #[rstest]
    fn row_mapping_preserves_read_flag_and_text() {
        let row = NotificationRow {
            id: Uuid::new_v4(),
            recipient_id: Uuid::new_v4(),
            message: "New request for \"Sofa\"".to_owned(),
            read: true,
            created_at: Utc::now(),
        };

        let notification = row_to_notification(row.clone());

        assert!(notification.read);
        assert_eq!(notification.message.as_ref(), row.message);
        assert_eq!(*notification.recipient_id.as_uuid(), row.recipient_id);
    }
}
