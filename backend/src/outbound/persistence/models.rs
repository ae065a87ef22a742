//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{exchange_requests, notifications, resources, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub display_name: String,
    pub email: String,
    pub password_hash: String,
    pub credits: i32,
}

/// Insertable struct for creating new accounts.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub display_name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub credits: i32,
}

/// Row struct for reading from the resources table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = resources)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ResourceRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub image_filename: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = resources)]
pub(crate) struct NewResourceRow<'a> {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: &'a str,
    pub description: &'a str,
    pub category: &'a str,
    pub image_filename: Option<&'a str>,
    pub created_at: DateTime<Utc>,
}

/// Row struct for reading from the exchange_requests table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = exchange_requests)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ExchangeRequestRow {
    pub id: Uuid,
    pub resource_id: Uuid,
    pub requester_id: Uuid,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = exchange_requests)]
pub(crate) struct NewExchangeRequestRow<'a> {
    pub id: Uuid,
    pub resource_id: Uuid,
    pub requester_id: Uuid,
    pub status: &'a str,
    pub created_at: DateTime<Utc>,
}

/// Row struct for reading from the notifications table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = notifications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct NotificationRow {
    pub id: Uuid,
    pub recipient_id: Uuid,
    pub message: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = notifications)]
pub(crate) struct NewNotificationRow<'a> {
    pub id: Uuid,
    pub recipient_id: Uuid,
    pub message: &'a str,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}
