//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered accounts and their credit balances.
    users (id) {
        id -> Uuid,
        #[max_length = 32]
        display_name -> Varchar,
        #[max_length = 254]
        email -> Varchar,
        /// PHC-formatted Argon2id hash.
        password_hash -> Text,
        credits -> Int4,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Items listed for exchange.
    resources (id) {
        id -> Uuid,
        owner_id -> Uuid,
        #[max_length = 120]
        title -> Varchar,
        description -> Text,
        #[max_length = 40]
        category -> Varchar,
        image_filename -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Requests for resources; `status` is `pending`, `approved` or `denied`.
    exchange_requests (id) {
        id -> Uuid,
        resource_id -> Uuid,
        requester_id -> Uuid,
        #[max_length = 16]
        status -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Per-user mailbox entries.
    notifications (id) {
        id -> Uuid,
        recipient_id -> Uuid,
        message -> Text,
        read -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(resources -> users (owner_id));
diesel::joinable!(exchange_requests -> resources (resource_id));
diesel::joinable!(notifications -> users (recipient_id));

diesel::allow_tables_to_appear_in_same_query!(users, resources, exchange_requests, notifications);
