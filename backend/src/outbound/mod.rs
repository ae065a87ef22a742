//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL repositories using Diesel
//! - **memory**: single-process store used without a database and in tests
//! - **notifications**: queue and worker behind the notification dispatcher
//! - **credentials**: Argon2id credential hasher

pub mod credentials;
pub mod memory;
pub mod notifications;
pub mod persistence;
