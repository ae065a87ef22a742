//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (repositories, the notification dispatcher, the credential
//! hasher) are implemented by outbound adapters. Driving ports (commands and
//! queries) are implemented by domain services and consumed by inbound
//! adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod account_service;
mod credential_hasher;
mod exchange_request_command;
mod exchange_request_repository;
mod notification_dispatcher;
mod notification_inbox;
mod notification_repository;
mod resource_catalog;
mod resource_repository;
mod user_repository;

pub use account_service::AccountService;
#[cfg(test)]
pub use account_service::MockAccountService;
pub use credential_hasher::{CredentialHasher, CredentialHasherError};
#[cfg(test)]
pub use credential_hasher::MockCredentialHasher;
pub use exchange_request_command::{ExchangeRequestCommand, ExchangeRequestQuery};
#[cfg(test)]
pub use exchange_request_command::{MockExchangeRequestCommand, MockExchangeRequestQuery};
pub use exchange_request_repository::{ExchangeRequestRepository, ExchangeRequestRepositoryError};
#[cfg(test)]
pub use exchange_request_repository::MockExchangeRequestRepository;
#[cfg(test)]
pub use notification_dispatcher::MockNotificationDispatcher;
pub use notification_dispatcher::{NotificationDeliveryError, NotificationDispatcher};
#[cfg(test)]
pub use notification_inbox::MockNotificationInbox;
pub use notification_inbox::NotificationInbox;
#[cfg(test)]
pub use notification_repository::MockNotificationRepository;
pub use notification_repository::{NotificationRepository, NotificationRepositoryError};
#[cfg(test)]
pub use resource_catalog::MockResourceCatalog;
pub use resource_catalog::ResourceCatalog;
#[cfg(test)]
pub use resource_repository::MockResourceRepository;
pub use resource_repository::{ResourceRepository, ResourceRepositoryError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserRecord, UserRepository, UserRepositoryError};
