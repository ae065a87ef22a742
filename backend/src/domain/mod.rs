//! Domain primitives, aggregates and services.
//!
//! Purpose: define strongly typed marketplace entities and the use-cases that
//! operate on them. Inbound adapters talk to the services through driving
//! ports; services reach storage and delivery through driven ports, so no
//! type in this module knows about HTTP or SQL.
//!
//! Public surface:
//! - Error / ErrorCode: API error payload and stable identifiers.
//! - User, Resource, ExchangeRequest, Notification: the four aggregates.
//! - DecisionUnitOfWork / CreditTransfer: the atomic approval ledger.
//! - AccountsService, CatalogService, ExchangeRequestService,
//!   NotificationInboxService: driving-port implementations.

pub mod accounts;
pub mod auth;
pub mod catalog;
pub mod error;
pub mod exchange_request;
pub mod identifiers;
pub mod ledger;
pub mod notification;
pub mod notification_inbox;
pub(crate) mod port_error_mapping;
pub mod ports;
pub mod request_lifecycle;
pub mod resource;
pub mod trace_id;
pub mod user;

pub use self::accounts::AccountsService;
pub use self::auth::{CredentialsValidationError, LoginCredentials, PasswordHash, Registration};
pub use self::catalog::CatalogService;
pub use self::error::{Error, ErrorCode, TRACE_ID_HEADER};
pub use self::exchange_request::{
    Decision, ExchangeRequest, OwnerRequestView, RequestStatus, RequesterRequestView,
    TransitionError, UnknownStatus,
};
pub use self::identifiers::{IdentifierError, NotificationId, RequestId, ResourceId, UserId};
pub use self::ledger::{CreditTransfer, DecisionUnitOfWork, TRANSFER_AMOUNT};
pub use self::notification::{Notification, NotificationDraft, NotificationMessage};
pub use self::notification_inbox::NotificationInboxService;
pub use self::request_lifecycle::ExchangeRequestService;
pub use self::resource::{Resource, ResourceDraft, ResourceListing, ResourceValidationError};
pub use self::trace_id::TraceId;
pub use self::user::{
    Credits, DisplayName, EmailAddress, STARTING_CREDITS, User, UserValidationError,
};
