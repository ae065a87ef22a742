//! Test helpers for inbound HTTP components.
//!
//! [`TestMarketplace`] wires the real domain services over the in-memory
//! store so handler tests exercise the same code paths as the server.
//! Notifications are recorded by the dispatcher and only stored on
//! [`TestMarketplace::flush_notifications`], so assertions never race a
//! background worker.

use std::sync::{Arc, Mutex};

use actix_web::cookie::Key;
use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;

use crate::domain::ports::{
    CredentialHasher, CredentialHasherError, NotificationDispatcher, NotificationRepository,
    ResourceRepository, UserRecord, UserRepository,
};
use crate::domain::{
    AccountsService, CatalogService, Credits, DisplayName, EmailAddress, ExchangeRequestService,
    Notification, NotificationDraft, NotificationId, NotificationInboxService, PasswordHash,
    Resource, ResourceDraft, ResourceId, STARTING_CREDITS, User, UserId,
};
use crate::outbound::memory::InMemoryMarketplace;

use super::auth::BearerTokens;
use super::state::{HttpState, HttpStatePorts};

/// Clock frozen at a fixed instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Instant used by [`FixedClock`] in handler tests.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 9, 1, 12, 0, 0)
        .single()
        .expect("unambiguous timestamp")
}

/// Hasher that stores passwords behind a recognisable prefix.
#[derive(Debug, Default)]
pub struct PlainHasher;

impl CredentialHasher for PlainHasher {
    fn hash(&self, password: &str) -> Result<PasswordHash, CredentialHasherError> {
        Ok(PasswordHash::new(format!("plain:{password}")))
    }

    fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, CredentialHasherError> {
        Ok(hash.as_ref() == format!("plain:{password}"))
    }
}

/// Dispatcher that records drafts until [`TestMarketplace::flush_notifications`].
#[derive(Default)]
struct RecordingDispatcher {
    sent: Mutex<Vec<NotificationDraft>>,
}

impl NotificationDispatcher for RecordingDispatcher {
    fn dispatch(&self, draft: NotificationDraft) {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(draft);
        }
    }
}

/// In-memory marketplace wired behind [`HttpState`].
pub struct TestMarketplace {
    pub store: Arc<InMemoryMarketplace>,
    pub tokens: BearerTokens,
    dispatcher: Arc<RecordingDispatcher>,
    state: HttpState,
}

impl TestMarketplace {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryMarketplace::new());
        let clock: Arc<dyn Clock> = Arc::new(FixedClock(fixed_now()));
        let dispatcher = Arc::new(RecordingDispatcher::default());
        let tokens = BearerTokens::new(Key::generate(), TimeDelta::hours(24), clock.clone());
        let requests = Arc::new(ExchangeRequestService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            dispatcher.clone(),
            clock.clone(),
        ));
        let state = HttpState::new(
            HttpStatePorts {
                accounts: Arc::new(AccountsService::new(
                    store.clone(),
                    Arc::new(PlainHasher),
                    STARTING_CREDITS,
                )),
                catalog: Arc::new(CatalogService::new(store.clone(), clock)),
                requests: requests.clone(),
                requests_query: requests,
                notifications: Arc::new(NotificationInboxService::new(store.clone())),
            },
            tokens.clone(),
        );
        Self {
            store,
            tokens,
            dispatcher,
            state,
        }
    }

    pub fn state(&self) -> HttpState {
        self.state.clone()
    }

    /// Store a user directly and return it with a valid bearer header value.
    pub async fn user(&self, name: &str, credits: i32) -> (User, String) {
        let user = User::new(
            UserId::random(),
            DisplayName::new(name).expect("display name"),
            EmailAddress::new(format!("{}@campus.edu", name.to_lowercase())).expect("email"),
            Credits::new(credits),
        );
        UserRepository::insert(
            self.store.as_ref(),
            &UserRecord {
                user: user.clone(),
                password_hash: PasswordHash::new("plain:secret"),
            },
        )
        .await
        .expect("user stored");
        let token = self.tokens.issue(user.id()).expect("token issued").token;
        (user, format!("Bearer {token}"))
    }

    pub async fn resource(&self, owner: &User, title: &str) -> Resource {
        let resource = Resource::from_draft(
            ResourceId::random(),
            owner.id(),
            ResourceDraft::new(title, "", "furniture").expect("draft"),
            fixed_now(),
        );
        ResourceRepository::insert(self.store.as_ref(), &resource)
            .await
            .expect("resource stored");
        resource
    }

    pub async fn balance(&self, user: &User) -> i32 {
        UserRepository::find_by_id(self.store.as_ref(), &user.id())
            .await
            .expect("lookup")
            .expect("user exists")
            .credits()
            .value()
    }

    /// Drafts dispatched so far, delivered into the store on the way out.
    pub async fn flush_notifications(&self) -> Vec<NotificationDraft> {
        let drafts = self
            .dispatcher
            .sent
            .lock()
            .map(|mut sent| std::mem::take(&mut *sent))
            .expect("dispatcher lock");
        for draft in &drafts {
            let notification = Notification::from_draft(
                NotificationId::random(),
                draft.clone(),
                fixed_now(),
            );
            NotificationRepository::insert(self.store.as_ref(), &notification)
                .await
                .expect("notification stored");
        }
        drafts
    }
}
