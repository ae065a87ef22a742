//! In-process implementation of every marketplace repository.
//!
//! One mutex guards all four collections, so a decision commit observes and
//! mutates the request and both balances under a single lock. The commit
//! validates everything it needs before writing anything, which makes it
//! all-or-nothing without a rollback path. Used when no database is
//! configured and by the HTTP tests.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{
    ExchangeRequestRepository, ExchangeRequestRepositoryError, NotificationRepository,
    NotificationRepositoryError, ResourceRepository, ResourceRepositoryError, UserRecord,
    UserRepository, UserRepositoryError,
};
use crate::domain::{
    DecisionUnitOfWork, EmailAddress, ExchangeRequest, Notification, NotificationId,
    OwnerRequestView, RequestId, RequesterRequestView, Resource, ResourceId, ResourceListing,
    User, UserId,
};

#[derive(Debug, Default)]
struct Store {
    users: HashMap<UserId, UserRecord>,
    resources: HashMap<ResourceId, Resource>,
    requests: HashMap<RequestId, ExchangeRequest>,
    notifications: HashMap<NotificationId, Notification>,
}

impl Store {
    fn user(&self, id: &UserId) -> Option<&User> {
        self.users.get(id).map(|record| &record.user)
    }
}

/// Mutex-guarded marketplace store.
#[derive(Debug, Default)]
pub struct InMemoryMarketplace {
    store: Mutex<Store>,
}

const POISONED: &str = "in-memory store lock poisoned";

impl InMemoryMarketplace {
    /// Empty store with no users, resources, requests or notifications.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Option<MutexGuard<'_, Store>> {
        self.store.lock().ok()
    }
}

/// Newest first, identifier as tie-breaker so ordering is total.
fn newest_first<T, K: Ord>(items: &mut [T], key: impl Fn(&T) -> K) {
    items.sort_by(|a, b| key(b).cmp(&key(a)));
}

#[async_trait]
impl UserRepository for InMemoryMarketplace {
    async fn insert(&self, record: &UserRecord) -> Result<(), UserRepositoryError> {
        let mut store = self.lock().ok_or_else(|| UserRepositoryError::query(POISONED))?;
        let email = record.user.email();
        if store.users.values().any(|existing| existing.user.email() == email) {
            return Err(UserRepositoryError::duplicate_email(email.as_ref()));
        }
        store.users.insert(record.user.id(), record.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        let store = self.lock().ok_or_else(|| UserRepositoryError::query(POISONED))?;
        Ok(store.user(id).cloned())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserRecord>, UserRepositoryError> {
        let store = self.lock().ok_or_else(|| UserRepositoryError::query(POISONED))?;
        Ok(store
            .users
            .values()
            .find(|record| record.user.email() == email)
            .cloned())
    }
}

#[async_trait]
impl ResourceRepository for InMemoryMarketplace {
    async fn insert(&self, resource: &Resource) -> Result<(), ResourceRepositoryError> {
        let mut store = self.lock().ok_or_else(|| ResourceRepositoryError::query(POISONED))?;
        if store.user(&resource.owner_id).is_none() {
            return Err(ResourceRepositoryError::query("owner does not exist"));
        }
        store.resources.insert(resource.id, resource.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &ResourceId) -> Result<Option<Resource>, ResourceRepositoryError> {
        let store = self.lock().ok_or_else(|| ResourceRepositoryError::query(POISONED))?;
        Ok(store.resources.get(id).cloned())
    }

    async fn list_listings(&self) -> Result<Vec<ResourceListing>, ResourceRepositoryError> {
        let store = self.lock().ok_or_else(|| ResourceRepositoryError::query(POISONED))?;
        let mut listings: Vec<ResourceListing> = store
            .resources
            .values()
            .filter_map(|resource| {
                store.user(&resource.owner_id).map(|owner| ResourceListing {
                    resource: resource.clone(),
                    owner_name: owner.display_name().clone(),
                })
            })
            .collect();
        newest_first(&mut listings, |l| (l.resource.created_at, l.resource.id));
        Ok(listings)
    }
}

#[async_trait]
impl ExchangeRequestRepository for InMemoryMarketplace {
    async fn insert(&self, request: &ExchangeRequest) -> Result<(), ExchangeRequestRepositoryError> {
        let mut store = self
            .lock()
            .ok_or_else(|| ExchangeRequestRepositoryError::query(POISONED))?;
        if !store.resources.contains_key(&request.resource_id)
            || store.user(&request.requester_id).is_none()
        {
            return Err(ExchangeRequestRepositoryError::query(
                "request references a missing resource or user",
            ));
        }
        store.requests.insert(request.id, request.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &RequestId,
    ) -> Result<Option<ExchangeRequest>, ExchangeRequestRepositoryError> {
        let store = self
            .lock()
            .ok_or_else(|| ExchangeRequestRepositoryError::query(POISONED))?;
        Ok(store.requests.get(id).cloned())
    }

    async fn list_for_owner(
        &self,
        owner_id: &UserId,
    ) -> Result<Vec<OwnerRequestView>, ExchangeRequestRepositoryError> {
        let store = self
            .lock()
            .ok_or_else(|| ExchangeRequestRepositoryError::query(POISONED))?;
        let mut views: Vec<OwnerRequestView> = store
            .requests
            .values()
            .filter_map(|request| {
                let resource = store.resources.get(&request.resource_id)?;
                if resource.owner_id != *owner_id {
                    return None;
                }
                let requester = store.user(&request.requester_id)?;
                Some(OwnerRequestView {
                    request: request.clone(),
                    resource_title: resource.title.clone(),
                    requester_name: requester.display_name().clone(),
                })
            })
            .collect();
        newest_first(&mut views, |v| (v.request.created_at, v.request.id));
        Ok(views)
    }

    async fn list_for_requester(
        &self,
        requester_id: &UserId,
    ) -> Result<Vec<RequesterRequestView>, ExchangeRequestRepositoryError> {
        let store = self
            .lock()
            .ok_or_else(|| ExchangeRequestRepositoryError::query(POISONED))?;
        let mut views: Vec<RequesterRequestView> = store
            .requests
            .values()
            .filter(|request| request.requester_id == *requester_id)
            .filter_map(|request| {
                let resource = store.resources.get(&request.resource_id)?;
                let owner = store.user(&resource.owner_id)?;
                Some(RequesterRequestView {
                    request: request.clone(),
                    resource_title: resource.title.clone(),
                    owner_name: owner.display_name().clone(),
                })
            })
            .collect();
        newest_first(&mut views, |v| (v.request.created_at, v.request.id));
        Ok(views)
    }

    async fn commit_decision(
        &self,
        work: &DecisionUnitOfWork,
    ) -> Result<ExchangeRequest, ExchangeRequestRepositoryError> {
        let mut store = self
            .lock()
            .ok_or_else(|| ExchangeRequestRepositoryError::transaction(POISONED))?;

        let request_id = work.request_id();
        let current = store
            .requests
            .get(&request_id)
            .map(|request| request.status)
            .ok_or_else(|| ExchangeRequestRepositoryError::missing(request_id.to_string()))?;
        if current != work.expected_status() {
            return Err(ExchangeRequestRepositoryError::already_decided(current.as_str()));
        }

        let balances = match work.transfer() {
            Some(transfer) => {
                let debtor = store.user(&transfer.debtor()).ok_or_else(|| {
                    ExchangeRequestRepositoryError::transaction("requester account missing")
                })?;
                let creditor = store.user(&transfer.creditor()).ok_or_else(|| {
                    ExchangeRequestRepositoryError::transaction("owner account missing")
                })?;
                let balances = transfer
                    .apply(debtor.credits(), creditor.credits())
                    .ok_or_else(|| {
                        ExchangeRequestRepositoryError::transaction("credit balance out of range")
                    })?;
                Some((transfer, balances))
            }
            None => None,
        };

        if let Some((transfer, (debtor_balance, creditor_balance))) = balances {
            for (id, balance) in [
                (transfer.debtor(), debtor_balance),
                (transfer.creditor(), creditor_balance),
            ] {
                if let Some(record) = store.users.get_mut(&id) {
                    record.user = record.user.clone().with_credits(balance);
                }
            }
        }

        let request = store.requests.get_mut(&request_id).ok_or_else(|| {
            ExchangeRequestRepositoryError::missing(request_id.to_string())
        })?;
        request.status = work.new_status();
        Ok(request.clone())
    }
}

#[async_trait]
impl NotificationRepository for InMemoryMarketplace {
    async fn insert(&self, notification: &Notification) -> Result<(), NotificationRepositoryError> {
        let mut store = self
            .lock()
            .ok_or_else(|| NotificationRepositoryError::query(POISONED))?;
        store
            .notifications
            .insert(notification.id, notification.clone());
        Ok(())
    }

    async fn list_for_recipient(
        &self,
        recipient_id: &UserId,
    ) -> Result<Vec<Notification>, NotificationRepositoryError> {
        let store = self
            .lock()
            .ok_or_else(|| NotificationRepositoryError::query(POISONED))?;
        let mut items: Vec<Notification> = store
            .notifications
            .values()
            .filter(|n| n.recipient_id == *recipient_id)
            .cloned()
            .collect();
        newest_first(&mut items, |n| (n.created_at, n.id));
        Ok(items)
    }

    async fn mark_read(
        &self,
        id: &NotificationId,
        recipient_id: &UserId,
    ) -> Result<Option<Notification>, NotificationRepositoryError> {
        let mut store = self
            .lock()
            .ok_or_else(|| NotificationRepositoryError::query(POISONED))?;
        Ok(store
            .notifications
            .get_mut(id)
            .filter(|n| n.recipient_id == *recipient_id)
            .map(|n| {
                n.read = true;
                n.clone()
            }))
    }

    async fn delete(
        &self,
        id: &NotificationId,
        recipient_id: &UserId,
    ) -> Result<bool, NotificationRepositoryError> {
        let mut store = self
            .lock()
            .ok_or_else(|| NotificationRepositoryError::query(POISONED))?;
        let owned = store
            .notifications
            .get(id)
            .is_some_and(|n| n.recipient_id == *recipient_id);
        if owned {
            store.notifications.remove(id);
        }
        Ok(owned)
    }
}
