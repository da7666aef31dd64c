//! In-process store backed by a single `RwLock`
//!
//! Holding the write lock for the whole check-and-write gives each mutation
//! the same all-or-nothing behaviour as a database transaction.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    fields, AccountStore, AccountUpdate, BusinessStore, BusinessUpdate, HealthCheck, StoreError,
};
use crate::accounts::Account;
use crate::business::{Business, NewBusiness};

#[derive(Debug, Default)]
struct State {
    accounts: HashMap<Uuid, Account>,
    businesses: BTreeMap<i64, Business>,
    last_business_id: i64,
}

/// Memory-backed implementation of every store trait
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn same_value(left: &Option<String>, right: &Option<String>) -> bool {
    matches!((left, right), (Some(left), Some(right)) if left == right)
}

fn username_conflict(accounts: &HashMap<Uuid, Account>, candidate: &Account) -> bool {
    accounts.values().any(|other| {
        other.id != candidate.id && !other.is_deleted && other.username == candidate.username
    })
}

fn business_conflict(
    businesses: &BTreeMap<i64, Business>,
    candidate: &Business,
) -> Option<&'static str> {
    for other in businesses.values().filter(|other| other.id != candidate.id) {
        if other.unique_id == candidate.unique_id {
            return Some(fields::UNIQUE_ID);
        }
        if other.is_deleted {
            continue;
        }
        if same_value(&other.user_name, &candidate.user_name) {
            return Some(fields::USER_NAME);
        }
        if other.legal_name == candidate.legal_name {
            return Some(fields::LEGAL_NAME);
        }
        if same_value(&other.organization_name, &candidate.organization_name) {
            return Some(fields::ORGANIZATION_NAME);
        }
        if same_value(&other.gst_number, &candidate.gst_number) {
            return Some(fields::GST_NUMBER);
        }
    }
    None
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .accounts
            .values()
            .find(|account| {
                account.username == username && account.is_active && !account.is_deleted
            })
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .accounts
            .get(&id)
            .filter(|account| !account.is_deleted)
            .cloned())
    }

    async fn insert(&self, account: Account) -> Result<Account, StoreError> {
        let mut state = self.state.write().await;

        if username_conflict(&state.accounts, &account) {
            return Err(StoreError::Duplicate(fields::USERNAME));
        }
        if state.accounts.contains_key(&account.id) {
            return Err(StoreError::Database(format!("account id {} already exists", account.id)));
        }

        state.accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn update(
        &self,
        id: Uuid,
        update: AccountUpdate,
    ) -> Result<Option<Account>, StoreError> {
        let mut state = self.state.write().await;

        let Some(current) = state.accounts.get(&id).filter(|account| !account.is_deleted) else {
            return Ok(None);
        };

        let mut candidate = current.clone();
        update(&mut candidate);
        candidate.id = current.id;
        candidate.created_at = current.created_at;
        candidate.is_deleted = current.is_deleted;

        if username_conflict(&state.accounts, &candidate) {
            return Err(StoreError::Duplicate(fields::USERNAME));
        }

        state.accounts.insert(id, candidate.clone());
        Ok(Some(candidate))
    }

    async fn soft_delete(&self, id: Uuid, at: DateTime<Utc>) -> Result<bool, StoreError> {
        let mut state = self.state.write().await;

        match state.accounts.get_mut(&id) {
            Some(account) if !account.is_deleted => {
                account.is_deleted = true;
                account.updated_at = account.updated_at.max(at);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[async_trait]
impl BusinessStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Business>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .businesses
            .values()
            .filter(|business| !business.is_deleted)
            .cloned()
            .collect())
    }

    async fn find_by_unique_id(&self, unique_id: &str) -> Result<Option<Business>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .businesses
            .values()
            .find(|business| business.unique_id == unique_id && !business.is_deleted)
            .cloned())
    }

    async fn insert(&self, business: NewBusiness) -> Result<Business, StoreError> {
        let mut state = self.state.write().await;

        let record = Business {
            id: state.last_business_id + 1,
            unique_id: business.unique_id,
            user_name: business.user_name,
            legal_name: business.legal_name,
            organization_name: business.organization_name,
            gst_number: business.gst_number,
            website: business.website,
            documents: business.documents,
            logo: business.logo,
            is_active: business.is_active,
            is_deleted: false,
            created_at: business.created_at,
            updated_at: business.updated_at,
        };

        if let Some(field) = business_conflict(&state.businesses, &record) {
            return Err(StoreError::Duplicate(field));
        }

        state.last_business_id = record.id;
        state.businesses.insert(record.id, record.clone());
        Ok(record)
    }

    async fn update(
        &self,
        unique_id: &str,
        update: BusinessUpdate,
    ) -> Result<Option<Business>, StoreError> {
        let mut state = self.state.write().await;

        let Some(current) = state
            .businesses
            .values()
            .find(|business| business.unique_id == unique_id && !business.is_deleted)
        else {
            return Ok(None);
        };

        let mut candidate = current.clone();
        update(&mut candidate);
        candidate.id = current.id;
        candidate.unique_id = current.unique_id.clone();
        candidate.created_at = current.created_at;
        candidate.is_deleted = current.is_deleted;

        if let Some(field) = business_conflict(&state.businesses, &candidate) {
            return Err(StoreError::Duplicate(field));
        }

        state.businesses.insert(candidate.id, candidate.clone());
        Ok(Some(candidate))
    }

    async fn soft_delete(&self, unique_id: &str, at: DateTime<Utc>) -> Result<bool, StoreError> {
        let mut state = self.state.write().await;

        match state
            .businesses
            .values_mut()
            .find(|business| business.unique_id == unique_id && !business.is_deleted)
        {
            Some(business) => {
                business.is_deleted = true;
                business.updated_at = business.updated_at.max(at);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl HealthCheck for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
