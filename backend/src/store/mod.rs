//! Persistence seam
//!
//! Services talk to storage only through these traits. Every mutating call is
//! one atomic unit: the Postgres store wraps it in a transaction, the memory
//! store performs it under a single write lock. Uniqueness is enforced here,
//! not by callers, so concurrent creates cannot both pass a pre-check.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::accounts::Account;
use crate::business::{Business, NewBusiness};

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Unique field names reported by [`StoreError::Duplicate`]
pub mod fields {
    pub const USERNAME: &str = "username";
    pub const UNIQUE_ID: &str = "unique_id";
    pub const USER_NAME: &str = "user_name";
    pub const LEGAL_NAME: &str = "legal_name";
    pub const ORGANIZATION_NAME: &str = "organization_name";
    pub const GST_NUMBER: &str = "gst_number";
}

/// Storage errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("duplicate value for {0}")]
    Duplicate(&'static str),

    #[error("database error: {0}")]
    Database(String),
}

/// In-transaction mutation of a stored account
pub type AccountUpdate = Box<dyn FnOnce(&mut Account) + Send>;

/// In-transaction mutation of a stored business
pub type BusinessUpdate = Box<dyn FnOnce(&mut Business) + Send>;

/// Credential store
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Lookup for authentication: active and not deleted
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, StoreError>;

    /// Lookup by id: not deleted
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError>;

    async fn insert(&self, account: Account) -> Result<Account, StoreError>;

    /// Lock the live row, apply `update`, persist. `None` when absent or deleted.
    async fn update(&self, id: Uuid, update: AccountUpdate)
        -> Result<Option<Account>, StoreError>;

    /// Flip `is_deleted`. `false` when absent or already deleted.
    async fn soft_delete(&self, id: Uuid, at: DateTime<Utc>) -> Result<bool, StoreError>;
}

/// Business record store
#[async_trait]
pub trait BusinessStore: Send + Sync {
    /// All non-deleted businesses, ordered by id
    async fn list(&self) -> Result<Vec<Business>, StoreError>;

    async fn find_by_unique_id(&self, unique_id: &str) -> Result<Option<Business>, StoreError>;

    async fn insert(&self, business: NewBusiness) -> Result<Business, StoreError>;

    /// Lock the live row, apply `update`, persist. `None` when absent or deleted.
    async fn update(
        &self,
        unique_id: &str,
        update: BusinessUpdate,
    ) -> Result<Option<Business>, StoreError>;

    /// Flip `is_deleted`. `false` when absent or already deleted.
    async fn soft_delete(&self, unique_id: &str, at: DateTime<Utc>) -> Result<bool, StoreError>;
}

/// Connectivity probe for the health endpoint
#[async_trait]
pub trait HealthCheck: Send + Sync {
    async fn ping(&self) -> Result<(), StoreError>;
}
