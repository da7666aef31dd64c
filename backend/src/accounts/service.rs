//! Account service

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;
use validator::Validate;

use super::model::{Account, CreateAccountRequest, UpdateAccountRequest};
use crate::auth::{PasswordError, PasswordHasher};
use crate::store::{fields, AccountStore, StoreError};
use crate::validation::{first_error, FieldError};

/// Account service errors
#[derive(Error, Debug)]
pub enum AccountError {
    #[error("Validation failed on {}: {}", .0.field, .0.message)]
    Validation(FieldError),

    #[error("Username already exists")]
    DuplicateUsername,

    #[error("Account not found")]
    NotFound,

    #[error("Password hashing error: {0}")]
    Password(#[from] PasswordError),

    #[error("Store error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for AccountError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Duplicate(field) if field == fields::USERNAME => {
                AccountError::DuplicateUsername
            }
            other => AccountError::Store(other),
        }
    }
}

/// Account lifecycle
#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn AccountStore>,
    hasher: PasswordHasher,
}

impl AccountService {
    pub fn new(store: Arc<dyn AccountStore>, hasher: PasswordHasher) -> Self {
        Self { store, hasher }
    }

    /// Register a new account
    pub async fn create(&self, request: CreateAccountRequest) -> Result<Account, AccountError> {
        let request = request.normalized();
        request.validate().map_err(|errors| {
            AccountError::Validation(first_error(&errors, CreateAccountRequest::FIELD_ORDER))
        })?;

        let (
            Some(username),
            Some(first_name),
            Some(last_name),
            Some(password),
            Some(email),
            Some(phone_number),
            Some(date_of_birth),
        ) = (
            request.username,
            request.first_name,
            request.last_name,
            request.password,
            request.email,
            request.phone_number,
            request.date_of_birth,
        )
        else {
            return Err(AccountError::Validation(FieldError::required("non_field_errors")));
        };

        let password_hash = self.hasher.hash(password).await?;
        let now = Utc::now();

        let account = self
            .store
            .insert(Account {
                id: Uuid::new_v4(),
                username,
                password_hash,
                email,
                first_name,
                last_name,
                phone_number,
                date_of_birth,
                is_active: true,
                is_deleted: false,
                created_at: now,
                updated_at: now,
            })
            .await?;

        tracing::info!(account_id = %account.id, username = %account.username, "Account created");
        Ok(account)
    }

    /// Fetch a non-deleted account
    pub async fn get(&self, id: Uuid) -> Result<Account, AccountError> {
        self.store.find_by_id(id).await?.ok_or(AccountError::NotFound)
    }

    /// Apply the supplied profile fields
    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateAccountRequest,
    ) -> Result<Account, AccountError> {
        let request = request.normalized();
        request.validate().map_err(|errors| {
            AccountError::Validation(first_error(&errors, UpdateAccountRequest::FIELD_ORDER))
        })?;

        let now = Utc::now();
        let account = self
            .store
            .update(
                id,
                Box::new(move |account: &mut Account| {
                    request.apply_to(account);
                    account.updated_at = account.updated_at.max(now);
                }),
            )
            .await?
            .ok_or(AccountError::NotFound)?;

        tracing::info!(account_id = %account.id, "Account updated");
        Ok(account)
    }

    /// Hide the account from every lookup, including authentication
    pub async fn soft_delete(&self, id: Uuid) -> Result<(), AccountError> {
        if !self.store.soft_delete(id, Utc::now()).await? {
            return Err(AccountError::NotFound);
        }

        tracing::info!(account_id = %id, "Account soft-deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::verify_password;
    use crate::store::MemoryStore;

    fn service() -> AccountService {
        AccountService::new(
            Arc::new(MemoryStore::new()),
            PasswordHasher::new(4).unwrap(),
        )
    }

    fn registration(username: &str) -> CreateAccountRequest {
        serde_json::from_value(serde_json::json!({
            "username": username,
            "first_name": "Alice",
            "last_name": "Smith",
            "password": "s3cret-pass",
            "email": "alice@example.com",
            "phone_number": 9876543210u64,
            "dob": "1990-01-01",
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_hashes_password() {
        let service = service();
        let account = service.create(registration("alice")).await.unwrap();

        assert_ne!(account.password_hash, "s3cret-pass");
        assert!(verify_password("s3cret-pass", &account.password_hash));
        assert_eq!(account.phone_number, "9876543210");
        assert!(account.is_active);
        assert_eq!(account.created_at, account.updated_at);
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_username() {
        let service = service();
        service.create(registration("alice")).await.unwrap();

        let err = service.create(registration("alice")).await.unwrap_err();
        assert!(matches!(err, AccountError::DuplicateUsername));
    }

    #[tokio::test]
    async fn test_concurrent_creates_one_wins() {
        let service = service();
        let (first, second) = tokio::join!(
            service.create(registration("alice")),
            service.create(registration("alice"))
        );

        assert_eq!(first.is_ok() as u8 + second.is_ok() as u8, 1);
    }

    #[tokio::test]
    async fn test_create_reports_first_invalid_field() {
        let service = service();
        let mut request = registration("a b");
        request.email = Some("not-an-email".to_string());

        let err = service.create(request).await.unwrap_err();
        match err {
            AccountError::Validation(field) => assert_eq!(field.field, "username"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_update_merges_supplied_fields() {
        let service = service();
        let account = service.create(registration("alice")).await.unwrap();

        let request: UpdateAccountRequest =
            serde_json::from_value(serde_json::json!({"first_name": "Alicia"})).unwrap();
        let updated = service.update(account.id, request).await.unwrap();

        assert_eq!(updated.first_name, "Alicia");
        assert_eq!(updated.last_name, "Smith");
        assert_eq!(updated.created_at, account.created_at);
        assert!(updated.updated_at >= account.updated_at);
    }

    #[tokio::test]
    async fn test_soft_delete_hides_account() {
        let service = service();
        let account = service.create(registration("alice")).await.unwrap();

        service.soft_delete(account.id).await.unwrap();

        assert!(matches!(service.get(account.id).await, Err(AccountError::NotFound)));
        assert!(matches!(
            service.soft_delete(account.id).await,
            Err(AccountError::NotFound)
        ));
    }
}
