//! Authentication service
//!
//! Username/password login, token verification against the live account
//! record, and refresh-token rotation.

use std::sync::Arc;

use thiserror::Error;

use super::jwt::{Claims, JwtError, TokenIssuer, TokenPair, TokenType, TokenVerifier};
use super::password::PasswordHasher;
use crate::accounts::Account;
use crate::config::AuthConfig;
use crate::store::{AccountStore, StoreError};

/// Message shared by every login rejection
pub const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// Message for tokens whose account is gone or disabled
pub const ACCOUNT_UNAVAILABLE: &str = "User is inactive or does not exist";

/// Auth service errors
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Invalid token: {0}")]
    InvalidToken(#[from] JwtError),

    #[error("User is inactive or does not exist")]
    AuthenticationFailed,

    #[error("Token issuance failed: {0}")]
    TokenIssue(JwtError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Stages of a login attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoginStage {
    Received,
    CredentialsChecked,
    TokensIssued,
    Rejected,
}

impl LoginStage {
    fn as_str(&self) -> &'static str {
        match self {
            LoginStage::Received => "received",
            LoginStage::CredentialsChecked => "credentials_checked",
            LoginStage::TokensIssued => "tokens_issued",
            LoginStage::Rejected => "rejected",
        }
    }
}

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn AccountStore>,
    hasher: PasswordHasher,
    issuer: TokenIssuer,
    verifier: TokenVerifier,
}

impl AuthService {
    pub fn new(store: Arc<dyn AccountStore>, hasher: PasswordHasher, config: &AuthConfig) -> Self {
        Self {
            store,
            hasher,
            issuer: TokenIssuer::new(config),
            verifier: TokenVerifier::new(config),
        }
    }

    /// Check credentials and mint a token pair.
    ///
    /// Every rejection (missing field, unknown or inactive user, wrong
    /// password) yields [`AuthError::InvalidCredentials`].
    pub async fn login(
        &self,
        username: Option<&str>,
        password: Option<&str>,
    ) -> Result<(Account, TokenPair), AuthError> {
        let username = username.map(str::trim).unwrap_or_default();
        let password = password.unwrap_or_default();
        tracing::debug!(stage = LoginStage::Received.as_str(), username, "Login attempt");

        if username.is_empty() || password.is_empty() {
            tracing::debug!(stage = LoginStage::Rejected.as_str(), "Missing credentials");
            return Err(AuthError::InvalidCredentials);
        }

        let account = match self.store.find_by_username(username).await? {
            Some(account) => account,
            None => {
                self.hasher.verify_dummy(password.to_string()).await;
                tracing::debug!(
                    stage = LoginStage::Rejected.as_str(),
                    username,
                    "No active account"
                );
                return Err(AuthError::InvalidCredentials);
            }
        };

        if !self
            .hasher
            .verify(password.to_string(), account.password_hash.clone())
            .await
        {
            tracing::debug!(
                stage = LoginStage::Rejected.as_str(),
                username,
                "Password mismatch"
            );
            return Err(AuthError::InvalidCredentials);
        }
        tracing::debug!(
            stage = LoginStage::CredentialsChecked.as_str(),
            account_id = %account.id,
            "Credentials accepted"
        );

        let tokens = self
            .issuer
            .issue_pair(&account)
            .map_err(AuthError::TokenIssue)?;
        tracing::debug!(
            stage = LoginStage::TokensIssued.as_str(),
            account_id = %account.id,
            "Tokens issued"
        );

        Ok((account, tokens))
    }

    /// Resolve an access token to its live, active account
    pub async fn authenticate(&self, token: &str) -> Result<Account, AuthError> {
        let claims = self.verifier.verify(token, TokenType::Access)?;
        self.resolve(&claims).await
    }

    /// Exchange a refresh token for a new pair
    pub async fn refresh(&self, token: &str) -> Result<(Account, TokenPair), AuthError> {
        let claims = self.verifier.verify(token, TokenType::Refresh)?;
        let account = self.resolve(&claims).await?;

        let tokens = self
            .issuer
            .issue_pair(&account)
            .map_err(AuthError::TokenIssue)?;
        tracing::debug!(account_id = %account.id, "Tokens refreshed");

        Ok((account, tokens))
    }

    async fn resolve(&self, claims: &Claims) -> Result<Account, AuthError> {
        match self.store.find_by_username(&claims.username).await? {
            // A reused username must not inherit tokens of a deleted account.
            Some(account) if account.id.to_string() == claims.sub => Ok(account),
            _ => {
                tracing::debug!(username = %claims.username, "Token subject unavailable");
                Err(AuthError::AuthenticationFailed)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::hash_password;
    use crate::store::MemoryStore;
    use chrono::{NaiveDate, Utc};
    use uuid::Uuid;

    const SECRET: &str = "test-secret-key";

    async fn setup() -> (Arc<MemoryStore>, AuthService, Account) {
        let store = Arc::new(MemoryStore::new());
        let now = Utc::now();
        let account = AccountStore::insert(
            store.as_ref(),
            Account {
                id: Uuid::new_v4(),
                username: "alice".to_string(),
                password_hash: hash_password("s3cret-pass", 4).unwrap(),
                email: "alice@example.com".to_string(),
                first_name: "Alice".to_string(),
                last_name: "Smith".to_string(),
                phone_number: "9876543210".to_string(),
                date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
                is_active: true,
                is_deleted: false,
                created_at: now,
                updated_at: now,
            },
        )
        .await
        .unwrap();

        let service = AuthService::new(
            store.clone(),
            PasswordHasher::new(4).unwrap(),
            &AuthConfig::with_secret(SECRET),
        );
        (store, service, account)
    }

    #[tokio::test]
    async fn test_login_success() {
        let (_, service, account) = setup().await;
        let (logged_in, tokens) = service
            .login(Some("alice"), Some("s3cret-pass"))
            .await
            .unwrap();

        assert_eq!(logged_in.id, account.id);
        let resolved = service.authenticate(&tokens.access).await.unwrap();
        assert_eq!(resolved.id, account.id);
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let (_, service, _) = setup().await;

        let attempts = [
            (Some("alice"), Some("wrong-pass")),
            (Some("nobody"), Some("s3cret-pass")),
            (Some(""), Some("s3cret-pass")),
            (Some("alice"), None),
            (None, None),
        ];
        for (username, password) in attempts {
            let err = service.login(username, password).await.unwrap_err();
            assert!(matches!(err, AuthError::InvalidCredentials));
            assert_eq!(err.to_string(), INVALID_CREDENTIALS);
        }
    }

    #[tokio::test]
    async fn test_login_rejects_inactive_account() {
        let (store, service, account) = setup().await;
        AccountStore::update(
            store.as_ref(),
            account.id,
            Box::new(|account: &mut Account| account.is_active = false),
        )
        .await
        .unwrap();

        let err = service
            .login(Some("alice"), Some("s3cret-pass"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_authenticate_rejects_deleted_account() {
        let (store, service, account) = setup().await;
        let (_, tokens) = service
            .login(Some("alice"), Some("s3cret-pass"))
            .await
            .unwrap();

        AccountStore::soft_delete(store.as_ref(), account.id, Utc::now())
            .await
            .unwrap();

        let err = service.authenticate(&tokens.access).await.unwrap_err();
        assert!(matches!(err, AuthError::AuthenticationFailed));
        assert_eq!(err.to_string(), ACCOUNT_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_authenticate_rejects_deactivated_account() {
        let (store, service, account) = setup().await;
        let (_, tokens) = service
            .login(Some("alice"), Some("s3cret-pass"))
            .await
            .unwrap();

        AccountStore::update(
            store.as_ref(),
            account.id,
            Box::new(|account: &mut Account| account.is_active = false),
        )
        .await
        .unwrap();

        let err = service.authenticate(&tokens.access).await.unwrap_err();
        assert!(matches!(err, AuthError::AuthenticationFailed));
        assert!(matches!(
            service.refresh(&tokens.refresh).await,
            Err(AuthError::AuthenticationFailed)
        ));
    }

    #[tokio::test]
    async fn test_refresh_token_cannot_authenticate() {
        let (_, service, _) = setup().await;
        let (_, tokens) = service
            .login(Some("alice"), Some("s3cret-pass"))
            .await
            .unwrap();

        assert!(matches!(
            service.authenticate(&tokens.refresh).await,
            Err(AuthError::InvalidToken(JwtError::WrongType { .. }))
        ));

        let (_, rotated) = service.refresh(&tokens.refresh).await.unwrap();
        service.authenticate(&rotated.access).await.unwrap();
    }
}
