//! Application state shared across handlers

use std::sync::Arc;

use axum::extract::FromRef;

use crate::accounts::AccountService;
use crate::auth::{AuthService, PasswordError, PasswordHasher};
use crate::business::BusinessService;
use crate::config::AuthConfig;
use crate::store::{AccountStore, BusinessStore, HealthCheck, MemoryStore, PgStore};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub account_service: Arc<AccountService>,
    pub business_service: Arc<BusinessService>,
    pub health: Arc<dyn HealthCheck>,
    /// Mark auth cookies `Secure`
    pub secure_cookies: bool,
}

impl AppState {
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        businesses: Arc<dyn BusinessStore>,
        health: Arc<dyn HealthCheck>,
        auth_config: &AuthConfig,
        secure_cookies: bool,
    ) -> Result<Self, PasswordError> {
        let hasher = PasswordHasher::new(auth_config.bcrypt_cost)?;

        Ok(Self {
            auth_service: Arc::new(AuthService::new(
                accounts.clone(),
                hasher.clone(),
                auth_config,
            )),
            account_service: Arc::new(AccountService::new(accounts, hasher)),
            business_service: Arc::new(BusinessService::new(businesses)),
            health,
            secure_cookies,
        })
    }

    /// State backed by PostgreSQL
    pub fn with_postgres(
        store: PgStore,
        auth_config: &AuthConfig,
        secure_cookies: bool,
    ) -> Result<Self, PasswordError> {
        let store = Arc::new(store);
        Self::new(store.clone(), store.clone(), store, auth_config, secure_cookies)
    }

    /// State backed by a fresh in-memory store
    pub fn in_memory(
        auth_config: &AuthConfig,
        secure_cookies: bool,
    ) -> Result<Self, PasswordError> {
        let store = Arc::new(MemoryStore::new());
        Self::new(store.clone(), store.clone(), store, auth_config, secure_cookies)
    }
}

impl FromRef<AppState> for Arc<AuthService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.auth_service.clone()
    }
}

impl FromRef<AppState> for Arc<AccountService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.account_service.clone()
    }
}

impl FromRef<AppState> for Arc<BusinessService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.business_service.clone()
    }
}
