//! Authentication request/response models

use serde::{Deserialize, Serialize};

use crate::accounts::AccountSummary;

/// Login payload. Both fields are optional at the wire level so that a
/// missing field is rejected with the same generic message as a wrong one.
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Successful login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub user: AccountSummary,
    pub access: String,
    pub refresh: String,
}

/// Refresh payload; the `refresh_token` cookie is used when absent
#[derive(Debug, Default, Deserialize)]
pub struct RefreshTokenRequest {
    #[serde(default)]
    pub refresh: Option<String>,
}

/// Token pair returned by the refresh endpoint
#[derive(Debug, Serialize)]
pub struct TokenRefreshResponse {
    pub message: String,
    pub access: String,
    pub refresh: String,
}

/// Message-only response (logout)
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
