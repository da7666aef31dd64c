//! Authentication middleware
//!
//! Extractor for JWT verification and account resolution.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    extract::CookieJar,
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use std::sync::Arc;

use crate::accounts::Account;
use crate::auth::AuthService;
use crate::error::ApiError;

/// Cookie carrying the access token
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// Cookie carrying the refresh token
pub const REFRESH_TOKEN_COOKIE: &str = "refresh_token";

/// Account resolved from a valid access token
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub account: Account,
}

/// Extractor for authenticated users
///
/// Reads the token from `Authorization: Bearer <token>`, falling back to the
/// `access_token` cookie, then re-checks that the account is still active
/// and not deleted.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(user: AuthenticatedUser) -> impl IntoResponse {
///     format!("Hello, {}", user.account.username)
/// }
/// ```
#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    Arc<AuthService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let bearer = TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
            .await
            .ok()
            .map(|TypedHeader(Authorization(bearer))| bearer.token().to_string());

        let token = match bearer {
            Some(token) => token,
            None => {
                let jar = CookieJar::from_headers(&parts.headers);
                jar.get(ACCESS_TOKEN_COOKIE)
                    .map(|cookie| cookie.value().to_string())
                    .ok_or_else(|| {
                        ApiError::Unauthorized(
                            "Authentication credentials were not provided.".to_string(),
                        )
                    })?
            }
        };

        let auth_service = Arc::<AuthService>::from_ref(state);
        let account = auth_service.authenticate(&token).await?;

        Ok(AuthenticatedUser { account })
    }
}
