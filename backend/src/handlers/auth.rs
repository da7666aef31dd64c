//! Authentication HTTP handlers
//!
//! Login, logout, token refresh and the current-user lookup.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use super::AuthenticatedUser;
use crate::accounts::{AccountResponse, AccountSummary};
use crate::auth::TokenPair;
use crate::error::{ApiError, ApiResult};
use crate::middleware::{ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE};
use crate::models::{
    ApiResponse, LoginRequest, LoginResponse, MessageResponse, RefreshTokenRequest,
    TokenRefreshResponse,
};
use crate::state::AppState;

fn token_cookie(name: &'static str, value: String, secure: bool) -> Cookie<'static> {
    Cookie::build((name, value))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .secure(secure)
        .build()
}

fn removal_cookie(name: &'static str) -> Cookie<'static> {
    let mut cookie = Cookie::build((name, "")).path("/").build();
    cookie.make_removal();
    cookie
}

fn with_token_cookies(jar: CookieJar, tokens: &TokenPair, secure: bool) -> CookieJar {
    jar.add(token_cookie(ACCESS_TOKEN_COOKIE, tokens.access.clone(), secure))
        .add(token_cookie(REFRESH_TOKEN_COOKIE, tokens.refresh.clone(), secure))
}

/// POST /api/auth/login - Exchange credentials for a token pair
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<(CookieJar, Json<LoginResponse>)> {
    // Unreadable bodies fall through to the generic credential failure
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Unreadable login payload");
            LoginRequest::default()
        }
    };

    let (account, tokens) = state
        .auth_service
        .login(req.username.as_deref(), req.password.as_deref())
        .await?;

    let jar = with_token_cookies(jar, &tokens, state.secure_cookies);
    tracing::info!(account_id = %account.id, "User logged in");

    Ok((
        jar,
        Json(LoginResponse {
            message: "Login successful".to_string(),
            user: AccountSummary::from(&account),
            access: tokens.access,
            refresh: tokens.refresh,
        }),
    ))
}

/// POST /api/auth/logout - Clear the token cookies
///
/// Removal cookies are always sent, whether or not the request carried any.
pub async fn logout(jar: CookieJar) -> (StatusCode, CookieJar, Json<MessageResponse>) {
    let jar = jar
        .add(removal_cookie(ACCESS_TOKEN_COOKIE))
        .add(removal_cookie(REFRESH_TOKEN_COOKIE));

    (
        StatusCode::OK,
        jar,
        Json(MessageResponse {
            message: "Logged out successfully".to_string(),
        }),
    )
}

/// POST /api/auth/refresh - Rotate the token pair using a refresh token
pub async fn refresh_token(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<RefreshTokenRequest>, JsonRejection>,
) -> ApiResult<(CookieJar, Json<TokenRefreshResponse>)> {
    let from_body = match payload {
        Ok(Json(req)) => req.refresh,
        // No JSON body: fall back to the cookie
        Err(JsonRejection::MissingJsonContentType(_)) => None,
        Err(rejection) => return Err(rejection.into()),
    };

    let token = from_body
        .filter(|token| !token.is_empty())
        .or_else(|| {
            jar.get(REFRESH_TOKEN_COOKIE)
                .map(|cookie| cookie.value().to_string())
        })
        .ok_or_else(|| ApiError::Unauthorized("Refresh token was not provided.".to_string()))?;

    let (_, tokens) = state.auth_service.refresh(&token).await?;
    let jar = with_token_cookies(jar, &tokens, state.secure_cookies);

    Ok((
        jar,
        Json(TokenRefreshResponse {
            message: "Token refreshed successfully".to_string(),
            access: tokens.access,
            refresh: tokens.refresh,
        }),
    ))
}

/// GET /api/auth/me - Current user's profile
pub async fn get_current_user(
    user: AuthenticatedUser,
) -> Json<ApiResponse<AccountResponse>> {
    Json(ApiResponse::with_data(
        StatusCode::OK,
        "Fetched user successfully",
        AccountResponse::from(user.account),
    ))
}
