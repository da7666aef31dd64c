//! User account handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};

use super::AuthenticatedUser;
use crate::accounts::{AccountResponse, CreateAccountRequest, UpdateAccountRequest};
use crate::error::ApiResult;
use crate::models::ApiResponse;
use crate::state::AppState;

/// POST /api/users - Register an account
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<CreateAccountRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ApiResponse<AccountResponse>>)> {
    let Json(req) = payload?;
    let account = state.account_service.create(req).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_data(
            StatusCode::CREATED,
            "User created successfully",
            account.into(),
        )),
    ))
}

/// GET /api/users/me
pub async fn get_user(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> ApiResult<Json<ApiResponse<AccountResponse>>> {
    let account = state.account_service.get(user.account.id).await?;

    Ok(Json(ApiResponse::with_data(
        StatusCode::OK,
        "Fetched user successfully",
        account.into(),
    )))
}

/// PUT /api/users/me - Partial profile update
pub async fn update_user(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    payload: Result<Json<UpdateAccountRequest>, JsonRejection>,
) -> ApiResult<Json<ApiResponse<AccountResponse>>> {
    let Json(req) = payload?;
    let account = state.account_service.update(user.account.id, req).await?;

    Ok(Json(ApiResponse::with_data(
        StatusCode::OK,
        "User updated successfully",
        account.into(),
    )))
}

/// DELETE /api/users/me - Soft-delete the current account
pub async fn delete_user(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> ApiResult<Json<ApiResponse<()>>> {
    state.account_service.soft_delete(user.account.id).await?;

    Ok(Json(ApiResponse::message(
        StatusCode::OK,
        "User soft-deleted successfully",
    )))
}
