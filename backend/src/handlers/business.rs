//! Business record handlers

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};

use crate::business::{Business, CreateBusinessRequest, UpdateBusinessRequest};
use crate::error::ApiResult;
use crate::models::ApiResponse;
use crate::state::AppState;

/// GET /api/businesses - All non-deleted businesses
pub async fn list_businesses(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<Vec<Business>>>> {
    let businesses = state.business_service.list().await?;

    Ok(Json(ApiResponse::with_data(
        StatusCode::OK,
        "Fetched business records successfully",
        businesses,
    )))
}

/// POST /api/businesses
pub async fn create_business(
    State(state): State<AppState>,
    payload: Result<Json<CreateBusinessRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Business>>)> {
    let Json(req) = payload?;
    let business = state.business_service.create(req).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_data(
            StatusCode::CREATED,
            "Business created successfully",
            business,
        )),
    ))
}

/// GET /api/businesses/:unique_id
pub async fn get_business(
    State(state): State<AppState>,
    Path(unique_id): Path<String>,
) -> ApiResult<Json<ApiResponse<Business>>> {
    let business = state.business_service.get(&unique_id).await?;

    Ok(Json(ApiResponse::with_data(
        StatusCode::OK,
        "Fetched business successfully",
        business,
    )))
}

/// PUT /api/businesses/:unique_id - Partial update
pub async fn update_business(
    State(state): State<AppState>,
    Path(unique_id): Path<String>,
    payload: Result<Json<UpdateBusinessRequest>, JsonRejection>,
) -> ApiResult<Json<ApiResponse<Business>>> {
    let Json(req) = payload?;
    let business = state.business_service.update(&unique_id, req).await?;

    Ok(Json(ApiResponse::with_data(
        StatusCode::OK,
        "Business updated successfully",
        business,
    )))
}

/// DELETE /api/businesses/:unique_id - Soft delete
pub async fn delete_business(
    State(state): State<AppState>,
    Path(unique_id): Path<String>,
) -> ApiResult<Json<ApiResponse<()>>> {
    state.business_service.soft_delete(&unique_id).await?;

    Ok(Json(ApiResponse::message(
        StatusCode::OK,
        "Business soft-deleted successfully",
    )))
}
