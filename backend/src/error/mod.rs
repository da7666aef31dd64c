//! Centralized API error handling
//!
//! Every failure is rendered in the shared response envelope with the HTTP
//! status mirrored in the body's `status` field.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::accounts::AccountError;
use crate::auth::{AuthError, JwtError, ACCOUNT_UNAVAILABLE, INVALID_CREDENTIALS};
use crate::business::BusinessError;
use crate::models::ApiResponse;
use crate::store::{fields, StoreError};
use crate::validation::FieldError;

const INTERNAL_ERROR: &str = "Internal server error";

/// API error type with HTTP status code mapping
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation error on {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Conflict on {field}: {message}")]
    Conflict { field: String, message: String },

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl ApiError {
    /// Get the HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::InvalidCredentials => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Envelope sent to the client
    pub fn to_envelope(&self) -> ApiResponse<()> {
        let status = self.status_code();
        match self {
            ApiError::Validation { field, message } | ApiError::Conflict { field, message } => {
                ApiResponse::failure(
                    status,
                    Some("Invalid input".to_string()),
                    message.clone(),
                    Some(field.clone()),
                )
            }
            ApiError::InvalidCredentials => ApiResponse::failure(
                status,
                Some("Login failed".to_string()),
                INVALID_CREDENTIALS,
                None,
            ),
            ApiError::Unauthorized(message)
            | ApiError::NotFound(message)
            | ApiError::BadRequest(message) => {
                ApiResponse::failure(status, None, message.clone(), None)
            }
            ApiError::DatabaseError(_) | ApiError::InternalError(_) => {
                ApiResponse::failure(status, None, INTERNAL_ERROR, None)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Log server errors
        match &self {
            ApiError::DatabaseError(_) | ApiError::InternalError(_) => {
                tracing::error!(error = %self, "Server error occurred");
            }
            _ => {
                tracing::debug!(error = %self, "Client error occurred");
            }
        }

        (status, Json(self.to_envelope())).into_response()
    }
}

// Conversions from domain errors

impl From<FieldError> for ApiError {
    fn from(err: FieldError) -> Self {
        ApiError::Validation {
            field: err.field,
            message: err.message,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate(field) => ApiError::Conflict {
                field: field.to_string(),
                message: duplicate_message(field),
            },
            StoreError::Database(message) => ApiError::DatabaseError(message),
        }
    }
}

impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::EncodingFailed(message) => ApiError::InternalError(message),
            JwtError::TokenExpired => ApiError::Unauthorized("Token has expired".to_string()),
            _ => ApiError::Unauthorized("Token is invalid".to_string()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => ApiError::InvalidCredentials,
            AuthError::InvalidToken(e) => e.into(),
            AuthError::AuthenticationFailed => {
                ApiError::Unauthorized(ACCOUNT_UNAVAILABLE.to_string())
            }
            AuthError::TokenIssue(e) => ApiError::InternalError(e.to_string()),
            AuthError::Store(e) => e.into(),
        }
    }
}

impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::Validation(field) => field.into(),
            AccountError::DuplicateUsername => ApiError::Conflict {
                field: fields::USERNAME.to_string(),
                message: duplicate_message(fields::USERNAME),
            },
            AccountError::NotFound => ApiError::NotFound("User not found".to_string()),
            AccountError::Password(e) => ApiError::InternalError(e.to_string()),
            AccountError::Store(e) => e.into(),
        }
    }
}

impl From<BusinessError> for ApiError {
    fn from(err: BusinessError) -> Self {
        match err {
            BusinessError::Validation(field) => field.into(),
            BusinessError::NotFound => ApiError::NotFound("Business not found".to_string()),
            BusinessError::Duplicate(field) => {
                let wire_field = format!("businesses_{field}");
                ApiError::Conflict {
                    message: duplicate_message(&wire_field),
                    field: wire_field,
                }
            }
            BusinessError::UniqueIdExhausted(attempts) => ApiError::InternalError(format!(
                "no free business unique id after {attempts} attempts"
            )),
            BusinessError::Store(e) => e.into(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

fn duplicate_message(field: &str) -> String {
    format!("A record with this {field} already exists.")
}

/// Result type alias using ApiError
pub type ApiResult<T> = Result<T, ApiError>;
