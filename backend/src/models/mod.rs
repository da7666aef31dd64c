//! Shared data models for the business registry API

use axum::http::StatusCode;
use serde::{Deserialize, Deserializer, Serialize};

pub mod auth;
pub use auth::*;

/// Uniform API response envelope
///
/// Every business/user endpoint and every error renders through this shape:
/// `{success, status, message?, data?, error?, error_field?}`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_field: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Successful response carrying a payload
    pub fn with_data(status: StatusCode, message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            status: status.as_u16(),
            message: Some(message.into()),
            data: Some(data),
            error: None,
            error_field: None,
        }
    }
}

impl ApiResponse<()> {
    /// Successful response with only a message
    pub fn message(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            success: true,
            status: status.as_u16(),
            message: Some(message.into()),
            data: None,
            error: None,
            error_field: None,
        }
    }

    /// Failure response
    pub fn failure(
        status: StatusCode,
        message: Option<String>,
        error: impl Into<String>,
        error_field: Option<String>,
    ) -> Self {
        Self {
            success: false,
            status: status.as_u16(),
            message,
            data: None,
            error: Some(error.into()),
            error_field,
        }
    }
}

/// Distinguishes an absent field from an explicit `null` in partial updates.
///
/// Used with `#[serde(default, deserialize_with = "double_option")]`: a missing
/// key stays `None`, `null` becomes `Some(None)`, a value becomes `Some(Some(v))`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Accepts a JSON string or integer and keeps it as text (phone numbers).
pub fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(u64),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Text(text) => text,
        Raw::Number(number) => number.to_string(),
    }))
}

/// Trim a required string field in place
pub(crate) fn trim_field(value: &mut Option<String>) {
    if let Some(text) = value.as_mut() {
        let trimmed = text.trim();
        if trimmed.len() != text.len() {
            *text = trimmed.to_string();
        }
    }
}

/// Trim an optional string; blank values become `None`
pub(crate) fn blank_to_none(value: Option<String>) -> Option<String> {
    value.and_then(|text| {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}
