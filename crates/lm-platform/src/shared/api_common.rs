//! Common API types and utilities

use axum::extract::FromRequest;
use utoipa::ToSchema;
use serde::Serialize;

use crate::shared::error::PlatformError;

/// JSON request body whose rejections use the `{error, message}` shape
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(PlatformError))]
pub struct ApiJson<T>(pub T);

/// Standard API error response
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiError {
    pub error: String,
    pub message: String,
}

/// Health check response
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl HealthResponse {
    pub fn up() -> Self {
        Self {
            status: "UP".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Reject blank strings with a field-named validation message.
pub(crate) fn require_non_blank(field: &str, value: &str) -> crate::Result<()> {
    if value.trim().is_empty() {
        return Err(crate::PlatformError::validation(format!("{} must not be blank", field)));
    }
    Ok(())
}

/// Minimal email shape check: non-blank and contains `@`.
pub(crate) fn require_email(value: &str) -> crate::Result<()> {
    require_non_blank("email", value)?;
    if !value.contains('@') {
        return Err(crate::PlatformError::validation("email must be a valid email address"));
    }
    Ok(())
}
