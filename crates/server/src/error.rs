//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that renders every failure as a
//! structured JSON message. No error crosses the HTTP boundary raw: expected
//! signals (not-found, conflict) become their message result, and unexpected
//! storage failures are captured to Sentry and replaced with a generic
//! message. All route handlers return `Result<T, AppError>`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::services::CatalogError;

/// Application-level error type for the catalog server.
#[derive(Debug, Error)]
pub enum AppError {
    /// Catalog service operation failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Structured message body returned for every error response.
#[derive(Debug, Serialize)]
struct MessageBody {
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Not-found and conflict are expected signals; only unexpected
        // storage failures are error-tracked.
        if matches!(self, Self::Catalog(CatalogError::Storage(_))) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Catalog(CatalogError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Catalog(CatalogError::Conflict { .. }) => StatusCode::CONFLICT,
            Self::Catalog(CatalogError::InvalidName(_)) | Self::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Catalog(CatalogError::Storage(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Don't expose storage details to clients
        let message = match &self {
            Self::Catalog(CatalogError::Storage(_)) => "an unexpected error occurred".to_owned(),
            other => other.to_string(),
        };

        (status, Json(MessageBody { message })).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
