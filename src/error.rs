//! Service-level errors and their HTTP mapping

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::api::ValidationErrorBody;
use crate::host::CommandError;

/// Errors surfaced by request handlers
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Body was not JSON, or `command` was missing or not a string
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    /// The command could not be started at all
    #[error(transparent)]
    Command(#[from] CommandError),
}

impl ServiceError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServiceError::InvalidBody(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ServiceError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ServiceError::Command(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ServiceError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::MissingJsonContentType(e) => {
                ServiceError::UnsupportedMediaType(e.body_text())
            }
            other => ServiceError::InvalidBody(other.body_text()),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            // Spawn faults stay opaque to the caller
            ServiceError::Command(e) => {
                tracing::error!("Command could not be run: {}", e);
                (status, "Internal Server Error").into_response()
            }
            other => {
                tracing::warn!("Rejected request: {}", other);
                let body = ValidationErrorBody {
                    detail: other.to_string(),
                };
                (status, Json(body)).into_response()
            }
        }
    }
}
