pub mod codes;
pub mod handlers;

pub use codes::ErrorCode;

use axum::{
    Json,
    extract::rejection::JsonRejection,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use utoipa::ToSchema;
use validator::ValidationErrors;

/// JSON body of every error response.
///
/// `error` is the human-readable message clients display; `kind` and `code`
/// identify the failure for programmatic handling and logs.
///
/// ```json
/// { "code": 1008, "kind": "CONFLICT", "error": "Email already exists" }
/// ```
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub code: i32,
    pub kind: ErrorCode,
    pub error: String,
    /// Per-field validation failures
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code.code(),
            kind: code,
            error: message.into(),
            details: None,
        }
    }
}

/// Errors a handler can return; each maps to one [`ErrorCode`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationErrors),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),
}

impl AppError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::JsonExtractorRejection(_) => ErrorCode::JsonExtraction,
            AppError::ValidationError(_) => ErrorCode::ValidationError,
            AppError::BadRequest(_) => ErrorCode::BadRequest,
            AppError::Unauthorized(_) => ErrorCode::Unauthorized,
            AppError::Conflict(_) => ErrorCode::Conflict,
            AppError::Storage(_) => ErrorCode::StorageError,
            AppError::InternalServerError(_) => ErrorCode::InternalError,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.code();
        let mut status = code.status();

        if code.is_server_error() {
            tracing::error!(error_code = code.code(), error = %self, "Request failed");
        } else {
            tracing::info!(error_code = code.code(), error = %self, "Request rejected");
        }

        let body = match self {
            // Server-side detail stays in the log.
            AppError::Storage(_) | AppError::InternalServerError(_) => {
                ErrorResponse::new(code, code.public_message())
            }
            AppError::JsonExtractorRejection(rejection) => {
                status = rejection.status();
                ErrorResponse::new(code, rejection.body_text())
            }
            AppError::ValidationError(errors) => ErrorResponse {
                details: serde_json::to_value(&errors).ok(),
                ..ErrorResponse::new(code, code.public_message())
            },
            AppError::BadRequest(msg)
            | AppError::Unauthorized(msg)
            | AppError::Conflict(msg) => ErrorResponse::new(code, msg),
        };

        (status, Json(body)).into_response()
    }
}

/// Render a standalone error outside of [`AppError`].
pub fn error_response(code: ErrorCode, message: impl Into<String>) -> Response {
    (code.status(), Json(ErrorResponse::new(code, message))).into_response()
}
