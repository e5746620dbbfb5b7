//! Machine-readable error codes carried in every error body.
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! assert_eq!(ErrorCode::Conflict.as_str(), "CONFLICT");
//! assert_eq!(ErrorCode::Conflict.code(), 1008);
//! ```

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Error identifiers. 1xxx are caller mistakes, 2xxx are failures on our side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Body decoded but failed `validator` rules
    ValidationError,
    /// Body could not be decoded as JSON
    JsonExtraction,
    NotFound,
    /// Missing or wrong credentials
    Unauthorized,
    /// Duplicate resource
    Conflict,
    BadRequest,
    /// Task snapshot could not be read or written
    StorageError,
    InternalError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::JsonExtraction => "JSON_EXTRACTION",
            Self::NotFound => "NOT_FOUND",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Conflict => "CONFLICT",
            Self::BadRequest => "BAD_REQUEST",
            Self::StorageError => "STORAGE_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Numeric code logged as `error_code`.
    pub fn code(&self) -> i32 {
        match self {
            Self::ValidationError => 1001,
            Self::JsonExtraction => 1003,
            Self::NotFound => 1004,
            Self::Unauthorized => 1006,
            Self::Conflict => 1008,
            Self::BadRequest => 1012,
            Self::StorageError => 2001,
            Self::InternalError => 2002,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::ValidationError | Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::JsonExtraction => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Conflict => StatusCode::CONFLICT,
            Self::StorageError | Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown when the underlying detail must not reach the client.
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::ValidationError => "Request validation failed",
            Self::JsonExtraction => "Failed to parse request body",
            Self::NotFound => "Resource not found",
            Self::Unauthorized => "Authentication required",
            Self::Conflict => "Resource already exists",
            Self::BadRequest => "Bad request",
            Self::StorageError => "Database error",
            Self::InternalError => "Something went wrong",
        }
    }

    pub fn is_server_error(&self) -> bool {
        self.status().is_server_error()
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
