use axum::response::Response;

use super::{ErrorCode, error_response};

/// JSON 404 for routes nothing else matched.
pub async fn not_found() -> Response {
    error_response(ErrorCode::NotFound, "No route matches this path")
}
