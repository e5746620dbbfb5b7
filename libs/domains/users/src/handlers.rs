use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use axum_helpers::ErrorResponse;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::UserResult;
use crate::models::{LoginRequest, RegisterRequest, UserResponse};
use crate::repository::UserRepository;
use crate::service::UserService;

/// OpenAPI documentation for the account endpoints
#[derive(OpenApi)]
#[openapi(
    paths(register, login),
    components(schemas(RegisterRequest, LoginRequest, UserResponse, ErrorResponse)),
    tags(
        (name = "accounts", description = "Account registration and login")
    )
)]
pub struct ApiDoc;

/// Create the account router (`/register`, `/login`)
pub fn router<R: UserRepository + 'static>(service: UserService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .with_state(shared_service)
}

/// Register a new account
#[utoipa::path(
    post,
    path = "/register",
    tag = "accounts",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 400, description = "A field is missing", body = ErrorResponse),
        (status = 409, description = "Email already exists", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn register<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    Json(input): Json<RegisterRequest>,
) -> UserResult<impl IntoResponse> {
    let user = service.register(input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Verify credentials
#[utoipa::path(
    post,
    path = "/login",
    tag = "accounts",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Credentials accepted", body = UserResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn login<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    Json(input): Json<LoginRequest>,
) -> UserResult<Json<UserResponse>> {
    let user = service.login(input).await?;
    Ok(Json(user))
}
