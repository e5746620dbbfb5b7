use axum::{Router, routing::get};

use crate::state::AppState;

pub mod health;

/// Creates the API routes without the `/api` prefix.
/// The `/api` prefix will be added by the `create_router` helper.
pub fn routes(state: &AppState) -> Router {
    Router::new()
        .nest("/tasks", domain_tasks::handlers::router(state.task_service()))
        .merge(domain_users::handlers::router(state.user_service()))
}

/// Creates a router with the /ready endpoint backed by the task store.
pub fn ready_router(state: AppState) -> Router {
    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}

/// Plain-text banner served at `/`.
pub fn banner_router() -> Router {
    Router::new().route("/", get(|| async { "Todo Task Manager API is running" }))
}
