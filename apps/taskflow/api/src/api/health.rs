//! Readiness check against the task store.

use crate::state::AppState;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use axum_helpers::server::{HealthCheckFuture, run_health_checks};
use std::sync::Arc;

/// Ready when the task snapshot can be read.
pub async fn ready_handler(State(state): State<AppState>) -> Response {
    let checks: Vec<(&str, HealthCheckFuture<'_>)> = vec![(
        "task_store",
        Box::pin(async {
            let store = Arc::clone(&state.store);
            tokio::task::spawn_blocking(move || store.load().map(|_| ()))
                .await
                .map_err(|e| format!("Task store check did not complete: {}", e))?
                .map_err(|e| format!("Task store unreadable: {}", e))
        }),
    )];

    match run_health_checks(checks).await {
        Ok((status, json)) => (status, json).into_response(),
        Err((status, json)) => (status, json).into_response(),
    }
}
