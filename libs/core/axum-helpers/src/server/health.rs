//! Liveness (`/health`) and readiness (`/ready`) plumbing.

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use core_config::AppInfo;
use futures::future::join_all;
use serde::Serialize;
use serde_json::{Map, Value};
use std::future::Future;
use std::pin::Pin;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub name: &'static str,
    pub version: &'static str,
}

/// One readiness check; `Err` carries a reason for the log.
pub type HealthCheckFuture<'a> = Pin<Box<dyn Future<Output = Result<(), String>> + Send + 'a>>;

type ReadinessReply = (StatusCode, Json<Value>);

/// Run every check concurrently.
///
/// The body is `{"status": "ready" | "not ready", "<check>": "connected" | "disconnected"}`.
/// `Ok` carries 200, `Err` carries 503.
///
/// ```ignore
/// let checks: Vec<(&str, HealthCheckFuture<'_>)> = vec![
///     ("task_store", Box::pin(async { store.load().map(|_| ()).map_err(|e| e.to_string()) })),
/// ];
/// run_health_checks(checks).await
/// ```
pub async fn run_health_checks(
    checks: Vec<(&str, HealthCheckFuture<'_>)>,
) -> Result<ReadinessReply, ReadinessReply> {
    let (names, checks): (Vec<&str>, Vec<HealthCheckFuture<'_>>) = checks.into_iter().unzip();
    let outcomes = join_all(checks).await;

    let mut body = Map::new();
    let mut ready = true;
    for (name, outcome) in names.into_iter().zip(outcomes) {
        let state = match outcome {
            Ok(()) => "connected",
            Err(reason) => {
                tracing::error!(check = name, %reason, "Readiness check failed");
                ready = false;
                "disconnected"
            }
        };
        body.insert(name.to_string(), Value::from(state));
    }
    body.insert(
        "status".to_string(),
        Value::from(if ready { "ready" } else { "not ready" }),
    );

    if ready {
        Ok((StatusCode::OK, Json(Value::Object(body))))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(Value::Object(body))))
    }
}

/// Always 200 while the process serves requests.
pub async fn health_handler(State(app): State<AppInfo>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        name: app.name,
        version: app.version,
    })
}

/// Router exposing `GET /health` for `app_info`.
pub fn health_router(app_info: AppInfo) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .with_state(app_info)
}
