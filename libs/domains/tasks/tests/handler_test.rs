//! Handler tests for the Tasks domain
//!
//! These drive the task router directly with `oneshot`, checking:
//! - Request deserialization (camelCase and snake_case bodies)
//! - Response bodies and HTTP status codes
//! - The JSON error envelope for 400 and 500 responses

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{TimeZone, Utc};
use domain_tasks::*;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use test_utils::{TempStoreDir, TestDataBuilder};
use tower::ServiceExt; // For oneshot()

// Helper to parse JSON response body
async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn clock() -> Arc<FixedClock> {
    Arc::new(FixedClock::at(
        Utc.with_ymd_and_hms(2025, 5, 20, 12, 0, 0).unwrap(),
    ))
}

fn app_with<S: TaskStore + 'static>(store: S) -> Router {
    let repo = StoreTaskRepository::new(store, clock());
    handlers::router(TaskService::new(repo))
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

/// Store whose every operation fails
struct BrokenStore;

impl TaskStore for BrokenStore {
    fn load(&self) -> TaskResult<Vec<Task>> {
        Err(TaskError::Storage("connection refused".to_string()))
    }

    fn save(&self, _tasks: &[Task]) -> TaskResult<()> {
        Err(TaskError::Storage("connection refused".to_string()))
    }
}

#[tokio::test]
async fn test_create_task_handler_returns_201_with_defaults() {
    let app = app_with(InMemoryTaskStore::new());
    let builder = TestDataBuilder::from_test_name("handler_create_201");

    let response = app
        .oneshot(json_request(
            "POST",
            "/",
            json!({
                "userId": builder.user_id(),
                "title": builder.name("task", "main"),
                "description": "Handler test"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let task: Task = json_body(response.into_body()).await;
    assert_eq!(task.title, builder.name("task", "main"));
    assert_eq!(task.user_id, builder.user_id());
    assert_eq!(task.status, TaskStatus::Todo);
    assert_eq!(task.priority, TaskPriority::Medium);
    assert_eq!(task.created_at, task.updated_at);
}

#[tokio::test]
async fn test_create_task_accepts_snake_case_fields() {
    let app = app_with(InMemoryTaskStore::new());

    let response = app
        .oneshot(json_request(
            "POST",
            "/",
            json!({
                "user_id": "legacy-client",
                "title": "From the old form",
                "status": "in-progress",
                "priority": "high",
                "due_date": "2025-06-01T09:00:00Z"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let task: Task = json_body(response.into_body()).await;
    assert_eq!(task.user_id, "legacy-client");
    assert_eq!(task.status, TaskStatus::InProgress);
    assert_eq!(
        task.due_date,
        Some(Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap())
    );
}

#[tokio::test]
async fn test_create_task_missing_fields_returns_400() {
    let store = InMemoryTaskStore::new();

    for body in [json!({ "title": "No owner" }), json!({ "userId": "u-1" })] {
        let response = app_with(store.clone())
            .oneshot(json_request("POST", "/", body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: Value = json_body(response.into_body()).await;
        assert_eq!(error["kind"], "BAD_REQUEST");
        assert!(error["error"].as_str().unwrap().contains("required"));
    }

    assert!(store.snapshot().is_empty());
}

#[tokio::test]
async fn test_list_tasks_scoped_by_user() {
    let store = InMemoryTaskStore::new();
    for (user, title) in [("alice", "a1"), ("bob", "b1"), ("alice", "a2")] {
        let response = app_with(store.clone())
            .oneshot(json_request(
                "POST",
                "/",
                json!({ "userId": user, "title": title }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app_with(store).oneshot(get("/?userId=alice")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let tasks: Vec<Task> = json_body(response.into_body()).await;
    let titles: Vec<&str> = tasks.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["a1", "a2"]);
}

#[tokio::test]
async fn test_list_tasks_without_user_returns_400() {
    let response = app_with(InMemoryTaskStore::new())
        .oneshot(get("/"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_task_returns_success_and_applies_patch() {
    let store = InMemoryTaskStore::new();
    let response = app_with(store.clone())
        .oneshot(json_request(
            "POST",
            "/",
            json!({ "userId": "u-1", "title": "Draft", "dueDate": "2025-06-01T09:00:00Z" }),
        ))
        .await
        .unwrap();
    let created: Task = json_body(response.into_body()).await;

    let response = app_with(store.clone())
        .oneshot(json_request(
            "PUT",
            &format!("/{}", created.id),
            json!({ "title": "Final", "status": "completed", "dueDate": null }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: SuccessResponse = json_body(response.into_body()).await;
    assert!(body.success);

    let stored = &store.snapshot()[0];
    assert_eq!(stored.title, "Final");
    assert_eq!(stored.status, TaskStatus::Completed);
    assert_eq!(stored.due_date, None);
    assert_eq!(stored.description, created.description);
}

#[tokio::test]
async fn test_update_and_delete_unknown_id_are_noops() {
    let store = InMemoryTaskStore::new();
    let missing = uuid::Uuid::now_v7();

    let response = app_with(store.clone())
        .oneshot(json_request(
            "PUT",
            &format!("/{}", missing),
            json!({ "title": "Ghost" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/{}", missing))
        .body(Body::empty())
        .unwrap();
    let response = app_with(store.clone()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body, json!({ "success": true }));

    assert!(store.snapshot().is_empty());
}

#[tokio::test]
async fn test_delete_task_removes_it() {
    let store = InMemoryTaskStore::new();
    let response = app_with(store.clone())
        .oneshot(json_request(
            "POST",
            "/",
            json!({ "userId": "u-1", "title": "Temp" }),
        ))
        .await
        .unwrap();
    let created: Task = json_body(response.into_body()).await;

    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/{}", created.id))
        .body(Body::empty())
        .unwrap();
    let response = app_with(store.clone()).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(store.snapshot().is_empty());
}

#[tokio::test]
async fn test_invalid_task_id_returns_400() {
    let request = Request::builder()
        .method("DELETE")
        .uri("/not-a-uuid")
        .body(Body::empty())
        .unwrap();
    let response = app_with(InMemoryTaskStore::new())
        .oneshot(request)
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_store_failure_returns_500_envelope() {
    let response = app_with(BrokenStore)
        .oneshot(get("/?userId=u-1"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let error: Value = json_body(response.into_body()).await;
    assert_eq!(error["code"], 2001);
    assert_eq!(error["kind"], "STORAGE_ERROR");
    assert_eq!(error["error"], "Database error");
    // internal detail stays in the logs
    assert!(!error["error"].as_str().unwrap().contains("connection refused"));
}

#[tokio::test]
async fn test_file_store_survives_restart() {
    let dir = TempStoreDir::new();

    let response = app_with(JsonFileStore::new(dir.tasks_path()))
        .oneshot(json_request(
            "POST",
            "/",
            json!({ "userId": "u-1", "title": "Persisted" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // a fresh router over the same file sees the task
    let response = app_with(JsonFileStore::new(dir.tasks_path()))
        .oneshot(get("/?userId=u-1"))
        .await
        .unwrap();
    let tasks: Vec<Task> = json_body(response.into_body()).await;
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].title, "Persisted");
}
