use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
    Json, Router,
};
use axum_helpers::{ErrorResponse, ValidatedJson};
use std::sync::Arc;
use utoipa::OpenApi;
use uuid::Uuid;

use crate::error::{TaskError, TaskResult};
use crate::models::{
    CreateTaskRequest, SuccessResponse, Task, TaskPriority, TaskQuery, TaskStatus, UpdateTask,
};
use crate::repository::TaskRepository;
use crate::service::TaskService;

/// OpenAPI documentation for the Tasks API
#[derive(OpenApi)]
#[openapi(
    paths(list_tasks, create_task, update_task, delete_task),
    components(schemas(
        Task,
        TaskStatus,
        TaskPriority,
        CreateTaskRequest,
        UpdateTask,
        SuccessResponse,
        ErrorResponse
    )),
    tags(
        (name = "tasks", description = "Task management endpoints")
    )
)]
pub struct ApiDoc;

/// Create the task router, to be nested under `/tasks`
pub fn router<R: TaskRepository + 'static>(service: TaskService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_tasks).post(create_task))
        .route("/{id}", put(update_task).delete(delete_task))
        .with_state(shared_service)
}

fn parse_id(id: &str) -> TaskResult<Uuid> {
    Uuid::parse_str(id).map_err(|_| TaskError::Validation(format!("Invalid task ID: {}", id)))
}

/// List a user's tasks
#[utoipa::path(
    get,
    path = "",
    tag = "tasks",
    params(TaskQuery),
    responses(
        (status = 200, description = "Tasks owned by the user", body = Vec<Task>),
        (status = 400, description = "userId missing", body = ErrorResponse),
        (status = 500, description = "Task store failure", body = ErrorResponse)
    )
)]
pub async fn list_tasks<R: TaskRepository>(
    State(service): State<Arc<TaskService<R>>>,
    Query(query): Query<TaskQuery>,
) -> TaskResult<Json<Vec<Task>>> {
    let tasks = service.list_tasks(query.user_id.as_deref()).await?;
    Ok(Json(tasks))
}

/// Create a new task
#[utoipa::path(
    post,
    path = "",
    tag = "tasks",
    request_body = CreateTaskRequest,
    responses(
        (status = 201, description = "Task created", body = Task),
        (status = 400, description = "userId or title missing", body = ErrorResponse),
        (status = 500, description = "Task store failure", body = ErrorResponse)
    )
)]
pub async fn create_task<R: TaskRepository>(
    State(service): State<Arc<TaskService<R>>>,
    Json(request): Json<CreateTaskRequest>,
) -> TaskResult<impl IntoResponse> {
    let task = service.create_task(request).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// Update a task. Unknown ids succeed without effect.
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "tasks",
    params(
        ("id" = String, Path, description = "Task ID")
    ),
    request_body = UpdateTask,
    responses(
        (status = 200, description = "Update applied", body = SuccessResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Task store failure", body = ErrorResponse)
    )
)]
pub async fn update_task<R: TaskRepository>(
    State(service): State<Arc<TaskService<R>>>,
    Path(id): Path<String>,
    ValidatedJson(input): ValidatedJson<UpdateTask>,
) -> TaskResult<Json<SuccessResponse>> {
    let id = parse_id(&id)?;
    if service.update_task(id, input).await?.is_none() {
        tracing::debug!(task_id = %id, "Update targeted unknown task");
    }
    Ok(Json(SuccessResponse::OK))
}

/// Delete a task. Unknown ids succeed without effect.
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "tasks",
    params(
        ("id" = String, Path, description = "Task ID")
    ),
    responses(
        (status = 200, description = "Delete applied", body = SuccessResponse),
        (status = 400, description = "Invalid task ID", body = ErrorResponse),
        (status = 500, description = "Task store failure", body = ErrorResponse)
    )
)]
pub async fn delete_task<R: TaskRepository>(
    State(service): State<Arc<TaskService<R>>>,
    Path(id): Path<String>,
) -> TaskResult<Json<SuccessResponse>> {
    let id = parse_id(&id)?;
    service.delete_task(id).await?;
    Ok(Json(SuccessResponse::OK))
}
