use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{TaskError, TaskResult};
use crate::models::{CreateTask, CreateTaskRequest, Task, UpdateTask};
use crate::repository::TaskRepository;

/// Service layer for the remote task API
#[derive(Clone)]
pub struct TaskService<R: TaskRepository> {
    repository: Arc<R>,
}

impl<R: TaskRepository> TaskService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// List a user's tasks. The user id is required.
    #[instrument(skip(self))]
    pub async fn list_tasks(&self, user_id: Option<&str>) -> TaskResult<Vec<Task>> {
        let user_id = required(user_id, "userId is required")?;
        self.repository.list_by_user(user_id).await
    }

    /// Create a task after checking required fields
    #[instrument(skip(self, request), fields(user_id = ?request.user_id))]
    pub async fn create_task(&self, request: CreateTaskRequest) -> TaskResult<Task> {
        let (Some(user_id), Some(title)) = (
            request.user_id.as_deref().map(str::trim).filter(|s| !s.is_empty()),
            request.title.as_deref().filter(|s| !s.trim().is_empty()),
        ) else {
            return Err(TaskError::Validation(
                "userId and title are required".to_string(),
            ));
        };

        let input = CreateTask {
            title: title.to_string(),
            description: request.description.clone().unwrap_or_default(),
            status: request.status,
            priority: request.priority,
            due_date: request.due_date,
            shared_with: Vec::new(),
            tags: request.tags.clone(),
        };
        input.validate()?;

        self.repository.create(user_id, input).await
    }

    /// Update a task. Unknown ids are a no-op.
    #[instrument(skip(self, input), fields(task_id = %id))]
    pub async fn update_task(&self, id: Uuid, input: UpdateTask) -> TaskResult<Option<Task>> {
        input.validate()?;
        self.repository.update(id, input).await
    }

    /// Delete a task. Unknown ids are a no-op.
    #[instrument(skip(self), fields(task_id = %id))]
    pub async fn delete_task(&self, id: Uuid) -> TaskResult<bool> {
        self.repository.delete(id).await
    }
}

fn required<'a>(value: Option<&'a str>, message: &str) -> TaskResult<&'a str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| TaskError::Validation(message.to_string()))
}
