use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::clock::Clock;
use crate::error::{TaskError, TaskResult};
use crate::list::TaskList;
use crate::models::{CreateTask, Task, UpdateTask};
use crate::mutations;
use crate::store::TaskStore;

/// Repository trait for the remote task API
///
/// Unlike the local board, every operation here reports store failures
/// to the caller instead of failing safe.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Tasks owned by `user_id`, in insertion order
    async fn list_by_user(&self, user_id: &str) -> TaskResult<Vec<Task>>;

    /// Create a task owned by `user_id`
    async fn create(&self, user_id: &str, input: CreateTask) -> TaskResult<Task>;

    /// Apply a patch; `None` when the id is unknown
    async fn update(&self, id: Uuid, input: UpdateTask) -> TaskResult<Option<Task>>;

    /// Delete by id; `false` when the id is unknown
    async fn delete(&self, id: Uuid) -> TaskResult<bool>;
}

/// [`TaskRepository`] over any [`TaskStore`].
///
/// Each call is a load, a pure mutation and a save while holding the writer
/// lock, so there is a single writer at a time. Store I/O is blocking and
/// runs on tokio's blocking pool.
pub struct StoreTaskRepository<S: TaskStore> {
    store: Arc<S>,
    writer: Mutex<()>,
    clock: Arc<dyn Clock>,
}

impl<S: TaskStore + 'static> StoreTaskRepository<S> {
    pub fn new(store: S, clock: Arc<dyn Clock>) -> Self {
        Self {
            store: Arc::new(store),
            writer: Mutex::new(()),
            clock,
        }
    }

    async fn with_store<T, F>(&self, op: F) -> TaskResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&S, &dyn Clock) -> TaskResult<T> + Send + 'static,
    {
        let _writer = self.writer.lock().await;
        let store = Arc::clone(&self.store);
        let clock = Arc::clone(&self.clock);

        tokio::task::spawn_blocking(move || op(store.as_ref(), clock.as_ref()))
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Task store call did not complete");
                TaskError::Internal(format!("Task store call did not complete: {}", e))
            })?
    }
}

fn load(store: &impl TaskStore) -> TaskResult<TaskList> {
    Ok(TaskList::from_tasks(store.load()?))
}

#[async_trait]
impl<S: TaskStore + 'static> TaskRepository for StoreTaskRepository<S> {
    async fn list_by_user(&self, user_id: &str) -> TaskResult<Vec<Task>> {
        let user_id = user_id.to_string();
        self.with_store(move |store, _| {
            Ok(load(store)?
                .iter()
                .filter(|task| task.user_id == user_id)
                .map(|task| Task::clone(task))
                .collect())
        })
        .await
    }

    async fn create(&self, user_id: &str, input: CreateTask) -> TaskResult<Task> {
        let owner = user_id.to_string();
        let task = self
            .with_store(move |store, clock| {
                let applied = mutations::create(&load(store)?, input, &owner, clock)?;
                store.save(&applied.tasks.to_vec())?;
                Ok(Task::clone(&applied.outcome))
            })
            .await?;

        tracing::info!(task_id = %task.id, user_id, "Created task");
        Ok(task)
    }

    async fn update(&self, id: Uuid, input: UpdateTask) -> TaskResult<Option<Task>> {
        let updated = self
            .with_store(move |store, clock| {
                let applied = mutations::update(&load(store)?, id, input, clock)?;
                let Some(task) = applied.outcome else {
                    return Ok(None);
                };
                store.save(&applied.tasks.to_vec())?;
                Ok(Some(Task::clone(&task)))
            })
            .await?;

        if updated.is_some() {
            tracing::info!(task_id = %id, "Updated task");
        }
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> TaskResult<bool> {
        let deleted = self
            .with_store(move |store, _| {
                let applied = mutations::delete(&load(store)?, id);
                if applied.outcome {
                    store.save(&applied.tasks.to_vec())?;
                }
                Ok(applied.outcome)
            })
            .await?;

        if deleted {
            tracing::info!(task_id = %id, "Deleted task");
        }
        Ok(deleted)
    }
}
