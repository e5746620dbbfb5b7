use std::sync::Arc;
use tokio::sync::watch;
use tracing::instrument;
use uuid::Uuid;

use crate::clock::Clock;
use crate::error::{TaskError, TaskResult};
use crate::filter::{filter_tasks, TaskFilter};
use crate::list::TaskList;
use crate::models::{CreateTask, Task, TaskStats, TaskStatus, UpdateTask};
use crate::mutations::{self, Applied, Shared};
use crate::notify::ShareNotifier;
use crate::stats::aggregate;
use crate::store::{load_or_empty, TaskStore};

/// The active user's task collection, kept in sync with a [`TaskStore`].
///
/// Every mutation publishes the new snapshot to subscribers first and then
/// persists it. When the save fails the in-memory change stays in place and
/// the caller gets [`TaskError::Storage`] so it can warn the user.
///
/// The store may hold several users' records. The board only sees those owned
/// by its user and writes the rest back untouched on every save.
pub struct TaskBoard {
    user_id: String,
    others: Vec<Task>,
    store: Arc<dyn TaskStore>,
    clock: Arc<dyn Clock>,
    notifier: Arc<dyn ShareNotifier>,
    snapshot: watch::Sender<TaskList>,
}

impl TaskBoard {
    /// Open the board for `user_id`. An unreadable store yields an empty board.
    pub fn open(
        user_id: impl Into<String>,
        store: Arc<dyn TaskStore>,
        clock: Arc<dyn Clock>,
        notifier: Arc<dyn ShareNotifier>,
    ) -> Self {
        let user_id = user_id.into();
        let (owned, others): (Vec<Task>, Vec<Task>) = load_or_empty(store.as_ref())
            .into_iter()
            .partition(|task| task.user_id == user_id);
        let tasks = TaskList::from_tasks(owned);
        tracing::debug!(
            user_id = %user_id,
            count = tasks.len(),
            others = others.len(),
            "Opened task board"
        );

        Self {
            user_id,
            others,
            store,
            clock,
            notifier,
            snapshot: watch::Sender::new(tasks),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Current snapshot.
    pub fn tasks(&self) -> TaskList {
        self.snapshot.borrow().clone()
    }

    pub fn get(&self, id: Uuid) -> Option<Arc<Task>> {
        self.snapshot.borrow().get(id).cloned()
    }

    /// Receiver that sees every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<TaskList> {
        self.snapshot.subscribe()
    }

    #[instrument(skip(self, input), fields(user_id = %self.user_id))]
    pub fn create(&mut self, input: CreateTask) -> TaskResult<Arc<Task>> {
        let Applied { tasks, outcome } =
            mutations::create(&self.tasks(), input, &self.user_id, self.clock.as_ref())?;
        tracing::info!(task_id = %outcome.id, "Created task");
        self.commit(tasks)?;
        Ok(outcome)
    }

    #[instrument(skip(self, patch), fields(user_id = %self.user_id, task_id = %id))]
    pub fn update(&mut self, id: Uuid, patch: UpdateTask) -> TaskResult<Option<Arc<Task>>> {
        let applied = mutations::update(&self.tasks(), id, patch, self.clock.as_ref())?;
        self.commit_changed(applied)
    }

    #[instrument(skip(self), fields(user_id = %self.user_id, task_id = %id))]
    pub fn delete(&mut self, id: Uuid) -> TaskResult<bool> {
        let Applied { tasks, outcome } = mutations::delete(&self.tasks(), id);
        if outcome {
            tracing::info!("Deleted task");
            self.commit(tasks)?;
        }
        Ok(outcome)
    }

    #[instrument(skip(self), fields(user_id = %self.user_id, task_id = %id))]
    pub fn advance_status(&mut self, id: Uuid) -> TaskResult<Option<Arc<Task>>> {
        let applied = mutations::advance_status(&self.tasks(), id, self.clock.as_ref());
        self.commit_changed(applied)
    }

    #[instrument(skip(self), fields(user_id = %self.user_id, task_id = %id, %status))]
    pub fn set_status(&mut self, id: Uuid, status: TaskStatus) -> TaskResult<Option<Arc<Task>>> {
        let applied = mutations::set_status(&self.tasks(), id, status, self.clock.as_ref());
        self.commit_changed(applied)
    }

    /// Add collaborators and hand the newly added ones to the notifier.
    #[instrument(skip(self, emails), fields(user_id = %self.user_id, task_id = %id))]
    pub fn share<I, S>(&mut self, id: Uuid, emails: I) -> TaskResult<Option<Shared>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let Applied { tasks, outcome } =
            mutations::share(&self.tasks(), id, emails, self.clock.as_ref())?;

        let Some(shared) = outcome else {
            return Ok(None);
        };
        if shared.added.is_empty() {
            return Ok(Some(shared));
        }

        let saved = self.commit(tasks);
        self.notifier
            .notify(shared.task.id, &shared.task.title, &shared.added);
        saved.map(|()| Some(shared))
    }

    /// Tasks passing `filter`, in collection order.
    pub fn visible(&self, filter: &TaskFilter) -> Vec<Arc<Task>> {
        filter_tasks(&self.snapshot.borrow(), filter, self.clock.as_ref())
    }

    pub fn stats(&self) -> TaskStats {
        aggregate(
            self.snapshot.borrow().iter().map(|task| task.as_ref()),
            self.clock.now(),
        )
    }

    /// Drop this user's collection and persist the rest of the store.
    #[instrument(skip(self), fields(user_id = %self.user_id))]
    pub fn sign_out(&mut self) -> TaskResult<()> {
        tracing::info!("Clearing tasks on sign-out");
        self.commit(TaskList::new())
    }

    fn commit_changed(&mut self, applied: Applied<Option<Arc<Task>>>) -> TaskResult<Option<Arc<Task>>> {
        let Applied { tasks, outcome } = applied;
        if let Some(task) = &outcome {
            tracing::info!(task_id = %task.id, status = %task.status, "Updated task");
            self.commit(tasks)?;
        }
        Ok(outcome)
    }

    fn commit(&mut self, tasks: TaskList) -> TaskResult<()> {
        self.refresh_others();
        let mut records = self.others.clone();
        records.extend(tasks.to_vec());
        self.snapshot.send_replace(tasks);

        self.store.save(&records).map_err(|e| {
            tracing::error!(error = %e, "Failed to persist task snapshot");
            match e {
                TaskError::Storage(msg) => TaskError::Storage(msg),
                other => TaskError::Storage(other.to_string()),
            }
        })
    }

    /// Pick up other users' records written since the board was opened.
    /// Keeps the last known set when the store cannot be read.
    fn refresh_others(&mut self) {
        match self.store.load() {
            Ok(all) => {
                self.others = all
                    .into_iter()
                    .filter(|task| task.user_id != self.user_id)
                    .collect();
            }
            Err(e) => {
                tracing::warn!(error = %e, "Could not re-read store, keeping known records");
            }
        }
    }
}
