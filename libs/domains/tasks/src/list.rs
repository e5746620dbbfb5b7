use serde::{Serialize, Serializer};
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

use crate::models::Task;

/// Ordered, immutable snapshot of tasks.
///
/// Every mutation produces a new `TaskList`. Tasks the mutation did not touch
/// keep their `Arc`, so `Arc::ptr_eq` tells a consumer exactly which records
/// changed between two snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskList {
    tasks: Vec<Arc<Task>>,
}

impl TaskList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from loaded records. Later duplicates of an id are dropped.
    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        let mut seen = HashSet::with_capacity(tasks.len());
        let tasks = tasks
            .into_iter()
            .filter(|task| {
                let fresh = seen.insert(task.id);
                if !fresh {
                    tracing::warn!(task_id = %task.id, "Dropping duplicate task id from snapshot");
                }
                fresh
            })
            .map(Arc::new)
            .collect();

        Self { tasks }
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Task>> {
        self.tasks.iter()
    }

    pub fn get(&self, id: Uuid) -> Option<&Arc<Task>> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.get(id).is_some()
    }

    /// Owned copies of every task, in order.
    pub fn to_vec(&self) -> Vec<Task> {
        self.tasks.iter().map(|task| Task::clone(task)).collect()
    }

    pub(crate) fn with_appended(&self, task: Arc<Task>) -> Self {
        let mut tasks = Vec::with_capacity(self.tasks.len() + 1);
        tasks.extend(self.tasks.iter().cloned());
        tasks.push(task);
        Self { tasks }
    }

    pub(crate) fn with_replaced(&self, task: Arc<Task>) -> Self {
        let tasks = self
            .tasks
            .iter()
            .map(|existing| {
                if existing.id == task.id {
                    Arc::clone(&task)
                } else {
                    Arc::clone(existing)
                }
            })
            .collect();
        Self { tasks }
    }

    pub(crate) fn without(&self, id: Uuid) -> Self {
        let tasks = self
            .tasks
            .iter()
            .filter(|task| task.id != id)
            .cloned()
            .collect();
        Self { tasks }
    }
}

impl FromIterator<Task> for TaskList {
    fn from_iter<I: IntoIterator<Item = Task>>(iter: I) -> Self {
        Self::from_tasks(iter.into_iter().collect())
    }
}

impl Serialize for TaskList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.tasks.iter().map(|task| task.as_ref()))
    }
}
