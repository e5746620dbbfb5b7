//! Persistence boundary for the task collection.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};
use tempfile::NamedTempFile;

use crate::error::TaskResult;
use crate::models::Task;

/// Whole-collection persistence.
///
/// `save` replaces the previous snapshot in one step. `load` on a store that
/// was never written returns an empty collection.
#[cfg_attr(test, mockall::automock)]
pub trait TaskStore: Send + Sync {
    fn load(&self) -> TaskResult<Vec<Task>>;

    fn save(&self, tasks: &[Task]) -> TaskResult<()>;
}

impl<S: TaskStore + ?Sized> TaskStore for Arc<S> {
    fn load(&self) -> TaskResult<Vec<Task>> {
        (**self).load()
    }

    fn save(&self, tasks: &[Task]) -> TaskResult<()> {
        (**self).save(tasks)
    }
}

/// Load, treating any failure as "no prior state".
pub fn load_or_empty(store: &dyn TaskStore) -> Vec<Task> {
    match store.load() {
        Ok(tasks) => tasks,
        Err(e) => {
            tracing::warn!(error = %e, "Task store unreadable, starting with an empty collection");
            Vec::new()
        }
    }
}

/// Pretty-printed JSON array on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parent_dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

impl TaskStore for JsonFileStore {
    #[tracing::instrument(skip(self), fields(path = %self.path.display()))]
    fn load(&self) -> TaskResult<Vec<Task>> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }

        let tasks: Vec<Task> = serde_json::from_str(&raw)?;
        tracing::debug!(count = tasks.len(), "Loaded task snapshot");
        Ok(tasks)
    }

    #[tracing::instrument(skip(self, tasks), fields(path = %self.path.display(), count = tasks.len()))]
    fn save(&self, tasks: &[Task]) -> TaskResult<()> {
        let dir = self.parent_dir();
        std::fs::create_dir_all(dir)?;

        let body = serde_json::to_vec_pretty(tasks)?;

        // Temp file lives next to the target so the rename stays on one filesystem
        let mut temp = NamedTempFile::new_in(dir)?;
        temp.write_all(&body)?;
        temp.as_file().sync_all()?;
        temp.persist(&self.path).map_err(|e| e.error)?;

        tracing::debug!("Saved task snapshot");
        Ok(())
    }
}

/// Process-local store. Clones share the same snapshot.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskStore {
    tasks: Arc<RwLock<Vec<Task>>>,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self {
            tasks: Arc::new(RwLock::new(tasks)),
        }
    }

    pub fn snapshot(&self) -> Vec<Task> {
        self.tasks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl TaskStore for InMemoryTaskStore {
    fn load(&self) -> TaskResult<Vec<Task>> {
        Ok(self.snapshot())
    }

    fn save(&self, tasks: &[Task]) -> TaskResult<()> {
        *self.tasks.write().unwrap_or_else(PoisonError::into_inner) = tasks.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TaskError;
    use crate::models::{TaskPriority, TaskStatus};
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn task(title: &str) -> Task {
        let at = Utc.with_ymd_and_hms(2025, 4, 1, 8, 0, 0).unwrap();
        Task {
            id: Uuid::now_v7(),
            title: title.to_string(),
            description: String::new(),
            status: TaskStatus::InProgress,
            priority: TaskPriority::High,
            due_date: Some(at),
            created_at: at,
            updated_at: at,
            user_id: "u-1".to_string(),
            shared_with: vec!["a@x.com".to_string()],
            tags: vec!["home".to_string()],
        }
    }

    #[test]
    fn test_json_store_missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("tasks.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_json_store_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested/tasks.json"));
        let tasks = vec![task("a"), task("b")];

        store.save(&tasks).unwrap();
        assert_eq!(store.load().unwrap(), tasks);

        // a second save replaces the snapshot entirely
        store.save(&tasks[..1]).unwrap();
        assert_eq!(store.load().unwrap(), tasks[..1].to_vec());
    }

    #[test]
    fn test_json_store_writes_camel_case_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        JsonFileStore::new(&path).save(&[task("a")]).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw[0]["status"], "in-progress");
        assert_eq!(raw[0]["sharedWith"][0], "a@x.com");
    }

    #[test]
    fn test_corrupt_file_fails_load_but_not_load_or_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        std::fs::write(&path, "{ not json").unwrap();
        let store = JsonFileStore::new(&path);

        assert!(matches!(store.load(), Err(TaskError::Serialization(_))));
        assert!(load_or_empty(&store).is_empty());
    }

    #[test]
    fn test_load_or_empty_on_store_error() {
        let mut store = MockTaskStore::new();
        store
            .expect_load()
            .returning(|| Err(TaskError::Storage("disk gone".to_string())));
        assert!(load_or_empty(&store).is_empty());
    }

    #[test]
    fn test_in_memory_clones_share_state() {
        let store = InMemoryTaskStore::new();
        let other = store.clone();
        store.save(&[task("a")]).unwrap();
        assert_eq!(other.load().unwrap().len(), 1);
    }
}
