//! Pure task mutations.
//!
//! Each function takes the current [`TaskList`] and returns a new one in an
//! [`Applied`]. The input list is never modified, and a task is replaced by
//! a fresh `Arc` only when it actually changed. Operations on an id that is
//! not in the list are no-ops reported through the outcome (`None`/`false`).

use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;
use validator::{Validate, ValidateEmail};

use crate::clock::Clock;
use crate::error::{TaskError, TaskResult};
use crate::list::TaskList;
use crate::models::{CreateTask, Task, TaskStatus, UpdateTask};

/// Result of a mutation: the next snapshot plus what happened.
#[derive(Debug, Clone)]
pub struct Applied<T> {
    pub tasks: TaskList,
    pub outcome: T,
}

impl<T> Applied<T> {
    fn new(tasks: TaskList, outcome: T) -> Self {
        Self { tasks, outcome }
    }
}

/// A successful share: the updated task and the collaborators it gained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shared {
    pub task: Arc<Task>,
    pub added: Vec<String>,
}

/// Append a new task owned by `user_id`.
pub fn create(
    tasks: &TaskList,
    input: CreateTask,
    user_id: &str,
    clock: &dyn Clock,
) -> TaskResult<Applied<Arc<Task>>> {
    input.validate()?;
    ensure_title(&input.title)?;

    let now = clock.now();
    let task = Arc::new(Task {
        id: fresh_id(tasks),
        title: input.title,
        description: input.description,
        status: input.status.unwrap_or_default(),
        priority: input.priority.unwrap_or_default(),
        due_date: input.due_date,
        created_at: now,
        updated_at: now,
        user_id: user_id.to_string(),
        shared_with: dedup_collaborators(&[], input.shared_with),
        tags: input.tags,
    });

    Ok(Applied::new(tasks.with_appended(Arc::clone(&task)), task))
}

/// Merge `patch` onto the task with `id`.
pub fn update(
    tasks: &TaskList,
    id: Uuid,
    patch: UpdateTask,
    clock: &dyn Clock,
) -> TaskResult<Applied<Option<Arc<Task>>>> {
    patch.validate()?;
    if let Some(title) = &patch.title {
        ensure_title(title)?;
    }

    Ok(replace_with(tasks, id, |task| {
        task.apply_update(patch, clock.now())
    }))
}

/// Remove the task with `id`. The outcome says whether anything was removed.
pub fn delete(tasks: &TaskList, id: Uuid) -> Applied<bool> {
    if tasks.contains(id) {
        Applied::new(tasks.without(id), true)
    } else {
        Applied::new(tasks.clone(), false)
    }
}

/// Move the task one step along todo → in-progress → completed → todo.
pub fn advance_status(tasks: &TaskList, id: Uuid, clock: &dyn Clock) -> Applied<Option<Arc<Task>>> {
    replace_with(tasks, id, |task| {
        task.status = task.status.next();
        task.touch(clock.now());
    })
}

/// Put the task straight into `status`.
pub fn set_status(
    tasks: &TaskList,
    id: Uuid,
    status: TaskStatus,
    clock: &dyn Clock,
) -> Applied<Option<Arc<Task>>> {
    replace_with(tasks, id, |task| {
        task.status = status;
        task.touch(clock.now());
    })
}

/// Grant collaborators access to the task.
///
/// Identifiers are trimmed and blanks dropped. Every remaining entry must be
/// a valid email. Entries already present (case-insensitively) are skipped,
/// and when nothing new remains the list is returned unchanged.
pub fn share<I, S>(
    tasks: &TaskList,
    id: Uuid,
    emails: I,
    clock: &dyn Clock,
) -> TaskResult<Applied<Option<Shared>>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let requested: Vec<String> = emails
        .into_iter()
        .map(|email| email.as_ref().trim().to_string())
        .filter(|email| !email.is_empty())
        .collect();

    let invalid: Vec<&str> = requested
        .iter()
        .filter(|email| !email.validate_email())
        .map(String::as_str)
        .collect();
    if !invalid.is_empty() {
        return Err(TaskError::Validation(format!(
            "Invalid collaborator email: {}",
            invalid.join(", ")
        )));
    }

    let Some(existing) = tasks.get(id) else {
        return Ok(Applied::new(tasks.clone(), None));
    };

    let merged = dedup_collaborators(&existing.shared_with, requested);
    let added: Vec<String> = merged[existing.shared_with.len()..].to_vec();

    if added.is_empty() {
        let shared = Shared {
            task: Arc::clone(existing),
            added,
        };
        return Ok(Applied::new(tasks.clone(), Some(shared)));
    }

    let mut task = Task::clone(existing);
    task.shared_with = merged;
    task.touch(clock.now());
    let task = Arc::new(task);

    Ok(Applied::new(
        tasks.with_replaced(Arc::clone(&task)),
        Some(Shared { task, added }),
    ))
}

/// Public link for a shared task.
pub fn share_link(base_url: &str, id: Uuid) -> String {
    format!("{}/task/{}", base_url.trim_end_matches('/'), id)
}

fn replace_with<F>(tasks: &TaskList, id: Uuid, edit: F) -> Applied<Option<Arc<Task>>>
where
    F: FnOnce(&mut Task),
{
    match tasks.get(id) {
        Some(existing) => {
            let mut task = Task::clone(existing);
            edit(&mut task);
            let task = Arc::new(task);
            Applied::new(tasks.with_replaced(Arc::clone(&task)), Some(task))
        }
        None => {
            tracing::debug!(task_id = %id, "Mutation targeted a missing task; ignoring");
            Applied::new(tasks.clone(), None)
        }
    }
}

fn ensure_title(title: &str) -> TaskResult<()> {
    if title.trim().is_empty() {
        return Err(TaskError::Validation("Task title cannot be blank".to_string()));
    }
    Ok(())
}

fn fresh_id(tasks: &TaskList) -> Uuid {
    loop {
        let id = Uuid::now_v7();
        if !tasks.contains(id) {
            return id;
        }
    }
}

/// `existing` followed by the entries of `incoming` not yet present.
fn dedup_collaborators(existing: &[String], incoming: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = existing.iter().map(|e| e.to_lowercase()).collect();
    let mut merged = existing.to_vec();
    for email in incoming {
        let email = email.trim().to_string();
        if !email.is_empty() && seen.insert(email.to_lowercase()) {
            merged.push(email);
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::models::TaskPriority;
    use chrono::{Duration, TimeZone, Utc};

    fn clock() -> FixedClock {
        FixedClock::at(Utc.with_ymd_and_hms(2025, 5, 20, 12, 0, 0).unwrap())
    }

    fn seeded(clock: &FixedClock, titles: &[&str]) -> TaskList {
        titles.iter().fold(TaskList::new(), |tasks, title| {
            create(&tasks, CreateTask::titled(*title), "u-1", clock)
                .unwrap()
                .tasks
        })
    }

    #[test]
    fn test_create_applies_defaults() {
        let clock = clock();
        let applied = create(&TaskList::new(), CreateTask::titled("A"), "u-1", &clock).unwrap();
        let task = applied.outcome;

        assert_eq!(task.status, TaskStatus::Todo);
        assert_eq!(task.priority, TaskPriority::Medium);
        assert_eq!(task.created_at, task.updated_at);
        assert_eq!(task.created_at, clock.now());
        assert_eq!(task.user_id, "u-1");
        assert!(task.shared_with.is_empty());
        assert!(task.tags.is_empty());
        assert_eq!(applied.tasks.len(), 1);
    }

    #[test]
    fn test_create_ids_are_unique() {
        let clock = clock();
        let tasks = seeded(&clock, &["a", "b", "c", "d", "e"]);
        let ids: HashSet<Uuid> = tasks.iter().map(|t| t.id).collect();
        assert_eq!(ids.len(), 5);
    }

    #[test]
    fn test_create_rejects_blank_title() {
        let clock = clock();
        let result = create(&TaskList::new(), CreateTask::titled("   "), "u-1", &clock);
        assert!(matches!(result, Err(TaskError::Validation(_))));

        let result = create(&TaskList::new(), CreateTask::titled(""), "u-1", &clock);
        assert!(matches!(result, Err(TaskError::Validation(_))));
    }

    #[test]
    fn test_update_merges_patch_and_bumps_updated_at() {
        let clock = clock();
        let tasks = create(
            &TaskList::new(),
            CreateTask {
                title: "A".to_string(),
                description: "keep me".to_string(),
                priority: Some(TaskPriority::High),
                ..Default::default()
            },
            "u-1",
            &clock,
        )
        .unwrap();
        let original = tasks.outcome;

        clock.advance(Duration::seconds(30));
        let applied = update(
            &tasks.tasks,
            original.id,
            UpdateTask {
                title: Some("B".to_string()),
                ..Default::default()
            },
            &clock,
        )
        .unwrap();
        let updated = applied.outcome.unwrap();

        assert_eq!(updated.title, "B");
        assert_eq!(updated.description, "keep me");
        assert_eq!(updated.priority, TaskPriority::High);
        assert_eq!(updated.created_at, original.created_at);
        assert!(updated.updated_at > original.updated_at);
        // input snapshot is untouched
        assert_eq!(tasks.tasks.get(original.id).unwrap().title, "A");
    }

    #[test]
    fn test_update_missing_id_is_noop() {
        let clock = clock();
        let tasks = seeded(&clock, &["a"]);
        let applied = update(&tasks, Uuid::now_v7(), UpdateTask::default(), &clock).unwrap();
        assert!(applied.outcome.is_none());
        assert_eq!(applied.tasks, tasks);
    }

    #[test]
    fn test_update_rejects_blank_title_patch() {
        let clock = clock();
        let tasks = seeded(&clock, &["a"]);
        let id = tasks.iter().next().unwrap().id;
        let result = update(
            &tasks,
            id,
            UpdateTask {
                title: Some(" ".to_string()),
                ..Default::default()
            },
            &clock,
        );
        assert!(matches!(result, Err(TaskError::Validation(_))));
    }

    #[test]
    fn test_create_delete_then_update_leaves_empty_collection() {
        let clock = clock();
        let created = create(&TaskList::new(), CreateTask::titled("A"), "u-1", &clock).unwrap();
        let id = created.outcome.id;

        let deleted = delete(&created.tasks, id);
        assert!(deleted.outcome);

        let updated = update(
            &deleted.tasks,
            id,
            UpdateTask {
                title: Some("B".to_string()),
                ..Default::default()
            },
            &clock,
        )
        .unwrap();

        assert!(updated.outcome.is_none());
        assert!(updated.tasks.is_empty());
    }

    #[test]
    fn test_delete_missing_id_reports_false() {
        let clock = clock();
        let tasks = seeded(&clock, &["a"]);
        let applied = delete(&tasks, Uuid::now_v7());
        assert!(!applied.outcome);
        assert_eq!(applied.tasks.len(), 1);
    }

    #[test]
    fn test_advance_status_cycles_and_refreshes_timestamp() {
        let clock = clock();
        let mut tasks = seeded(&clock, &["a"]);
        let id = tasks.iter().next().unwrap().id;

        let mut seen = vec![];
        for _ in 0..3 {
            clock.advance(Duration::seconds(1));
            let applied = advance_status(&tasks, id, &clock);
            let task = applied.outcome.unwrap();
            assert_eq!(task.updated_at, clock.now());
            seen.push(task.status);
            tasks = applied.tasks;
        }

        assert_eq!(
            seen,
            vec![TaskStatus::InProgress, TaskStatus::Completed, TaskStatus::Todo]
        );
    }

    #[test]
    fn test_set_status_missing_id_is_noop() {
        let clock = clock();
        let tasks = seeded(&clock, &["a"]);
        let applied = set_status(&tasks, Uuid::now_v7(), TaskStatus::Completed, &clock);
        assert!(applied.outcome.is_none());
    }

    #[test]
    fn test_share_twice_keeps_single_entry() {
        let clock = clock();
        let tasks = seeded(&clock, &["a"]);
        let id = tasks.iter().next().unwrap().id;

        let first = share(&tasks, id, ["a@x.com"], &clock).unwrap();
        let shared = first.outcome.unwrap();
        assert_eq!(shared.added, vec!["a@x.com".to_string()]);

        let second = share(&first.tasks, id, ["a@x.com"], &clock).unwrap();
        let shared = second.outcome.unwrap();
        assert!(shared.added.is_empty());
        assert_eq!(shared.task.shared_with, vec!["a@x.com".to_string()]);
        assert!(Arc::ptr_eq(
            second.tasks.get(id).unwrap(),
            first.tasks.get(id).unwrap()
        ));
    }

    #[test]
    fn test_share_dedups_within_call_and_ignores_case() {
        let clock = clock();
        let tasks = seeded(&clock, &["a"]);
        let id = tasks.iter().next().unwrap().id;

        let applied = share(&tasks, id, [" b@x.com ", "B@X.com", "", "c@x.com"], &clock).unwrap();
        let shared = applied.outcome.unwrap();
        assert_eq!(shared.task.shared_with, vec!["b@x.com", "c@x.com"]);
        assert_eq!(shared.added.len(), 2);
    }

    #[test]
    fn test_share_rejects_invalid_email() {
        let clock = clock();
        let tasks = seeded(&clock, &["a"]);
        let id = tasks.iter().next().unwrap().id;

        let result = share(&tasks, id, ["not-an-email"], &clock);
        assert!(matches!(result, Err(TaskError::Validation(msg)) if msg.contains("not-an-email")));
    }

    #[test]
    fn test_share_missing_task_is_noop() {
        let clock = clock();
        let tasks = seeded(&clock, &["a"]);
        let applied = share(&tasks, Uuid::now_v7(), ["a@x.com"], &clock).unwrap();
        assert!(applied.outcome.is_none());
    }

    #[test]
    fn test_share_link_strips_trailing_slash() {
        let id = Uuid::nil();
        assert_eq!(
            share_link("https://tasks.example.com/", id),
            format!("https://tasks.example.com/task/{}", id)
        );
    }
}
