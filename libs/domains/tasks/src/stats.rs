use chrono::{DateTime, Utc};

use crate::models::{Task, TaskStats, TaskStatus};

/// Count tasks by category as of `now`.
///
/// `overdue` uses [`Task::is_overdue_at`], the same predicate as the
/// overdue due-date filter.
pub fn aggregate<'a, I>(tasks: I, now: DateTime<Utc>) -> TaskStats
where
    I: IntoIterator<Item = &'a Task>,
{
    tasks
        .into_iter()
        .fold(TaskStats::default(), |mut stats, task| {
            stats.total += 1;
            match task.status {
                TaskStatus::Completed => stats.completed += 1,
                TaskStatus::InProgress => stats.in_progress += 1,
                TaskStatus::Todo => {}
            }
            if task.is_overdue_at(now) {
                stats.overdue += 1;
            }
            stats
        })
}
