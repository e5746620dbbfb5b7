//! View derivation: which tasks a dashboard shows for a set of criteria.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use strum::{Display, EnumIter, EnumString};

use crate::clock::Clock;
use crate::list::TaskList;
use crate::models::{Task, TaskPriority, TaskStatus};

/// Either every value (`"all"`) or exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Selection<T> {
    #[default]
    All,
    Only(T),
}

impl<T: PartialEq> Selection<T> {
    pub fn admits(&self, value: &T) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(wanted) => wanted == value,
        }
    }
}

impl<T> FromStr for Selection<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(Selection::All);
        }
        s.parse::<T>()
            .map(Selection::Only)
            .map_err(|e| format!("invalid value '{}': {}", s, e))
    }
}

impl<T: fmt::Display> fmt::Display for Selection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::All => f.write_str("all"),
            Selection::Only(value) => value.fmt(f),
        }
    }
}

/// Due-date window.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum DueDateFilter {
    #[default]
    All,
    /// Due on the current local calendar day
    Today,
    /// Due before now and not completed
    Overdue,
    /// Due on or after the start of tomorrow
    Upcoming,
}

/// Filter criteria. The default admits every task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub status: Selection<TaskStatus>,
    pub priority: Selection<TaskPriority>,
    pub due_date: DueDateFilter,
    pub search: String,
}

impl TaskFilter {
    pub fn status(mut self, status: TaskStatus) -> Self {
        self.status = Selection::Only(status);
        self
    }

    pub fn priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Selection::Only(priority);
        self
    }

    pub fn due(mut self, due_date: DueDateFilter) -> Self {
        self.due_date = due_date;
        self
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    /// Whether `task` passes every active predicate.
    pub fn matches(&self, task: &Task, clock: &dyn Clock) -> bool {
        self.matcher(clock).matches(task)
    }

    fn matcher(&self, clock: &dyn Clock) -> Matcher<'_> {
        Matcher {
            filter: self,
            needle: self.search.trim().to_lowercase(),
            now: clock.now(),
            today: clock.today(),
            start_of_tomorrow: clock.start_of_tomorrow(),
            offset: clock.local_offset(),
        }
    }
}

/// Criteria with "now" and the search needle resolved once per pass.
struct Matcher<'a> {
    filter: &'a TaskFilter,
    needle: String,
    now: DateTime<Utc>,
    today: NaiveDate,
    start_of_tomorrow: DateTime<Utc>,
    offset: chrono::FixedOffset,
}

impl Matcher<'_> {
    fn matches(&self, task: &Task) -> bool {
        self.filter.status.admits(&task.status)
            && self.filter.priority.admits(&task.priority)
            && self.matches_search(task)
            && self.matches_due_date(task)
    }

    fn matches_search(&self, task: &Task) -> bool {
        self.needle.is_empty()
            || task.title.to_lowercase().contains(&self.needle)
            || task.description.to_lowercase().contains(&self.needle)
    }

    fn matches_due_date(&self, task: &Task) -> bool {
        if self.filter.due_date == DueDateFilter::All {
            return true;
        }
        let Some(due) = task.due_date else {
            return false;
        };
        match self.filter.due_date {
            DueDateFilter::All => true,
            DueDateFilter::Today => due.with_timezone(&self.offset).date_naive() == self.today,
            DueDateFilter::Overdue => task.is_overdue_at(self.now),
            DueDateFilter::Upcoming => due >= self.start_of_tomorrow,
        }
    }
}

/// Tasks passing `filter`, in collection order.
pub fn filter_tasks(tasks: &TaskList, filter: &TaskFilter, clock: &dyn Clock) -> Vec<Arc<Task>> {
    let matcher = filter.matcher(clock);
    tasks
        .iter()
        .filter(|task| matcher.matches(task))
        .cloned()
        .collect()
}
