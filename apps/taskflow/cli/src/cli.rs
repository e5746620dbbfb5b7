//! Command-line surface.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Utc};
use clap::{Args, Parser, Subcommand};
use domain_tasks::{
    Clock, CreateTask, DueDateFilter, Selection, SystemClock, TaskFilter, TaskPriority,
    TaskStatus, UpdateTask,
};
use domain_users::AuthProvider;
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(name = "taskflow")]
#[command(about = "Manage a personal task list from the terminal")]
pub struct Cli {
    /// Signed-in user id. Omit to continue as guest.
    #[arg(short, long, global = true, env = "TASKFLOW_USER")]
    pub user: Option<String>,

    /// Identity provider the user id belongs to
    #[arg(long, global = true, default_value = "google")]
    pub provider: AuthProvider,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create a task
    Add(AddArgs),

    /// Change fields of an existing task
    Edit(EditArgs),

    /// Delete a task
    Rm { id: Uuid },

    /// Move a task to its next status (todo, in-progress, completed, todo, ...)
    Advance { id: Uuid },

    /// Set a task's status directly
    Status { id: Uuid, status: TaskStatus },

    /// Add collaborators by email and print the share link
    Share {
        id: Uuid,

        #[arg(required = true)]
        emails: Vec<String>,

        /// Base URL used to build the share link
        #[arg(long, env = "TASKFLOW_BASE_URL", default_value = "http://localhost:3000")]
        base_url: String,
    },

    /// List tasks matching the given criteria
    List(ListArgs),

    /// Show total, completed, in-progress and overdue counts
    Stats,

    /// Sign out and clear the local task list
    Logout,
}

#[derive(Debug, Args)]
pub struct AddArgs {
    pub title: String,

    #[arg(short, long, default_value = "")]
    pub description: String,

    #[arg(short, long)]
    pub priority: Option<TaskPriority>,

    #[arg(short, long)]
    pub status: Option<TaskStatus>,

    /// Due date as YYYY-MM-DD or RFC 3339
    #[arg(long, value_parser = parse_due)]
    pub due: Option<DateTime<Utc>>,

    #[arg(short, long = "tag")]
    pub tags: Vec<String>,
}

impl From<AddArgs> for CreateTask {
    fn from(args: AddArgs) -> Self {
        CreateTask {
            title: args.title,
            description: args.description,
            status: args.status,
            priority: args.priority,
            due_date: args.due,
            shared_with: Vec::new(),
            tags: args.tags,
        }
    }
}

#[derive(Debug, Args)]
pub struct EditArgs {
    pub id: Uuid,

    #[arg(short, long)]
    pub title: Option<String>,

    #[arg(short, long)]
    pub description: Option<String>,

    #[arg(short, long)]
    pub priority: Option<TaskPriority>,

    #[arg(short, long)]
    pub status: Option<TaskStatus>,

    /// Due date as YYYY-MM-DD or RFC 3339
    #[arg(long, value_parser = parse_due, conflicts_with = "clear_due")]
    pub due: Option<DateTime<Utc>>,

    /// Remove the due date
    #[arg(long)]
    pub clear_due: bool,

    /// Replace all tags
    #[arg(long = "tag")]
    pub tags: Option<Vec<String>>,
}

impl From<EditArgs> for UpdateTask {
    fn from(args: EditArgs) -> Self {
        let due_date = if args.clear_due {
            Some(None)
        } else {
            args.due.map(Some)
        };

        UpdateTask {
            title: args.title,
            description: args.description,
            status: args.status,
            priority: args.priority,
            due_date,
            tags: args.tags,
        }
    }
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Status or "all"
    #[arg(long, default_value = "all")]
    pub status: Selection<TaskStatus>,

    /// Priority or "all"
    #[arg(long, default_value = "all")]
    pub priority: Selection<TaskPriority>,

    /// all, today, overdue or upcoming
    #[arg(long, default_value = "all")]
    pub due: DueDateFilter,

    /// Case-insensitive text matched against title and description
    #[arg(long, default_value = "")]
    pub search: String,
}

impl From<ListArgs> for TaskFilter {
    fn from(args: ListArgs) -> Self {
        TaskFilter {
            status: args.status,
            priority: args.priority,
            due_date: args.due,
            search: args.search,
        }
    }
}

/// A bare date means local midnight of that day.
fn parse_due(raw: &str) -> Result<DateTime<Utc>, String> {
    parse_due_in(raw, SystemClock.local_offset())
}

fn parse_due_in(raw: &str, offset: FixedOffset) -> Result<DateTime<Utc>, String> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date
            .and_time(NaiveTime::MIN)
            .and_local_timezone(offset)
            .single()
            .map(|midnight| midnight.with_timezone(&Utc))
            .ok_or_else(|| format!("'{}' has no local midnight", raw));
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("expected YYYY-MM-DD or RFC 3339, got '{}': {}", raw, e))
}
