//! Executes one parsed command against the task board.

use domain_tasks::{
    share_link, CreateTask, Task, TaskBoard, TaskError, TaskFilter, TaskResult, TaskStats,
    UpdateTask,
};
use domain_users::Session;
use std::io::Write;
use uuid::Uuid;

use crate::cli::Command;

pub fn run(
    board: &mut TaskBoard,
    session: &mut Session,
    command: Command,
    out: &mut dyn Write,
) -> eyre::Result<()> {
    match command {
        Command::Add(args) => {
            let created = settle(board.create(CreateTask::from(args)), out)?;
            // A failed save still leaves the task in the board; it was appended last.
            let task = created.or_else(|| board.tasks().iter().last().cloned());
            if let Some(task) = task {
                writeln!(out, "Created {}", task_line(&task))?;
            }
        }
        Command::Edit(args) => {
            let id = args.id;
            let patch = UpdateTask::from(args);
            if patch.is_empty() {
                writeln!(out, "Nothing to change")?;
                return Ok(());
            }
            let updated = settle(board.update(id, patch), out)?.flatten();
            report_changed(board, id, updated.as_deref(), out)?;
        }
        Command::Rm { id } => match settle(board.delete(id), out)? {
            Some(false) => writeln!(out, "No task {}", id)?,
            _ => writeln!(out, "Deleted {}", id)?,
        },
        Command::Advance { id } => {
            let updated = settle(board.advance_status(id), out)?.flatten();
            report_changed(board, id, updated.as_deref(), out)?;
        }
        Command::Status { id, status } => {
            let updated = settle(board.set_status(id, status), out)?.flatten();
            report_changed(board, id, updated.as_deref(), out)?;
        }
        Command::Share {
            id,
            emails,
            base_url,
        } => {
            let shared = settle(board.share(id, &emails), out)?.flatten();
            match (shared, board.get(id)) {
                (Some(shared), _) if shared.added.is_empty() => {
                    writeln!(out, "Already shared with everyone listed")?;
                }
                (Some(shared), _) => {
                    writeln!(out, "Shared with {}", shared.added.join(", "))?;
                }
                (None, None) => {
                    writeln!(out, "No task {}", id)?;
                    return Ok(());
                }
                (None, Some(_)) => {}
            }
            writeln!(out, "Link: {}", share_link(&base_url, id))?;
        }
        Command::List(args) => {
            let visible = board.visible(&TaskFilter::from(args));
            if visible.is_empty() {
                writeln!(out, "No tasks")?;
            }
            for task in visible {
                writeln!(out, "{}", task_line(&task))?;
            }
        }
        Command::Stats => {
            writeln!(out, "{}", stats_line(&board.stats()))?;
        }
        Command::Logout => {
            settle(board.sign_out(), out)?;
            match session.sign_out() {
                Some(user) => writeln!(out, "Signed out {}", user.name)?,
                None => writeln!(out, "Signed out")?,
            }
        }
    }

    Ok(())
}

/// A storage failure is a warning: the change was applied, only persistence failed.
fn settle<T>(result: TaskResult<T>, out: &mut dyn Write) -> eyre::Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(TaskError::Storage(msg)) => {
            tracing::warn!(error = %msg, "Change applied but not saved");
            writeln!(out, "warning: change applied but not saved: {}", msg)?;
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

fn report_changed(
    board: &TaskBoard,
    id: Uuid,
    updated: Option<&Task>,
    out: &mut dyn Write,
) -> eyre::Result<()> {
    let line = updated
        .map(task_line)
        .or_else(|| board.get(id).map(|task| task_line(&task)));
    match line {
        Some(line) => writeln!(out, "Updated {}", line)?,
        None => writeln!(out, "No task {}", id)?,
    }
    Ok(())
}

pub fn task_line(task: &Task) -> String {
    let mut line = format!(
        "{} [{}] ({}) {}",
        task.id, task.status, task.priority, task.title
    );
    if let Some(due) = task.due_date {
        line.push_str(&format!(" due {}", due.format("%Y-%m-%d %H:%M UTC")));
    }
    if !task.tags.is_empty() {
        line.push_str(&format!(" #{}", task.tags.join(" #")));
    }
    if !task.shared_with.is_empty() {
        line.push_str(&format!(" shared: {}", task.shared_with.join(", ")));
    }
    line
}

pub fn stats_line(stats: &TaskStats) -> String {
    format!(
        "total {}  completed {}  in progress {}  overdue {}",
        stats.total, stats.completed, stats.in_progress, stats.overdue
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{AddArgs, Cli};
    use chrono::{TimeZone, Utc};
    use clap::Parser;
    use domain_tasks::{FixedClock, InMemoryTaskStore, LogNotifier, TaskStatus, TaskStore};
    use std::sync::Arc;

    struct Harness {
        board: TaskBoard,
        session: Session,
        store: Arc<InMemoryTaskStore>,
    }

    impl Harness {
        fn new() -> Self {
            let store = Arc::new(InMemoryTaskStore::new());
            let clock = FixedClock::at(Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap());
            let board = TaskBoard::open(
                "u-1",
                store.clone(),
                Arc::new(clock),
                Arc::new(LogNotifier),
            );
            let mut session = Session::new();
            session.guest();
            Self {
                board,
                session,
                store,
            }
        }

        fn exec(&mut self, args: &[&str]) -> String {
            let cli = Cli::try_parse_from(std::iter::once("taskflow").chain(args.iter().copied()))
                .unwrap();
            let mut out: Vec<u8> = Vec::new();
            run(&mut self.board, &mut self.session, cli.command, &mut out).unwrap();
            String::from_utf8(out).unwrap()
        }

        fn add(&mut self, title: &str) -> Uuid {
            let args = AddArgs {
                title: title.to_string(),
                description: String::new(),
                priority: None,
                status: None,
                due: None,
                tags: Vec::new(),
            };
            let mut out: Vec<u8> = Vec::new();
            run(&mut self.board, &mut self.session, Command::Add(args), &mut out).unwrap();
            self.board.tasks().iter().last().unwrap().id
        }
    }

    #[test]
    fn test_add_then_list_and_stats() {
        let mut h = Harness::new();
        let output = h.exec(&["add", "Write report", "--priority", "high", "--tag", "work"]);
        assert!(output.starts_with("Created "));
        assert!(output.contains("[todo] (high) Write report #work"));

        assert!(h.exec(&["list"]).contains("Write report"));
        assert_eq!(h.exec(&["list", "--status", "completed"]), "No tasks\n");
        assert_eq!(
            h.exec(&["stats"]).trim(),
            "total 1  completed 0  in progress 0  overdue 0"
        );
        assert_eq!(h.store.snapshot().len(), 1);
    }

    #[test]
    fn test_advance_cycles_status() {
        let mut h = Harness::new();
        let id = h.add("Cycle");

        assert!(h.exec(&["advance", &id.to_string()]).contains("[in-progress]"));
        assert!(h.exec(&["advance", &id.to_string()]).contains("[completed]"));
        assert!(h.exec(&["advance", &id.to_string()]).contains("[todo]"));
    }

    #[test]
    fn test_unknown_id_is_reported_not_fatal() {
        let mut h = Harness::new();
        let missing = Uuid::now_v7().to_string();

        assert!(h.exec(&["rm", &missing]).starts_with("No task"));
        assert!(h.exec(&["status", &missing, "completed"]).starts_with("No task"));
        assert!(h.exec(&["share", &missing, "a@example.com"]).starts_with("No task"));
    }

    #[test]
    fn test_share_prints_added_and_link() {
        let mut h = Harness::new();
        let id = h.add("Plan trip");

        let output = h.exec(&[
            "share",
            &id.to_string(),
            "bob@example.com",
            "--base-url",
            "https://tasks.example.com/",
        ]);
        assert!(output.contains("Shared with bob@example.com"));
        assert!(output.contains(&format!("Link: https://tasks.example.com/task/{}", id)));

        let again = h.exec(&["share", &id.to_string(), "BOB@example.com"]);
        assert!(again.starts_with("Already shared"));
    }

    #[test]
    fn test_edit_and_logout_clear_state() {
        let mut h = Harness::new();
        let id = h.add("Draft");

        let output = h.exec(&["edit", &id.to_string(), "--title", "Final", "--status", "completed"]);
        assert!(output.contains("[completed]"));
        assert_eq!(h.board.get(id).unwrap().status, TaskStatus::Completed);

        assert_eq!(h.exec(&["logout"]), "Signed out Guest User\n");
        assert!(h.board.tasks().is_empty());
        assert!(h.store.load().unwrap().is_empty());
        assert!(!h.session.is_signed_in());
    }

    #[test]
    fn test_storage_failure_is_a_warning() {
        struct ReadOnlyStore;

        impl TaskStore for ReadOnlyStore {
            fn load(&self) -> TaskResult<Vec<Task>> {
                Ok(Vec::new())
            }

            fn save(&self, _tasks: &[Task]) -> TaskResult<()> {
                Err(TaskError::Storage("read-only file system".to_string()))
            }
        }

        let mut board = TaskBoard::open(
            "u-1",
            Arc::new(ReadOnlyStore),
            Arc::new(FixedClock::at(Utc::now())),
            Arc::new(LogNotifier),
        );
        let mut session = Session::new();
        let cli = Cli::try_parse_from(["taskflow", "add", "Unsaved"]).unwrap();
        let mut out: Vec<u8> = Vec::new();

        run(&mut board, &mut session, cli.command, &mut out).unwrap();

        let output = String::from_utf8(out).unwrap();
        assert!(output.starts_with("warning: change applied but not saved"));
        assert!(output.contains("Created "));
        assert_eq!(board.tasks().len(), 1);
    }

    #[test]
    fn test_file_store_survives_reopen() {
        use domain_tasks::{JsonFileStore, SystemClock};
        use test_utils::TempStoreDir;

        let dir = TempStoreDir::new();
        let open = || {
            TaskBoard::open(
                "u-1",
                Arc::new(JsonFileStore::new(dir.tasks_path())),
                Arc::new(SystemClock),
                Arc::new(LogNotifier),
            )
        };
        let mut session = Session::new();

        let mut first = open();
        let cli = Cli::try_parse_from(["taskflow", "add", "Persist me", "--tag", "disk"]).unwrap();
        run(&mut first, &mut session, cli.command, &mut std::io::sink()).unwrap();

        let mut second = open();
        let cli = Cli::try_parse_from(["taskflow", "list", "--search", "PERSIST"]).unwrap();
        let mut out: Vec<u8> = Vec::new();
        run(&mut second, &mut session, cli.command, &mut out).unwrap();

        assert!(String::from_utf8(out).unwrap().contains("Persist me #disk"));
    }

    #[test]
    fn test_users_sharing_a_file_only_see_their_own_tasks() {
        use domain_tasks::{JsonFileStore, SystemClock};
        use test_utils::TempStoreDir;

        let dir = TempStoreDir::new();
        let open = |user: &str| {
            TaskBoard::open(
                user,
                Arc::new(JsonFileStore::new(dir.tasks_path())),
                Arc::new(SystemClock),
                Arc::new(LogNotifier),
            )
        };
        let exec = |board: &mut TaskBoard, args: &[&str]| {
            let cli = Cli::try_parse_from(std::iter::once("taskflow").chain(args.iter().copied()))
                .unwrap();
            let mut out: Vec<u8> = Vec::new();
            run(board, &mut Session::new(), cli.command, &mut out).unwrap();
            String::from_utf8(out).unwrap()
        };

        let mut bob = open("bob");
        exec(&mut bob, &["add", "bob private"]);

        let mut alice = open("alice");
        assert_eq!(exec(&mut alice, &["list"]), "No tasks\n");
        assert!(exec(&mut alice, &["stats"]).starts_with("total 0 "));
        exec(&mut alice, &["add", "alice own"]);
        exec(&mut alice, &["logout"]);

        let store = JsonFileStore::new(dir.tasks_path());
        let left = store.load().unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].title, "bob private");
        assert!(exec(&mut open("bob"), &["list"]).contains("bob private"));
    }
}
