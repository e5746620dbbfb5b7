//! Tasks Domain
//!
//! Task state and view derivation for a single user's task collection.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐       ┌──────────────┐
//! │  TaskBoard  │       │ TaskService  │  ← remote API (validation, HTTP errors)
//! └──────┬──────┘       └──────┬───────┘
//!        │                     │
//! ┌──────▼─────────────────────▼──────┐
//! │ mutations · filter · stats        │  ← pure functions over a TaskList
//! └──────┬────────────────────────────┘
//!        │
//! ┌──────▼──────┐
//! │  TaskStore  │  ← whole-collection load/save (JSON file, in-memory)
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use domain_tasks::{
//!     CreateTask, DueDateFilter, JsonFileStore, LogNotifier, SystemClock, TaskBoard, TaskFilter,
//! };
//!
//! # fn example() -> Result<(), domain_tasks::TaskError> {
//! let mut board = TaskBoard::open(
//!     "guest",
//!     Arc::new(JsonFileStore::new("data/tasks.json")),
//!     Arc::new(SystemClock),
//!     Arc::new(LogNotifier),
//! );
//!
//! let task = board.create(CreateTask::titled("Water the plants"))?;
//! board.advance_status(task.id)?;
//!
//! let overdue = board.visible(&TaskFilter::default().due(DueDateFilter::Overdue));
//! println!("{} overdue, {:?}", overdue.len(), board.stats());
//! # Ok(())
//! # }
//! ```

pub mod board;
pub mod clock;
pub mod error;
pub mod filter;
pub mod handlers;
pub mod list;
pub mod models;
pub mod mutations;
pub mod notify;
pub mod repository;
pub mod service;
pub mod stats;
pub mod store;

// Re-export commonly used types
pub use board::TaskBoard;
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{TaskError, TaskResult};
pub use filter::{filter_tasks, DueDateFilter, Selection, TaskFilter};
pub use handlers::ApiDoc;
pub use list::TaskList;
pub use models::{
    CreateTask, CreateTaskRequest, SuccessResponse, Task, TaskPriority, TaskQuery, TaskStats,
    TaskStatus, UpdateTask,
};
pub use mutations::{share_link, Applied, Shared};
pub use notify::{LogNotifier, ShareNotifier};
pub use repository::{StoreTaskRepository, TaskRepository};
pub use service::TaskService;
pub use stats::aggregate;
pub use store::{load_or_empty, InMemoryTaskStore, JsonFileStore, TaskStore};
