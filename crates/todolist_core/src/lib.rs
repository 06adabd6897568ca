//! Core of the to-do list app: task lists, their tasks, and the storage
//! session that persists them.
//! This crate is the single source of truth for list/task invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod prompt;
pub mod repo;
pub mod store;

pub use logging::{default_log_level, init_logging, logging_status, LogLevel};
pub use model::task::{Task, TaskId};
pub use model::task_list::{TaskList, TaskListId};
pub use model::{now_epoch_ms, ModelValidationError};
pub use prompt::{ActionOutcome, ActionStyle, Prompt, PromptBuilder, PromptError, TextField};
pub use repo::task_list_repo::{SqliteTaskListRepository, TaskListRepository};
pub use repo::task_repo::{SqliteTaskRepository, TaskRepository};
pub use repo::{RepoError, RepoResult};
pub use store::{LiveResults, Record, RecordKind, StoreError, StoreResult, TodoStore};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
