//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose list/task use cases to Dart via FRB as sync calls.
//! - Translate core errors into simple, stable response envelopes.
//!
//! # Invariants
//! - Exported functions never panic across the FFI boundary.
//! - Records are addressed by their UUID in string form.
//! - Each call opens its own `TodoStore` session on the configured path.

use std::path::PathBuf;
use std::sync::OnceLock;
use todolist_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, StoreError, Task,
    TaskList, TodoStore,
};
use uuid::Uuid;

const DB_FILE_NAME: &str = "todolist.sqlite3";
const DB_PATH_ENV: &str = "TODOLIST_DB_PATH";
static DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking. Never throws.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same arguments.
/// - Returns empty string on success and an error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Task list row for the lists screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskListItem {
    pub list_id: String,
    pub title: String,
    pub created_at_ms: i64,
    pub task_count: u32,
    /// Tasks not yet complete; the UI shows a checkmark when this is 0.
    pub pending_count: u32,
}

/// Task row for the tasks screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    pub task_id: String,
    pub title: String,
    pub note: String,
    pub created_at_ms: i64,
    pub is_complete: bool,
}

/// Response envelope for list queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskListsResponse {
    pub ok: bool,
    pub items: Vec<TaskListItem>,
    pub message: String,
}

/// Response envelope for task queries of one list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TasksResponse {
    pub ok: bool,
    /// Open tasks in list order.
    pub current: Vec<TaskItem>,
    /// Completed tasks in list order.
    pub completed: Vec<TaskItem>,
    pub message: String,
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    pub ok: bool,
    /// Id of the created or affected record.
    pub record_id: Option<String>,
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>, record_id: Uuid) -> Self {
        Self {
            ok: true,
            record_id: Some(record_id.to_string()),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            record_id: None,
            message: message.into(),
        }
    }

    fn from_result(operation: &str, success: &str, result: Result<Uuid, String>) -> Self {
        match result {
            Ok(record_id) => Self::success(success, record_id),
            Err(err) => Self::failure(format!("{operation} failed: {err}")),
        }
    }
}

/// Lists every task list in creation order.
#[flutter_rust_bridge::frb(sync)]
pub fn task_lists_list() -> TaskListsResponse {
    let result = with_store(|store| {
        let lists = store.fetch_all::<TaskList>().snapshot()?;
        Ok(lists.iter().map(to_task_list_item).collect::<Vec<_>>())
    });
    match result {
        Ok(items) => {
            let message = format!("Found {} list(s).", items.len());
            TaskListsResponse {
                ok: true,
                items,
                message,
            }
        }
        Err(err) => TaskListsResponse {
            ok: false,
            items: Vec::new(),
            message: format!("task_lists_list failed: {err}"),
        },
    }
}

/// Creates a task list with the given title.
#[flutter_rust_bridge::frb(sync)]
pub fn task_list_create(title: String) -> ActionResponse {
    let result = with_store(|store| {
        let list = store.save_new_list(title.trim(), |_| {})?;
        Ok(list.uuid)
    });
    ActionResponse::from_result("task_list_create", "List created.", result)
}

/// Renames a task list.
#[flutter_rust_bridge::frb(sync)]
pub fn task_list_rename(list_id: String, title: String) -> ActionResponse {
    let result = with_list(&list_id, |store, mut list| {
        store.edit(&mut list, title.trim(), None)?;
        Ok(list.uuid)
    });
    ActionResponse::from_result("task_list_rename", "List renamed.", result)
}

/// Marks every task of a list complete.
#[flutter_rust_bridge::frb(sync)]
pub fn task_list_complete_all(list_id: String) -> ActionResponse {
    let result = with_list(&list_id, |store, mut list| {
        store.toggle_done(&mut list)?;
        Ok(list.uuid)
    });
    ActionResponse::from_result("task_list_complete_all", "List completed.", result)
}

/// Deletes a task list together with its tasks.
#[flutter_rust_bridge::frb(sync)]
pub fn task_list_delete(list_id: String) -> ActionResponse {
    let result = with_list(&list_id, |store, list| {
        let id = list.uuid;
        store.delete(list)?;
        Ok(id)
    });
    ActionResponse::from_result("task_list_delete", "List deleted.", result)
}

/// Loads the tasks of one list, split into current and completed sections.
#[flutter_rust_bridge::frb(sync)]
pub fn tasks_list(list_id: String) -> TasksResponse {
    let result = with_list(&list_id, |_, list| Ok(list));
    match result {
        Ok(list) => TasksResponse {
            ok: true,
            current: list.current_tasks().map(to_task_item).collect(),
            completed: list.completed_tasks().map(to_task_item).collect(),
            message: format!("Found {} task(s).", list.tasks.len()),
        },
        Err(err) => TasksResponse {
            ok: false,
            current: Vec::new(),
            completed: Vec::new(),
            message: format!("tasks_list failed: {err}"),
        },
    }
}

/// Appends a new task to a list. Blank notes are stored as empty.
#[flutter_rust_bridge::frb(sync)]
pub fn task_add(list_id: String, title: String, note: Option<String>) -> ActionResponse {
    let result = with_list(&list_id, |store, mut list| {
        let task = Task::new(title.trim()).with_note(note.as_deref().unwrap_or_default().trim());
        store.save_task(&task, &mut list)?;
        Ok(task.uuid)
    });
    ActionResponse::from_result("task_add", "Task added.", result)
}

/// Replaces title and note of a task. A missing note clears it.
#[flutter_rust_bridge::frb(sync)]
pub fn task_edit(task_id: String, title: String, note: Option<String>) -> ActionResponse {
    let result = with_task(&task_id, |store, mut task| {
        store.edit(&mut task, title.trim(), note.as_deref().map(str::trim))?;
        Ok(task.uuid)
    });
    ActionResponse::from_result("task_edit", "Task updated.", result)
}

/// Flips the completion flag of a task.
#[flutter_rust_bridge::frb(sync)]
pub fn task_toggle(task_id: String) -> ActionResponse {
    let result = with_task(&task_id, |store, mut task| {
        store.toggle_done(&mut task)?;
        Ok(task.uuid)
    });
    ActionResponse::from_result("task_toggle", "Task toggled.", result)
}

/// Deletes a single task.
#[flutter_rust_bridge::frb(sync)]
pub fn task_delete(task_id: String) -> ActionResponse {
    let result = with_task(&task_id, |store, task| {
        let id = task.uuid;
        store.delete(task)?;
        Ok(id)
    });
    ActionResponse::from_result("task_delete", "Task deleted.", result)
}

fn resolve_db_path() -> PathBuf {
    DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(DB_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(DB_FILE_NAME)
        })
        .clone()
}

fn open_store() -> Result<TodoStore, String> {
    TodoStore::open(resolve_db_path()).map_err(|err| {
        log::error!("event=store_open module=ffi status=error error={err}");
        format!("store open failed: {err}")
    })
}

fn with_store<T>(f: impl FnOnce(&TodoStore) -> Result<T, StoreError>) -> Result<T, String> {
    let store = open_store()?;
    f(&store).map_err(|err| err.to_string())
}

fn with_list<T>(
    list_id: &str,
    f: impl FnOnce(&TodoStore, TaskList) -> Result<T, StoreError>,
) -> Result<T, String> {
    let id = parse_id(list_id)?;
    let store = open_store()?;
    let list = store
        .find_list(id)
        .map_err(|err| err.to_string())?
        .ok_or_else(|| format!("task list not found: {id}"))?;
    f(&store, list).map_err(|err| err.to_string())
}

fn with_task<T>(
    task_id: &str,
    f: impl FnOnce(&TodoStore, Task) -> Result<T, StoreError>,
) -> Result<T, String> {
    let id = parse_id(task_id)?;
    let store = open_store()?;
    let task = store
        .find_task(id)
        .map_err(|err| err.to_string())?
        .ok_or_else(|| format!("task not found: {id}"))?;
    f(&store, task).map_err(|err| err.to_string())
}

fn parse_id(value: &str) -> Result<Uuid, String> {
    Uuid::parse_str(value.trim()).map_err(|_| format!("invalid id `{}`", value.trim()))
}

fn saturating_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

fn to_task_list_item(list: &TaskList) -> TaskListItem {
    TaskListItem {
        list_id: list.uuid.to_string(),
        title: list.title.clone(),
        created_at_ms: list.created_at,
        task_count: saturating_u32(list.tasks.len()),
        pending_count: saturating_u32(list.pending_count()),
    }
}

fn to_task_item(task: &Task) -> TaskItem {
    TaskItem {
        task_id: task.uuid.to_string(),
        title: task.title.clone(),
        note: task.note.clone(),
        created_at_ms: task.created_at,
        is_complete: task.is_complete,
    }
}
