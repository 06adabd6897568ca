//! Task repository contract and SQLite implementation.
//!
//! # Invariants
//! - Each task row references exactly one list (`tasks.list_uuid`).
//! - Within a list, `position` grows with every append; reads order by it.

use super::{
    bool_to_int, list_exists, parse_flag, parse_uuid, task_exists, RepoError, RepoResult,
};
use crate::model::task::{Task, TaskId};
use crate::model::task_list::TaskListId;
use rusqlite::{params, Connection, OptionalExtension, Row};

const TASK_SELECT_SQL: &str = "SELECT
    uuid,
    title,
    note,
    created_at,
    is_complete
FROM tasks";

/// Repository interface for task operations.
pub trait TaskRepository {
    /// Appends `task` to the end of the list's collection.
    ///
    /// Returns the position assigned to the task.
    fn append_task(&self, list_id: TaskListId, task: &Task) -> RepoResult<i64>;
    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>>;
    /// All tasks of every list, in insertion order.
    fn list_all(&self) -> RepoResult<Vec<Task>>;
    /// Tasks of one list, in append order.
    fn list_for_list(&self, list_id: TaskListId) -> RepoResult<Vec<Task>>;
    /// Replaces title and note.
    fn edit_task(&self, id: TaskId, title: &str, note: &str) -> RepoResult<()>;
    /// Flips `is_complete` and returns the new value.
    fn toggle_task(&self, id: TaskId) -> RepoResult<bool>;
    fn delete_task(&self, id: TaskId) -> RepoResult<()>;
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn append_task(&self, list_id: TaskListId, task: &Task) -> RepoResult<i64> {
        if !list_exists(self.conn, list_id)? {
            return Err(RepoError::ListNotFound(list_id));
        }
        if task_exists(self.conn, task.uuid)? {
            return Err(RepoError::DuplicateRecord(task.uuid));
        }

        let position = next_position(self.conn, list_id)?;
        insert_task_row(self.conn, list_id, position, task)?;
        Ok(position)
    }

    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_task_row(row)?));
        }
        Ok(None)
    }

    fn list_all(&self) -> RepoResult<Vec<Task>> {
        collect_tasks(
            self.conn,
            &format!("{TASK_SELECT_SQL} ORDER BY rowid ASC;"),
            None,
        )
    }

    fn list_for_list(&self, list_id: TaskListId) -> RepoResult<Vec<Task>> {
        load_tasks_for_list(self.conn, list_id)
    }

    fn edit_task(&self, id: TaskId, title: &str, note: &str) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE tasks SET title = ?2, note = ?3 WHERE uuid = ?1;",
            params![id.to_string(), title, note],
        )?;
        if changed == 0 {
            return Err(RepoError::TaskNotFound(id));
        }
        Ok(())
    }

    fn toggle_task(&self, id: TaskId) -> RepoResult<bool> {
        let current: Option<i64> = self
            .conn
            .query_row(
                "SELECT is_complete FROM tasks WHERE uuid = ?1;",
                [id.to_string()],
                |row| row.get(0),
            )
            .optional()?;
        let Some(current) = current else {
            return Err(RepoError::TaskNotFound(id));
        };

        let toggled = !parse_flag(current, "tasks.is_complete")?;
        self.conn.execute(
            "UPDATE tasks SET is_complete = ?2 WHERE uuid = ?1;",
            params![id.to_string(), bool_to_int(toggled)],
        )?;
        Ok(toggled)
    }

    fn delete_task(&self, id: TaskId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM tasks WHERE uuid = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::TaskNotFound(id));
        }
        Ok(())
    }
}

pub(crate) fn insert_task_row(
    conn: &Connection,
    list_id: TaskListId,
    position: i64,
    task: &Task,
) -> RepoResult<()> {
    conn.execute(
        "INSERT INTO tasks (
            uuid,
            list_uuid,
            position,
            title,
            note,
            created_at,
            is_complete
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
        params![
            task.uuid.to_string(),
            list_id.to_string(),
            position,
            task.title.as_str(),
            task.note.as_str(),
            task.created_at,
            bool_to_int(task.is_complete),
        ],
    )?;
    Ok(())
}

pub(crate) fn load_tasks_for_list(
    conn: &Connection,
    list_id: TaskListId,
) -> RepoResult<Vec<Task>> {
    collect_tasks(
        conn,
        &format!("{TASK_SELECT_SQL} WHERE list_uuid = ?1 ORDER BY position ASC, rowid ASC;"),
        Some(list_id),
    )
}

fn collect_tasks(
    conn: &Connection,
    sql: &str,
    list_id: Option<TaskListId>,
) -> RepoResult<Vec<Task>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = match list_id {
        Some(list_id) => stmt.query([list_id.to_string()])?,
        None => stmt.query([])?,
    };

    let mut tasks = Vec::new();
    while let Some(row) = rows.next()? {
        tasks.push(parse_task_row(row)?);
    }
    Ok(tasks)
}

fn next_position(conn: &Connection, list_id: TaskListId) -> RepoResult<i64> {
    let next = conn.query_row(
        "SELECT COALESCE(MAX(position), -1) + 1
         FROM tasks
         WHERE list_uuid = ?1;",
        [list_id.to_string()],
        |row| row.get(0),
    )?;
    Ok(next)
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let uuid_text: String = row.get("uuid")?;
    Ok(Task {
        uuid: parse_uuid(&uuid_text, "tasks.uuid")?,
        title: row.get("title")?,
        note: row.get("note")?,
        created_at: row.get("created_at")?,
        is_complete: parse_flag(row.get("is_complete")?, "tasks.is_complete")?,
    })
}
