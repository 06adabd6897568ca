//! Task list repository contract and SQLite implementation.
//!
//! # Invariants
//! - Lists are returned in insertion order, each with its tasks loaded in
//!   append order.
//! - Deleting a list removes its tasks first; the foreign key rejects any
//!   attempt to leave orphans behind.

use super::task_repo::{insert_task_row, load_tasks_for_list};
use super::{list_exists, parse_uuid, task_exists, RepoError, RepoResult};
use crate::model::task_list::{TaskList, TaskListId};
use rusqlite::{params, Connection, Row};

const LIST_SELECT_SQL: &str = "SELECT
    uuid,
    title,
    created_at
FROM task_lists";

/// Repository interface for task list operations.
pub trait TaskListRepository {
    /// Inserts the list and every task it carries, preserving task order.
    ///
    /// Issues several statements; run it inside a transaction.
    fn insert_list(&self, list: &TaskList) -> RepoResult<()>;
    fn get_list(&self, id: TaskListId) -> RepoResult<Option<TaskList>>;
    /// Every list in insertion order, tasks included.
    fn list_all(&self) -> RepoResult<Vec<TaskList>>;
    fn rename_list(&self, id: TaskListId, title: &str) -> RepoResult<()>;
    /// Deletes owned tasks, then the list. Returns the number of tasks removed.
    fn delete_list_cascade(&self, id: TaskListId) -> RepoResult<usize>;
    /// Sets `is_complete = 1` on every owned task. Returns the number of tasks
    /// touched.
    fn complete_all_tasks(&self, id: TaskListId) -> RepoResult<usize>;
}

/// SQLite-backed task list repository.
pub struct SqliteTaskListRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskListRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn ensure_exists(&self, id: TaskListId) -> RepoResult<()> {
        if list_exists(self.conn, id)? {
            Ok(())
        } else {
            Err(RepoError::ListNotFound(id))
        }
    }
}

impl TaskListRepository for SqliteTaskListRepository<'_> {
    fn insert_list(&self, list: &TaskList) -> RepoResult<()> {
        if list_exists(self.conn, list.uuid)? {
            return Err(RepoError::DuplicateRecord(list.uuid));
        }

        self.conn.execute(
            "INSERT INTO task_lists (uuid, title, created_at) VALUES (?1, ?2, ?3);",
            params![list.uuid.to_string(), list.title.as_str(), list.created_at],
        )?;

        for (position, task) in list.tasks.iter().enumerate() {
            if task_exists(self.conn, task.uuid)? {
                return Err(RepoError::DuplicateRecord(task.uuid));
            }
            insert_task_row(self.conn, list.uuid, position as i64, task)?;
        }
        Ok(())
    }

    fn get_list(&self, id: TaskListId) -> RepoResult<Option<TaskList>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{LIST_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_list_row(self.conn, row)?));
        }
        Ok(None)
    }

    fn list_all(&self) -> RepoResult<Vec<TaskList>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{LIST_SELECT_SQL} ORDER BY rowid ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut lists = Vec::new();
        while let Some(row) = rows.next()? {
            lists.push(parse_list_row(self.conn, row)?);
        }
        Ok(lists)
    }

    fn rename_list(&self, id: TaskListId, title: &str) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE task_lists SET title = ?2 WHERE uuid = ?1;",
            params![id.to_string(), title],
        )?;
        if changed == 0 {
            return Err(RepoError::ListNotFound(id));
        }
        Ok(())
    }

    fn delete_list_cascade(&self, id: TaskListId) -> RepoResult<usize> {
        self.ensure_exists(id)?;
        let removed_tasks = self
            .conn
            .execute("DELETE FROM tasks WHERE list_uuid = ?1;", [id.to_string()])?;
        self.conn
            .execute("DELETE FROM task_lists WHERE uuid = ?1;", [id.to_string()])?;
        Ok(removed_tasks)
    }

    fn complete_all_tasks(&self, id: TaskListId) -> RepoResult<usize> {
        self.ensure_exists(id)?;
        let touched = self.conn.execute(
            "UPDATE tasks SET is_complete = 1 WHERE list_uuid = ?1;",
            [id.to_string()],
        )?;
        Ok(touched)
    }
}

fn parse_list_row(conn: &Connection, row: &Row<'_>) -> RepoResult<TaskList> {
    let uuid_text: String = row.get("uuid")?;
    let uuid = parse_uuid(&uuid_text, "task_lists.uuid")?;
    Ok(TaskList {
        uuid,
        title: row.get("title")?,
        created_at: row.get("created_at")?,
        tasks: load_tasks_for_list(conn, uuid)?,
    })
}
