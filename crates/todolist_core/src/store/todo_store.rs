//! Session object owning the database connection.
//!
//! # Invariants
//! - Exactly one connection per store; every write runs inside one
//!   IMMEDIATE transaction opened by `write`.
//! - Caller-held snapshots change only after a successful commit.
//! - Titles and notes are never written to logs.

use super::live::LiveResults;
use super::record::{Record, RecordKind};
use super::{StoreError, StoreResult};
use crate::db::migrations::{current_user_version, latest_version};
use crate::db::{open_db, open_db_in_memory};
use crate::model::task::{Task, TaskId};
use crate::model::task_list::{TaskList, TaskListId};
use crate::repo::task_list_repo::{SqliteTaskListRepository, TaskListRepository};
use crate::repo::task_repo::{SqliteTaskRepository, TaskRepository};
use crate::repo::RepoResult;
use log::{error, info};
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::path::Path;
use std::time::Instant;

/// Storage session for task lists and tasks.
///
/// Construct once at start-up and hand out by reference. The connection is
/// not `Sync`; use the store from one thread at a time.
pub struct TodoStore {
    conn: Connection,
}

impl TodoStore {
    /// Opens (or creates) the database file at `path`.
    ///
    /// # Errors
    /// - `StoreError::Db` when the file cannot be opened or migrated. The app
    ///   shell should treat this as a fatal start-up fault.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Ok(Self {
            conn: open_db(path)?,
        })
    }

    /// Opens a private in-memory store, e.g. one per test.
    pub fn open_in_memory() -> StoreResult<Self> {
        Ok(Self {
            conn: open_db_in_memory()?,
        })
    }

    /// Wraps an already-migrated connection.
    ///
    /// # Errors
    /// - `StoreError::UninitializedConnection` when the schema version does not
    ///   match this build.
    pub fn from_connection(conn: Connection) -> StoreResult<Self> {
        let expected_version = latest_version();
        let actual_version = current_user_version(&conn)?;
        if actual_version != expected_version {
            return Err(StoreError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }
        Ok(Self { conn })
    }

    /// Underlying connection, for read-only diagnostics.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Returns a live view over every persisted record of kind `R`.
    pub fn fetch_all<R: Record>(&self) -> LiveResults<'_, R> {
        LiveResults::new(self)
    }

    /// Looks up one list by id, tasks included.
    pub fn find_list(&self, id: TaskListId) -> StoreResult<Option<TaskList>> {
        Ok(SqliteTaskListRepository::new(&self.conn).get_list(id)?)
    }

    /// Looks up one task by id.
    pub fn find_task(&self, id: TaskId) -> StoreResult<Option<Task>> {
        Ok(SqliteTaskRepository::new(&self.conn).get_task(id)?)
    }

    /// Persists a batch of lists, and the tasks they carry, atomically.
    ///
    /// Either every list is stored or none is.
    pub fn save_lists(&self, lists: &[TaskList]) -> StoreResult<()> {
        self.write("save_lists", RecordKind::TaskList, |tx| {
            let repo = SqliteTaskListRepository::new(tx);
            for list in lists {
                repo.insert_list(list)?;
            }
            Ok(())
        })
    }

    /// Creates and persists a list with only its title set.
    ///
    /// `completion` receives the durable list after commit and before this
    /// function returns. It is not called when the write fails.
    pub fn save_new_list<F>(
        &self,
        title: impl Into<String>,
        completion: F,
    ) -> StoreResult<TaskList>
    where
        F: FnOnce(&TaskList),
    {
        let list = TaskList::new(title);
        self.write("save_new_list", RecordKind::TaskList, |tx| {
            SqliteTaskListRepository::new(tx).insert_list(&list)
        })?;
        completion(&list);
        Ok(list)
    }

    /// Appends `task` to the end of `list` and persists it.
    ///
    /// On success `list.tasks` gains a copy of the task.
    ///
    /// # Errors
    /// - `RepoError::DuplicateRecord` when the task is already stored, since a
    ///   task can belong to only one list.
    /// - `RepoError::ListNotFound` when `list` was never saved or was deleted.
    pub fn save_task(&self, task: &Task, list: &mut TaskList) -> StoreResult<()> {
        let list_id = list.uuid;
        self.write("save_task", RecordKind::Task, |tx| {
            SqliteTaskRepository::new(tx).append_task(list_id, task)
        })?;
        list.tasks.push(task.clone());
        Ok(())
    }

    /// Renames a record. Lists ignore `note`; tasks clear it when `None`.
    pub fn edit<R: Record>(
        &self,
        record: &mut R,
        title: &str,
        note: Option<&str>,
    ) -> StoreResult<()> {
        let mut staged = record.clone();
        self.write("edit", R::KIND, |tx| staged.rename(tx, title, note))?;
        *record = staged;
        Ok(())
    }

    /// Deletes a record. Deleting a list deletes its tasks first.
    pub fn delete<R: Record>(&self, record: R) -> StoreResult<()> {
        self.write("delete", R::KIND, |tx| record.remove(tx))
    }

    /// Lists: marks every owned task complete. Tasks: flips completion.
    pub fn toggle_done<R: Record>(&self, record: &mut R) -> StoreResult<()> {
        let mut staged = record.clone();
        self.write("toggle_done", R::KIND, |tx| staged.mark_done(tx))?;
        *record = staged;
        Ok(())
    }

    /// Runs `unit_of_work` in one IMMEDIATE transaction.
    ///
    /// Commits when the unit returns `Ok`; any error (or commit failure)
    /// rolls back, because the transaction is dropped uncommitted.
    fn write<T>(
        &self,
        operation: &'static str,
        kind: RecordKind,
        unit_of_work: impl FnOnce(&Transaction<'_>) -> RepoResult<T>,
    ) -> StoreResult<T> {
        let started_at = Instant::now();
        let outcome = Transaction::new_unchecked(&self.conn, TransactionBehavior::Immediate)
            .map_err(StoreError::from)
            .and_then(|tx| {
                let value = unit_of_work(&tx)?;
                tx.commit()?;
                Ok(value)
            });

        match &outcome {
            Ok(_) => info!(
                "event=store_write module=store status=ok op={} kind={} duration_ms={}",
                operation,
                kind.as_str(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=store_write module=store status=error op={} kind={} duration_ms={} error={}",
                operation,
                kind.as_str(),
                started_at.elapsed().as_millis(),
                err
            ),
        }
        outcome
    }
}
