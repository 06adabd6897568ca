//! Closed record capability shared by `TaskList` and `Task`.
//!
//! The gateway never inspects concrete types; each record kind supplies its
//! own rename/mark-done/remove behavior. The trait is sealed, so the set of
//! kinds stays exactly {TaskList, Task}.

use crate::model::task::Task;
use crate::model::task_list::TaskList;
use crate::repo::task_list_repo::{SqliteTaskListRepository, TaskListRepository};
use crate::repo::task_repo::{SqliteTaskRepository, TaskRepository};
use crate::repo::RepoResult;
use rusqlite::{Connection, Transaction};
use uuid::Uuid;

mod sealed {
    pub trait Sealed {}

    impl Sealed for crate::model::task_list::TaskList {}
    impl Sealed for crate::model::task::Task {}
}

/// Record kind label used in logs and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    TaskList,
    Task,
}

impl RecordKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TaskList => "task_list",
            Self::Task => "task",
        }
    }
}

/// Persisted record behavior dispatched by `TodoStore`.
///
/// Mutating methods write through the given transaction and then update
/// `self`; callers apply them to a staged copy and keep it only after commit.
pub trait Record: sealed::Sealed + Clone {
    const KIND: RecordKind;

    fn record_id(&self) -> Uuid;

    /// Loads every persisted record of this kind in insertion order.
    fn load_all(conn: &Connection) -> RepoResult<Vec<Self>>;

    /// Replaces the user-editable text.
    ///
    /// Lists take the title only. Tasks take title and note; a missing note
    /// clears it.
    fn rename(
        &mut self,
        tx: &Transaction<'_>,
        title: &str,
        note: Option<&str>,
    ) -> RepoResult<()>;

    /// Lists: marks every owned task complete (bulk set, never clears).
    /// Tasks: flips the completion flag.
    fn mark_done(&mut self, tx: &Transaction<'_>) -> RepoResult<()>;

    /// Lists: removes owned tasks, then the list. Tasks: removes the task.
    fn remove(&self, tx: &Transaction<'_>) -> RepoResult<()>;
}

impl Record for TaskList {
    const KIND: RecordKind = RecordKind::TaskList;

    fn record_id(&self) -> Uuid {
        self.uuid
    }

    fn load_all(conn: &Connection) -> RepoResult<Vec<Self>> {
        SqliteTaskListRepository::new(conn).list_all()
    }

    fn rename(
        &mut self,
        tx: &Transaction<'_>,
        title: &str,
        _note: Option<&str>,
    ) -> RepoResult<()> {
        SqliteTaskListRepository::new(tx).rename_list(self.uuid, title)?;
        self.title = title.to_string();
        Ok(())
    }

    fn mark_done(&mut self, tx: &Transaction<'_>) -> RepoResult<()> {
        SqliteTaskListRepository::new(tx).complete_all_tasks(self.uuid)?;
        // Refresh from storage so tasks appended through other snapshots show up.
        self.tasks = SqliteTaskRepository::new(tx).list_for_list(self.uuid)?;
        Ok(())
    }

    fn remove(&self, tx: &Transaction<'_>) -> RepoResult<()> {
        SqliteTaskListRepository::new(tx).delete_list_cascade(self.uuid)?;
        Ok(())
    }
}

impl Record for Task {
    const KIND: RecordKind = RecordKind::Task;

    fn record_id(&self) -> Uuid {
        self.uuid
    }

    fn load_all(conn: &Connection) -> RepoResult<Vec<Self>> {
        SqliteTaskRepository::new(conn).list_all()
    }

    fn rename(
        &mut self,
        tx: &Transaction<'_>,
        title: &str,
        note: Option<&str>,
    ) -> RepoResult<()> {
        let note = note.unwrap_or_default();
        SqliteTaskRepository::new(tx).edit_task(self.uuid, title, note)?;
        self.title = title.to_string();
        self.note = note.to_string();
        Ok(())
    }

    fn mark_done(&mut self, tx: &Transaction<'_>) -> RepoResult<()> {
        self.is_complete = SqliteTaskRepository::new(tx).toggle_task(self.uuid)?;
        Ok(())
    }

    fn remove(&self, tx: &Transaction<'_>) -> RepoResult<()> {
        SqliteTaskRepository::new(tx).delete_task(self.uuid)
    }
}
