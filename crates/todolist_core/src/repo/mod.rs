//! Repository contracts and SQLite implementations.
//!
//! # Responsibility
//! - Keep SQL for `task_lists` and `tasks` behind use-case shaped traits.
//! - Report semantic errors (`ListNotFound`, `DuplicateRecord`, ...) next
//!   to transport errors.
//!
//! # Invariants
//! - Repositories operate on `&Connection`; multi-statement writes expect the
//!   caller to pass a transaction (it derefs to `Connection`).
//! - Read paths reject malformed persisted rows instead of masking them.

use crate::db::DbError;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub mod task_list_repo;
pub mod task_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Error returned by list/task persistence operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    ListNotFound(Uuid),
    TaskNotFound(Uuid),
    /// A record with this id is already persisted.
    DuplicateRecord(Uuid),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::ListNotFound(id) => write!(f, "task list not found: {id}"),
            Self::TaskNotFound(id) => write!(f, "task not found: {id}"),
            Self::DuplicateRecord(id) => write!(f, "record already persisted: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::ListNotFound(_)
            | Self::TaskNotFound(_)
            | Self::DuplicateRecord(_)
            | Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

fn parse_uuid(value: &str, column: &'static str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid `{value}` in {column}")))
}

fn parse_flag(value: i64, column: &'static str) -> RepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid flag value `{other}` in {column}"
        ))),
    }
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

fn row_exists(conn: &Connection, sql: &str, id: Uuid) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(sql, [id.to_string()], |row| row.get(0))?;
    Ok(exists == 1)
}

fn list_exists(conn: &Connection, id: Uuid) -> RepoResult<bool> {
    row_exists(
        conn,
        "SELECT EXISTS(SELECT 1 FROM task_lists WHERE uuid = ?1);",
        id,
    )
}

fn task_exists(conn: &Connection, id: Uuid) -> RepoResult<bool> {
    row_exists(
        conn,
        "SELECT EXISTS(SELECT 1 FROM tasks WHERE uuid = ?1);",
        id,
    )
}
