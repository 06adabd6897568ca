//! Storage gateway: the single access point for durable list/task state.
//!
//! # Responsibility
//! - Own the one SQLite connection of a session (`TodoStore`).
//! - Run every mutation as a scoped unit of work that commits or rolls back.
//! - Dispatch rename/remove/mark-done through the `Record` capability.
//!
//! # Invariants
//! - A failed write leaves both the database and the caller's snapshot
//!   untouched.
//! - Write failures are logged at the write boundary and returned.

use crate::db::DbError;
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod live;
mod record;
mod todo_store;

pub use live::LiveResults;
pub use record::{Record, RecordKind};
pub use todo_store::TodoStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Error surfaced by `TodoStore` operations.
#[derive(Debug)]
pub enum StoreError {
    /// Opening or bootstrapping the database failed.
    Db(DbError),
    /// A read failed, or a write failed and was rolled back.
    Repo(RepoError),
    /// A connection handed to `TodoStore::from_connection` was not migrated.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "store requires schema version {expected_version}, got {actual_version}"
            ),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::UninitializedConnection { .. } => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Repo(RepoError::from(value))
    }
}
