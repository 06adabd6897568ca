//! Record model for task lists and the tasks they own.
//!
//! # Responsibility
//! - Define the two persisted shapes and their default values.
//! - Keep ownership explicit: a `TaskList` holds its `Task`s in order.
//!
//! # Invariants
//! - Every record is identified by a stable, non-nil UUID.
//! - Timestamps are Unix epoch milliseconds.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};

pub mod task;
pub mod task_list;

/// Validation failure for caller-constructed records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelValidationError {
    /// A nil UUID cannot identify a persisted record.
    NilUuid,
}

impl Display for ModelValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilUuid => write!(f, "record uuid must not be nil"),
        }
    }
}

impl Error for ModelValidationError {}

/// Current wall-clock time in epoch milliseconds.
///
/// Clamps to 0 if the system clock is set before the Unix epoch.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
