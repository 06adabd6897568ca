//! Single actionable record with a completion flag.

use super::{now_epoch_ms, ModelValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a task.
pub type TaskId = Uuid;

/// One to-do entry owned by exactly one `TaskList` once persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub uuid: TaskId,
    pub title: String,
    /// Free-form detail text, empty when the user left it blank.
    pub note: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    pub is_complete: bool,
}

impl Task {
    /// Creates an incomplete task with an empty note, stamped with the
    /// current time.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            title: title.into(),
            note: String::new(),
            created_at: now_epoch_ms(),
            is_complete: false,
        }
    }

    /// Restores a task with a known identity, e.g. from an import.
    pub fn with_id(
        uuid: TaskId,
        title: impl Into<String>,
        note: impl Into<String>,
        created_at: i64,
    ) -> Result<Self, ModelValidationError> {
        if uuid.is_nil() {
            return Err(ModelValidationError::NilUuid);
        }
        Ok(Self {
            uuid,
            title: title.into(),
            note: note.into(),
            created_at,
            is_complete: false,
        })
    }

    /// Sets the note, consuming and returning the task.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }
}
