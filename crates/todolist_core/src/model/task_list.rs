//! Named container owning an ordered collection of tasks.
//!
//! # Invariants
//! - `tasks` is kept in append order.
//! - Titles carry no uniqueness constraint.

use super::task::Task;
use super::{now_epoch_ms, ModelValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a task list.
pub type TaskListId = Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskList {
    pub uuid: TaskListId,
    pub title: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    pub tasks: Vec<Task>,
}

impl TaskList {
    /// Creates an empty list stamped with the current time.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            title: title.into(),
            created_at: now_epoch_ms(),
            tasks: Vec::new(),
        }
    }

    /// Restores an empty list with a known identity.
    pub fn with_id(
        uuid: TaskListId,
        title: impl Into<String>,
        created_at: i64,
    ) -> Result<Self, ModelValidationError> {
        if uuid.is_nil() {
            return Err(ModelValidationError::NilUuid);
        }
        Ok(Self {
            uuid,
            title: title.into(),
            created_at,
            tasks: Vec::new(),
        })
    }

    /// Tasks still open, in list order.
    pub fn current_tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(|task| !task.is_complete)
    }

    /// Finished tasks, in list order.
    pub fn completed_tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(|task| task.is_complete)
    }

    pub fn pending_count(&self) -> usize {
        self.current_tasks().count()
    }

    pub fn completed_count(&self) -> usize {
        self.completed_tasks().count()
    }

    /// Returns `true` when the list has tasks and all of them are complete.
    ///
    /// An empty list is never considered complete.
    pub fn is_complete(&self) -> bool {
        !self.tasks.is_empty() && self.tasks.iter().all(|task| task.is_complete)
    }
}

impl Default for TaskList {
    fn default() -> Self {
        Self::new("")
    }
}

#[cfg(test)]
mod tests {
    use super::TaskList;
    use crate::model::task::Task;

    fn list_with(states: &[bool]) -> TaskList {
        let mut list = TaskList::new("Chores");
        for (index, done) in states.iter().enumerate() {
            let mut task = Task::new(format!("task {index}"));
            task.is_complete = *done;
            list.tasks.push(task);
        }
        list
    }

    #[test]
    fn counts_split_by_completion() {
        let list = list_with(&[true, false, false]);
        assert_eq!(list.pending_count(), 2);
        assert_eq!(list.completed_count(), 1);
        assert_eq!(
            list.current_tasks()
                .map(|task| task.title.as_str())
                .collect::<Vec<_>>(),
            vec!["task 1", "task 2"]
        );
    }

    #[test]
    fn empty_list_is_not_complete() {
        assert!(!TaskList::default().is_complete());
        assert!(list_with(&[true, true]).is_complete());
        assert!(!list_with(&[true, false]).is_complete());
    }
}
