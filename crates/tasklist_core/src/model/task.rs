//! Task domain model.
//!
//! # Responsibility
//! - Define the task record returned by every store operation.
//! - Provide title normalization used before create requests.
//!
//! # Invariants
//! - `id` and `created_at` are assigned by the store and never change.
//! - `title` is immutable after creation; only `completed` is toggled.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Store-assigned stable identifier for a task.
pub type TaskId = Uuid;

/// One entry of the task list, exactly as confirmed by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Opaque id assigned by the store on create.
    pub id: TaskId,
    /// Trimmed, non-empty title.
    pub title: String,
    /// Completion flag, `false` at creation.
    pub completed: bool,
    /// Unix epoch milliseconds assigned by the store. Defines list order.
    pub created_at: i64,
}

impl Task {
    /// Validates the persisted shape of this task.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.title.trim().is_empty() {
            return Err(TaskValidationError::EmptyTitle);
        }
        if self.title.trim().len() != self.title.len() {
            return Err(TaskValidationError::UntrimmedTitle);
        }
        Ok(())
    }
}

/// Requested field changes for an existing task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskUpdate {
    pub completed: bool,
}

/// Validation failures for task input and persisted rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskValidationError {
    EmptyTitle,
    UntrimmedTitle,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "task title cannot be empty"),
            Self::UntrimmedTitle => {
                write!(f, "task title must not carry surrounding whitespace")
            }
        }
    }
}

impl Error for TaskValidationError {}

/// Trims raw title input.
///
/// Returns `None` when nothing is left after trimming, which callers treat
/// as "no request".
pub fn normalize_title(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

/// Completion counts over a task list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskSummary {
    pub completed: usize,
    pub total: usize,
}

impl TaskSummary {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        Self {
            completed: tasks.iter().filter(|task| task.completed).count(),
            total: tasks.len(),
        }
    }

    /// Completed share in whole percent, `0` for an empty list.
    pub fn progress_percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        // completed <= total, so the quotient never exceeds 100.
        u8::try_from(self.completed * 100 / self.total).unwrap_or(100)
    }
}

impl Display for TaskSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.total == 0 {
            write!(f, "Start adding tasks")
        } else {
            write!(f, "{} out of {} completed", self.completed, self.total)
        }
    }
}
