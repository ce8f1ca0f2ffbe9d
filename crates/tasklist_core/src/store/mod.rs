//! Task store contract and implementations.
//!
//! # Responsibility
//! - Define the async contract the synchronizer talks to.
//! - Provide persistent (SQLite) and non-durable (memory) stores.
//!
//! # Invariants
//! - The store assigns `id`, `created_at` and the initial `completed=false`.
//! - `update` returns the full updated record.
//! - Every failure is reported as one `StoreError` kind with a message.

use crate::db::DbError;
use crate::model::task::{Task, TaskId, TaskUpdate, TaskValidationError};
use async_trait::async_trait;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};

pub mod memory_store;
pub mod sqlite_store;

pub type StoreResult<T> = Result<T, StoreError>;

/// The single error kind surfaced by task stores.
///
/// Network, validation and not-found failures are deliberately not
/// distinguished; callers only get a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreError {
    message: String,
}

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn not_found(id: TaskId) -> Self {
        Self::new(format!("task not found: {id}"))
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for StoreError {}

impl From<TaskValidationError> for StoreError {
    fn from(value: TaskValidationError) -> Self {
        Self::new(value.to_string())
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::new(format!("task storage unavailable: {value}"))
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::new(value.to_string())
    }
}

/// Remote source of truth for tasks.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// All tasks, newest `created_at` first.
    async fn list(&self) -> StoreResult<Vec<Task>>;
    async fn create(&self, title: &str) -> StoreResult<Task>;
    async fn update(&self, id: TaskId, update: TaskUpdate) -> StoreResult<Task>;
    async fn delete(&self, id: TaskId) -> StoreResult<()>;
}

#[async_trait]
impl<S: TaskStore + ?Sized> TaskStore for std::sync::Arc<S> {
    async fn list(&self) -> StoreResult<Vec<Task>> {
        (**self).list().await
    }

    async fn create(&self, title: &str) -> StoreResult<Task> {
        (**self).create(title).await
    }

    async fn update(&self, id: TaskId, update: TaskUpdate) -> StoreResult<Task> {
        (**self).update(id, update).await
    }

    async fn delete(&self, id: TaskId) -> StoreResult<()> {
        (**self).delete(id).await
    }
}

/// Current wall-clock time in epoch milliseconds.
pub(crate) fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| {
            i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX)
        })
}

/// Returns a creation timestamp strictly after `previous`.
///
/// Keeps `created_at` unique per store even when the clock stalls or
/// moves backwards, so newest-first order matches creation order.
pub(crate) fn next_created_at(previous: Option<i64>) -> i64 {
    let now = now_epoch_ms();
    match previous {
        Some(previous) if previous >= now => previous + 1,
        _ => now,
    }
}
