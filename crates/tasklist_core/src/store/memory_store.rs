//! In-memory task store.
//!
//! Not durable. Used by the CLI when no database path is given and by
//! tests that need a well-behaved store.

use crate::model::task::{normalize_title, Task, TaskId, TaskUpdate, TaskValidationError};
use crate::store::{next_created_at, StoreError, StoreResult, TaskStore};
use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

#[derive(Default)]
pub struct InMemoryTaskStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    tasks: Vec<Task>,
    latest_created_at: Option<i64>,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with existing records, as if loaded from elsewhere.
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        let latest_created_at = tasks.iter().map(|task| task.created_at).max();
        Self {
            inner: Mutex::new(Inner {
                tasks,
                latest_created_at,
            }),
        }
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| StoreError::new("in-memory task store lock poisoned"))
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn list(&self) -> StoreResult<Vec<Task>> {
        let inner = self.lock()?;
        // Reversed first so the stable sort puts later inserts ahead on ties.
        let mut tasks: Vec<Task> = inner.tasks.iter().rev().cloned().collect();
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(tasks)
    }

    async fn create(&self, title: &str) -> StoreResult<Task> {
        let title = normalize_title(title).ok_or(TaskValidationError::EmptyTitle)?;
        let mut inner = self.lock()?;

        let created_at = next_created_at(inner.latest_created_at);
        let task = Task {
            id: Uuid::new_v4(),
            title: title.to_string(),
            completed: false,
            created_at,
        };
        inner.latest_created_at = Some(created_at);
        inner.tasks.push(task.clone());
        Ok(task)
    }

    async fn update(&self, id: TaskId, update: TaskUpdate) -> StoreResult<Task> {
        let mut inner = self.lock()?;
        let task = inner
            .tasks
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or_else(|| StoreError::not_found(id))?;
        task.completed = update.completed;
        Ok(task.clone())
    }

    async fn delete(&self, id: TaskId) -> StoreResult<()> {
        let mut inner = self.lock()?;
        let before = inner.tasks.len();
        inner.tasks.retain(|task| task.id != id);
        if inner.tasks.len() == before {
            return Err(StoreError::not_found(id));
        }
        Ok(())
    }
}
