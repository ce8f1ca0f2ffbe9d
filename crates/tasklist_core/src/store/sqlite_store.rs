//! SQLite-backed task store.
//!
//! # Responsibility
//! - Persist tasks in the `tasks` table and serve the store contract.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Titles are trimmed and validated before any insert.
//! - Write paths read the row back so callers get the stored record.
//! - Read paths reject invalid persisted rows instead of masking them.

use crate::db::{open_db, open_db_in_memory};
use crate::model::task::{normalize_title, Task, TaskId, TaskUpdate, TaskValidationError};
use crate::store::{next_created_at, StoreError, StoreResult, TaskStore};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

const TASK_SELECT_SQL: &str = "SELECT
    uuid,
    title,
    completed,
    created_at
FROM tasks";

/// Task store over one SQLite connection.
pub struct SqliteTaskStore {
    conn: Mutex<Connection>,
}

impl SqliteTaskStore {
    /// Wraps an already migrated connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Opens (or creates) a task database file.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Ok(Self::new(open_db(path)?))
    }

    /// Opens a private in-memory task database.
    pub fn open_in_memory() -> StoreResult<Self> {
        Ok(Self::new(open_db_in_memory()?))
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StoreError::new("task store connection lock poisoned"))
    }
}

#[async_trait]
impl TaskStore for SqliteTaskStore {
    async fn list(&self) -> StoreResult<Vec<Task>> {
        let conn = self.lock()?;
        let mut stmt =
            conn.prepare(&format!("{TASK_SELECT_SQL} ORDER BY created_at DESC, rowid DESC;"))?;
        let mut rows = stmt.query([])?;
        let mut tasks = Vec::new();

        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }

        Ok(tasks)
    }

    async fn create(&self, title: &str) -> StoreResult<Task> {
        let title = normalize_title(title).ok_or(TaskValidationError::EmptyTitle)?;
        let conn = self.lock()?;

        let latest: Option<i64> =
            conn.query_row("SELECT MAX(created_at) FROM tasks;", [], |row| row.get(0))?;
        let id = Uuid::new_v4();
        conn.execute(
            "INSERT INTO tasks (uuid, title, completed, created_at)
             VALUES (?1, ?2, 0, ?3);",
            params![id.to_string(), title, next_created_at(latest)],
        )?;

        get_task(&conn, id)?
            .ok_or_else(|| StoreError::new("created task not found in read-back"))
    }

    async fn update(&self, id: TaskId, update: TaskUpdate) -> StoreResult<Task> {
        let conn = self.lock()?;
        let changed = conn.execute(
            "UPDATE tasks SET completed = ?1 WHERE uuid = ?2;",
            params![bool_to_int(update.completed), id.to_string()],
        )?;

        if changed == 0 {
            return Err(StoreError::not_found(id));
        }

        get_task(&conn, id)?.ok_or_else(|| StoreError::not_found(id))
    }

    async fn delete(&self, id: TaskId) -> StoreResult<()> {
        let conn = self.lock()?;
        let changed = conn.execute("DELETE FROM tasks WHERE uuid = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(StoreError::not_found(id));
        }

        Ok(())
    }
}

fn get_task(conn: &Connection, id: TaskId) -> StoreResult<Option<Task>> {
    let mut stmt = conn.prepare(&format!("{TASK_SELECT_SQL} WHERE uuid = ?1;"))?;
    let raw = stmt
        .query_row([id.to_string()], read_raw_row)
        .optional()?;

    raw.map(RawTaskRow::into_task).transpose()
}

fn parse_task_row(row: &Row<'_>) -> StoreResult<Task> {
    read_raw_row(row)?.into_task()
}

struct RawTaskRow {
    uuid: String,
    title: String,
    completed: i64,
    created_at: i64,
}

fn read_raw_row(row: &Row<'_>) -> rusqlite::Result<RawTaskRow> {
    Ok(RawTaskRow {
        uuid: row.get("uuid")?,
        title: row.get("title")?,
        completed: row.get("completed")?,
        created_at: row.get("created_at")?,
    })
}

impl RawTaskRow {
    fn into_task(self) -> StoreResult<Task> {
        let id = Uuid::parse_str(&self.uuid).map_err(|_| {
            StoreError::new(format!(
                "invalid persisted task data: uuid `{}` in tasks.uuid",
                self.uuid
            ))
        })?;

        let completed = match self.completed {
            0 => false,
            1 => true,
            other => {
                return Err(StoreError::new(format!(
                    "invalid persisted task data: completed `{other}` in tasks.completed"
                )));
            }
        };

        let task = Task {
            id,
            title: self.title,
            completed,
            created_at: self.created_at,
        };
        task.validate()?;
        Ok(task)
    }
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
