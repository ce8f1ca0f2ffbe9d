//! Core of the single-list task tracker.
//! Owns the task store contract and the client-side synchronizer that keeps
//! a local, newest-first list consistent with it.

pub mod db;
pub mod logging;
pub mod model;
pub mod store;
pub mod sync;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::task::{Task, TaskId, TaskSummary, TaskUpdate, TaskValidationError};
pub use store::memory_store::InMemoryTaskStore;
pub use store::sqlite_store::SqliteTaskStore;
pub use store::{StoreError, StoreResult, TaskStore};
pub use sync::synchronizer::{SyncOutcome, SyncSnapshot, Synchronizer};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
