//! Task list synchronizer.
//!
//! # Responsibility
//! - Expose `refresh`/`create`/`toggle`/`remove` intents to the presentation.
//! - Own list, loading flag, draft input and last error as one state container.
//!
//! # Invariants
//! - No local mutation happens before the store confirms (no optimistic state).
//! - A failed store call leaves the task list deep-equal to its prior value.
//! - `refresh` replaces the whole list or nothing.
//! - A task id appears at most once in the list.
//! - `loading` reflects in-flight refreshes only.
//!
//! Concurrent operations are not serialized. Two toggles of the same task
//! race and the response that resolves last wins.

use crate::logging::sanitize_message;
use crate::model::task::{normalize_title, Task, TaskId, TaskSummary, TaskUpdate};
use crate::store::{StoreError, StoreResult, TaskStore};
use log::{debug, info, warn};
use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;

const MAX_LOGGED_ERROR_CHARS: usize = 200;

/// Result of one synchronizer intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The store confirmed and the local state was reconciled.
    Applied,
    /// The store failed; local list is unchanged and the error is recorded.
    Failed(StoreError),
    /// Precondition not met, no request was sent.
    Skipped,
}

impl SyncOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Point-in-time copy of synchronizer state for rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncSnapshot {
    /// Newest first.
    pub tasks: Vec<Task>,
    pub loading: bool,
    /// Number of store calls currently in flight.
    pub pending: usize,
    pub draft: String,
    pub last_error: Option<StoreError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SyncOp {
    Refresh,
    Create,
    Toggle,
    Remove,
}

impl SyncOp {
    fn event(self) -> &'static str {
        match self {
            Self::Refresh => "task_refresh",
            Self::Create => "task_create",
            Self::Toggle => "task_toggle",
            Self::Remove => "task_remove",
        }
    }
}

#[derive(Debug, Default)]
struct SyncState {
    tasks: Vec<Task>,
    refreshing: usize,
    pending: usize,
    draft: String,
    last_error: Option<StoreError>,
}

fn lock_state(state: &Mutex<SyncState>) -> MutexGuard<'_, SyncState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Holds one unit of an in-flight counter and gives it back on drop.
///
/// Intent futures can be dropped mid-await (timeouts, `select!`), so the
/// counters must not rely on code after the await running.
struct InFlight<'a> {
    state: &'a Mutex<SyncState>,
    counter: fn(&mut SyncState) -> &mut usize,
}

impl<'a> InFlight<'a> {
    fn enter(state: &'a Mutex<SyncState>, counter: fn(&mut SyncState) -> &mut usize) -> Self {
        *counter(&mut lock_state(state)) += 1;
        Self { state, counter }
    }

    fn pending(state: &'a Mutex<SyncState>) -> Self {
        Self::enter(state, pending_counter)
    }

    fn refreshing(state: &'a Mutex<SyncState>) -> Self {
        Self::enter(state, refreshing_counter)
    }
}

fn pending_counter(state: &mut SyncState) -> &mut usize {
    &mut state.pending
}

fn refreshing_counter(state: &mut SyncState) -> &mut usize {
    &mut state.refreshing
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut state = lock_state(self.state);
        let counter = (self.counter)(&mut state);
        *counter = counter.saturating_sub(1);
    }
}

/// Reconciles a local, newest-first task list with a `TaskStore`.
pub struct Synchronizer<S: TaskStore> {
    store: S,
    state: Mutex<SyncState>,
}

impl<S: TaskStore> Synchronizer<S> {
    /// Creates a synchronizer with an empty list. Call `refresh` to load.
    pub fn new(store: S) -> Self {
        Self {
            store,
            state: Mutex::new(SyncState::default()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn tasks(&self) -> Vec<Task> {
        self.with_state(|state| state.tasks.clone())
    }

    pub fn loading(&self) -> bool {
        self.with_state(|state| state.refreshing > 0)
    }

    /// Number of store calls issued and not yet resolved.
    pub fn pending(&self) -> usize {
        self.with_state(|state| state.pending)
    }

    pub fn is_empty(&self) -> bool {
        self.with_state(|state| state.tasks.is_empty())
    }

    pub fn summary(&self) -> TaskSummary {
        self.with_state(|state| TaskSummary::from_tasks(&state.tasks))
    }

    pub fn draft(&self) -> String {
        self.with_state(|state| state.draft.clone())
    }

    pub fn set_draft(&self, text: impl Into<String>) {
        let text = text.into();
        self.with_state(|state| state.draft = text);
    }

    /// Most recent store failure, kept until cleared or replaced.
    pub fn last_error(&self) -> Option<StoreError> {
        self.with_state(|state| state.last_error.clone())
    }

    pub fn clear_error(&self) {
        self.with_state(|state| state.last_error = None);
    }

    pub fn snapshot(&self) -> SyncSnapshot {
        self.with_state(|state| SyncSnapshot {
            tasks: state.tasks.clone(),
            loading: state.refreshing > 0,
            pending: state.pending,
            draft: state.draft.clone(),
            last_error: state.last_error.clone(),
        })
    }

    /// Reloads the whole list from the store, newest first.
    ///
    /// # Contract
    /// - `loading` is true while this call is in flight.
    /// - Success replaces the list with the store's order, untouched.
    /// - Failure keeps the previous list.
    /// - Dropping the future before it resolves clears `loading` and applies nothing.
    pub async fn refresh(&self) -> SyncOutcome {
        let _refreshing = InFlight::refreshing(&self.state);
        self.run(
            SyncOp::Refresh,
            self.store.list(),
            |state, tasks: Vec<Task>| state.tasks = tasks,
        )
        .await
    }

    /// Creates a task from raw input.
    ///
    /// # Contract
    /// - Blank input after trimming is skipped without a store call.
    /// - Success prepends the stored record and clears the draft.
    /// - Failure keeps the draft and the list.
    pub async fn create(&self, title: &str) -> SyncOutcome {
        let Some(title) = normalize_title(title) else {
            debug!("event=task_create module=sync status=skipped reason=blank_title");
            return SyncOutcome::Skipped;
        };

        self.run(SyncOp::Create, self.store.create(title), |state, created: Task| {
            // A refresh that resolved first may already hold the new record.
            state.tasks.retain(|task| task.id != created.id);
            state.tasks.insert(0, created);
            state.draft.clear();
        })
        .await
    }

    /// Creates a task from the current draft text.
    pub async fn submit_draft(&self) -> SyncOutcome {
        let draft = self.draft();
        self.create(&draft).await
    }

    /// Flips `completed` for `task` and replaces it in place on success.
    ///
    /// The flip is computed from the passed record, not from the current list.
    pub async fn toggle(&self, task: &Task) -> SyncOutcome {
        let update = TaskUpdate {
            completed: !task.completed,
        };

        self.run(
            SyncOp::Toggle,
            self.store.update(task.id, update),
            |state, updated: Task| {
                if let Some(slot) = state.tasks.iter_mut().find(|task| task.id == updated.id) {
                    *slot = updated;
                }
            },
        )
        .await
    }

    /// Deletes a task and filters it out of the list on success.
    pub async fn remove(&self, id: TaskId) -> SyncOutcome {
        self.run(SyncOp::Remove, self.store.delete(id), |state, ()| {
            state.tasks.retain(|task| task.id != id);
        })
        .await
    }

    async fn run<T>(
        &self,
        op: SyncOp,
        request: impl Future<Output = StoreResult<T>>,
        apply: impl FnOnce(&mut SyncState, T),
    ) -> SyncOutcome {
        let started_at = Instant::now();
        let in_flight = InFlight::pending(&self.state);
        let result = request.await;
        drop(in_flight);

        self.with_state(|state| match result {
            Ok(value) => {
                apply(&mut *state, value);
                info!(
                    "event={} module=sync status=ok duration_ms={} count={}",
                    op.event(),
                    started_at.elapsed().as_millis(),
                    state.tasks.len()
                );
                SyncOutcome::Applied
            }
            Err(err) => {
                warn!(
                    "event={} module=sync status=error duration_ms={} error={}",
                    op.event(),
                    started_at.elapsed().as_millis(),
                    sanitize_message(err.message(), MAX_LOGGED_ERROR_CHARS)
                );
                state.last_error = Some(err.clone());
                SyncOutcome::Failed(err)
            }
        })
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut SyncState) -> R) -> R {
        f(&mut lock_state(&self.state))
    }
}
