//! Plain-text rendering of synchronizer state.
//!
//! Pure functions over `SyncSnapshot` so every screen can be asserted on.

use std::fmt::Write;
use tasklist_core::{SyncOutcome, SyncSnapshot, TaskSummary};

const EMPTY_HINT: &str = "No tasks yet. Create one with `add <title>`.";

/// Full screen: the recorded store error (if any), then summary and list.
pub fn render(snapshot: &SyncSnapshot) -> String {
    let body = render_tasks(snapshot);
    match &snapshot.last_error {
        Some(err) => format!("error: {err}\n{body}"),
        None => body,
    }
}

/// What to print after an intent resolved.
///
/// A failure always names the error, then shows the list that was kept.
pub fn report(outcome: &SyncOutcome, snapshot: &SyncSnapshot) -> String {
    match outcome {
        SyncOutcome::Applied => render(snapshot),
        SyncOutcome::Skipped => "nothing to add".to_string(),
        SyncOutcome::Failed(err) => format!("error: {err}\n{}", render_tasks(snapshot)),
    }
}

fn render_tasks(snapshot: &SyncSnapshot) -> String {
    if snapshot.loading {
        return "Loading tasks...".to_string();
    }

    let mut out = TaskSummary::from_tasks(&snapshot.tasks).to_string();
    if snapshot.tasks.is_empty() {
        out.push('\n');
        out.push_str(EMPTY_HINT);
        return out;
    }
    for (index, task) in snapshot.tasks.iter().enumerate() {
        let mark = if task.completed { "x" } else { " " };
        let _ = write!(out, "\n{:>3}. [{mark}] {}", index + 1, task.title);
    }
    out
}
