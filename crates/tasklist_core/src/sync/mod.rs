//! Client-side synchronization between local list state and a task store.
//!
//! # Responsibility
//! - Own the in-memory task list and reconcile it with store responses.
//! - Turn store failures into observable, non-fatal outcomes.
//!
//! # Invariants
//! - Confirm-then-apply: local state changes only after the store succeeds.
//! - Results apply in resolution order, not call order.

pub mod synchronizer;
