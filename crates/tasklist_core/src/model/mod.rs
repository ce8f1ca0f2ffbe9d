//! Domain model for the single task list.
//!
//! # Responsibility
//! - Define the canonical task record shared by store and sync layers.
//!
//! # Invariants
//! - Every task is identified by a store-assigned `TaskId`.
//! - Task titles are trimmed and never empty once persisted.

pub mod task;
