//! SQLite bootstrap for the persistent task store.
//!
//! # Responsibility
//! - Open and configure the connection behind `SqliteTaskStore`.
//! - Bring the `tasks` schema up to date before any task row is touched.
//!
//! # Invariants
//! - Every error names where it happened: which database, or which schema step.
//! - A database written by a newer build is refused, never downgraded.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod migrations;
mod open;

pub use migrations::{latest_version, schema_version};
pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Which task database a connection points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbTarget {
    File(PathBuf),
    Memory,
}

impl DbTarget {
    fn mode(&self) -> &'static str {
        match self {
            Self::File(_) => "file",
            Self::Memory => "memory",
        }
    }
}

impl Display for DbTarget {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Memory => f.write_str(":memory:"),
        }
    }
}

/// Failure while opening or migrating the task database.
#[derive(Debug)]
pub enum DbError {
    /// The connection could not be established or configured.
    Open {
        target: DbTarget,
        source: rusqlite::Error,
    },
    /// `PRAGMA user_version` could not be read.
    ReadVersion(rusqlite::Error),
    /// Schema step `version` failed; the whole migration was rolled back.
    Migrate {
        version: u32,
        source: rusqlite::Error,
    },
    /// The file was written by a build with a newer `tasks` schema.
    SchemaTooNew { found: u32, supported: u32 },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open { target, source } => {
                write!(f, "cannot open task database `{target}`: {source}")
            }
            Self::ReadVersion(source) => write!(f, "cannot read task schema version: {source}"),
            Self::Migrate { version, source } => {
                write!(f, "task schema step {version} failed: {source}")
            }
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "task database uses schema version {found}, this build supports up to {supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Open { source, .. } | Self::Migrate { source, .. } => Some(source),
            Self::ReadVersion(source) => Some(source),
            Self::SchemaTooNew { .. } => None,
        }
    }
}
