//! Forward-only schema steps for the `tasks` table.
//!
//! Each step leaves `PRAGMA user_version` at its own number. Pending steps
//! run inside one transaction, so a failing step leaves the file untouched.

use super::{DbError, DbResult};
use log::{debug, info};
use rusqlite::Connection;
use std::cmp::Ordering;

struct SchemaStep {
    version: u32,
    sql: &'static str,
}

const SCHEMA_STEPS: &[SchemaStep] = &[SchemaStep {
    version: 1,
    sql: include_str!("0001_tasks.sql"),
}];

/// Newest schema version this build can write.
pub fn latest_version() -> u32 {
    SCHEMA_STEPS.last().map_or(0, |step| step.version)
}

/// Schema version recorded in the database file.
pub fn schema_version(conn: &Connection) -> DbResult<u32> {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(DbError::ReadVersion)
}

/// Runs every step newer than the recorded version. Returns the version reached.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<u32> {
    let found = schema_version(conn)?;
    let supported = latest_version();

    match found.cmp(&supported) {
        Ordering::Greater => return Err(DbError::SchemaTooNew { found, supported }),
        Ordering::Equal => {
            debug!("event=db_migrate module=db status=skipped version={found}");
            return Ok(found);
        }
        Ordering::Less => {}
    }

    let pending = SCHEMA_STEPS.iter().filter(|step| step.version > found);
    let first_pending = found + 1;
    let tx = conn.transaction().map_err(|source| DbError::Migrate {
        version: first_pending,
        source,
    })?;
    for step in pending {
        tx.execute_batch(step.sql)
            .and_then(|()| tx.pragma_update(None, "user_version", step.version))
            .map_err(|source| DbError::Migrate {
                version: step.version,
                source,
            })?;
    }
    tx.commit().map_err(|source| DbError::Migrate {
        version: supported,
        source,
    })?;

    info!("event=db_migrate module=db status=ok from_version={found} to_version={supported}");
    Ok(supported)
}
