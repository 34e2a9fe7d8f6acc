//! Schema migrations for the exam store.
//!
//! Each entry is one embedded SQL file. A store is either at a known version
//! or rejected: files stamped by a newer binary are never touched.

use crate::db::{DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;

/// `(user_version after apply, script)`; versions ascend by one.
const SCHEMA_STEPS: &[(u32, &str)] = &[(1, include_str!("0001_init.sql"))];

/// Schema version this binary writes.
pub fn latest_version() -> u32 {
    SCHEMA_STEPS.last().map_or(0, |(version, _)| *version)
}

/// Brings `conn` up to [`latest_version`] inside a single transaction.
///
/// A failing step leaves the store at its previous version.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let stored: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    let latest = latest_version();

    if stored > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: stored,
            latest_supported: latest,
        });
    }
    if stored == latest {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for (version, script) in SCHEMA_STEPS.iter().filter(|(version, _)| *version > stored) {
        tx.execute_batch(script)
            .and_then(|()| tx.pragma_update(None, "user_version", version))
            .map_err(|source| {
                error!("event=db_migrate module=db status=error version={version} error={source}");
                DbError::Migration {
                    version: *version,
                    source,
                }
            })?;
    }
    tx.commit()?;

    info!("event=db_migrate module=db status=ok from_version={stored} to_version={latest}");
    Ok(())
}
