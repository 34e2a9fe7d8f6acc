//! Connection bootstrap for file-backed and in-memory stores.
//!
//! # Invariants
//! - Returned connections have `foreign_keys=ON` and a busy timeout.
//! - Returned connections have migrations fully applied.

use super::migrations::apply_migrations;
use super::{DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

/// Store label used for in-memory databases in logs and errors.
pub const MEMORY_TARGET: &str = ":memory:";

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens (or creates) the SQLite file at `path` and migrates it.
///
/// # Side effects
/// - Emits `db_open` events with target, duration and status.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    let path = path.as_ref();
    open_with(&path.display().to_string(), || Connection::open(path))
}

/// Opens a private in-memory store and migrates it.
///
/// Each call returns an independent, empty database.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_with(MEMORY_TARGET, Connection::open_in_memory)
}

fn open_with<F>(target: &str, connect: F) -> DbResult<Connection>
where
    F: FnOnce() -> rusqlite::Result<Connection>,
{
    let started_at = Instant::now();
    info!("event=db_open module=db status=start target={target}");

    let mut conn = connect().map_err(|source| {
        error!(
            "event=db_open module=db status=error target={} duration_ms={} error_code=db_open_failed error={}",
            target,
            started_at.elapsed().as_millis(),
            source
        );
        DbError::Open {
            target: target.to_string(),
            source,
        }
    })?;

    if let Err(err) = bootstrap_connection(&mut conn) {
        error!(
            "event=db_open module=db status=error target={} duration_ms={} error_code=db_bootstrap_failed error={}",
            target,
            started_at.elapsed().as_millis(),
            err
        );
        return Err(err);
    }

    info!(
        "event=db_open module=db status=ok target={} duration_ms={}",
        target,
        started_at.elapsed().as_millis()
    );
    Ok(conn)
}

/// Per-connection settings; SQLite does not persist them in the file.
pub(super) fn configure_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.pragma_update(None, "foreign_keys", true)?;
    conn.busy_timeout(BUSY_TIMEOUT)
}

pub(super) fn bootstrap_connection(conn: &mut Connection) -> DbResult<()> {
    configure_connection(conn)?;
    apply_migrations(conn)
}
