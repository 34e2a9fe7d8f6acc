//! `r2d2` connection pool over the exam store.
//!
//! # Invariants
//! - The schema is migrated once, before the pool hands out its first
//!   connection.
//! - Every pooled connection runs the same per-connection pragmas as
//!   [`super::open_db`].
//! - An in-memory pool holds exactly one long-lived connection, since each
//!   SQLite memory connection is its own database.

use super::open::{bootstrap_connection, configure_connection};
use super::{open_db, DbError, DbResult, MEMORY_TARGET};
use log::info;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use std::path::Path;

pub type StorePool = Pool<SqliteConnectionManager>;
pub type PooledConnection = r2d2::PooledConnection<SqliteConnectionManager>;

pub const DEFAULT_POOL_SIZE: u32 = 8;

/// Migrates the SQLite file at `path` and returns a pool of up to
/// `max_size` connections to it.
///
/// The file is switched to WAL journaling so readers proceed while one
/// batch holds the write lock.
pub fn open_pool(path: impl AsRef<Path>, max_size: u32) -> DbResult<StorePool> {
    let path = path.as_ref();
    let target = path.display().to_string();

    let conn = open_db(path)?;
    let journal_mode: String =
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
    drop(conn);

    let manager = SqliteConnectionManager::file(path).with_init(|conn| configure_connection(conn));
    let pool = Pool::builder()
        .max_size(max_size.max(1))
        .build(manager)
        .map_err(|source| DbError::Pool {
            target: target.clone(),
            source,
        })?;

    info!(
        "event=db_pool module=db status=ok target={} max_size={} journal_mode={}",
        target,
        pool.max_size(),
        journal_mode
    );
    Ok(pool)
}

/// Returns a single-connection pool over a fresh, migrated in-memory store.
pub fn open_pool_in_memory() -> DbResult<StorePool> {
    let manager = SqliteConnectionManager::memory().with_init(init_memory_connection);
    let pool = Pool::builder()
        .max_size(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .build(manager)
        .map_err(|source| DbError::Pool {
            target: MEMORY_TARGET.to_string(),
            source,
        })?;

    info!("event=db_pool module=db status=ok target={MEMORY_TARGET} max_size=1");
    Ok(pool)
}

fn init_memory_connection(conn: &mut Connection) -> rusqlite::Result<()> {
    bootstrap_connection(conn).map_err(|err| match err {
        DbError::Sqlite(source)
        | DbError::Open { source, .. }
        | DbError::Migration { source, .. } => source,
        other => rusqlite::Error::UserFunctionError(Box::new(other)),
    })
}
