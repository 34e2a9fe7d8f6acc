//! SQLite store bootstrap, pooling and schema migrations.
//!
//! # Responsibility
//! - Open and configure SQLite connections for the exam recorder.
//! - Hand out pooled connections so independent requests never queue on one
//!   handle.
//! - Apply schema migrations in deterministic order before any data access.
//!
//! # Invariants
//! - Migration version is tracked via `PRAGMA user_version`.
//! - Foreign keys are enforced on every connection returned from here,
//!   pooled or not.
//! - Errors name the store they came from.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;
mod pool;

pub use open::{open_db, open_db_in_memory, MEMORY_TARGET};
pub use pool::{open_pool, open_pool_in_memory, PooledConnection, StorePool, DEFAULT_POOL_SIZE};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    /// The store at `target` could not be opened.
    Open {
        target: String,
        source: rusqlite::Error,
    },
    /// Migration `version` failed; nothing of it was applied.
    Migration {
        version: u32,
        source: rusqlite::Error,
    },
    /// The file carries a schema written by a newer binary.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    /// The connection pool for `target` could not be built.
    Pool {
        target: String,
        source: r2d2::Error,
    },
    Sqlite(rusqlite::Error),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open { target, source } => write!(f, "cannot open store `{target}`: {source}"),
            Self::Migration { version, source } => {
                write!(f, "schema migration {version} failed: {source}")
            }
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "store schema version {db_version} is newer than supported {latest_supported}"
            ),
            Self::Pool { target, source } => {
                write!(f, "cannot build connection pool for `{target}`: {source}")
            }
            Self::Sqlite(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Open { source, .. } | Self::Migration { source, .. } => Some(source),
            Self::Pool { source, .. } => Some(source),
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
