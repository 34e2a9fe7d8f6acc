//! Storage gateway: repository contracts and SQLite implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Keep SQL text and row mapping inside the persistence boundary.
//! - Hand out a transaction scope for multi-row arch writes.
//!
//! # Invariants
//! - Every statement is parameterized; caller input is never spliced into SQL.
//! - "Not found" is expressed as `Ok(None)`, never as a transport error.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod arch_repo;
pub mod average_repo;
pub mod patient_repo;
pub mod tooth_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Error shared by every repository.
#[derive(Debug)]
pub enum RepoError {
    /// The store rejected or failed the operation.
    Db(DbError),
    /// A persisted row cannot be mapped to its domain record.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}
