//! Shared handler state.
//!
//! # Responsibility
//! - Own the store connection pool opened at startup.
//! - Run each core call on the blocking pool with its own checked-out
//!   connection.
//!
//! # Invariants
//! - A connection is held for exactly one core operation, then returned.
//! - Requests never share a connection, so a batch transaction is only ever
//!   visible to the request that opened it.

use crate::error::ApiError;
use odonto_core::db::StorePool;
use rusqlite::Connection;

const STORE_UNAVAILABLE_MESSAGE: &str = "Banco de dados indisponível.";

/// Application state, injected into route handlers via axum state.
#[derive(Clone)]
pub struct AppState {
    pool: StorePool,
}

impl AppState {
    pub fn new(pool: StorePool) -> Self {
        Self { pool }
    }

    /// Runs `operation` on the blocking pool with a connection of its own.
    ///
    /// A panicking operation drops its connection back into the pool; any
    /// transaction it left open has already rolled back on unwind.
    pub async fn with_connection<T, F>(&self, operation: F) -> Result<T, ApiError>
    where
        F: FnOnce(&mut Connection) -> Result<T, ApiError> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool
                .get()
                .map_err(|err| ApiError::internal(STORE_UNAVAILABLE_MESSAGE, err))?;
            operation(&mut conn)
        })
        .await
        .map_err(|err| ApiError::internal(STORE_UNAVAILABLE_MESSAGE, err))?
    }
}
