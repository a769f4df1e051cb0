//! Shared handler state.

use crate::error::ApiError;
use relmap_core::{RepoResult, SqliteStore};
use rusqlite::Connection;
use std::sync::Mutex;

/// Owns the single migrated connection all requests go through.
pub struct AppState {
    conn: Mutex<Connection>,
}

impl AppState {
    /// Wraps a connection returned by `relmap_core::db::open_db*`.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Runs `op` against a store bound to the locked connection.
    ///
    /// The lock is released before this returns; `op` must not block on I/O
    /// other than SQLite.
    pub fn with_store<T>(
        &self,
        op: impl FnOnce(SqliteStore<'_>) -> RepoResult<T>,
    ) -> Result<T, ApiError> {
        let mut conn = self.conn.lock().map_err(|_| ApiError::LockPoisoned)?;
        let store = SqliteStore::try_new(&mut conn)?;
        Ok(op(store)?)
    }
}
