//! The single serialized write connection.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::Connection;

use causeway_core::errors::CausewayResult;

use super::pragmas::apply_pragmas;
use crate::to_storage_err;

/// Mutex-guarded write connection. Holding the guard is holding the only
/// writer of this process.
pub struct WriteConnection {
    conn: Mutex<Connection>,
}

impl WriteConnection {
    pub fn open(path: &Path, busy_timeout_ms: u64) -> CausewayResult<Self> {
        let conn = Connection::open(path).map_err(|e| to_storage_err(e.to_string()))?;
        apply_pragmas(&conn, busy_timeout_ms)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory(busy_timeout_ms: u64) -> CausewayResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| to_storage_err(e.to_string()))?;
        apply_pragmas(&conn, busy_timeout_ms)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Lock the writer. Blocks while another transaction holds it.
    pub fn lock(&self) -> CausewayResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| to_storage_err(format!("write lock poisoned: {e}")))
    }

    /// Execute a closure with the write connection.
    pub fn with_conn_sync<F, T>(&self, f: F) -> CausewayResult<T>
    where
        F: FnOnce(&Connection) -> CausewayResult<T>,
    {
        let guard = self.lock()?;
        f(&guard)
    }
}
