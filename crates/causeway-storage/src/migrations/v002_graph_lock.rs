//! v002: graph_lock singleton row.

use rusqlite::{params, Connection};

use causeway_core::constants::GRAPH_LOCK_ID;
use causeway_core::errors::CausewayResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> CausewayResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS graph_lock (
            id           INTEGER PRIMARY KEY,
            holder       TEXT,
            acquired_at  TEXT
        );
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    conn.execute(
        "INSERT OR IGNORE INTO graph_lock (id) VALUES (?1)",
        params![GRAPH_LOCK_ID],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
