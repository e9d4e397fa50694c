//! The singleton exclusive-lock row serializing orchestrated updates.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use causeway_core::constants::GRAPH_LOCK_ID;
use causeway_core::errors::{CausewayResult, StorageError};

use super::{now_rfc3339, parse_timestamp};
use crate::to_storage_err;

/// Stamp the lock row with `holder`. Inside a write transaction this takes
/// the row for the rest of the transaction.
pub fn acquire(conn: &Connection, holder: &str) -> CausewayResult<()> {
    let updated = conn
        .prepare_cached("UPDATE graph_lock SET holder = ?2, acquired_at = ?3 WHERE id = ?1")
        .and_then(|mut stmt| stmt.execute(params![GRAPH_LOCK_ID, holder, now_rfc3339()]))
        .map_err(|e| to_storage_err(e.to_string()))?;
    if updated == 0 {
        return Err(StorageError::LockUnavailable {
            details: "graph_lock row is missing".to_string(),
        }
        .into());
    }
    Ok(())
}

/// Last holder of the lock and when it took it.
pub fn last_holder(conn: &Connection) -> CausewayResult<Option<(String, DateTime<Utc>)>> {
    let row: Option<(Option<String>, Option<String>)> = conn
        .query_row(
            "SELECT holder, acquired_at FROM graph_lock WHERE id = ?1",
            params![GRAPH_LOCK_ID],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;

    match row {
        Some((Some(holder), Some(acquired_at))) => {
            Ok(Some((holder, parse_timestamp(&acquired_at)?)))
        }
        _ => Ok(None),
    }
}
