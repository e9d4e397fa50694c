//! v001: components, calls.

use rusqlite::Connection;

use causeway_core::errors::CausewayResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> CausewayResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS components (
            id                  TEXT NOT NULL,
            status              TEXT NOT NULL DEFAULT 'INITIALIZING'
                CHECK (status IN ('INITIALIZING', 'NORMAL', 'CONFIRMED', 'VICTIM', 'PERPETRATOR')),
            transition_counter  INTEGER NOT NULL DEFAULT 0 CHECK (transition_counter >= 0),
            created_at          TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
            updated_at          TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );

        CREATE INDEX IF NOT EXISTS idx_components_status ON components(status);

        CREATE TABLE IF NOT EXISTS calls (
            caller_id           TEXT NOT NULL REFERENCES components(id) ON DELETE CASCADE,
            callee_id           TEXT NOT NULL REFERENCES components(id) ON DELETE CASCADE,
            callee_status       TEXT NOT NULL DEFAULT 'INITIALIZING',
            callee_is_abnormal  INTEGER NOT NULL DEFAULT 0,
            created_at          TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
            updated_at          TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
            PRIMARY KEY (caller_id, callee_id)
        );

        CREATE INDEX IF NOT EXISTS idx_calls_callee ON calls(callee_id);
        CREATE INDEX IF NOT EXISTS idx_calls_abnormal
            ON calls(caller_id) WHERE callee_is_abnormal = 1;
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
