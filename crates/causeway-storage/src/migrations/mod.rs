//! Versioned schema migrations, tracked in `schema_version`.

mod v001_component_tables;
mod v002_graph_lock;

use rusqlite::{params, Connection};
use tracing::{debug, info};

use causeway_core::errors::{CausewayResult, StorageError};

use crate::to_storage_err;

type Migration = fn(&Connection) -> CausewayResult<()>;

const MIGRATIONS: &[(u32, Migration)] = &[
    (1, v001_component_tables::migrate),
    (2, v002_graph_lock::migrate),
];

/// Highest schema version known to this build.
pub const LATEST_VERSION: u32 = 2;

/// Name of the unique index guarding component identity.
pub const COMPONENT_ID_CONSTRAINT: &str = "component_id_unique";

/// Apply every migration newer than the stored schema version.
/// Returns the number of migrations applied.
pub fn run_migrations(conn: &Connection) -> CausewayResult<usize> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version     INTEGER PRIMARY KEY,
            applied_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;

    let current = current_version(conn)?;
    let mut applied = 0;
    for &(version, migrate) in MIGRATIONS.iter().filter(|(v, _)| *v > current) {
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| to_storage_err(format!("migration {version} begin: {e}")))?;
        migrate(&tx).map_err(|e| StorageError::MigrationFailed {
            version,
            reason: e.to_string(),
        })?;
        tx.execute(
            "INSERT INTO schema_version (version) VALUES (?1)",
            params![version],
        )
        .map_err(|e| StorageError::MigrationFailed {
            version,
            reason: e.to_string(),
        })?;
        tx.commit()
            .map_err(|e| to_storage_err(format!("migration {version} commit: {e}")))?;
        debug!(version, "applied migration");
        applied += 1;
    }
    Ok(applied)
}

/// Stored schema version, 0 for a fresh database.
pub fn current_version(conn: &Connection) -> CausewayResult<u32> {
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )
    .map_err(|e| to_storage_err(e.to_string()))
}

/// Create the unique constraint on component ids. A constraint that already
/// exists is not an error.
pub fn ensure_unique_constraint(conn: &Connection) -> CausewayResult<()> {
    let sql = format!("CREATE UNIQUE INDEX {COMPONENT_ID_CONSTRAINT} ON components(id)");
    match conn.execute_batch(&sql) {
        Ok(()) => {
            info!(constraint = COMPONENT_ID_CONSTRAINT, "created constraint");
            Ok(())
        }
        Err(e) if e.to_string().contains("already exists") => {
            info!(constraint = COMPONENT_ID_CONSTRAINT, "constraint already exists");
            Ok(())
        }
        Err(e) => Err(to_storage_err(e.to_string())),
    }
}
