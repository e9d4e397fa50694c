//! Component rows: upsert, reads, status and counter writes, reset.

use std::collections::{BTreeMap, HashMap};

use rusqlite::{params, Connection, OptionalExtension};

use causeway_core::errors::{CausewayError, CausewayResult};
use causeway_core::models::{Component, ComponentState, ComponentStatus};

use super::{call_ops, ids_param, now_rfc3339, parse_status, parse_timestamp};
use crate::to_storage_err;

/// Insert `id` as a new `INITIALIZING` component. Returns whether it was new.
pub fn insert_if_missing(conn: &Connection, id: &str) -> CausewayResult<bool> {
    let inserted = conn
        .prepare_cached(
            "INSERT OR IGNORE INTO components (id, status, transition_counter)
             VALUES (?1, 'INITIALIZING', 0)",
        )
        .and_then(|mut stmt| stmt.execute(params![id]))
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(inserted > 0)
}

/// Status of one component, if it exists.
pub fn get_status(conn: &Connection, id: &str) -> CausewayResult<Option<ComponentStatus>> {
    let raw: Option<String> = conn
        .query_row(
            "SELECT status FROM components WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;
    raw.as_deref().map(parse_status).transpose()
}

/// Status, counter and dependencies of one component.
pub fn get_state(conn: &Connection, id: &str) -> CausewayResult<Option<ComponentState>> {
    let row: Option<(String, u32)> = conn
        .query_row(
            "SELECT status, transition_counter FROM components WHERE id = ?1",
            params![id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;

    let Some((status, transition_counter)) = row else {
        return Ok(None);
    };
    Ok(Some(ComponentState {
        status: parse_status(&status)?,
        transition_counter,
        dependencies: call_ops::dependencies_of(conn, id)?,
    }))
}

/// Full snapshot of one component.
pub fn get_component(conn: &Connection, id: &str) -> CausewayResult<Option<Component>> {
    let row: Option<(String, u32, String)> = conn
        .query_row(
            "SELECT status, transition_counter, updated_at FROM components WHERE id = ?1",
            params![id],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;

    let Some((status, transition_counter, updated_at)) = row else {
        return Ok(None);
    };
    Ok(Some(Component {
        id: id.to_string(),
        status: parse_status(&status)?,
        transition_counter,
        dependencies: call_ops::dependencies_of(conn, id)?,
        consumers: call_ops::consumers_of(conn, id)?,
        updated_at: parse_timestamp(&updated_at)?,
    }))
}

/// Every component with its dependencies and consumers, keyed by id.
pub fn list_components(conn: &Connection) -> CausewayResult<BTreeMap<String, Component>> {
    let mut stmt = conn
        .prepare("SELECT id, status, transition_counter, updated_at FROM components")
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, u32>(2)?,
                row.get::<_, String>(3)?,
            ))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut graph = BTreeMap::new();
    for row in rows {
        let (id, status, transition_counter, updated_at) =
            row.map_err(|e| to_storage_err(e.to_string()))?;
        graph.insert(
            id.clone(),
            Component {
                id,
                status: parse_status(&status)?,
                transition_counter,
                dependencies: Vec::new(),
                consumers: Vec::new(),
                updated_at: parse_timestamp(&updated_at)?,
            },
        );
    }

    for edge in call_ops::all_edges(conn)? {
        if let Some(caller) = graph.get_mut(&edge.caller_id) {
            caller.dependencies.push(edge.callee_id.clone());
        }
        if let Some(callee) = graph.get_mut(&edge.callee_id) {
            callee.consumers.push(edge.caller_id);
        }
    }
    Ok(graph)
}

/// Current status of each existing id in `ids`.
pub fn statuses_of(
    conn: &Connection,
    ids: &[String],
) -> CausewayResult<HashMap<String, ComponentStatus>> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT id, status FROM components
             WHERE id IN (SELECT value FROM json_each(?1))",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![ids_param(ids)?], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut statuses = HashMap::with_capacity(ids.len());
    for row in rows {
        let (id, status) = row.map_err(|e| to_storage_err(e.to_string()))?;
        statuses.insert(id, parse_status(&status)?);
    }
    Ok(statuses)
}

/// Write a status and refresh the callee caches of every incoming edge.
pub fn set_status(conn: &Connection, id: &str, status: ComponentStatus) -> CausewayResult<()> {
    let now = now_rfc3339();
    let updated = conn
        .prepare_cached("UPDATE components SET status = ?2, updated_at = ?3 WHERE id = ?1")
        .and_then(|mut stmt| stmt.execute(params![id, status.as_str(), now]))
        .map_err(|e| to_storage_err(e.to_string()))?;
    if updated == 0 {
        return Err(CausewayError::ComponentNotFound { id: id.to_string() });
    }
    call_ops::refresh_callee_cache(conn, id, status)
}

pub fn set_transition_counter(conn: &Connection, id: &str, counter: u32) -> CausewayResult<()> {
    let now = now_rfc3339();
    let updated = conn
        .prepare_cached(
            "UPDATE components SET transition_counter = ?2, updated_at = ?3 WHERE id = ?1",
        )
        .and_then(|mut stmt| stmt.execute(params![id, counter, now]))
        .map_err(|e| to_storage_err(e.to_string()))?;
    if updated == 0 {
        return Err(CausewayError::ComponentNotFound { id: id.to_string() });
    }
    Ok(())
}

/// Delete every component and edge. The lock row survives.
pub fn clear(conn: &Connection) -> CausewayResult<()> {
    conn.execute_batch("DELETE FROM calls; DELETE FROM components;")
        .map_err(|e| to_storage_err(e.to_string()))
}
