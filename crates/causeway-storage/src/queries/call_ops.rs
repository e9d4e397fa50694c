//! `calls` edges: upsert, adjacency reads, and the callee status cache.

use rusqlite::{params, Connection};

use causeway_core::errors::{CausewayError, CausewayResult};
use causeway_core::models::{CallEdge, ComponentStatus};

use super::{component_ops, ids_param, now_rfc3339, parse_status};
use crate::to_storage_err;

/// Upsert `caller → callee`. Missing endpoints are created as `INITIALIZING`;
/// the callee cache is taken from the callee's current status.
pub fn upsert_call(conn: &Connection, caller: &str, callee: &str) -> CausewayResult<()> {
    component_ops::insert_if_missing(conn, caller)?;
    component_ops::insert_if_missing(conn, callee)?;
    let callee_status = component_ops::get_status(conn, callee)?.ok_or_else(|| {
        CausewayError::ComponentNotFound {
            id: callee.to_string(),
        }
    })?;

    conn.prepare_cached(
        "INSERT INTO calls (caller_id, callee_id, callee_status, callee_is_abnormal, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT (caller_id, callee_id) DO UPDATE SET
            callee_status = excluded.callee_status,
            callee_is_abnormal = excluded.callee_is_abnormal,
            updated_at = excluded.updated_at",
    )
    .and_then(|mut stmt| {
        stmt.execute(params![
            caller,
            callee,
            callee_status.as_str(),
            callee_status.is_anomalous(),
            now_rfc3339(),
        ])
    })
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Mirror `status` onto every edge pointing at `callee`.
pub fn refresh_callee_cache(
    conn: &Connection,
    callee: &str,
    status: ComponentStatus,
) -> CausewayResult<()> {
    conn.prepare_cached(
        "UPDATE calls SET callee_status = ?2, callee_is_abnormal = ?3, updated_at = ?4
         WHERE callee_id = ?1",
    )
    .and_then(|mut stmt| {
        stmt.execute(params![
            callee,
            status.as_str(),
            status.is_anomalous(),
            now_rfc3339(),
        ])
    })
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Direct callees of `id`, sorted.
pub fn dependencies_of(conn: &Connection, id: &str) -> CausewayResult<Vec<String>> {
    collect_ids(
        conn,
        "SELECT callee_id FROM calls WHERE caller_id = ?1 ORDER BY callee_id",
        id,
    )
}

/// Direct callers of `id`, sorted.
pub fn consumers_of(conn: &Connection, id: &str) -> CausewayResult<Vec<String>> {
    collect_ids(
        conn,
        "SELECT caller_id FROM calls WHERE callee_id = ?1 ORDER BY caller_id",
        id,
    )
}

/// Direct callers of `id` whose own status is `status`.
pub fn callers_with_status(
    conn: &Connection,
    id: &str,
    status: ComponentStatus,
) -> CausewayResult<Vec<String>> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT c.caller_id FROM calls c
             JOIN components p ON p.id = c.caller_id
             WHERE c.callee_id = ?1 AND p.status = ?2
             ORDER BY c.caller_id",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![id, status.as_str()], |row| row.get::<_, String>(0))
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut result = Vec::new();
    for row in rows {
        result.push(row.map_err(|e| to_storage_err(e.to_string()))?);
    }
    Ok(result)
}

/// Every edge whose caller and callee are both in `ids`.
pub fn edges_among(conn: &Connection, ids: &[String]) -> CausewayResult<Vec<CallEdge>> {
    query_edges(
        conn,
        "SELECT caller_id, callee_id, callee_status, callee_is_abnormal FROM calls
         WHERE caller_id IN (SELECT value FROM json_each(?1))
           AND callee_id IN (SELECT value FROM json_each(?1))
         ORDER BY caller_id, callee_id",
        params![ids_param(ids)?],
    )
}

/// Every edge in the graph.
pub fn all_edges(conn: &Connection) -> CausewayResult<Vec<CallEdge>> {
    query_edges(
        conn,
        "SELECT caller_id, callee_id, callee_status, callee_is_abnormal FROM calls
         ORDER BY caller_id, callee_id",
        params![],
    )
}

fn collect_ids(conn: &Connection, sql: &str, id: &str) -> CausewayResult<Vec<String>> {
    let mut stmt = conn
        .prepare_cached(sql)
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![id], |row| row.get::<_, String>(0))
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut result = Vec::new();
    for row in rows {
        result.push(row.map_err(|e| to_storage_err(e.to_string()))?);
    }
    Ok(result)
}

fn query_edges<P: rusqlite::Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> CausewayResult<Vec<CallEdge>> {
    let mut stmt = conn
        .prepare_cached(sql)
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params, |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, bool>(3)?,
            ))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut result = Vec::new();
    for row in rows {
        let (caller_id, callee_id, callee_status, callee_is_abnormal) =
            row.map_err(|e| to_storage_err(e.to_string()))?;
        result.push(CallEdge {
            caller_id,
            callee_id,
            callee_status: parse_status(&callee_status)?,
            callee_is_abnormal,
        });
    }
    Ok(result)
}
