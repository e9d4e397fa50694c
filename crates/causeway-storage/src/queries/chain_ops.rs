//! Recursive traversals: the abnormal causal chain downstream of a component,
//! its full dependency closure, and the perpetrator chain upstream of it.

use std::collections::HashSet;

use rusqlite::{params, Connection};

use causeway_core::errors::CausewayResult;

use super::component_ops;
use crate::to_storage_err;

/// `id` followed by every component reachable through edges whose callee is
/// cached as abnormal, deduplicated. Empty when `id` is missing or not
/// abnormal. `UNION` keeps the traversal finite on cycles.
pub fn causal_chain(conn: &Connection, id: &str) -> CausewayResult<Vec<String>> {
    match component_ops::get_status(conn, id)? {
        Some(status) if status.is_anomalous() => {}
        _ => return Ok(Vec::new()),
    }

    let reached = collect(
        conn,
        "WITH RECURSIVE chain(id) AS (
            SELECT ?1
            UNION
            SELECT c.callee_id FROM calls c
            JOIN chain ON c.caller_id = chain.id
            WHERE c.callee_is_abnormal = 1
        )
        SELECT id FROM chain",
        id,
    )?;

    let mut seen = HashSet::with_capacity(reached.len());
    seen.insert(id.to_string());
    let mut chain = Vec::with_capacity(reached.len());
    chain.push(id.to_string());
    chain.extend(reached.into_iter().filter(|member| seen.insert(member.clone())));
    Ok(chain)
}

/// `PERPETRATOR` callers of `id`, followed upstream through callers that are
/// themselves `PERPETRATOR`. Never contains `id`.
pub fn perpetrator_chain(conn: &Connection, id: &str) -> CausewayResult<Vec<String>> {
    collect(
        conn,
        "WITH RECURSIVE upstream(id) AS (
            SELECT c.caller_id FROM calls c
            JOIN components p ON p.id = c.caller_id
            WHERE c.callee_id = ?1 AND p.status = 'PERPETRATOR'
            UNION
            SELECT c.caller_id FROM calls c
            JOIN upstream u ON c.callee_id = u.id
            JOIN components p ON p.id = c.caller_id
            WHERE p.status = 'PERPETRATOR'
        )
        SELECT id FROM upstream WHERE id != ?1 ORDER BY id",
        id,
    )
}

/// Every component reachable from `id` through `CALLS` edges, whatever its
/// status. Contains `id` only when `id` sits on a cycle.
pub fn downstream(conn: &Connection, id: &str) -> CausewayResult<Vec<String>> {
    collect(
        conn,
        "WITH RECURSIVE down(id) AS (
            SELECT callee_id FROM calls WHERE caller_id = ?1
            UNION
            SELECT c.callee_id FROM calls c
            JOIN down d ON c.caller_id = d.id
        )
        SELECT id FROM down ORDER BY id",
        id,
    )
}

fn collect(conn: &Connection, sql: &str, id: &str) -> CausewayResult<Vec<String>> {
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
