//! `GraphTransaction`: one `BEGIN IMMEDIATE` write transaction on the
//! serialized writer. Dropped without `commit` means rolled back.

use std::collections::HashMap;
use std::sync::MutexGuard;

use rusqlite::Connection;
use tracing::{debug, warn};

use causeway_core::errors::CausewayResult;
use causeway_core::models::{CallEdge, ComponentState, ComponentStatus};
use causeway_core::traits::{IGraphReader, IGraphStore};

use crate::queries::{call_ops, chain_ops, component_ops, lock_ops};
use crate::to_storage_err;

pub struct GraphTransaction<'a> {
    conn: MutexGuard<'a, Connection>,
    holder: String,
    finished: bool,
}

impl<'a> GraphTransaction<'a> {
    /// Start a write transaction on an already locked writer.
    pub fn begin(
        conn: MutexGuard<'a, Connection>,
        holder: impl Into<String>,
    ) -> CausewayResult<Self> {
        conn.execute_batch("BEGIN IMMEDIATE")
            .map_err(|e| to_storage_err(format!("begin transaction: {e}")))?;
        let holder = holder.into();
        debug!(holder = %holder, "graph transaction started");
        Ok(Self {
            conn,
            holder,
            finished: false,
        })
    }

    pub fn holder(&self) -> &str {
        &self.holder
    }

    pub fn commit(mut self) -> CausewayResult<()> {
        self.finished = true;
        match self.conn.execute_batch("COMMIT") {
            Ok(()) => {
                debug!(holder = %self.holder, "graph transaction committed");
                Ok(())
            }
            Err(e) => {
                // A failed COMMIT can leave the transaction open.
                if !self.conn.is_autocommit() {
                    let _ = self.conn.execute_batch("ROLLBACK");
                }
                Err(to_storage_err(format!("commit transaction: {e}")))
            }
        }
    }

    pub fn rollback(mut self) -> CausewayResult<()> {
        self.finished = true;
        self.conn
            .execute_batch("ROLLBACK")
            .map_err(|e| to_storage_err(format!("rollback transaction: {e}")))?;
        debug!(holder = %self.holder, "graph transaction rolled back");
        Ok(())
    }

    /// Delete every component and edge.
    pub fn clear(&self) -> CausewayResult<()> {
        component_ops::clear(&self.conn)
    }
}

impl Drop for GraphTransaction<'_> {
    fn drop(&mut self) {
        if self.finished || self.conn.is_autocommit() {
            return;
        }
        if let Err(e) = self.conn.execute_batch("ROLLBACK") {
            warn!(holder = %self.holder, error = %e, "rollback of abandoned transaction failed");
        } else {
            debug!(holder = %self.holder, "abandoned graph transaction rolled back");
        }
    }
}

impl IGraphReader for GraphTransaction<'_> {
    fn get_component(&self, id: &str) -> CausewayResult<Option<ComponentState>> {
        component_ops::get_state(&self.conn, id)
    }

    fn causal_chain(&self, id: &str) -> CausewayResult<Vec<String>> {
        chain_ops::causal_chain(&self.conn, id)
    }

    fn edges_among(&self, ids: &[String]) -> CausewayResult<Vec<CallEdge>> {
        call_ops::edges_among(&self.conn, ids)
    }

    fn statuses_of(&self, ids: &[String]) -> CausewayResult<HashMap<String, ComponentStatus>> {
        component_ops::statuses_of(&self.conn, ids)
    }

    fn callers_with_status(
        &self,
        id: &str,
        status: ComponentStatus,
    ) -> CausewayResult<Vec<String>> {
        call_ops::callers_with_status(&self.conn, id, status)
    }

    fn perpetrator_chain(&self, id: &str) -> CausewayResult<Vec<String>> {
        chain_ops::perpetrator_chain(&self.conn, id)
    }

    fn downstream(&self, id: &str) -> CausewayResult<Vec<String>> {
        chain_ops::downstream(&self.conn, id)
    }
}

impl IGraphStore for GraphTransaction<'_> {
    fn acquire_exclusive_lock(&self) -> CausewayResult<()> {
        lock_ops::acquire(&self.conn, &self.holder)
    }

    fn add_call(&self, caller: Option<&str>, callee: &str) -> CausewayResult<()> {
        match caller {
            Some(caller) => call_ops::upsert_call(&self.conn, caller, callee),
            None => component_ops::insert_if_missing(&self.conn, callee).map(|_| ()),
        }
    }

    fn set_status(&self, id: &str, status: ComponentStatus) -> CausewayResult<()> {
        component_ops::set_status(&self.conn, id, status)
    }

    fn set_transition_counter(&self, id: &str, counter: u32) -> CausewayResult<()> {
        component_ops::set_transition_counter(&self.conn, id, counter)
    }
}

