//! `GraphSnapshot`: a deferred read transaction giving one consistent view.

use std::collections::{BTreeMap, HashMap};

use rusqlite::Connection;

use causeway_core::errors::CausewayResult;
use causeway_core::models::{CallEdge, Component, ComponentState, ComponentStatus};
use causeway_core::traits::IGraphReader;

use crate::queries::{call_ops, chain_ops, component_ops};

/// Borrowed connection inside an open read transaction. Created by
/// [`StorageEngine::with_snapshot`](crate::StorageEngine::with_snapshot).
pub struct GraphSnapshot<'c> {
    conn: &'c Connection,
}

impl<'c> GraphSnapshot<'c> {
    pub(crate) fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    pub fn component(&self, id: &str) -> CausewayResult<Option<Component>> {
        component_ops::get_component(self.conn, id)
    }

    pub fn components(&self) -> CausewayResult<BTreeMap<String, Component>> {
        component_ops::list_components(self.conn)
    }
}

impl IGraphReader for GraphSnapshot<'_> {
    fn get_component(&self, id: &str) -> CausewayResult<Option<ComponentState>> {
        component_ops::get_state(self.conn, id)
    }

    fn causal_chain(&self, id: &str) -> CausewayResult<Vec<String>> {
        chain_ops::causal_chain(self.conn, id)
    }

    fn edges_among(&self, ids: &[String]) -> CausewayResult<Vec<CallEdge>> {
        call_ops::edges_among(self.conn, ids)
    }

    fn statuses_of(&self, ids: &[String]) -> CausewayResult<HashMap<String, ComponentStatus>> {
        component_ops::statuses_of(self.conn, ids)
    }

    fn callers_with_status(
        &self,
        id: &str,
        status: ComponentStatus,
    ) -> CausewayResult<Vec<String>> {
        call_ops::callers_with_status(self.conn, id, status)
    }

    fn perpetrator_chain(&self, id: &str) -> CausewayResult<Vec<String>> {
        chain_ops::perpetrator_chain(self.conn, id)
    }

    fn downstream(&self, id: &str) -> CausewayResult<Vec<String>> {
        chain_ops::downstream(self.conn, id)
    }
}
