use std::collections::HashMap;

use crate::errors::CausewayResult;
use crate::models::{CallEdge, ComponentState, ComponentStatus};

/// Read surface every root-cause query needs. Implementations answer from a
/// single consistent view (a transaction or a read snapshot).
pub trait IGraphReader {
    /// Status, transition counter and direct dependencies of `id`.
    fn get_component(&self, id: &str) -> CausewayResult<Option<ComponentState>>;

    /// `id` followed by every component reachable through edges whose callee
    /// is cached as abnormal. Empty when `id` itself is not abnormal.
    fn causal_chain(&self, id: &str) -> CausewayResult<Vec<String>>;

    /// Every `CALLS` edge whose caller and callee are both in `ids`.
    fn edges_among(&self, ids: &[String]) -> CausewayResult<Vec<CallEdge>>;

    /// Current status of each id in `ids` that exists.
    fn statuses_of(&self, ids: &[String]) -> CausewayResult<HashMap<String, ComponentStatus>>;

    /// Direct callers of `id` whose own status is `status`.
    fn callers_with_status(&self, id: &str, status: ComponentStatus)
        -> CausewayResult<Vec<String>>;

    /// `PERPETRATOR` callers of `id`, followed transitively through callers
    /// that are themselves `PERPETRATOR`. Never contains `id`.
    fn perpetrator_chain(&self, id: &str) -> CausewayResult<Vec<String>>;

    /// Every component reachable from `id` through `CALLS` edges, sorted.
    /// Contains `id` only when `id` sits on a cycle.
    fn downstream(&self, id: &str) -> CausewayResult<Vec<String>>;
}

/// Transactional write surface. Writes are only visible to others once the
/// owning transaction commits.
pub trait IGraphStore: IGraphReader {
    /// Take the singleton exclusive-lock row for the rest of the transaction.
    fn acquire_exclusive_lock(&self) -> CausewayResult<()>;

    /// Upsert `caller → callee`, creating unseen endpoints as `INITIALIZING`.
    /// Without a caller only the callee is registered.
    fn add_call(&self, caller: Option<&str>, callee: &str) -> CausewayResult<()>;

    /// Write `status` and refresh the callee caches of every incoming edge.
    fn set_status(&self, id: &str, status: ComponentStatus) -> CausewayResult<()>;

    fn set_transition_counter(&self, id: &str, counter: u32) -> CausewayResult<()>;
}
