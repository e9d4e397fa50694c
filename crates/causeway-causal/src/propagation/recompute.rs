use std::collections::HashSet;

use tracing::debug;

use causeway_core::errors::{CausalError, CausewayResult};
use causeway_core::models::ComponentStatus;
use causeway_core::traits::IGraphStore;

use super::change_set::ChangeSet;
use crate::chain::{find_causal_chain, to_graph};
use crate::graph::find_ends;

/// Reclassify the causal subgraph rooted at `root`: ends become
/// `PERPETRATOR`, every other member `VICTIM`.
pub fn recompute<S: IGraphStore>(
    store: &S,
    root: &str,
    changes: &mut ChangeSet,
) -> CausewayResult<()> {
    let chain = find_causal_chain(store, root)?;
    if chain.is_empty() {
        return Ok(());
    }

    let statuses = store.statuses_of(&chain)?;
    let graph = to_graph(store, root, &chain)?;
    let ends: HashSet<String> = find_ends(root, graph)?
        .into_iter()
        .map(|end| end.id)
        .collect();

    for member in &chain {
        let current = statuses.get(member).copied().ok_or_else(|| {
            CausalError::GraphInconsistency {
                details: format!("chain member {member} has no component"),
            }
        })?;
        let target = if ends.contains(member) {
            ComponentStatus::Perpetrator
        } else {
            ComponentStatus::Victim
        };
        if current != target {
            transition(store, changes, member, current, target)?;
        }
    }
    debug!(root, members = chain.len(), ends = ends.len(), "recomputed causal subgraph");
    Ok(())
}

/// Write `to` and record the change.
pub fn transition<S: IGraphStore>(
    store: &S,
    changes: &mut ChangeSet,
    id: &str,
    from: ComponentStatus,
    to: ComponentStatus,
) -> CausewayResult<()> {
    store.set_status(id, to)?;
    changes.record(id, from, to);
    Ok(())
}
