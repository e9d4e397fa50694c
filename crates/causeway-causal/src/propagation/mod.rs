//! The single write path: debounce an observation, then reclassify the
//! affected part of the graph inside the caller's transaction.

mod change_set;
mod recompute;

use std::collections::HashSet;

use tracing::{debug, info};

use causeway_core::config::ThresholdConfig;
use causeway_core::errors::{CausewayError, CausewayResult};
use causeway_core::models::{ChangeMap, ComponentStatus};
use causeway_core::traits::IGraphStore;

use crate::status::{decide, Decision};

pub use change_set::ChangeSet;
pub use recompute::recompute;

/// Apply `observed` to `id` and propagate any committed transition.
///
/// Runs entirely on `store`, which is expected to be an open transaction:
/// an error leaves the caller to roll back.
pub fn propagate<S: IGraphStore>(
    store: &S,
    id: &str,
    observed: ComponentStatus,
    thresholds: &ThresholdConfig,
) -> CausewayResult<ChangeMap> {
    store.acquire_exclusive_lock()?;

    let state = store
        .get_component(id)?
        .ok_or_else(|| CausewayError::ComponentNotFound { id: id.to_string() })?;

    let to = match decide(state.status, state.transition_counter, observed, thresholds)? {
        Decision::NoOp => return Ok(ChangeMap::new()),
        Decision::Progress { counter } => {
            store.set_transition_counter(id, counter)?;
            debug!(id, counter, "transition in progress");
            return Ok(ChangeMap::new());
        }
        Decision::Commit { to } => to,
    };

    let mut changes = ChangeSet::new();
    store.set_transition_counter(id, 0)?;
    recompute::transition(store, &mut changes, id, state.status, to)?;
    info!(id, from = %state.status, to = %to, "status committed");

    if to.is_anomalous() {
        demote_perpetrators(store, id, &mut changes)?;
        recompute(store, id, &mut changes)?;
    } else {
        let partners = clear_cycle_partners(store, id, &mut changes)?;
        for candidate in recovery_candidates(store, id, &partners)? {
            recompute(store, &candidate, &mut changes)?;
        }
    }

    Ok(changes.into_map())
}

/// Perpetrators upstream of a newly abnormal component are now victims of it.
fn demote_perpetrators<S: IGraphStore>(
    store: &S,
    id: &str,
    changes: &mut ChangeSet,
) -> CausewayResult<()> {
    for caller in store.perpetrator_chain(id)? {
        recompute::transition(
            store,
            changes,
            &caller,
            ComponentStatus::Perpetrator,
            ComponentStatus::Victim,
        )?;
    }
    Ok(())
}

/// Perpetrators upstream of a healed component that it also depends on share
/// its cycle, so they heal with it. Returns the cleared ids.
fn clear_cycle_partners<S: IGraphStore>(
    store: &S,
    id: &str,
    changes: &mut ChangeSet,
) -> CausewayResult<Vec<String>> {
    let upstream = store.perpetrator_chain(id)?;
    if upstream.is_empty() {
        return Ok(upstream);
    }
    let downstream: HashSet<String> = store.downstream(id)?.into_iter().collect();
    let partners: Vec<String> = upstream
        .into_iter()
        .filter(|caller| downstream.contains(caller))
        .collect();

    for partner in &partners {
        store.set_transition_counter(partner, 0)?;
        recompute::transition(
            store,
            changes,
            partner,
            ComponentStatus::Perpetrator,
            ComponentStatus::Normal,
        )?;
    }
    if !partners.is_empty() {
        debug!(id, partners = partners.len(), "cleared cycle partners");
    }
    Ok(partners)
}

/// Callers whose classification may depend on a component that just healed,
/// or on one of its cleared cycle partners.
fn recovery_candidates<S: IGraphStore>(
    store: &S,
    id: &str,
    partners: &[String],
) -> CausewayResult<Vec<String>> {
    let mut candidates = store.callers_with_status(id, ComponentStatus::Victim)?;
    for partner in partners {
        candidates.extend(store.callers_with_status(partner, ComponentStatus::Victim)?);
    }
    candidates.extend(store.perpetrator_chain(id)?);

    let mut seen = HashSet::with_capacity(candidates.len());
    candidates.retain(|candidate| seen.insert(candidate.clone()));
    Ok(candidates)
}
