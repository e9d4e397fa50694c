//! End-to-end status propagation through `CausalEngine`.

mod common;

use std::sync::{Arc, Mutex};

use causeway_causal::CausalEngine;
use causeway_core::config::ThresholdOverrides;
use causeway_core::errors::{CausewayError, CausewayResult};
use causeway_core::models::{Change, ChangeMap, ComponentCall, ComponentStatus};
use causeway_core::traits::IChangeSink;

use common::{engine, status};
use ComponentStatus::*;

fn single(changes: &ChangeMap, id: &str, from: ComponentStatus, to: ComponentStatus) {
    assert_eq!(changes.get(id), Some(&Change::new(id, from, to)), "{changes:?}");
}

#[test]
fn single_node_lifecycle() {
    let engine = engine(&[], 3);
    engine.add(&[ComponentCall::callee_only("a")]).unwrap();
    common::graduate(&engine, 3);

    assert!(engine.update_component_status("a", Normal).unwrap().is_empty());
    assert!(engine.update_component_status("a", Confirmed).unwrap().is_empty());
    assert!(engine.update_component_status("a", Confirmed).unwrap().is_empty());

    let changes = engine.update_component_status("a", Confirmed).unwrap();
    assert_eq!(changes.len(), 1);
    single(&changes, "a", Normal, Perpetrator);

    assert!(engine.update_component_status("a", Confirmed).unwrap().is_empty());

    assert!(engine.update_component_status("a", Normal).unwrap().is_empty());
    assert!(engine.update_component_status("a", Normal).unwrap().is_empty());
    let changes = engine.update_component_status("a", Normal).unwrap();
    assert_eq!(changes.len(), 1);
    single(&changes, "a", Perpetrator, Normal);
}

#[test]
fn interrupted_run_resets_the_counter() {
    let engine = engine(&[("a", "b")], 3);
    engine.update_component_status("a", Confirmed).unwrap();
    engine.update_component_status("a", Confirmed).unwrap();
    assert_eq!(engine.search("a").unwrap().transition_counter, 2);

    assert!(engine.update_component_status("a", Normal).unwrap().is_empty());
    assert_eq!(engine.search("a").unwrap().transition_counter, 0);

    engine.update_component_status("a", Confirmed).unwrap();
    engine.update_component_status("a", Confirmed).unwrap();
    assert_eq!(status(&engine, "a"), Normal);
}

#[test]
fn chain_of_three() {
    let engine = engine(&[("a", "b"), ("b", "c")], 1);

    single(&engine.update_component_status("a", Confirmed).unwrap(), "a", Normal, Perpetrator);
    single(&engine.update_component_status("c", Confirmed).unwrap(), "c", Normal, Perpetrator);

    let changes = engine.update_component_status("b", Confirmed).unwrap();
    assert_eq!(changes.len(), 2);
    single(&changes, "a", Perpetrator, Victim);
    single(&changes, "b", Normal, Victim);
    assert_eq!(status(&engine, "c"), Perpetrator);

    let changes = engine.update_component_status("b", Normal).unwrap();
    assert_eq!(changes.len(), 2);
    single(&changes, "b", Victim, Normal);
    single(&changes, "a", Victim, Perpetrator);
    assert_eq!(status(&engine, "c"), Perpetrator);
}

#[test]
fn two_node_cycle() {
    let engine = engine(&[("a", "b"), ("b", "a")], 1);

    single(&engine.update_component_status("a", Confirmed).unwrap(), "a", Normal, Perpetrator);
    let changes = engine.update_component_status("b", Confirmed).unwrap();
    assert_eq!(changes.len(), 1);
    single(&changes, "b", Normal, Perpetrator);
    assert_eq!(status(&engine, "a"), Perpetrator);

    // Healing either member heals the whole cycle.
    let changes = engine.update_component_status("a", Normal).unwrap();
    assert_eq!(changes.len(), 2);
    single(&changes, "a", Perpetrator, Normal);
    single(&changes, "b", Perpetrator, Normal);
    assert_eq!(status(&engine, "b"), Normal);
    assert!(engine.find_root_causes("b").unwrap().is_empty());

    assert!(engine.update_component_status("b", Normal).unwrap().is_empty());
}

#[test]
fn healing_the_other_cycle_member_works_the_same() {
    let engine = engine(&[("a", "b"), ("b", "a")], 1);
    engine.update_component_status("a", Confirmed).unwrap();
    engine.update_component_status("b", Confirmed).unwrap();

    let changes = engine.update_component_status("b", Normal).unwrap();
    assert_eq!(changes.len(), 2);
    single(&changes, "a", Perpetrator, Normal);
    single(&changes, "b", Perpetrator, Normal);
}

#[test]
fn cycle_members_share_the_exit() {
    // a and b form a cycle whose only way out is c: both are victims of c.
    let engine = engine(&[("a", "b"), ("b", "a"), ("b", "c")], 1);
    engine.update_component_status("c", Confirmed).unwrap();
    engine.update_component_status("a", Confirmed).unwrap();
    engine.update_component_status("b", Confirmed).unwrap();

    assert_eq!(status(&engine, "a"), Victim);
    assert_eq!(status(&engine, "b"), Victim);
    assert_eq!(status(&engine, "c"), Perpetrator);

    let roots = engine.find_root_causes("a").unwrap();
    assert_eq!(roots.len(), 1);
    assert_eq!(roots[0].id, "c");
}

#[test]
fn root_causes_of_a_healthy_node_are_empty() {
    let engine = engine(&[("a", "b"), ("b", "c")], 1);
    engine.update_component_status("c", Confirmed).unwrap();

    let before = engine.get_full_graph().unwrap();
    assert!(engine.find_root_causes("a").unwrap().is_empty());
    assert!(engine.find_root_causes("unknown").unwrap().is_empty());
    assert!(engine.find_causal_chain("a").unwrap().is_empty());
    assert_eq!(engine.get_full_graph().unwrap(), before);
}

#[test]
fn same_category_updates_are_idempotent() {
    let engine = engine(&[("a", "b")], 1);
    engine.update_component_status("b", Confirmed).unwrap();
    let before = engine.get_full_graph().unwrap();

    for _ in 0..3 {
        assert!(engine.update_component_status("a", Normal).unwrap().is_empty());
        assert!(engine.update_component_status("b", Perpetrator).unwrap().is_empty());
    }
    assert_eq!(engine.get_full_graph().unwrap(), before);
}

#[test]
fn rejects_bad_observations_and_unknown_ids() {
    let engine = engine(&[("a", "b")], 1);
    assert!(matches!(
        engine.update_component_status_str("a", "sideways"),
        Err(CausewayError::InvalidStatus { .. })
    ));
    assert!(matches!(
        engine.update_component_status("a", Initializing),
        Err(CausewayError::InvalidStatus { .. })
    ));
    assert!(matches!(
        engine.update_component_status("ghost", Confirmed),
        Err(CausewayError::ComponentNotFound { .. })
    ));
    assert!(matches!(
        engine.search("ghost"),
        Err(CausewayError::ComponentNotFound { .. })
    ));

    let changes = engine.update_component_status_str("a", "confirmed").unwrap();
    single(&changes, "a", Normal, Perpetrator);
}

#[test]
fn failed_update_leaves_no_trace() {
    let engine = engine(&[("a", "b"), ("b", "c")], 1);
    engine.update_component_status("a", Confirmed).unwrap();
    engine.update_component_status("c", Confirmed).unwrap();
    let before = engine.get_full_graph().unwrap();

    engine
        .storage()
        .pool()
        .writer
        .with_conn_sync(|conn| {
            conn.execute_batch(
                "CREATE TRIGGER fail_victim_b BEFORE UPDATE OF status ON components
                 WHEN NEW.id = 'b' AND NEW.status = 'VICTIM'
                 BEGIN SELECT RAISE(ABORT, 'injected failure'); END;",
            )
            .map_err(|e| causeway_storage::to_storage_err(e.to_string()))
        })
        .unwrap();

    let err = engine.update_component_status("b", Confirmed).unwrap_err();
    assert!(err.to_string().contains("injected failure"), "{err}");
    assert_eq!(engine.get_full_graph().unwrap(), before);
    assert_eq!(engine.find_causal_chain("a").unwrap(), vec!["a".to_string()]);

    engine
        .storage()
        .pool()
        .writer
        .with_conn_sync(|conn| {
            conn.execute_batch("DROP TRIGGER fail_victim_b")
                .map_err(|e| causeway_storage::to_storage_err(e.to_string()))
        })
        .unwrap();
    assert_eq!(engine.update_component_status("b", Confirmed).unwrap().len(), 2);
}

#[test]
fn thresholds_can_be_overridden_partially() {
    let engine = CausalEngine::open_in_memory().unwrap();
    let defaults = engine.thresholds().unwrap();
    assert_eq!((defaults.initializing, defaults.confirmed, defaults.normal), (30, 3, 3));

    let updated = engine
        .set_transitioning_thresholds(ThresholdOverrides {
            confirmed: Some(5),
            ..ThresholdOverrides::default()
        })
        .unwrap();
    assert_eq!((updated.initializing, updated.confirmed, updated.normal), (30, 5, 3));
    assert_eq!(engine.thresholds().unwrap(), updated);
}

#[test]
fn clear_resets_everything() {
    let engine = engine(&[("a", "b")], 1);
    engine.update_component_status("b", Confirmed).unwrap();
    engine.clear().unwrap();
    assert!(engine.get_full_graph().unwrap().is_empty());
    assert!(engine.find_root_causes("b").unwrap().is_empty());
}

#[derive(Default)]
struct RecordingSink {
    received: Mutex<Vec<ChangeMap>>,
}

impl IChangeSink for RecordingSink {
    fn notify(&self, changes: &ChangeMap) -> CausewayResult<()> {
        self.received.lock().unwrap().push(changes.clone());
        Ok(())
    }
}

struct FailingSink;

impl IChangeSink for FailingSink {
    fn notify(&self, _changes: &ChangeMap) -> CausewayResult<()> {
        Err(CausewayError::ConfigError("sink offline".to_string()))
    }
}

#[test]
fn sink_receives_committed_changes_only() {
    let sink = Arc::new(RecordingSink::default());
    let engine = CausalEngine::open_in_memory()
        .unwrap()
        .with_sink(sink.clone());
    common::prepare(&engine, &[("a", "b")], 2);
    let graduations = sink.received.lock().unwrap().len();
    assert_eq!(graduations, 2);

    engine.update_component_status("b", Confirmed).unwrap();
    assert_eq!(sink.received.lock().unwrap().len(), graduations);

    let changes = engine.update_component_status("b", Confirmed).unwrap();
    let received = sink.received.lock().unwrap();
    assert_eq!(received.len(), graduations + 1);
    assert_eq!(received.last(), Some(&changes));
}

#[test]
fn failing_sink_does_not_undo_the_update() {
    let engine = CausalEngine::open_in_memory()
        .unwrap()
        .with_sink(Arc::new(FailingSink));
    common::prepare(&engine, &[("a", "b")], 1);

    let changes = engine.update_component_status("b", Confirmed).unwrap();
    single(&changes, "b", Normal, Perpetrator);
    assert_eq!(status(&engine, "b"), Perpetrator);
}
