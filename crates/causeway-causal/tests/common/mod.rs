#![allow(dead_code)]

use causeway_causal::CausalEngine;
use causeway_core::config::ThresholdOverrides;
use causeway_core::models::{ComponentCall, ComponentStatus};

/// In-memory engine over `edges`, every component graduated to NORMAL, with
/// abnormal/normal thresholds of `k`.
pub fn engine(edges: &[(&str, &str)], k: u32) -> CausalEngine {
    let engine = CausalEngine::open_in_memory().unwrap();
    prepare(&engine, edges, k);
    engine
}

pub fn prepare(engine: &CausalEngine, edges: &[(&str, &str)], k: u32) {
    let calls: Vec<_> = edges
        .iter()
        .map(|(caller, callee)| ComponentCall::new(*caller, *callee))
        .collect();
    engine.add(&calls).unwrap();
    graduate(engine, k);
}

/// Graduate every INITIALIZING component, then apply thresholds `k`.
pub fn graduate(engine: &CausalEngine, k: u32) {
    engine
        .set_transitioning_thresholds(ThresholdOverrides::all(1, k, k))
        .unwrap();
    for (id, component) in engine.get_full_graph().unwrap() {
        if component.status == ComponentStatus::Initializing {
            engine
                .update_component_status(&id, ComponentStatus::Normal)
                .unwrap();
        }
    }
}

pub fn status(engine: &CausalEngine, id: &str) -> ComponentStatus {
    engine.search(id).unwrap().status
}

pub fn sorted(mut ids: Vec<String>) -> Vec<String> {
    ids.sort();
    ids
}
