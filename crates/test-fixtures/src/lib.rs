//! Test fixture loader for causeway topology scenarios.
//!
//! Topologies are JSON files under `topologies/`: a set of call edges, the
//! components to mark abnormal, and the expected causal chains and root
//! causes per component.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Root directory of the fixture files.
fn fixtures_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

/// Load and deserialize a JSON fixture file.
///
/// # Panics
/// Panics if the file doesn't exist or can't be deserialized.
pub fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> T {
    let path = fixtures_root().join(relative_path);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path.display(), e))
}

/// Check that a fixture file exists.
pub fn fixture_exists(relative_path: &str) -> bool {
    fixtures_root().join(relative_path).exists()
}

/// List all JSON files in a fixture subdirectory, sorted.
pub fn list_fixtures(subdir: &str) -> Vec<PathBuf> {
    let dir = fixtures_root().join(subdir);
    if !dir.exists() {
        return Vec::new();
    }
    let mut files: Vec<PathBuf> = std::fs::read_dir(&dir)
        .unwrap_or_else(|e| panic!("Failed to read directory {}: {}", dir.display(), e))
        .filter_map(|entry| {
            let path = entry.ok()?.path();
            path.extension().is_some_and(|ext| ext == "json").then_some(path)
        })
        .collect();
    files.sort();
    files
}

/// A call graph with abnormal markings and expected query results.
#[derive(Debug, Clone, Deserialize)]
pub struct Topology {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// `[caller, callee]` pairs.
    pub edges: Vec<(String, String)>,
    /// Components registered without any caller.
    #[serde(default)]
    pub lone: Vec<String>,
    /// Components whose status is set to `CONFIRMED`; all others stay `NORMAL`.
    pub abnormal: Vec<String>,
    /// Expected causal-chain members per component, order not significant.
    #[serde(default)]
    pub expected_causal_chains: BTreeMap<String, Vec<String>>,
    /// Expected root causes per component, order not significant.
    #[serde(default)]
    pub expected_root_causes: BTreeMap<String, Vec<String>>,
}

impl Topology {
    /// Every component id named by an edge or a lone entry, sorted.
    pub fn components(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .edges
            .iter()
            .flat_map(|(caller, callee)| [caller.clone(), callee.clone()])
            .chain(self.lone.iter().cloned())
            .collect();
        ids.sort();
        ids.dedup();
        ids
    }
}

/// Load a topology by file stem, e.g. `load_topology("cyclic_mesh")`.
pub fn load_topology(name: &str) -> Topology {
    load_fixture(&format!("topologies/{name}.json"))
}

/// Every topology under `topologies/`.
pub fn all_topologies() -> Vec<Topology> {
    list_fixtures("topologies")
        .into_iter()
        .map(|path| {
            let content = std::fs::read_to_string(&path)
                .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
            serde_json::from_str(&content)
                .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path.display(), e))
        })
        .collect()
}
