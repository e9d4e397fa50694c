//! CausalEngine: the public facade over storage, root-cause queries and
//! status propagation.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, RwLock};

use tracing::{debug, info, warn};
use uuid::Uuid;

use causeway_core::config::{CausewayConfig, ThresholdConfig, ThresholdOverrides};
use causeway_core::constants::VERSION;
use causeway_core::errors::{CausewayError, CausewayResult};
use causeway_core::models::{ChangeMap, Component, ComponentCall, ComponentStatus};
use causeway_core::traits::IChangeSink;
use causeway_observability::{ingestion_span, propagation_span, root_cause_span};
use causeway_storage::StorageEngine;

use crate::chain;
use crate::graph::RootCause;
use crate::propagation;

/// Shared through `Arc` across threads; every update is serialized by the
/// storage layer.
pub struct CausalEngine {
    storage: StorageEngine,
    thresholds: RwLock<ThresholdConfig>,
    /// Lock-row holder token of this engine.
    holder: String,
    sink: Option<Arc<dyn IChangeSink>>,
}

impl CausalEngine {
    /// Install tracing, open storage, and take the configured thresholds.
    pub fn open(config: &CausewayConfig) -> CausewayResult<Self> {
        if !causeway_observability::init_tracing(&config.observability)? {
            debug!("tracing subscriber already installed");
        }
        let storage = StorageEngine::open(&config.storage)?;
        Ok(Self::from_storage(storage, config.thresholds))
    }

    /// Open from a TOML config file.
    pub fn open_with_config_file(path: &Path) -> CausewayResult<Self> {
        Self::open(&CausewayConfig::load(path)?)
    }

    /// In-memory engine with default thresholds.
    pub fn open_in_memory() -> CausewayResult<Self> {
        Ok(Self::from_storage(
            StorageEngine::open_in_memory()?,
            ThresholdConfig::default(),
        ))
    }

    pub fn from_storage(storage: StorageEngine, thresholds: ThresholdConfig) -> Self {
        let holder = Uuid::new_v4().to_string();
        info!(holder = %holder, version = VERSION, "causal engine ready");
        Self {
            storage,
            thresholds: RwLock::new(thresholds),
            holder,
            sink: None,
        }
    }

    /// Hand every committed, non-empty change map to `sink`.
    pub fn with_sink(mut self, sink: Arc<dyn IChangeSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn storage(&self) -> &StorageEngine {
        &self.storage
    }

    pub fn holder(&self) -> &str {
        &self.holder
    }

    /// Ingest observed calls.
    pub fn add(&self, calls: &[ComponentCall]) -> CausewayResult<usize> {
        let span = ingestion_span!(calls.len());
        let _guard = span.enter();
        self.storage.add_calls(calls)
    }

    /// Snapshot of one component.
    pub fn search(&self, id: &str) -> CausewayResult<Component> {
        self.storage
            .search(id)?
            .ok_or_else(|| CausewayError::ComponentNotFound { id: id.to_string() })
    }

    /// Ids in the abnormal causal chain of `id`. Read-only.
    pub fn find_causal_chain(&self, id: &str) -> CausewayResult<Vec<String>> {
        self.storage
            .with_snapshot(|snapshot| chain::find_causal_chain(snapshot, id))
    }

    /// Root causes of `id`'s abnormality. Empty when `id` is healthy or
    /// unknown. Read-only.
    pub fn find_root_causes(&self, id: &str) -> CausewayResult<Vec<RootCause>> {
        let span = root_cause_span!(id);
        let _guard = span.enter();
        self.storage
            .with_snapshot(|snapshot| chain::find_root_causes(snapshot, id))
    }

    /// Feed one observation for `id` and return the resulting changes.
    /// All writes happen in one transaction; any error rolls them back.
    pub fn update_component_status(
        &self,
        id: &str,
        observed: ComponentStatus,
    ) -> CausewayResult<ChangeMap> {
        let thresholds = self.thresholds()?;
        let span = propagation_span!(id, observed);
        let _guard = span.enter();

        let tx = self.storage.begin(&self.holder)?;
        let changes = propagation::propagate(&tx, id, observed, &thresholds)?;
        tx.commit()?;

        span.record("changes", changes.len());
        if !changes.is_empty() {
            info!(id, changes = changes.len(), "status update committed");
            self.notify(&changes);
        }
        Ok(changes)
    }

    /// [`update_component_status`](Self::update_component_status) for an
    /// observation given by name.
    pub fn update_component_status_str(
        &self,
        id: &str,
        observed: &str,
    ) -> CausewayResult<ChangeMap> {
        self.update_component_status(id, observed.parse()?)
    }

    /// Every component keyed by id.
    pub fn get_full_graph(&self) -> CausewayResult<BTreeMap<String, Component>> {
        self.storage.full_graph()
    }

    /// Wipe every component and edge.
    pub fn clear(&self) -> CausewayResult<()> {
        self.storage.clear()
    }

    /// Apply a partial threshold override and return the new thresholds.
    pub fn set_transitioning_thresholds(
        &self,
        overrides: ThresholdOverrides,
    ) -> CausewayResult<ThresholdConfig> {
        let mut thresholds = self
            .thresholds
            .write()
            .map_err(|e| CausewayError::ConfigError(format!("thresholds lock poisoned: {e}")))?;
        *thresholds = thresholds.with_overrides(overrides);
        info!(
            initializing = thresholds.initializing,
            confirmed = thresholds.confirmed,
            normal = thresholds.normal,
            "thresholds updated"
        );
        Ok(*thresholds)
    }

    pub fn thresholds(&self) -> CausewayResult<ThresholdConfig> {
        self.thresholds
            .read()
            .map(|t| *t)
            .map_err(|e| CausewayError::ConfigError(format!("thresholds lock poisoned: {e}")))
    }

    fn notify(&self, changes: &ChangeMap) {
        if let Some(sink) = &self.sink {
            if let Err(e) = sink.notify(changes) {
                warn!(error = %e, changes = changes.len(), "change sink rejected update");
            }
        }
    }
}
