//! StorageEngine: owns the ConnectionPool, runs migrations at startup, hands
//! out write transactions and read snapshots.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use rusqlite::Connection;
use tracing::{debug, info};

use causeway_core::config::StorageConfig;
use causeway_core::constants::{MAX_BULK_BATCH_SIZE, SUPERNODE_PREFIX};
use causeway_core::errors::{CausewayError, CausewayResult};
use causeway_core::models::{CallEdge, Component, ComponentCall, ComponentStatus};
use causeway_core::traits::{IGraphReader, IGraphStore};

use crate::migrations;
use crate::pool::ConnectionPool;
use crate::queries::lock_ops;
use crate::snapshot::GraphSnapshot;
use crate::transaction::GraphTransaction;
use crate::to_storage_err;

/// Holder token used by plain ingestion and reset transactions.
const INGESTION_HOLDER: &str = "ingestion";

pub struct StorageEngine {
    pool: ConnectionPool,
    /// False for in-memory databases: a pooled reader would open its own
    /// empty database, so reads go through the writer.
    use_read_pool: bool,
}

impl StorageEngine {
    /// Open according to `config`. `":memory:"` selects an in-memory database.
    pub fn open(config: &StorageConfig) -> CausewayResult<Self> {
        if config.is_in_memory() {
            return Self::open_in_memory_with_timeout(config.busy_timeout_ms);
        }
        let pool = ConnectionPool::open(
            Path::new(&config.db_path),
            config.read_pool_size,
            config.busy_timeout_ms,
        )?;
        let engine = Self {
            pool,
            use_read_pool: true,
        };
        engine.initialize()?;
        Ok(engine)
    }

    /// Open a file-backed database with default pool settings.
    pub fn open_path(path: &Path) -> CausewayResult<Self> {
        Self::open(&StorageConfig {
            db_path: path.to_string_lossy().into_owned(),
            ..StorageConfig::default()
        })
    }

    /// Open an in-memory database (tests, ephemeral runs).
    pub fn open_in_memory() -> CausewayResult<Self> {
        Self::open_in_memory_with_timeout(StorageConfig::default().busy_timeout_ms)
    }

    fn open_in_memory_with_timeout(busy_timeout_ms: u64) -> CausewayResult<Self> {
        let pool = ConnectionPool::open_in_memory(busy_timeout_ms)?;
        let engine = Self {
            pool,
            use_read_pool: false,
        };
        engine.initialize()?;
        Ok(engine)
    }

    /// Run migrations, then create the component id constraint.
    fn initialize(&self) -> CausewayResult<()> {
        self.pool.writer.with_conn_sync(|conn| {
            let applied = migrations::run_migrations(conn)?;
            if applied > 0 {
                info!(applied, version = migrations::LATEST_VERSION, "schema migrated");
            }
            migrations::ensure_unique_constraint(conn)
        })
    }

    /// The connection pool, for maintenance and tests.
    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }

    /// Start a write transaction. Blocks until the writer is free.
    pub fn begin(&self, holder: &str) -> CausewayResult<GraphTransaction<'_>> {
        GraphTransaction::begin(self.pool.writer.lock()?, holder)
    }

    /// Run `f` on the best available read connection.
    pub fn with_reader<F, T>(&self, f: F) -> CausewayResult<T>
    where
        F: FnOnce(&Connection) -> CausewayResult<T>,
    {
        match (&self.pool.readers, self.use_read_pool) {
            (Some(readers), true) => readers.with_conn(f),
            _ => self.pool.writer.with_conn_sync(f),
        }
    }

    /// Run `f` against one consistent committed view of the graph.
    pub fn with_snapshot<F, T>(&self, f: F) -> CausewayResult<T>
    where
        F: FnOnce(&GraphSnapshot<'_>) -> CausewayResult<T>,
    {
        self.with_reader(|conn| {
            conn.execute_batch("BEGIN")
                .map_err(|e| to_storage_err(format!("begin snapshot: {e}")))?;
            let result = f(&GraphSnapshot::new(conn));
            let end = if result.is_ok() { "COMMIT" } else { "ROLLBACK" };
            conn.execute_batch(end)
                .map_err(|e| to_storage_err(format!("end snapshot: {e}")))?;
            result
        })
    }

    /// Ingest observed calls in one transaction. Every call is validated
    /// before anything is written; a failure anywhere writes nothing.
    pub fn add_calls(&self, calls: &[ComponentCall]) -> CausewayResult<usize> {
        if calls.len() > MAX_BULK_BATCH_SIZE {
            return Err(CausewayError::InvalidCall {
                reason: format!(
                    "batch of {} calls exceeds the limit of {MAX_BULK_BATCH_SIZE}",
                    calls.len()
                ),
            });
        }
        for call in calls {
            validate_call(call)?;
        }

        let tx = self.begin(INGESTION_HOLDER)?;
        for call in calls {
            tx.add_call(call.caller.as_deref(), &call.callee)?;
        }
        tx.commit()?;
        debug!(calls = calls.len(), "ingested call batch");
        Ok(calls.len())
    }

    /// Snapshot of one component, including dependencies and consumers.
    pub fn search(&self, id: &str) -> CausewayResult<Option<Component>> {
        self.with_snapshot(|snapshot| snapshot.component(id))
    }

    /// Every component keyed by id.
    pub fn full_graph(&self) -> CausewayResult<BTreeMap<String, Component>> {
        self.with_snapshot(|snapshot| snapshot.components())
    }

    pub fn causal_chain(&self, id: &str) -> CausewayResult<Vec<String>> {
        self.with_snapshot(|snapshot| snapshot.causal_chain(id))
    }

    pub fn edges_among(&self, ids: &[String]) -> CausewayResult<Vec<CallEdge>> {
        self.with_snapshot(|snapshot| snapshot.edges_among(ids))
    }

    pub fn component_statuses(
        &self,
        ids: &[String],
    ) -> CausewayResult<HashMap<String, ComponentStatus>> {
        self.with_snapshot(|snapshot| snapshot.statuses_of(ids))
    }

    /// Last holder of the exclusive lock row, if any update has run.
    pub fn lock_holder(&self) -> CausewayResult<Option<String>> {
        self.with_reader(|conn| Ok(lock_ops::last_holder(conn)?.map(|(holder, _)| holder)))
    }

    /// Wipe every component and edge.
    pub fn clear(&self) -> CausewayResult<()> {
        let tx = self.begin(INGESTION_HOLDER)?;
        tx.clear()?;
        tx.commit()?;
        info!("graph cleared");
        Ok(())
    }
}

fn validate_call(call: &ComponentCall) -> CausewayResult<()> {
    if let Some(caller) = &call.caller {
        validate_id(caller)?;
    }
    validate_id(&call.callee)
}

fn validate_id(id: &str) -> CausewayResult<()> {
    if id.is_empty() {
        return Err(CausewayError::InvalidCall {
            reason: "component id is empty".to_string(),
        });
    }
    if id.starts_with(SUPERNODE_PREFIX) {
        return Err(CausewayError::InvalidCall {
            reason: format!("component id {id:?} uses the reserved prefix {SUPERNODE_PREFIX:?}"),
        });
    }
    Ok(())
}
