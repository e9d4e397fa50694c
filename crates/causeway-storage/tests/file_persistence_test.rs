//! File-backed databases: reopen survival, idempotent initialization, pragmas.

use causeway_core::config::StorageConfig;
use causeway_core::models::{ComponentCall, ComponentStatus};
use causeway_core::traits::IGraphStore;
use causeway_storage::migrations::{self, LATEST_VERSION};
use causeway_storage::pool::pragmas;
use causeway_storage::StorageEngine;

#[test]
fn graph_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("graph.db");

    {
        let engine = StorageEngine::open_path(&db_path).unwrap();
        engine
            .add_calls(&[ComponentCall::new("a", "b"), ComponentCall::new("b", "c")])
            .unwrap();
        let tx = engine.begin("test").unwrap();
        tx.set_status("c", ComponentStatus::Perpetrator).unwrap();
        tx.commit().unwrap();
    }

    let engine = StorageEngine::open_path(&db_path).unwrap();
    let graph = engine.full_graph().unwrap();
    assert_eq!(graph.len(), 3);
    assert_eq!(graph["c"].status, ComponentStatus::Perpetrator);
    assert_eq!(graph["b"].dependencies, vec!["c"]);
}

#[test]
fn reopening_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("reopen.db");

    for _ in 0..3 {
        let engine = StorageEngine::open_path(&db_path).unwrap();
        let version = engine
            .pool()
            .writer
            .with_conn_sync(|conn| migrations::current_version(conn))
            .unwrap();
        assert_eq!(version, LATEST_VERSION);
        engine
            .pool()
            .writer
            .with_conn_sync(|conn| migrations::ensure_unique_constraint(conn))
            .unwrap();
    }
}

#[test]
fn unique_index_rejects_duplicate_rows() {
    let dir = tempfile::tempdir().unwrap();
    let engine = StorageEngine::open_path(&dir.path().join("unique.db")).unwrap();
    engine.add_calls(&[ComponentCall::callee_only("a")]).unwrap();

    let duplicate = engine.pool().writer.with_conn_sync(|conn| {
        conn.execute("INSERT INTO components (id) VALUES ('a')", [])
            .map_err(|e| causeway_storage::to_storage_err(e.to_string()))
    });
    assert!(duplicate.is_err());
}

#[test]
fn file_databases_use_wal_and_a_read_pool() {
    let dir = tempfile::tempdir().unwrap();
    let config = StorageConfig {
        db_path: dir.path().join("wal.db").to_string_lossy().into_owned(),
        read_pool_size: 2,
        ..StorageConfig::default()
    };
    let engine = StorageEngine::open(&config).unwrap();

    let wal = engine
        .pool()
        .writer
        .with_conn_sync(|conn| pragmas::verify_wal_mode(conn))
        .unwrap();
    assert!(wal);
    assert_eq!(engine.pool().readers.as_ref().map(|r| r.size()), Some(2));
}

#[test]
fn memory_config_selects_in_memory_database() {
    let config = StorageConfig {
        db_path: ":memory:".to_string(),
        ..StorageConfig::default()
    };
    let engine = StorageEngine::open(&config).unwrap();
    assert!(engine.pool().readers.is_none());
    assert!(engine.pool().db_path.is_none());
}

#[test]
fn readers_see_only_committed_writes() {
    let dir = tempfile::tempdir().unwrap();
    let engine = StorageEngine::open_path(&dir.path().join("isolation.db")).unwrap();
    engine.add_calls(&[ComponentCall::callee_only("a")]).unwrap();

    let tx = engine.begin("test").unwrap();
    tx.set_status("a", ComponentStatus::Confirmed).unwrap();
    assert_eq!(
        engine.search("a").unwrap().unwrap().status,
        ComponentStatus::Initializing
    );
    tx.commit().unwrap();
    assert_eq!(
        engine.search("a").unwrap().unwrap().status,
        ComponentStatus::Confirmed
    );
}
