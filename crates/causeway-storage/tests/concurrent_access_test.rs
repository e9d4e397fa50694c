//! Read pool and serialized writer under concurrent threads.

use std::sync::Arc;
use std::thread;

use causeway_core::models::ComponentCall;
use causeway_storage::StorageEngine;

#[test]
fn concurrent_ingestion_and_reads() {
    let dir = tempfile::tempdir().unwrap();
    let engine = Arc::new(StorageEngine::open_path(&dir.path().join("concurrent.db")).unwrap());
    engine
        .add_calls(&[ComponentCall::callee_only("shared")])
        .unwrap();

    let mut handles = Vec::new();
    for t in 0..4 {
        let engine = Arc::clone(&engine);
        handles.push(thread::spawn(move || {
            for i in 0..25 {
                engine
                    .add_calls(&[ComponentCall::new(format!("w{t}-{i}"), "shared")])
                    .unwrap();
            }
        }));
    }
    for _ in 0..4 {
        let engine = Arc::clone(&engine);
        handles.push(thread::spawn(move || {
            for _ in 0..25 {
                let shared = engine.search("shared").unwrap().unwrap();
                assert!(shared.consumers.len() <= 100);
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    let shared = engine.search("shared").unwrap().unwrap();
    assert_eq!(shared.consumers.len(), 100);
    assert_eq!(engine.full_graph().unwrap().len(), 101);
}
