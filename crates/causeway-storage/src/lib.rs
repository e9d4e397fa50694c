//! # causeway-storage
//!
//! SQLite persistence layer for the component graph.
//! One serialized write connection, a read pool, versioned migrations,
//! and the `GraphTransaction` every orchestrated update runs in.

pub mod engine;
pub mod migrations;
pub mod pool;
pub mod queries;
pub mod snapshot;
pub mod transaction;

pub use engine::StorageEngine;
pub use snapshot::GraphSnapshot;
pub use transaction::GraphTransaction;

use causeway_core::errors::{CausewayError, StorageError};

/// Helper to convert any error message into a storage error.
pub fn to_storage_err(msg: impl Into<String>) -> CausewayError {
    CausewayError::StorageError(StorageError::SqliteError {
        message: msg.into(),
    })
}
