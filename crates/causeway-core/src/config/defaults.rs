//! Default values for every configuration field.

pub const DEFAULT_DB_PATH: &str = "causeway.db";
pub const DEFAULT_READ_POOL_SIZE: usize = 4;
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Calls/heartbeats a new component survives before graduating to NORMAL.
pub const DEFAULT_INITIALIZING_THRESHOLD: u32 = 30;
/// Consecutive abnormal observations needed to leave the normal category.
pub const DEFAULT_CONFIRMED_THRESHOLD: u32 = 3;
/// Consecutive healthy observations needed to return to NORMAL.
pub const DEFAULT_NORMAL_THRESHOLD: u32 = 3;

pub const DEFAULT_LOG_LEVEL: &str = "info";
