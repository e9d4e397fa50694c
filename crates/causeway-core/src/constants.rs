/// Causeway system version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Reserved prefix of synthetic cycle ids produced by the root finder.
/// Real component ids may not start with it.
pub const SUPERNODE_PREFIX: &str = "@cycle:";

/// Separator between member ids inside a supernode id.
pub const SUPERNODE_SEPARATOR: &str = ",";

/// Maximum number of calls accepted in one `add` batch.
pub const MAX_BULK_BATCH_SIZE: usize = 10_000;

/// Primary key of the singleton exclusive-lock row.
pub const GRAPH_LOCK_ID: i64 = 1;
