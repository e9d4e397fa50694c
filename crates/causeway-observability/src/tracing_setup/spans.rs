//! Span definitions per operation: propagation, root-cause query, ingestion.

/// Create a propagation span around one status update.
#[macro_export]
macro_rules! propagation_span {
    ($component_id:expr, $observed:expr) => {
        tracing::info_span!(
            "causeway.propagation",
            component_id = %$component_id,
            observed = %$observed,
            changes = tracing::field::Empty
        )
    };
}

/// Create a root-cause query span.
#[macro_export]
macro_rules! root_cause_span {
    ($component_id:expr) => {
        tracing::debug_span!("causeway.root_cause", component_id = %$component_id)
    };
}

/// Create an ingestion span.
#[macro_export]
macro_rules! ingestion_span {
    ($call_count:expr) => {
        tracing::info_span!("causeway.ingestion", call_count = $call_count)
    };
}

/// Span names as constants for programmatic use.
pub mod names {
    pub const PROPAGATION: &str = "causeway.propagation";
    pub const ROOT_CAUSE: &str = "causeway.root_cause";
    pub const INGESTION: &str = "causeway.ingestion";
}
