//! # causeway-observability
//!
//! Tracing subscriber installation and the span macros shared by the
//! propagation, root-cause and ingestion paths.

pub mod tracing_setup;

pub use tracing_setup::{init_tracing, spans::names};
