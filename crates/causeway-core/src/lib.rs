//! # causeway-core
//!
//! Foundation crate for the causeway dependency graph.
//! Defines the component model, status categories, change records, errors,
//! configuration, constants, and the store/sink traits.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::CausewayConfig;
pub use errors::{CausewayError, CausewayResult};
pub use models::{
    CallEdge, Change, ChangeMap, Component, ComponentCall, ComponentState, ComponentStatus,
};
