//! # causeway-causal
//!
//! Root-cause engine over the component call graph.
//!
//! - [`status`]: per-component hysteresis state machine.
//! - [`chain`]: abnormal causal chain and its working subgraph.
//! - [`graph`]: cycle-collapsing search for the ends of that subgraph.
//! - [`propagation`]: the transactional status update and reclassification.
//! - [`CausalEngine`]: the public facade tying them to storage.

pub mod chain;
pub mod engine;
pub mod graph;
pub mod propagation;
pub mod status;

pub use engine::CausalEngine;
pub use graph::RootCause;
pub use status::Decision;
