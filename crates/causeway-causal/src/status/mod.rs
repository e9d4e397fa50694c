//! Debounced status transitions.

mod machine;

pub use machine::{decide, Decision};
