mod change;
mod component;

pub use change::{Change, ChangeMap, StatusSnapshot};
pub use component::{CallEdge, Component, ComponentCall, ComponentState, ComponentStatus};
