//! Working subgraph of one causal chain and the search for its ends.

mod ends;
mod subgraph;
pub mod supernode;

use serde::{Deserialize, Serialize};

use causeway_core::models::ComponentStatus;

pub use ends::find_ends;
pub use subgraph::{AbnormalSubgraph, SubgraphNode};

/// One root cause: the component id and the status it was found in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RootCause {
    pub id: String,
    pub status: ComponentStatus,
}
