//! The abnormal causal chain of a component and its working subgraph.

use causeway_core::errors::{CausalError, CausewayResult};
use causeway_core::traits::IGraphReader;

use crate::graph::{find_ends, AbnormalSubgraph, RootCause, SubgraphNode};

/// `id` followed by every component reachable through abnormal callees.
/// Empty when `id` is not currently abnormal.
pub fn find_causal_chain(reader: &impl IGraphReader, id: &str) -> CausewayResult<Vec<String>> {
    reader.causal_chain(id)
}

/// Materialize `chain` and the edges strictly between its members, with each
/// member's current status.
pub fn to_graph(
    reader: &impl IGraphReader,
    initial_id: &str,
    chain: &[String],
) -> CausewayResult<AbnormalSubgraph> {
    if chain.is_empty() {
        return Ok(AbnormalSubgraph::new());
    }
    if !chain.iter().any(|member| member == initial_id) {
        return Err(CausalError::GraphInconsistency {
            details: format!("{initial_id} is not part of its own causal chain"),
        }
        .into());
    }

    let statuses = reader.statuses_of(chain)?;
    let mut graph: AbnormalSubgraph = chain
        .iter()
        .map(|member| {
            let status = statuses.get(member).copied().ok_or_else(|| {
                CausalError::GraphInconsistency {
                    details: format!("chain member {member} has no component"),
                }
            })?;
            Ok((
                member.clone(),
                SubgraphNode {
                    dependencies: Vec::new(),
                    status,
                },
            ))
        })
        .collect::<Result<_, CausalError>>()?;

    for edge in reader.edges_among(chain)? {
        graph.add_dependency(&edge.caller_id, edge.callee_id);
    }
    Ok(graph)
}

/// Root causes of `id`: the ends of its causal subgraph.
pub fn find_root_causes(reader: &impl IGraphReader, id: &str) -> CausewayResult<Vec<RootCause>> {
    let chain = find_causal_chain(reader, id)?;
    if chain.is_empty() {
        return Ok(Vec::new());
    }
    let graph = to_graph(reader, id, &chain)?;
    find_ends(id, graph)
}
