//! Depth-first search for the ends of an abnormal subgraph, collapsing
//! cycles into supernodes as they are found.
//!
//! An end is a node without dependencies. A cycle has no end of its own, so
//! each one is replaced by a `CONFIRMED` supernode that inherits the
//! members' dependencies leaving the cycle. Edges into the cycle are
//! redirected to the supernode, which loses the original target member.
//! Supernode ends are expanded back into their members at the end.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use causeway_core::errors::{CausalError, CausewayError, CausewayResult};
use causeway_core::models::ComponentStatus;

use super::supernode;
use super::{AbnormalSubgraph, RootCause, SubgraphNode};

struct Frame {
    id: String,
    cursor: usize,
}

impl Frame {
    fn new(id: String) -> Self {
        Self { id, cursor: 0 }
    }
}

struct Search {
    graph: AbnormalSubgraph,
    visited: HashSet<String>,
    path: Vec<Frame>,
    ends: Vec<(String, ComponentStatus)>,
    supernodes: HashMap<String, Vec<String>>,
}

/// Ends reachable from `initial_id`, deduplicated by id in discovery order.
/// Empty when `initial_id` is not part of `graph`.
pub fn find_ends(initial_id: &str, graph: AbnormalSubgraph) -> CausewayResult<Vec<RootCause>> {
    if !graph.contains(initial_id) {
        return Ok(Vec::new());
    }

    let mut search = Search {
        graph,
        visited: HashSet::new(),
        path: Vec::new(),
        ends: Vec::new(),
        supernodes: HashMap::new(),
    };
    search.enter(initial_id.to_string())?;
    search.run()?;
    search.expand()
}

impl Search {
    fn run(&mut self) -> CausewayResult<()> {
        while let Some(frame) = self.path.last_mut() {
            let node = self.graph.get(&frame.id).ok_or_else(|| {
                inconsistency(format!("{} left the subgraph while on the path", frame.id))
            })?;
            let Some(dep) = node.dependencies.get(frame.cursor).cloned() else {
                self.path.pop();
                continue;
            };
            frame.cursor += 1;

            if !self.graph.contains(&dep) {
                continue;
            }
            if let Some(pos) = self.path.iter().position(|f| f.id == dep) {
                let supernode = self.collapse(pos)?;
                self.enter(supernode)?;
                continue;
            }
            if !self.visited.contains(&dep) {
                self.enter(dep)?;
            }
        }
        Ok(())
    }

    /// Mark `id` visited and push it; record it when it has no dependencies.
    fn enter(&mut self, id: String) -> CausewayResult<()> {
        let node = self
            .graph
            .get(&id)
            .ok_or_else(|| inconsistency(format!("{id} is not in the subgraph")))?;
        if node.dependencies.is_empty() {
            self.ends.push((id.clone(), node.status));
        }
        self.visited.insert(id.clone());
        self.path.push(Frame::new(id));
        Ok(())
    }

    /// Replace the cycle `path[pos..]` with a supernode and return its id.
    fn collapse(&mut self, pos: usize) -> CausewayResult<String> {
        let members: Vec<String> = self.path.drain(pos..).map(|f| f.id).collect();
        let id = supernode::encode(&members);

        let mut external = Vec::new();
        let mut former_targets = Vec::new();
        for member in &members {
            let node = self
                .graph
                .remove(member)
                .ok_or_else(|| inconsistency(format!("cycle member {member} is missing")))?;
            for dep in node.dependencies {
                if !members.contains(&dep) && !external.contains(&dep) {
                    external.push(dep.clone());
                }
                former_targets.push(dep);
            }
        }
        for stale in members.iter().chain(&former_targets) {
            self.visited.remove(stale);
        }

        self.graph.redirect(&members, &id);
        self.graph.insert(
            id.clone(),
            SubgraphNode {
                dependencies: external,
                status: ComponentStatus::Confirmed,
            },
        );
        debug!(supernode = %id, members = members.len(), "collapsed cycle");
        self.supernodes.insert(id.clone(), members);
        Ok(id)
    }

    fn expand(self) -> CausewayResult<Vec<RootCause>> {
        let mut seen = HashSet::new();
        let mut roots = Vec::new();
        for (id, status) in &self.ends {
            self.expand_into(id, *status, &mut seen, &mut roots)?;
        }
        Ok(roots)
    }

    fn expand_into(
        &self,
        id: &str,
        status: ComponentStatus,
        seen: &mut HashSet<String>,
        roots: &mut Vec<RootCause>,
    ) -> CausewayResult<()> {
        if let Some(members) = self.supernodes.get(id) {
            for member in members {
                self.expand_into(member, status, seen, roots)?;
            }
            return Ok(());
        }
        if supernode::is_supernode(id) {
            return Err(CausalError::UnknownSupernode { id: id.to_string() }.into());
        }
        if seen.insert(id.to_string()) {
            roots.push(RootCause {
                id: id.to_string(),
                status,
            });
        }
        Ok(())
    }
}

fn inconsistency(details: String) -> CausewayError {
    CausalError::GraphInconsistency { details }.into()
}
