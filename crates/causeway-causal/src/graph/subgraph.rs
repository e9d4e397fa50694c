use std::collections::BTreeMap;

use causeway_core::models::ComponentStatus;

/// Adjacency entry of the working subgraph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubgraphNode {
    pub dependencies: Vec<String>,
    pub status: ComponentStatus,
}

/// Id-keyed adjacency map of an abnormal causal chain. Built per query,
/// mutated by cycle collapsing, never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AbnormalSubgraph {
    nodes: BTreeMap<String, SubgraphNode>,
}

impl AbnormalSubgraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, node: SubgraphNode) {
        self.nodes.insert(id.into(), node);
    }

    pub fn get(&self, id: &str) -> Option<&SubgraphNode> {
        self.nodes.get(id)
    }

    pub fn remove(&mut self, id: &str) -> Option<SubgraphNode> {
        self.nodes.remove(id)
    }

    /// Append `dependency` to `id`. Returns false when `id` is absent.
    pub fn add_dependency(&mut self, id: &str, dependency: String) -> bool {
        match self.nodes.get_mut(id) {
            Some(node) => {
                node.dependencies.push(dependency);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Point every dependency on one of `members` at `replacement`.
    /// Duplicates are kept so that dependency positions do not shift.
    pub fn redirect(&mut self, members: &[String], replacement: &str) {
        for node in self.nodes.values_mut() {
            for dep in node.dependencies.iter_mut() {
                if members.contains(dep) {
                    *dep = replacement.to_string();
                }
            }
        }
    }
}

impl FromIterator<(String, SubgraphNode)> for AbnormalSubgraph {
    fn from_iter<I: IntoIterator<Item = (String, SubgraphNode)>>(iter: I) -> Self {
        Self {
            nodes: iter.into_iter().collect(),
        }
    }
}
