use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::atomic::{AtomicU64, Ordering};

use super::model::{GraphEdge, GraphNode};

static NEXT_REVISION: AtomicU64 = AtomicU64::new(1);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolvedEdge {
    pub edge: usize,
    pub source: usize,
    pub target: usize,
}

/// Immutable node/edge set handed over by the data source, indexed for the engine.
///
/// Nodes live in a flat arena addressed by index; `index_by_id` maps identities back.
/// Edges whose endpoints are not in the node set are kept in `edges` (they are part of
/// the snapshot) but never resolved, so nothing downstream can draw or traverse them.
#[derive(Clone, Debug)]
pub struct GraphSnapshot {
    revision: u64,
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    index_by_id: HashMap<String, usize>,
    resolved: Vec<ResolvedEdge>,
    outgoing: Vec<Vec<usize>>,
    incoming: Vec<Vec<usize>>,
}

impl Default for GraphSnapshot {
    fn default() -> Self {
        Self::new(Vec::new(), Vec::new())
    }
}

impl GraphSnapshot {
    pub fn new(nodes: Vec<GraphNode>, edges: Vec<GraphEdge>) -> Self {
        let mut unique_nodes = Vec::with_capacity(nodes.len());
        let mut index_by_id = HashMap::with_capacity(nodes.len());
        for node in nodes {
            match index_by_id.entry(node.id.clone()) {
                Entry::Occupied(_) => {
                    tracing::warn!(id = %node.id, "duplicate node id in snapshot, keeping first");
                }
                Entry::Vacant(slot) => {
                    slot.insert(unique_nodes.len());
                    unique_nodes.push(node);
                }
            }
        }

        let mut resolved = Vec::with_capacity(edges.len());
        let mut outgoing = vec![Vec::new(); unique_nodes.len()];
        let mut incoming = vec![Vec::new(); unique_nodes.len()];
        let mut dangling = 0usize;
        for (edge_index, edge) in edges.iter().enumerate() {
            let (Some(&source), Some(&target)) =
                (index_by_id.get(&edge.source), index_by_id.get(&edge.target))
            else {
                dangling += 1;
                continue;
            };

            let slot = resolved.len();
            resolved.push(ResolvedEdge {
                edge: edge_index,
                source,
                target,
            });
            outgoing[source].push(slot);
            incoming[target].push(slot);
        }

        if dangling > 0 {
            tracing::debug!(dangling, "skipped edges with endpoints outside the node set");
        }

        Self {
            revision: NEXT_REVISION.fetch_add(1, Ordering::Relaxed),
            nodes: unique_nodes,
            edges,
            index_by_id,
            resolved,
            outgoing,
            incoming,
        }
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index_by_id.get(id).copied()
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.index_of(id).map(|index| &self.nodes[index])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index_by_id.contains_key(id)
    }

    pub fn resolved_edges(&self) -> &[ResolvedEdge] {
        &self.resolved
    }

    pub fn edge(&self, resolved: &ResolvedEdge) -> &GraphEdge {
        &self.edges[resolved.edge]
    }

    pub fn outgoing(&self, index: usize) -> impl Iterator<Item = &ResolvedEdge> {
        self.outgoing
            .get(index)
            .into_iter()
            .flatten()
            .map(|&slot| &self.resolved[slot])
    }

    pub fn incoming(&self, index: usize) -> impl Iterator<Item = &ResolvedEdge> {
        self.incoming
            .get(index)
            .into_iter()
            .flatten()
            .map(|&slot| &self.resolved[slot])
    }

    pub fn incident(&self, index: usize) -> impl Iterator<Item = (usize, &ResolvedEdge)> {
        self.outgoing(index)
            .map(|edge| (edge.target, edge))
            .chain(self.incoming(index).map(|edge| (edge.source, edge)))
    }
}
