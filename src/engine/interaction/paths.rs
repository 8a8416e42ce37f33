use std::collections::{HashSet, VecDeque};

use crate::graph::{GraphSnapshot, edge_key};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UsagePaths {
    pub start: String,
    pub nodes: HashSet<String>,
    /// `"{source}-{target}"` keys of every traversed edge.
    pub edges: HashSet<String>,
}

impl UsagePaths {
    pub fn contains_edge(&self, source: &str, target: &str) -> bool {
        self.edges.contains(&edge_key(source, target))
    }
}

/// Node ids within `depth` undirected hops of `start`, `start` included. Unknown ids
/// yield an empty set.
pub fn focus_range(snapshot: &GraphSnapshot, start: &str, depth: usize) -> HashSet<String> {
    let Some(start_index) = snapshot.index_of(start) else {
        return HashSet::new();
    };

    let mut visited = vec![false; snapshot.node_count()];
    let mut queue = VecDeque::from([(start_index, 0usize)]);
    visited[start_index] = true;

    while let Some((index, hops)) = queue.pop_front() {
        if hops >= depth {
            continue;
        }

        for (next, _) in snapshot.incident(index) {
            if !visited[next] {
                visited[next] = true;
                queue.push_back((next, hops + 1));
            }
        }
    }

    visited
        .iter()
        .enumerate()
        .filter(|(_, seen)| **seen)
        .map(|(index, _)| snapshot.nodes()[index].id.clone())
        .collect()
}

/// Unbounded traversal from `start` over edges in both directions, collecting every
/// reached node and every edge crossed on the way.
pub fn usage_paths(snapshot: &GraphSnapshot, start: &str) -> UsagePaths {
    let Some(start_index) = snapshot.index_of(start) else {
        return UsagePaths::default();
    };

    let mut visited = vec![false; snapshot.node_count()];
    let mut queue = VecDeque::from([start_index]);
    let mut edges = HashSet::new();
    visited[start_index] = true;

    while let Some(index) = queue.pop_front() {
        for (next, resolved) in snapshot.incident(index) {
            edges.insert(snapshot.edge(resolved).key());
            if !visited[next] {
                visited[next] = true;
                queue.push_back(next);
            }
        }
    }

    let nodes = visited
        .iter()
        .enumerate()
        .filter(|(_, seen)| **seen)
        .map(|(index, _)| snapshot.nodes()[index].id.clone())
        .collect();

    UsagePaths {
        start: start.to_owned(),
        nodes,
        edges,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{GraphEdge, GraphNode, NodeKind};

    fn ids(values: &[&str]) -> HashSet<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    fn chain() -> GraphSnapshot {
        let nodes = ["A", "B", "C", "D", "island"]
            .into_iter()
            .map(|id| GraphNode::new(id, id, NodeKind::Function))
            .collect();
        let edges = vec![
            GraphEdge::new("A", "B", "calls"),
            GraphEdge::new("B", "C", "calls"),
            GraphEdge::new("C", "D", "calls"),
        ];
        GraphSnapshot::new(nodes, edges)
    }

    #[test]
    fn focus_range_on_chain_respects_depth() {
        let snapshot = chain();
        assert_eq!(focus_range(&snapshot, "B", 0), ids(&["B"]));
        assert_eq!(focus_range(&snapshot, "B", 1), ids(&["A", "B", "C"]));
        assert_eq!(focus_range(&snapshot, "B", 2), ids(&["A", "B", "C", "D"]));
        assert!(focus_range(&snapshot, "missing", 3).is_empty());
    }

    #[test]
    fn usage_paths_follow_edges_both_ways() {
        let snapshot = chain();
        let paths = usage_paths(&snapshot, "C");
        assert_eq!(paths.nodes, ids(&["A", "B", "C", "D"]));
        assert_eq!(paths.edges, ids(&["A-B", "B-C", "C-D"]));
        assert!(paths.contains_edge("C", "D"));
        assert_eq!(paths.start, "C");

        let isolated = usage_paths(&snapshot, "island");
        assert_eq!(isolated.nodes, ids(&["island"]));
        assert!(isolated.edges.is_empty());
    }

    #[test]
    fn cycles_terminate() {
        let snapshot = GraphSnapshot::new(
            vec![
                GraphNode::new("x", "x", NodeKind::Class),
                GraphNode::new("y", "y", NodeKind::Class),
            ],
            vec![
                GraphEdge::new("x", "y", "calls"),
                GraphEdge::new("y", "x", "calls"),
                GraphEdge::new("x", "x", "calls"),
            ],
        );
        let paths = usage_paths(&snapshot, "x");
        assert_eq!(paths.nodes.len(), 2);
        assert_eq!(paths.edges, ids(&["x-y", "y-x", "x-x"]));
    }
}
