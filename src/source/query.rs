use std::collections::{HashMap, HashSet, VecDeque};

use anyhow::{Result, bail};

use crate::graph::{Direction, GraphEdge, GraphNode, NodeKind};

const DEPENDENCY_EDGE_TYPES: [&str; 4] = ["imports", "import", "depends_on", "dependency"];

/// Parameters of a graph request: an optional center entity, how many undirected hops
/// to keep around it, and which relationship kinds to include (empty means all).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SubgraphQuery {
    pub center: Option<String>,
    pub depth: usize,
    pub kinds: Vec<String>,
}

impl SubgraphQuery {
    fn includes_kind(&self, edge_type: &str) -> bool {
        self.kinds.is_empty()
            || self
                .kinds
                .iter()
                .any(|kind| kind.eq_ignore_ascii_case(edge_type))
    }

    pub fn apply(
        &self,
        nodes: Vec<GraphNode>,
        edges: Vec<GraphEdge>,
    ) -> Result<(Vec<GraphNode>, Vec<GraphEdge>)> {
        let edges = edges
            .into_iter()
            .filter(|edge| self.includes_kind(&edge.edge_type))
            .collect::<Vec<_>>();

        let Some(center) = self.center.as_deref() else {
            return Ok((nodes, edges));
        };

        if !nodes.iter().any(|node| node.id == center) {
            bail!("center entity {center} is not part of the graph");
        }

        let mut neighbors: HashMap<&str, Vec<&str>> = HashMap::new();
        for edge in &edges {
            neighbors
                .entry(edge.source.as_str())
                .or_default()
                .push(edge.target.as_str());
            neighbors
                .entry(edge.target.as_str())
                .or_default()
                .push(edge.source.as_str());
        }

        let mut queue = VecDeque::from([(center, 0usize)]);
        let mut keep = HashSet::from([center.to_owned()]);
        while let Some((id, depth)) = queue.pop_front() {
            if depth >= self.depth {
                continue;
            }

            for &next in neighbors.get(id).into_iter().flatten() {
                if keep.insert(next.to_owned()) {
                    queue.push_back((next, depth + 1));
                }
            }
        }

        let nodes = nodes
            .into_iter()
            .filter(|node| keep.contains(&node.id))
            .collect::<Vec<_>>();
        let edges = edges
            .into_iter()
            .filter(|edge| keep.contains(&edge.source) && keep.contains(&edge.target))
            .collect::<Vec<_>>();

        Ok((nodes, edges))
    }
}

/// The file itself plus its direct import/dependency neighbors, each tagged with the
/// direction it sits in relative to the file.
pub fn file_dependencies(
    nodes: &[GraphNode],
    edges: &[GraphEdge],
    file_id: &str,
) -> Result<(Vec<GraphNode>, Vec<GraphEdge>)> {
    let Some(root) = nodes.iter().find(|node| node.id == file_id) else {
        bail!("file {file_id} is not part of the graph");
    };
    if root.kind != NodeKind::File {
        bail!("{file_id} is a {}, not a file", root.kind.label());
    }

    let mut directions = HashMap::from([(file_id, Direction::Root)]);
    let mut kept_edges = Vec::new();
    for edge in edges {
        let is_dependency = DEPENDENCY_EDGE_TYPES
            .iter()
            .any(|kind| kind.eq_ignore_ascii_case(&edge.edge_type));
        if !is_dependency {
            continue;
        }

        if edge.source == file_id && edge.target != file_id {
            directions
                .entry(edge.target.as_str())
                .or_insert(Direction::Outgoing);
            kept_edges.push(edge.clone());
        } else if edge.target == file_id && edge.source != file_id {
            directions
                .entry(edge.source.as_str())
                .or_insert(Direction::Incoming);
            kept_edges.push(edge.clone());
        }
    }

    let tagged = nodes
        .iter()
        .filter_map(|node| {
            directions.get(node.id.as_str()).map(|&direction| GraphNode {
                direction: Some(direction),
                ..node.clone()
            })
        })
        .collect::<Vec<_>>();
    let known = tagged.iter().map(|node| node.id.as_str()).collect::<HashSet<_>>();
    kept_edges.retain(|edge| known.contains(edge.source.as_str()) && known.contains(edge.target.as_str()));

    Ok((tagged, kept_edges))
}
