use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::graph::GraphSnapshot;

use super::parse::parse_graph_json;
use super::query::{SubgraphQuery, file_dependencies};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GraphRequest {
    Subgraph(SubgraphQuery),
    FileDependencies { file_id: String },
}

impl Default for GraphRequest {
    fn default() -> Self {
        Self::Subgraph(SubgraphQuery::default())
    }
}

pub fn load_graph(path: &Path, request: &GraphRequest) -> Result<GraphSnapshot> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read graph snapshot {}", path.display()))?;
    let graph = parse_graph_json(&raw)
        .with_context(|| format!("failed to parse graph snapshot {}", path.display()))?;

    let (nodes, edges) = match request {
        GraphRequest::Subgraph(query) => query.apply(graph.nodes, graph.edges)?,
        GraphRequest::FileDependencies { file_id } => {
            file_dependencies(&graph.nodes, &graph.edges, file_id)?
        }
    };

    let snapshot = GraphSnapshot::new(nodes, edges);
    tracing::info!(
        path = %path.display(),
        nodes = snapshot.node_count(),
        edges = snapshot.edges().len(),
        "loaded graph snapshot"
    );
    Ok(snapshot)
}
