use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use serde_json::Value;

use crate::graph::{GraphEdge, GraphNode};

#[derive(Clone, Debug, Default, Deserialize)]
pub(super) struct RawGraph {
    #[serde(default)]
    pub(super) nodes: Vec<GraphNode>,
    #[serde(default)]
    pub(super) edges: Vec<GraphEdge>,
}

/// Accepts either a bare `{nodes, edges}` object or one wrapped in `graph`/`data`, which
/// is how query responses arrive when they were saved straight from the HTTP layer.
pub(super) fn parse_graph_json(raw: &str) -> Result<RawGraph> {
    let parsed: Value = serde_json::from_str(raw).context("invalid JSON in graph snapshot")?;
    let object = parsed
        .as_object()
        .ok_or_else(|| anyhow!("graph snapshot must be a JSON object"))?;

    for wrapper in ["graph", "data"] {
        if let Some(inner) = object.get(wrapper)
            && inner.is_object()
        {
            return RawGraph::deserialize(inner)
                .with_context(|| format!("invalid `{wrapper}` object in graph snapshot"));
        }
    }

    if !object.contains_key("nodes") {
        return Err(anyhow!("graph snapshot has no `nodes` array"));
    }

    RawGraph::deserialize(&parsed).context("invalid nodes/edges in graph snapshot")
}
