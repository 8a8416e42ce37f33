mod model;
mod snapshot;

pub use model::{Direction, GraphEdge, GraphNode, Lens, NodeKind, edge_key};
pub use snapshot::{GraphSnapshot, ResolvedEdge};
