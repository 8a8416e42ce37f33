//! Lens-based grouping, layout, interaction and rendering for code knowledge graphs.
//!
//! [`graph`] holds the data model, [`source`] reads graph snapshots from disk and
//! answers subgraph queries over them, and [`engine`] turns a snapshot plus a [`Lens`]
//! into a drawable, interactive [`engine::Scene`].

pub mod config;
pub mod engine;
pub mod graph;
pub mod source;
pub mod util;

pub use config::EngineConfig;
pub use engine::Scene;
pub use graph::{GraphEdge, GraphNode, GraphSnapshot, Lens, NodeKind};
