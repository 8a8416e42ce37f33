//! Grouping, layout, interaction and rendering for a lens-organized code graph.
//!
//! Everything here is synchronous and infallible: empty or partial input produces empty
//! output rather than an error.

pub mod grouping;
pub mod interaction;
pub mod layout;
pub mod render;
pub mod view;

use eframe::egui::{Pos2, Vec2};

use crate::graph::{GraphSnapshot, Lens};

use self::grouping::{BundledEdge, GroupSet, bundle_edges, group_nodes};
use self::layout::{LayoutConstants, calculate_positions};

/// Groups, bundles and positions derived from one (snapshot, lens, viewport) triple.
#[derive(Clone, Debug)]
pub struct Scene {
    revision: u64,
    lens: Lens,
    viewport: Vec2,
    pub groups: GroupSet,
    pub bundles: Vec<BundledEdge>,
    pub positions: Vec<Pos2>,
}

impl Scene {
    pub fn build(
        snapshot: &GraphSnapshot,
        lens: Lens,
        viewport: Vec2,
        constants: &LayoutConstants,
    ) -> Self {
        let viewport = viewport.round();
        let mut groups = group_nodes(snapshot, lens);
        let bundles = bundle_edges(snapshot, &groups);
        let positions =
            calculate_positions(snapshot, &mut groups, &bundles, lens, viewport, constants);

        tracing::debug!(
            lens = %lens,
            nodes = snapshot.node_count(),
            groups = groups.len(),
            bundles = bundles.len(),
            width = viewport.x,
            height = viewport.y,
            "rebuilt scene"
        );

        Self {
            revision: snapshot.revision(),
            lens,
            viewport,
            groups,
            bundles,
            positions,
        }
    }

    pub fn matches(&self, snapshot: &GraphSnapshot, lens: Lens, viewport: Vec2) -> bool {
        self.revision == snapshot.revision() && self.lens == lens && self.viewport == viewport.round()
    }

    pub fn lens(&self) -> Lens {
        self.lens
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    pub fn position(&self, node_index: usize) -> Option<Pos2> {
        self.positions.get(node_index).copied()
    }
}
