mod force;
mod lens;

use eframe::egui::{Pos2, Vec2};
use serde::{Deserialize, Serialize};

use crate::graph::{GraphSnapshot, Lens};

use super::grouping::{BundledEdge, GroupSet};

/// Tuning values for every layout strategy. All of them can be overridden from a JSON
/// file; missing keys keep their defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConstants {
    pub iterations: usize,
    pub seed_radius_factor: f32,
    pub repulsion_distance: f32,
    pub repulsion_per_node: f32,
    pub repulsion_strength: f32,
    pub ideal_bundle_distance: f32,
    pub attraction_strength: f32,
    pub center_gravity: f32,
    pub boundary_margin: f32,
    pub node_spacing: f32,
    pub min_group_radius: f32,
    pub member_inset: f32,
    pub infra_columns: [f32; 3],
    pub infra_min_radius: f32,
    pub infra_max_radius: f32,
    pub ring_min_radius: f32,
    pub ring_gap: f32,
    pub fallback_radius_factor: f32,
}

impl Default for LayoutConstants {
    fn default() -> Self {
        Self {
            iterations: 50,
            seed_radius_factor: 0.3,
            repulsion_distance: 100.0,
            repulsion_per_node: 2.0,
            repulsion_strength: 0.5,
            ideal_bundle_distance: 200.0,
            attraction_strength: 0.1,
            center_gravity: 0.02,
            boundary_margin: 100.0,
            node_spacing: 15.0,
            min_group_radius: 40.0,
            member_inset: 20.0,
            infra_columns: [0.2, 0.5, 0.8],
            infra_min_radius: 50.0,
            infra_max_radius: 150.0,
            ring_min_radius: 60.0,
            ring_gap: 40.0,
            fallback_radius_factor: 0.35,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LayoutStrategy {
    Clustered,
    Columns,
    Rings,
    Circular,
}

impl LayoutStrategy {
    fn for_lens(lens: Lens) -> Self {
        match lens {
            Lens::Structure | Lens::Business => Self::Clustered,
            Lens::Infra => Self::Columns,
            Lens::Pattern => Self::Rings,
            Lens::Unknown => Self::Circular,
        }
    }
}

/// Computes a position for every node of `snapshot`, indexed like the snapshot arena,
/// and fills in each group's center and radius.
///
/// The result depends only on the arguments: there is no randomness and no state kept
/// between calls. An empty snapshot yields an empty vector.
pub fn calculate_positions(
    snapshot: &GraphSnapshot,
    groups: &mut GroupSet,
    bundles: &[BundledEdge],
    lens: Lens,
    viewport: Vec2,
    constants: &LayoutConstants,
) -> Vec<Pos2> {
    let mut positions = vec![Pos2::ZERO; snapshot.node_count()];
    if snapshot.is_empty() {
        return positions;
    }

    match LayoutStrategy::for_lens(lens) {
        LayoutStrategy::Clustered => {
            force::clustered_layout(groups, bundles, viewport, constants, &mut positions);
        }
        LayoutStrategy::Columns => {
            lens::column_layout(groups, viewport, constants, &mut positions);
        }
        LayoutStrategy::Rings => {
            lens::ring_layout(groups, viewport, constants, &mut positions);
        }
        LayoutStrategy::Circular => {
            lens::circular_layout(groups, viewport, constants, &mut positions);
        }
    }

    positions
}

fn place_on_circle(
    members: &[usize],
    center: Pos2,
    radius: f32,
    start_angle: f32,
    positions: &mut [Pos2],
) {
    if let [only] = members {
        positions[*only] = center;
        return;
    }

    let count = members.len() as f32;
    for (slot, &node) in members.iter().enumerate() {
        let angle = start_angle + (slot as f32 / count) * std::f32::consts::TAU;
        positions[node] = center + Vec2::angled(angle) * radius;
    }
}

fn circumference_radius(member_count: usize, spacing: f32) -> f32 {
    (member_count as f32 * spacing) / std::f32::consts::TAU
}
