use eframe::egui::{Pos2, Vec2, vec2};

use crate::engine::grouping::{BundledEdge, GroupSet};
use crate::util::clamp_axis;

use super::{LayoutConstants, circumference_radius, place_on_circle};

const MIN_SEPARATION: f32 = 0.0001;
// Past this each endpoint would overshoot the ideal distance.
const MAX_ATTRACTION_FACTOR: f32 = 0.5;

fn separation_direction(i: usize, j: usize) -> Vec2 {
    let angle = ((i as f32) * 0.618_034 + (j as f32) * 0.414_214) * std::f32::consts::TAU;
    vec2(angle.cos(), angle.sin())
}

/// Relaxes group centers with a fixed number of repulsion/attraction/gravity passes,
/// then sizes each group and rings its members around the center.
pub(super) fn clustered_layout(
    groups: &mut GroupSet,
    bundles: &[BundledEdge],
    viewport: Vec2,
    constants: &LayoutConstants,
    positions: &mut [Pos2],
) {
    let group_count = groups.groups.len();
    if group_count == 0 {
        return;
    }

    let center = (viewport * 0.5).to_pos2();
    let seed_radius = constants.seed_radius_factor * viewport.x.min(viewport.y);
    let mut centers = (0..group_count)
        .map(|index| {
            let angle = (index as f32 / group_count as f32) * std::f32::consts::TAU;
            center + Vec2::angled(angle) * seed_radius
        })
        .collect::<Vec<_>>();
    let counts = groups
        .groups
        .iter()
        .map(|group| group.node_count() as f32)
        .collect::<Vec<_>>();

    let margin = constants.boundary_margin;
    for _ in 0..constants.iterations {
        for i in 0..group_count {
            for j in (i + 1)..group_count {
                let mut delta = centers[j] - centers[i];
                let mut distance = delta.length();
                if distance < MIN_SEPARATION {
                    delta = separation_direction(i, j);
                    distance = 1.0;
                }

                let min_distance =
                    constants.repulsion_distance + constants.repulsion_per_node * (counts[i] + counts[j]);
                if distance < min_distance {
                    let push = delta
                        * ((min_distance - distance) / distance * constants.repulsion_strength);
                    centers[i] -= push;
                    centers[j] += push;
                }
            }
        }

        for bundle in bundles {
            let (from, to) = (bundle.source_group, bundle.target_group);
            if from >= group_count || to >= group_count || from == to {
                continue;
            }

            let delta = centers[to] - centers[from];
            let distance = delta.length();
            if distance <= constants.ideal_bundle_distance {
                continue;
            }

            let weight = (bundle.count as f32 + 1.0).log2();
            let factor = ((distance - constants.ideal_bundle_distance) / distance
                * constants.attraction_strength
                * weight)
                .min(MAX_ATTRACTION_FACTOR);
            let pull = delta * factor;
            centers[from] += pull;
            centers[to] -= pull;
        }

        for position in &mut centers {
            *position += (center - *position) * constants.center_gravity;
            position.x = clamp_axis(position.x, margin, viewport.x - margin);
            position.y = clamp_axis(position.y, margin, viewport.y - margin);
        }
    }

    for (group, group_center) in groups.groups.iter_mut().zip(centers) {
        group.center = group_center;
        group.radius = circumference_radius(group.node_count(), constants.node_spacing)
            .max(constants.min_group_radius);
        place_on_circle(
            &group.nodes,
            group.center,
            group.radius - constants.member_inset,
            0.0,
            positions,
        );
    }

    tracing::debug!(
        groups = group_count,
        bundles = bundles.len(),
        iterations = constants.iterations,
        "clustered layout settled"
    );
}

#[cfg(test)]
mod tests {
    use eframe::egui::vec2;

    use super::*;
    use crate::engine::grouping::{bundle_edges, group_nodes};
    use crate::graph::{GraphEdge, GraphNode, GraphSnapshot, Lens, NodeKind};

    fn two_groups(edge_count: usize) -> GraphSnapshot {
        let nodes = vec![
            GraphNode::new("a", "left/a", NodeKind::Function),
            GraphNode::new("b", "right/b", NodeKind::Function),
        ];
        let edges = (0..edge_count)
            .map(|_| GraphEdge::new("a", "b", "calls"))
            .collect();
        GraphSnapshot::new(nodes, edges)
    }

    fn settled_distance(snapshot: &GraphSnapshot, viewport: Vec2) -> f32 {
        let mut groups = group_nodes(snapshot, Lens::Structure);
        let bundles = bundle_edges(snapshot, &groups);
        let mut positions = vec![Pos2::ZERO; snapshot.node_count()];
        let constants = LayoutConstants {
            iterations: 3,
            ..LayoutConstants::default()
        };
        clustered_layout(&mut groups, &bundles, viewport, &constants, &mut positions);
        groups.groups[0].center.distance(groups.groups[1].center)
    }

    #[test]
    fn heavier_bundles_pull_groups_closer() {
        let viewport = vec2(2000.0, 2000.0);
        let loose = settled_distance(&two_groups(0), viewport);
        let light = settled_distance(&two_groups(1), viewport);
        let heavy = settled_distance(&two_groups(40), viewport);
        assert!(light < loose);
        assert!(heavy < light);
    }

    #[test]
    fn tiny_viewport_collapses_to_center_without_panicking() {
        let snapshot = two_groups(1);
        let mut groups = group_nodes(&snapshot, Lens::Structure);
        let bundles = bundle_edges(&snapshot, &groups);
        let mut positions = vec![Pos2::ZERO; 2];
        clustered_layout(
            &mut groups,
            &bundles,
            vec2(120.0, 80.0),
            &LayoutConstants::default(),
            &mut positions,
        );
        for group in &groups.groups {
            assert_eq!(group.center, Pos2::new(60.0, 40.0));
        }
    }
}
