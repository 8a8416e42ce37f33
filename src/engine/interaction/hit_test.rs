use std::collections::HashSet;

use eframe::egui::Pos2;

use crate::engine::Scene;
use crate::engine::view::DetailLevel;
use crate::graph::GraphSnapshot;
use crate::util::distance_to_segment;

use super::InteractionConstants;

/// What the pointer is over. Indices address the snapshot arena (`Node`), the scene's
/// group list (`Group`) and the snapshot's resolved edges (`Edge`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitTarget {
    Group(usize),
    Node(usize),
    Edge(usize),
}

pub fn group_shows_nodes(detail: DetailLevel, expanded: &HashSet<String>, group_id: &str) -> bool {
    detail.shows_nodes() || expanded.contains(group_id)
}

/// Resolves a world-space point to the element under it.
///
/// Collapsed groups are tested first, then visible nodes, then (only when nothing else
/// matched and raw edges are drawn) edges.
pub fn hit_test(
    snapshot: &GraphSnapshot,
    scene: &Scene,
    point: Pos2,
    detail: DetailLevel,
    expanded: &HashSet<String>,
    constants: &InteractionConstants,
) -> Option<HitTarget> {
    if snapshot.is_empty() || scene.positions.len() != snapshot.node_count() {
        return None;
    }

    let group_hit = scene
        .groups
        .groups
        .iter()
        .enumerate()
        .filter(|(_, group)| !group_shows_nodes(detail, expanded, &group.id))
        .filter(|(_, group)| {
            group.center.distance(point) <= group.radius + constants.group_hit_padding
        })
        .min_by(|(_, a), (_, b)| a.radius.total_cmp(&b.radius))
        .map(|(index, _)| HitTarget::Group(index));
    if group_hit.is_some() {
        return group_hit;
    }

    let node_visible = |node: usize| {
        scene
            .groups
            .group_of(node)
            .map(|group| group_shows_nodes(detail, expanded, &scene.groups.groups[group].id))
            .unwrap_or(false)
    };

    let node_hit = scene
        .positions
        .iter()
        .enumerate()
        .filter(|(index, _)| node_visible(*index))
        .map(|(index, position)| (index, position.distance(point)))
        .filter(|(_, distance)| *distance <= constants.node_hit_radius)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(index, _)| HitTarget::Node(index));
    if node_hit.is_some() {
        return node_hit;
    }

    if !detail.shows_raw_edges() {
        return None;
    }

    snapshot
        .resolved_edges()
        .iter()
        .enumerate()
        .filter(|(_, edge)| edge.source != edge.target)
        .filter(|(_, edge)| node_visible(edge.source) && node_visible(edge.target))
        .map(|(slot, edge)| {
            let distance = distance_to_segment(
                point,
                scene.positions[edge.source],
                scene.positions[edge.target],
            );
            (slot, distance)
        })
        .filter(|(_, distance)| *distance <= constants.edge_hit_threshold)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(slot, _)| HitTarget::Edge(slot))
}

#[cfg(test)]
mod tests {
    use eframe::egui::{pos2, vec2};
    use proptest::prelude::*;

    use super::*;
    use crate::engine::layout::LayoutConstants;
    use crate::graph::{GraphEdge, GraphNode, Lens, NodeKind};

    fn scene_for(snapshot: &GraphSnapshot, lens: Lens) -> Scene {
        Scene::build(snapshot, lens, vec2(1000.0, 800.0), &LayoutConstants::default())
    }

    fn sample() -> GraphSnapshot {
        GraphSnapshot::new(
            vec![
                GraphNode::new("a1", "src/a/a1", NodeKind::Function),
                GraphNode::new("a2", "src/a/a2", NodeKind::Function),
                GraphNode::new("b1", "src/b/b1", NodeKind::Function),
                GraphNode::new("b2", "src/b/b2", NodeKind::Class),
            ],
            vec![
                GraphEdge::new("a1", "b1", "calls"),
                GraphEdge::new("a2", "a1", "calls"),
            ],
        )
    }

    #[test]
    fn node_at_its_own_position_is_hit() {
        let snapshot = sample();
        let scene = scene_for(&snapshot, Lens::Structure);
        let constants = InteractionConstants::default();
        for (index, position) in scene.positions.iter().enumerate() {
            let hit = hit_test(
                &snapshot,
                &scene,
                *position,
                DetailLevel::FullDetail,
                &HashSet::new(),
                &constants,
            );
            assert_eq!(hit, Some(HitTarget::Node(index)));
        }
    }

    #[test]
    fn groups_win_while_collapsed() {
        let snapshot = sample();
        let scene = scene_for(&snapshot, Lens::Structure);
        let constants = InteractionConstants::default();
        let group = &scene.groups.groups[0];

        let hit = hit_test(
            &snapshot,
            &scene,
            group.center,
            DetailLevel::GroupsOnly,
            &HashSet::new(),
            &constants,
        );
        assert_eq!(hit, Some(HitTarget::Group(0)));

        let expanded = HashSet::from([group.id.clone()]);
        let node = group.nodes[0];
        let hit = hit_test(
            &snapshot,
            &scene,
            scene.positions[node],
            DetailLevel::GroupsOnly,
            &expanded,
            &constants,
        );
        assert_eq!(hit, Some(HitTarget::Node(node)));
    }

    #[test]
    fn edge_midpoint_is_hit_only_when_edges_are_drawn() {
        let snapshot = sample();
        // Circular fallback puts a1 and b1 on opposite ends of a diameter.
        let scene = scene_for(&snapshot, Lens::Unknown);
        let constants = InteractionConstants::default();
        let resolved = snapshot.resolved_edges()[0];
        let start = scene.positions[resolved.source];
        let end = scene.positions[resolved.target];
        let midpoint = start + (end - start) * 0.5;

        let hit = hit_test(
            &snapshot,
            &scene,
            midpoint,
            DetailLevel::FullDetail,
            &HashSet::new(),
            &constants,
        );
        assert_eq!(hit, Some(HitTarget::Edge(0)));

        let hit = hit_test(
            &snapshot,
            &scene,
            midpoint,
            DetailLevel::SparseNodes,
            &HashSet::new(),
            &constants,
        );
        assert_eq!(hit, None);

        let hit = hit_test(
            &snapshot,
            &scene,
            midpoint,
            DetailLevel::GroupsWithLabels,
            &HashSet::from(["src/a".to_owned(), "src/b".to_owned()]),
            &constants,
        );
        assert_eq!(hit, None);
    }

    #[test]
    fn empty_or_mismatched_inputs_hit_nothing() {
        let empty = GraphSnapshot::default();
        let scene = scene_for(&empty, Lens::Structure);
        let constants = InteractionConstants::default();
        assert_eq!(
            hit_test(&empty, &scene, pos2(0.0, 0.0), DetailLevel::FullDetail, &HashSet::new(), &constants),
            None
        );

        let other = sample();
        assert_eq!(
            hit_test(&other, &scene, pos2(0.0, 0.0), DetailLevel::FullDetail, &HashSet::new(), &constants),
            None
        );
    }

    proptest! {
        #[test]
        fn far_away_points_hit_nothing(x in -5000.0f32..5000.0, y in -5000.0f32..5000.0) {
            let snapshot = sample();
            let scene = scene_for(&snapshot, Lens::Structure);
            let constants = InteractionConstants::default();
            let point = pos2(x, y);

            let near_node = scene
                .positions
                .iter()
                .any(|position| position.distance(point) <= constants.node_hit_radius + 1.0);
            let near_edge = snapshot.resolved_edges().iter().any(|edge| {
                distance_to_segment(point, scene.positions[edge.source], scene.positions[edge.target])
                    <= constants.edge_hit_threshold + 1.0
            });
            prop_assume!(!near_node && !near_edge);

            let hit = hit_test(&snapshot, &scene, point, DetailLevel::FullDetail, &HashSet::new(), &constants);
            prop_assert_eq!(hit, None);
        }
    }
}
