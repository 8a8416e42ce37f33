use std::f32::consts::{FRAC_PI_2, TAU};

use eframe::egui::{Pos2, Vec2};

use crate::engine::grouping::{GroupSet, HIGH_CONFIDENCE, LOW_CONFIDENCE, MEDIUM_CONFIDENCE};

use super::{LayoutConstants, circumference_radius, place_on_circle};

const RING_ORDER: [&str; 3] = [HIGH_CONFIDENCE, MEDIUM_CONFIDENCE, LOW_CONFIDENCE];

fn column_of(group_id: &str) -> usize {
    if group_id.eq_ignore_ascii_case("domain") {
        0
    } else if group_id.eq_ignore_ascii_case("infrastructure") {
        2
    } else {
        1
    }
}

/// Domain, unclassified and infrastructure groups in three fixed columns. Groups sharing
/// a column are stacked top to bottom in id order.
pub(super) fn column_layout(
    groups: &mut GroupSet,
    viewport: Vec2,
    constants: &LayoutConstants,
    positions: &mut [Pos2],
) {
    let mut columns: [Vec<usize>; 3] = Default::default();
    for (index, group) in groups.groups.iter().enumerate() {
        columns[column_of(&group.id)].push(index);
    }

    for (column, members) in columns.iter().enumerate() {
        let x = viewport.x * constants.infra_columns[column];
        let rows = members.len() as f32;
        for (row, &group_index) in members.iter().enumerate() {
            let group = &mut groups.groups[group_index];
            group.center = Pos2::new(x, viewport.y * (row as f32 + 1.0) / (rows + 1.0));
            group.radius = circumference_radius(group.node_count(), constants.node_spacing)
                .clamp(constants.infra_min_radius, constants.infra_max_radius);
            let count = group.nodes.len() as f32;
            for (slot, &node) in group.nodes.iter().enumerate() {
                let angle = (slot as f32 / count) * TAU;
                positions[node] = group.center + Vec2::angled(angle) * group.radius;
            }
        }
    }
}

/// Concentric confidence rings around the viewport center, high confidence innermost.
pub(super) fn ring_layout(
    groups: &mut GroupSet,
    viewport: Vec2,
    constants: &LayoutConstants,
    positions: &mut [Pos2],
) {
    let center = (viewport * 0.5).to_pos2();
    let mut cumulative = 0.0;

    let mut ordered = RING_ORDER
        .iter()
        .filter_map(|tier| groups.index_of(tier))
        .collect::<Vec<_>>();
    for index in 0..groups.groups.len() {
        if !ordered.contains(&index) {
            ordered.push(index);
        }
    }

    for group_index in ordered {
        let group = &mut groups.groups[group_index];
        let ring = cumulative
            + circumference_radius(group.node_count(), constants.node_spacing)
                .max(constants.ring_min_radius)
            + constants.ring_gap;
        cumulative = ring;

        group.center = center;
        group.radius = ring;
        let count = group.nodes.len() as f32;
        for (slot, &node) in group.nodes.iter().enumerate() {
            let angle = -FRAC_PI_2 + (slot as f32 / count) * TAU;
            positions[node] = center + Vec2::angled(angle) * ring;
        }
    }
}

/// Every node on one circle around the viewport center. Groups are sized to enclose
/// their members so group-level views still have something to draw.
pub(super) fn circular_layout(
    groups: &mut GroupSet,
    viewport: Vec2,
    constants: &LayoutConstants,
    positions: &mut [Pos2],
) {
    let center = (viewport * 0.5).to_pos2();
    let radius = constants.fallback_radius_factor * viewport.x.min(viewport.y);
    let all = (0..positions.len()).collect::<Vec<_>>();
    if all.len() == 1 {
        positions[0] = center + Vec2::angled(0.0) * radius;
    } else {
        place_on_circle(&all, center, radius, 0.0, positions);
    }

    for group in &mut groups.groups {
        if group.nodes.is_empty() {
            continue;
        }
        let sum = group
            .nodes
            .iter()
            .fold(Vec2::ZERO, |acc, &node| acc + positions[node].to_vec2());
        let centroid = (sum / group.nodes.len() as f32).to_pos2();
        let spread = group
            .nodes
            .iter()
            .map(|&node| positions[node].distance(centroid))
            .fold(0.0_f32, f32::max);
        group.center = centroid;
        group.radius = (spread + constants.member_inset).max(constants.min_group_radius);
    }
}
