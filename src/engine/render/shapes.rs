use std::f32::consts::{FRAC_PI_2, TAU};

use eframe::egui::{Color32, Pos2, Rect, Vec2, vec2};

use crate::graph::{GraphNode, NodeKind};

use super::surface::Primitive;

const ELLIPSE_SEGMENTS: usize = 16;
const ARC_SEGMENT_ANGLE: f32 = 0.2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeShape {
    Hexagon,
    Cylinder,
    Diamond,
    Square,
    Circle,
}

/// Classification takes precedence over kind.
pub fn node_shape(node: &GraphNode) -> NodeShape {
    if node.is_domain() {
        return NodeShape::Hexagon;
    }
    if node.is_infrastructure() {
        return NodeShape::Cylinder;
    }

    match node.kind {
        NodeKind::Interface => NodeShape::Diamond,
        NodeKind::File => NodeShape::Square,
        _ => NodeShape::Circle,
    }
}

pub fn kind_color(kind: NodeKind) -> Color32 {
    match kind {
        NodeKind::Function => Color32::from_rgb(98, 160, 234),
        NodeKind::Method => Color32::from_rgb(120, 180, 230),
        NodeKind::Class => Color32::from_rgb(237, 180, 84),
        NodeKind::Interface => Color32::from_rgb(184, 132, 230),
        NodeKind::File => Color32::from_rgb(150, 160, 172),
        NodeKind::Module => Color32::from_rgb(110, 200, 170),
        NodeKind::Variable => Color32::from_rgb(230, 120, 140),
        NodeKind::Unknown => Color32::from_rgb(170, 170, 170),
    }
}

/// Halo color for classified nodes; `None` when the node carries no classification.
pub fn classification_color(node: &GraphNode) -> Option<Color32> {
    if node.is_domain() {
        Some(Color32::from_rgb(96, 214, 140))
    } else if node.is_infrastructure() {
        Some(Color32::from_rgb(241, 146, 94))
    } else {
        None
    }
}

pub fn shape_primitives(shape: NodeShape, center: Pos2, radius: f32) -> Vec<Primitive> {
    match shape {
        NodeShape::Circle => vec![Primitive::Circle { center, radius }],
        NodeShape::Square => {
            let side = radius * 1.7;
            vec![Primitive::Rect {
                rect: Rect::from_center_size(center, Vec2::splat(side)),
                corner_radius: radius * 0.15,
            }]
        }
        NodeShape::Diamond => vec![Primitive::Polygon(vec![
            center + vec2(0.0, -radius * 1.2),
            center + vec2(radius * 1.2, 0.0),
            center + vec2(0.0, radius * 1.2),
            center + vec2(-radius * 1.2, 0.0),
        ])],
        NodeShape::Hexagon => {
            let points = (0..6)
                .map(|corner| {
                    let angle = corner as f32 * TAU / 6.0;
                    center + vec2(angle.cos(), angle.sin()) * radius * 1.1
                })
                .collect();
            vec![Primitive::Polygon(points)]
        }
        NodeShape::Cylinder => {
            let half_width = radius;
            let half_height = radius * 0.9;
            let cap = radius * 0.35;
            let body = Rect::from_center_size(center, vec2(half_width * 2.0, half_height * 2.0));
            vec![
                Primitive::Polygon(ellipse_points(
                    center + vec2(0.0, half_height),
                    vec2(half_width, cap),
                )),
                Primitive::Rect {
                    rect: body,
                    corner_radius: 0.0,
                },
                Primitive::Polygon(ellipse_points(
                    center - vec2(0.0, half_height),
                    vec2(half_width, cap),
                )),
            ]
        }
    }
}

fn ellipse_points(center: Pos2, radii: Vec2) -> Vec<Pos2> {
    (0..ELLIPSE_SEGMENTS)
        .map(|step| {
            let angle = step as f32 * TAU / ELLIPSE_SEGMENTS as f32;
            center + vec2(angle.cos() * radii.x, angle.sin() * radii.y)
        })
        .collect()
}

/// Points along a circular arc starting at 12 o'clock and sweeping clockwise.
pub fn arc_points(center: Pos2, radius: f32, sweep: f32) -> Vec<Pos2> {
    let sweep = sweep.clamp(0.0, TAU);
    let segments = ((sweep / ARC_SEGMENT_ANGLE).ceil() as usize).max(1);
    (0..=segments)
        .map(|step| {
            let angle = -FRAC_PI_2 + sweep * step as f32 / segments as f32;
            center + vec2(angle.cos(), angle.sin()) * radius
        })
        .collect()
}

/// Sweep of the confidence ring; confidence is clamped into `0..=1`.
pub fn confidence_sweep(confidence: f32) -> f32 {
    confidence.clamp(0.0, 1.0) * TAU
}

pub fn arrowhead(tip: Pos2, direction: Vec2, size: f32) -> Option<Primitive> {
    if direction.length_sq() <= f32::EPSILON {
        return None;
    }

    let direction = direction.normalized();
    let perpendicular = direction.rot90();
    Some(Primitive::Polygon(vec![
        tip,
        tip - direction * size + perpendicular * size * 0.5,
        tip - direction * size - perpendicular * size * 0.5,
    ]))
}

#[cfg(test)]
mod tests {
    use eframe::egui::pos2;

    use super::*;

    #[test]
    fn classification_beats_kind() {
        let interface = GraphNode::new("i", "src/i", NodeKind::Interface);
        assert_eq!(node_shape(&interface), NodeShape::Diamond);
        assert_eq!(
            node_shape(&interface.clone().with_classification("Domain")),
            NodeShape::Hexagon
        );
        assert_eq!(
            node_shape(&interface.with_classification("infrastructure")),
            NodeShape::Cylinder
        );
        assert_eq!(
            node_shape(&GraphNode::new("f", "src/f", NodeKind::File)),
            NodeShape::Square
        );
        assert_eq!(
            node_shape(&GraphNode::new("u", "src/u", NodeKind::Unknown)),
            NodeShape::Circle
        );
    }

    #[test]
    fn arc_spans_requested_sweep() {
        let center = pos2(0.0, 0.0);
        let half = arc_points(center, 10.0, confidence_sweep(0.5));
        let first = half[0];
        let last = half[half.len() - 1];
        assert!((first - pos2(0.0, -10.0)).length() < 1e-4);
        assert!((last - pos2(0.0, 10.0)).length() < 1e-3);
        assert_eq!(confidence_sweep(3.0), TAU);
    }

    #[test]
    fn arrowhead_needs_a_direction() {
        assert!(arrowhead(pos2(1.0, 1.0), Vec2::ZERO, 6.0).is_none());
        let Some(Primitive::Polygon(points)) = arrowhead(pos2(10.0, 0.0), vec2(1.0, 0.0), 6.0)
        else {
            panic!("expected a triangle");
        };
        assert_eq!(points[0], pos2(10.0, 0.0));
        assert!(points[1].x < 10.0 && points[2].x < 10.0);
    }

    #[test]
    fn every_shape_stays_near_its_radius() {
        for shape in [
            NodeShape::Hexagon,
            NodeShape::Cylinder,
            NodeShape::Diamond,
            NodeShape::Square,
            NodeShape::Circle,
        ] {
            for primitive in shape_primitives(shape, pos2(50.0, 50.0), 8.0) {
                let bounds = primitive.bounds();
                assert!(bounds.width() <= 20.0, "{shape:?}");
                assert!(bounds.center().distance(pos2(50.0, 50.0)) <= 8.0, "{shape:?}");
            }
        }
    }
}
