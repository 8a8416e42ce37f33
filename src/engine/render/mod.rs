//! Scene drawing against an abstract [`Surface`].
//!
//! The renderer only reads its inputs. Layout positions are world coordinates; every
//! point goes through the current [`ViewTransform`] while stroke widths and label sizes
//! stay in screen pixels.

mod labels;
mod shapes;
mod surface;

use std::collections::HashSet;
use std::f32::consts::TAU;

use eframe::egui::{Color32, Pos2, Rect, Stroke, Vec2, vec2};

use crate::graph::{GraphSnapshot, edge_key};
use crate::util::short_label;

use super::Scene;
use super::interaction::{HitTarget, InteractionState, group_shows_nodes};
use super::view::ViewTransform;

pub use labels::LabelPlacer;
pub use shapes::{
    NodeShape, arc_points, arrowhead, classification_color, confidence_sweep, kind_color,
    node_shape, shape_primitives,
};
pub use surface::{Dash, Primitive, Surface};

#[cfg(test)]
pub(crate) use surface::recording;

const BACKGROUND: Color32 = Color32::from_rgb(19, 23, 29);
const NODE_RADIUS: f32 = 8.0;
const CURVE_SEGMENTS: usize = 20;
const BUNDLE_CURVE_OFFSET: f32 = 0.15;
const BUNDLE_MAX_WIDTH: f32 = 8.0;
const BUNDLE_ALPHA: u8 = 153;
const BUNDLE_ARROW_SIZE: f32 = 10.0;
const EDGE_ARROW_SIZE: f32 = 6.0;
const LABEL_TEXT_SIZE: f32 = 12.0;
const LABEL_PADDING: Vec2 = vec2(4.0, 2.0);
const HALO_DASH: Dash = Dash {
    length: 4.0,
    gap: 3.0,
};

const SELECTED_COLOR: Color32 = Color32::from_rgb(245, 206, 93);
const HOVER_COLOR: Color32 = Color32::from_rgb(255, 164, 101);
const USAGE_PATH_COLOR: Color32 = Color32::from_rgb(246, 206, 104);
const FOCUS_COLOR: Color32 = Color32::from_rgb(241, 146, 94);
const FILTER_COLOR: Color32 = Color32::from_rgb(103, 196, 255);
const NODE_OUTLINE: Color32 = Color32::from_rgba_premultiplied(15, 15, 15, 190);
const LABEL_BACKGROUND: Color32 = Color32::from_rgba_premultiplied(22, 26, 33, 225);
const LABEL_BORDER: Color32 = Color32::from_rgb(88, 98, 112);
const LABEL_TEXT: Color32 = Color32::from_gray(238);

pub struct Frame<'a> {
    pub snapshot: &'a GraphSnapshot,
    pub scene: &'a Scene,
    pub interaction: &'a InteractionState,
    /// Screen rectangle of the canvas; its top-left corner is the world origin.
    pub viewport: Rect,
    /// Node indices matching the label filter, if one is active.
    pub filter_matches: Option<&'a HashSet<usize>>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub groups: usize,
    pub bundles: usize,
    pub edges: usize,
    pub nodes: usize,
    pub labels: usize,
}

pub fn bundle_width(count: usize) -> f32 {
    (1.0 + 2.0 * (count as f32 + 1.0).log2()).min(BUNDLE_MAX_WIDTH)
}

/// Control point bending a bundle off the straight line by a fixed share of its length.
pub fn bundle_control_point(start: Pos2, end: Pos2) -> Pos2 {
    let midpoint = start + (end - start) * 0.5;
    midpoint + (end - start).rot90() * BUNDLE_CURVE_OFFSET
}

pub fn quadratic_points(start: Pos2, control: Pos2, end: Pos2, segments: usize) -> Vec<Pos2> {
    let segments = segments.max(1);
    (0..=segments)
        .map(|step| {
            let t = step as f32 / segments as f32;
            let inverse = 1.0 - t;
            let point = start.to_vec2() * (inverse * inverse)
                + control.to_vec2() * (2.0 * inverse * t)
                + end.to_vec2() * (t * t);
            point.to_pos2()
        })
        .collect()
}

pub fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * amount) as u8;
    Color32::from_rgba_unmultiplied(
        mix(base.r(), overlay.r()),
        mix(base.g(), overlay.g()),
        mix(base.b(), overlay.b()),
        mix(base.a(), overlay.a()),
    )
}

pub fn dim_color(color: Color32, factor: f32) -> Color32 {
    let factor = factor.clamp(0.0, 1.0);
    Color32::from_rgba_unmultiplied(
        (color.r() as f32 * factor) as u8,
        (color.g() as f32 * factor) as u8,
        (color.b() as f32 * factor) as u8,
        (color.a() as f32 * (0.45 + factor * 0.55)) as u8,
    )
}

fn with_alpha(color: Color32, alpha: u8) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha)
}

fn circle_on_screen(viewport: Rect, center: Pos2, radius: f32) -> bool {
    viewport.expand(radius).contains(center)
}

fn segment_on_screen(viewport: Rect, start: Pos2, end: Pos2) -> bool {
    viewport.intersects(Rect::from_two_pos(start, end).expand(1.0))
}

struct Emphasis<'a> {
    frame: &'a Frame<'a>,
    active: bool,
}

impl<'a> Emphasis<'a> {
    fn new(frame: &'a Frame<'a>) -> Self {
        let interaction = frame.interaction;
        let active = interaction.usage_paths.is_some()
            || !interaction.focus_range.is_empty()
            || frame.filter_matches.is_some_and(|matches| !matches.is_empty());
        Self { frame, active }
    }

    fn node(&self, index: usize, id: &str) -> bool {
        let interaction = self.frame.interaction;
        interaction
            .usage_paths
            .as_ref()
            .is_some_and(|paths| paths.nodes.contains(id))
            || interaction.focus_range.contains(id)
            || self.filtered(index)
    }

    fn filtered(&self, index: usize) -> bool {
        self.frame
            .filter_matches
            .is_some_and(|matches| matches.contains(&index))
    }
}

struct PendingLabel {
    anchor: Pos2,
    clearance: f32,
    text: String,
    forced: bool,
}

/// Draws one frame. Missing geometry is skipped element by element.
pub fn render<S: Surface + ?Sized>(surface: &mut S, frame: &Frame<'_>) -> RenderStats {
    let mut stats = RenderStats::default();
    surface.fill_background(frame.viewport, BACKGROUND);
    if frame.snapshot.is_empty() || frame.scene.groups.is_empty() {
        return stats;
    }

    let view = frame.interaction.view_transform(frame.viewport.min);
    let emphasis = Emphasis::new(frame);
    let mut labels = Vec::new();

    stats.groups = draw_groups(surface, frame, &view, &mut labels);
    if frame.interaction.detail_level().shows_raw_edges() {
        stats.edges = draw_edges(surface, frame, &view, &emphasis);
    } else {
        stats.bundles = draw_bundles(surface, frame, &view);
    }
    stats.nodes = draw_nodes(surface, frame, &view, &emphasis, &mut labels);
    stats.labels = draw_labels(surface, labels);
    stats
}

fn draw_groups<S: Surface + ?Sized>(
    surface: &mut S,
    frame: &Frame<'_>,
    view: &ViewTransform,
    labels: &mut Vec<PendingLabel>,
) -> usize {
    let interaction = frame.interaction;
    let detail = interaction.detail_level();
    let mut drawn = 0;

    // Largest first so nested rings stay visible.
    let mut order = frame.scene.groups.groups.iter().enumerate().collect::<Vec<_>>();
    order.sort_by(|(_, a), (_, b)| b.radius.total_cmp(&a.radius));

    for (index, group) in order {
        let center = view.to_screen(group.center);
        let radius = view.scale(group.radius);
        if !circle_on_screen(frame.viewport, center, radius) {
            continue;
        }

        let hovered = interaction.hovered == Some(HitTarget::Group(index));
        let collapsed = !group_shows_nodes(detail, &interaction.expanded_groups, &group.id);
        let fill_alpha = if collapsed { 70 } else { 26 };
        let stroke = Stroke::new(
            if hovered { 2.5 } else { 1.4 },
            with_alpha(group.color, if hovered { 230 } else { 140 }),
        );
        surface.fill_shape(
            &Primitive::Circle { center, radius },
            with_alpha(group.color, fill_alpha),
            stroke,
        );
        drawn += 1;

        if detail.shows_group_labels() || hovered {
            labels.push(PendingLabel {
                anchor: center,
                clearance: radius,
                text: format!("{} ({})", group.name, group.node_count()),
                forced: hovered,
            });
        }
    }

    drawn
}

fn draw_bundles<S: Surface + ?Sized>(
    surface: &mut S,
    frame: &Frame<'_>,
    view: &ViewTransform,
) -> usize {
    let groups = &frame.scene.groups.groups;
    let mut drawn = 0;

    for bundle in &frame.scene.bundles {
        let (Some(source), Some(target)) =
            (groups.get(bundle.source_group), groups.get(bundle.target_group))
        else {
            continue;
        };

        let start = view.to_screen(source.center);
        let end = view.to_screen(target.center);
        if (end - start).length_sq() <= f32::EPSILON
            || !segment_on_screen(frame.viewport, start, end)
        {
            continue;
        }

        let control = bundle_control_point(start, end);
        let color = with_alpha(source.color, BUNDLE_ALPHA);
        let stroke = Stroke::new(bundle_width(bundle.count), color);
        surface.draw_path(
            &quadratic_points(start, control, end, CURVE_SEGMENTS),
            stroke,
            None,
        );

        let direction = end - control;
        let tip = end - direction.normalized() * view.scale(target.radius);
        if let Some(head) = arrowhead(tip, direction, BUNDLE_ARROW_SIZE) {
            surface.fill_shape(&head, color, Stroke::NONE);
        }
        drawn += 1;
    }

    drawn
}

fn node_screen_radius(zoom: f32) -> f32 {
    (NODE_RADIUS * zoom.powf(0.4)).clamp(3.0, 20.0)
}

fn node_visible(frame: &Frame<'_>, index: usize) -> bool {
    let groups = &frame.scene.groups;
    groups
        .group_of(index)
        .and_then(|group| groups.groups.get(group))
        .is_some_and(|group| {
            group_shows_nodes(
                frame.interaction.detail_level(),
                &frame.interaction.expanded_groups,
                &group.id,
            )
        })
}

fn draw_edges<S: Surface + ?Sized>(
    surface: &mut S,
    frame: &Frame<'_>,
    view: &ViewTransform,
    emphasis: &Emphasis<'_>,
) -> usize {
    let interaction = frame.interaction;
    let radius = node_screen_radius(interaction.zoom);
    let mut drawn = 0;

    for (slot, resolved) in frame.snapshot.resolved_edges().iter().enumerate() {
        if resolved.source == resolved.target
            || !node_visible(frame, resolved.source)
            || !node_visible(frame, resolved.target)
        {
            continue;
        }
        let (Some(source), Some(target)) = (
            frame.scene.position(resolved.source),
            frame.scene.position(resolved.target),
        ) else {
            continue;
        };

        let start = view.to_screen(source);
        let end = view.to_screen(target);
        let delta = end - start;
        if delta.length() <= radius * 2.0 || !segment_on_screen(frame.viewport, start, end) {
            continue;
        }

        let edge = frame.snapshot.edge(resolved);
        let on_usage_path = interaction
            .usage_paths
            .as_ref()
            .is_some_and(|paths| paths.edges.contains(&edge_key(&edge.source, &edge.target)));
        let in_focus = interaction.focus_range.contains(&edge.source)
            && interaction.focus_range.contains(&edge.target);
        let hovered = interaction.hovered == Some(HitTarget::Edge(slot));

        let stroke = if on_usage_path {
            Stroke::new(2.6, USAGE_PATH_COLOR)
        } else if in_focus {
            Stroke::new(2.0, FOCUS_COLOR)
        } else if hovered {
            Stroke::new(2.2, HOVER_COLOR)
        } else if emphasis.active {
            Stroke::new(0.8, Color32::from_rgba_unmultiplied(80, 90, 104, 90))
        } else {
            Stroke::new(1.2, Color32::from_rgba_unmultiplied(110, 120, 134, 200))
        };

        let direction = delta.normalized();
        let from = start + direction * radius;
        let to = end - direction * radius;
        surface.stroke_line(from, to, stroke);
        if let Some(head) = arrowhead(to, direction, EDGE_ARROW_SIZE) {
            surface.fill_shape(&head, stroke.color, Stroke::NONE);
        }
        drawn += 1;
    }

    drawn
}

fn draw_nodes<S: Surface + ?Sized>(
    surface: &mut S,
    frame: &Frame<'_>,
    view: &ViewTransform,
    emphasis: &Emphasis<'_>,
    labels: &mut Vec<PendingLabel>,
) -> usize {
    let interaction = frame.interaction;
    let radius = node_screen_radius(interaction.zoom);
    let label_everything = interaction.constants.detail.labels_everything(interaction.zoom);
    let hovered = interaction.hovered_node();
    let mut drawn = 0;

    for (index, node) in frame.snapshot.nodes().iter().enumerate() {
        if !node_visible(frame, index) {
            continue;
        }
        let Some(position) = frame.scene.position(index) else {
            continue;
        };
        let center = view.to_screen(position);
        if !circle_on_screen(frame.viewport, center, radius + 8.0) {
            continue;
        }

        let is_hovered = hovered == Some(index);
        let is_selected = interaction.selected.as_deref() == Some(node.id.as_str());
        let is_focused = interaction.focused.as_deref() == Some(node.id.as_str());
        let emphasized = emphasis.node(index, &node.id);

        let base = kind_color(node.kind);
        let fill = if emphasis.filtered(index) {
            blend_color(base, FILTER_COLOR, 0.55)
        } else if emphasis.active && !emphasized && !is_selected {
            dim_color(base, 0.45)
        } else {
            base
        };

        let outline = Stroke::new(1.0, NODE_OUTLINE);
        for primitive in shape_primitives(node_shape(node), center, radius) {
            surface.fill_shape(&primitive, fill, outline);
        }

        if let Some(color) = classification_color(node) {
            surface.draw_path(
                &arc_points(center, radius + 4.0, TAU),
                Stroke::new(1.2, color),
                Some(HALO_DASH),
            );
        }

        if let Some(confidence) = node.confidence {
            let sweep = confidence_sweep(confidence);
            if sweep > 0.0 {
                surface.draw_path(
                    &arc_points(center, radius + 7.0, sweep),
                    Stroke::new(2.0, with_alpha(SELECTED_COLOR, 200)),
                    None,
                );
            }
        }

        if is_hovered || is_selected {
            let color = if is_selected { SELECTED_COLOR } else { HOVER_COLOR };
            surface.fill_shape(
                &Primitive::Circle {
                    center,
                    radius: radius + 10.0,
                },
                Color32::TRANSPARENT,
                Stroke::new(2.0, color),
            );
        }
        drawn += 1;

        let forced = is_hovered || is_selected || is_focused;
        if forced || label_everything || emphasis.filtered(index) {
            labels.push(PendingLabel {
                anchor: center,
                clearance: radius + 8.0,
                text: short_label(&node.label).to_owned(),
                forced,
            });
        }
    }

    drawn
}

fn draw_labels<S: Surface + ?Sized>(surface: &mut S, mut labels: Vec<PendingLabel>) -> usize {
    // Forced labels claim their spots first.
    labels.sort_by_key(|label| !label.forced);

    let mut placer = LabelPlacer::default();
    let mut drawn = 0;
    for label in labels {
        let size = surface.measure_text(&label.text, LABEL_TEXT_SIZE) + LABEL_PADDING * 2.0;
        let rect = if label.forced {
            placer.place_forced(label.anchor, label.clearance, size)
        } else {
            match placer.place(label.anchor, label.clearance, size) {
                Some(rect) => rect,
                None => continue,
            }
        };

        surface.fill_shape(
            &Primitive::Rect {
                rect,
                corner_radius: 3.0,
            },
            LABEL_BACKGROUND,
            Stroke::new(1.0, LABEL_BORDER),
        );
        surface.draw_text(rect.min + LABEL_PADDING, &label.text, LABEL_TEXT_SIZE, LABEL_TEXT);
        drawn += 1;
    }

    drawn
}
