//! Pointer-driven state: hover, selection, focus, usage paths, pan/zoom, expanded groups
//! and the node context menu.
//!
//! [`InteractionState`] holds every piece of mutable interaction state explicitly. Each
//! handler runs to completion and reports what the surrounding shell should hear about
//! through a returned [`GraphEvent`].

mod hit_test;
mod paths;

use std::collections::HashSet;

use eframe::egui::{Pos2, Vec2};
use serde::{Deserialize, Serialize};

use crate::graph::{GraphSnapshot, NodeKind};

use super::Scene;
use super::view::{DetailLevel, DetailThresholds, ViewTransform};

pub use hit_test::{HitTarget, group_shows_nodes, hit_test};
pub use paths::{UsagePaths, focus_range, usage_paths};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConstants {
    pub group_hit_padding: f32,
    pub node_hit_radius: f32,
    pub edge_hit_threshold: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,
    pub default_focus_depth: usize,
    pub detail: DetailThresholds,
}

impl Default for InteractionConstants {
    fn default() -> Self {
        Self {
            group_hit_padding: 15.0,
            node_hit_radius: 12.0,
            edge_hit_threshold: 8.0,
            min_zoom: 0.05,
            max_zoom: 6.0,
            default_focus_depth: 2,
            detail: DetailThresholds::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContextAction {
    ShowUsagePaths,
    FocusNode,
    ShowConnected,
}

impl ContextAction {
    pub const ALL: [ContextAction; 3] = [
        ContextAction::ShowUsagePaths,
        ContextAction::FocusNode,
        ContextAction::ShowConnected,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::ShowUsagePaths => "Show usage paths",
            Self::FocusNode => "Focus on node",
            Self::ShowConnected => "Show connected",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ContextMenuState {
    pub visible: bool,
    pub position: Pos2,
    pub node_id: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GraphEvent {
    NodeSelected { id: String, kind: NodeKind },
    SelectionCleared,
    NodeFocused { id: String },
    ShowUsagePaths { id: String },
    ShowConnected { id: String },
    GroupToggled { id: String, expanded: bool },
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PanTracker {
    last: Option<Pos2>,
}

impl PanTracker {
    pub fn begin(&mut self, point: Pos2) {
        self.last = Some(point);
    }

    /// Delta since the previous point; `None` when no pan is in progress.
    pub fn move_to(&mut self, point: Pos2) -> Option<Vec2> {
        let last = self.last.replace(point)?;
        Some(point - last)
    }

    pub fn end(&mut self) {
        self.last = None;
    }

    pub fn is_active(&self) -> bool {
        self.last.is_some()
    }
}

#[derive(Clone, Debug)]
pub struct InteractionState {
    pub constants: InteractionConstants,
    pub hovered: Option<HitTarget>,
    pub selected: Option<String>,
    pub focused: Option<String>,
    pub focus_depth: usize,
    pub focus_range: HashSet<String>,
    pub usage_paths: Option<UsagePaths>,
    pub pan: Vec2,
    pub zoom: f32,
    pub expanded_groups: HashSet<String>,
    pub context_menu: ContextMenuState,
    pan_tracker: PanTracker,
}

impl Default for InteractionState {
    fn default() -> Self {
        Self::new(InteractionConstants::default())
    }
}

impl InteractionState {
    pub fn new(constants: InteractionConstants) -> Self {
        Self {
            focus_depth: constants.default_focus_depth,
            constants,
            hovered: None,
            selected: None,
            focused: None,
            focus_range: HashSet::new(),
            usage_paths: None,
            pan: Vec2::ZERO,
            zoom: 1.0,
            expanded_groups: HashSet::new(),
            context_menu: ContextMenuState::default(),
            pan_tracker: PanTracker::default(),
        }
    }

    pub fn view_transform(&self, origin: Pos2) -> ViewTransform {
        ViewTransform {
            origin,
            pan: self.pan,
            zoom: self.zoom,
        }
    }

    pub fn detail_level(&self) -> DetailLevel {
        self.constants.detail.level_for(self.zoom)
    }

    pub fn hovered_node(&self) -> Option<usize> {
        match self.hovered {
            Some(HitTarget::Node(index)) => Some(index),
            _ => None,
        }
    }

    pub fn pointer_moved(
        &mut self,
        snapshot: &GraphSnapshot,
        scene: &Scene,
        world: Pos2,
    ) -> Option<HitTarget> {
        self.hovered = hit_test(
            snapshot,
            scene,
            world,
            self.detail_level(),
            &self.expanded_groups,
            &self.constants,
        );
        self.hovered
    }

    pub fn pointer_left(&mut self) {
        self.hovered = None;
    }

    /// Primary click: selects a node, toggles a collapsed group, or clears the
    /// selection when it lands on empty space.
    pub fn click(
        &mut self,
        snapshot: &GraphSnapshot,
        scene: &Scene,
        world: Pos2,
    ) -> Option<GraphEvent> {
        self.context_menu.visible = false;
        match self.pointer_moved(snapshot, scene, world) {
            Some(HitTarget::Node(index)) => {
                let node = snapshot.nodes().get(index)?;
                self.selected = Some(node.id.clone());
                Some(GraphEvent::NodeSelected {
                    id: node.id.clone(),
                    kind: node.kind,
                })
            }
            Some(HitTarget::Group(index)) => {
                let id = scene.groups.groups.get(index)?.id.clone();
                let expanded = self.toggle_group(&id);
                Some(GraphEvent::GroupToggled { id, expanded })
            }
            Some(HitTarget::Edge(_)) => None,
            None => {
                self.usage_paths = None;
                self.selected
                    .take()
                    .map(|_| GraphEvent::SelectionCleared)
            }
        }
    }

    /// Flips a group between expanded and collapsed; returns the new state.
    pub fn toggle_group(&mut self, group_id: &str) -> bool {
        if self.expanded_groups.remove(group_id) {
            false
        } else {
            self.expanded_groups.insert(group_id.to_owned());
            true
        }
    }

    /// Opens the context menu at `screen` if a node is hovered. Returns whether it opened.
    pub fn open_context_menu(&mut self, snapshot: &GraphSnapshot, screen: Pos2) -> bool {
        let Some(node) = self
            .hovered_node()
            .and_then(|index| snapshot.nodes().get(index))
        else {
            self.context_menu.visible = false;
            return false;
        };

        self.context_menu = ContextMenuState {
            visible: true,
            position: screen,
            node_id: Some(node.id.clone()),
        };
        true
    }

    pub fn close_context_menu(&mut self) {
        self.context_menu.visible = false;
    }

    pub fn apply_context_action(
        &mut self,
        snapshot: &GraphSnapshot,
        action: ContextAction,
    ) -> Option<GraphEvent> {
        self.context_menu.visible = false;
        let id = self.context_menu.node_id.take()?;
        self.run_action(snapshot, action, &id)
    }

    /// Runs a node action directly, as the inspector does without a menu.
    pub fn run_action(
        &mut self,
        snapshot: &GraphSnapshot,
        action: ContextAction,
        id: &str,
    ) -> Option<GraphEvent> {
        if !snapshot.contains(id) {
            return None;
        }

        let id = id.to_owned();
        match action {
            ContextAction::ShowUsagePaths => {
                self.usage_paths = Some(usage_paths(snapshot, &id));
                Some(GraphEvent::ShowUsagePaths { id })
            }
            ContextAction::FocusNode => {
                self.focus_node(snapshot, &id);
                Some(GraphEvent::NodeFocused { id })
            }
            ContextAction::ShowConnected => {
                self.focused = Some(id.clone());
                self.focus_range = focus_range(snapshot, &id, 1);
                Some(GraphEvent::ShowConnected { id })
            }
        }
    }

    pub fn focus_node(&mut self, snapshot: &GraphSnapshot, id: &str) {
        self.focused = Some(id.to_owned());
        self.focus_range = focus_range(snapshot, id, self.focus_depth);
    }

    pub fn set_focus_depth(&mut self, snapshot: &GraphSnapshot, depth: usize) {
        self.focus_depth = depth;
        if let Some(id) = self.focused.clone() {
            self.focus_range = focus_range(snapshot, &id, depth);
        }
    }

    pub fn clear_focus(&mut self) {
        self.focused = None;
        self.focus_range.clear();
        self.usage_paths = None;
    }

    pub fn begin_pan(&mut self, screen: Pos2) {
        self.close_context_menu();
        self.pan_tracker.begin(screen);
    }

    pub fn pan_to(&mut self, screen: Pos2) -> Option<Vec2> {
        let delta = self.pan_tracker.move_to(screen)?;
        self.pan += delta;
        Some(delta)
    }

    pub fn end_pan(&mut self) {
        self.pan_tracker.end();
    }

    pub fn is_panning(&self) -> bool {
        self.pan_tracker.is_active()
    }

    /// Scales by `factor` while keeping the world point under `pointer` fixed.
    pub fn zoom_at(&mut self, origin: Pos2, pointer: Pos2, factor: f32) {
        let world_before = self.view_transform(origin).to_world(pointer);
        self.zoom = (self.zoom * factor).clamp(self.constants.min_zoom, self.constants.max_zoom);
        self.pan = pointer - origin - world_before.to_vec2() * self.zoom;
    }

    pub fn reset_view(&mut self) {
        self.pan = Vec2::ZERO;
        self.zoom = 1.0;
    }

    /// Drops references to nodes and groups that no longer exist after a data refresh
    /// or lens change.
    pub fn retain_existing(&mut self, snapshot: &GraphSnapshot, scene: &Scene) {
        self.hovered = None;
        if self
            .selected
            .as_deref()
            .is_some_and(|id| !snapshot.contains(id))
        {
            self.selected = None;
        }

        match self.focused.clone() {
            Some(id) if snapshot.contains(&id) => {
                self.focus_range = focus_range(snapshot, &id, self.focus_depth);
            }
            Some(_) => {
                self.focused = None;
                self.focus_range.clear();
            }
            None => {}
        }

        self.usage_paths = self
            .usage_paths
            .take()
            .filter(|paths| snapshot.contains(&paths.start))
            .map(|paths| usage_paths(snapshot, &paths.start));

        if self
            .context_menu
            .node_id
            .as_deref()
            .is_some_and(|id| !snapshot.contains(id))
        {
            self.context_menu = ContextMenuState::default();
        }

        self.expanded_groups
            .retain(|id| scene.groups.index_of(id).is_some());
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::{pos2, vec2};

    use super::*;
    use crate::engine::layout::LayoutConstants;
    use crate::graph::{GraphEdge, GraphNode, Lens};

    fn fixture() -> (GraphSnapshot, Scene) {
        let snapshot = GraphSnapshot::new(
            vec![
                GraphNode::new("A", "src/a/A", NodeKind::Function),
                GraphNode::new("B", "src/a/B", NodeKind::Function),
                GraphNode::new("C", "src/c/C", NodeKind::Class),
                GraphNode::new("D", "src/d/D", NodeKind::Interface),
            ],
            vec![
                GraphEdge::new("A", "B", "calls"),
                GraphEdge::new("B", "C", "calls"),
                GraphEdge::new("C", "D", "implements"),
            ],
        );
        let scene = Scene::build(
            &snapshot,
            Lens::Structure,
            vec2(1000.0, 800.0),
            &LayoutConstants::default(),
        );
        (snapshot, scene)
    }

    fn position_of(snapshot: &GraphSnapshot, scene: &Scene, id: &str) -> Pos2 {
        scene.positions[snapshot.index_of(id).unwrap()]
    }

    #[test]
    fn pan_deltas_accumulate() {
        let mut state = InteractionState::default();
        assert_eq!(state.pan_to(pos2(5.0, 5.0)), None);

        state.begin_pan(pos2(10.0, 10.0));
        assert_eq!(state.pan_to(pos2(15.0, 7.0)), Some(vec2(5.0, -3.0)));
        assert_eq!(state.pan_to(pos2(20.0, 7.0)), Some(vec2(5.0, 0.0)));
        assert_eq!(state.pan, vec2(10.0, -3.0));

        state.end_pan();
        assert!(!state.is_panning());
    }

    #[test]
    fn zoom_keeps_pointer_anchored() {
        let mut state = InteractionState::default();
        let origin = pos2(0.0, 0.0);
        let pointer = pos2(300.0, 200.0);
        let before = state.view_transform(origin).to_world(pointer);
        state.zoom_at(origin, pointer, 2.0);
        let after = state.view_transform(origin).to_world(pointer);
        assert!((before - after).length() < 1e-3);
        assert_eq!(state.zoom, 2.0);

        state.zoom_at(origin, pointer, 1000.0);
        assert_eq!(state.zoom, state.constants.max_zoom);
    }

    #[test]
    fn click_selects_node_and_reports_kind() {
        let (snapshot, scene) = fixture();
        let mut state = InteractionState::default();
        let event = state.click(&snapshot, &scene, position_of(&snapshot, &scene, "C"));
        assert_eq!(
            event,
            Some(GraphEvent::NodeSelected {
                id: "C".to_owned(),
                kind: NodeKind::Class
            })
        );
        assert_eq!(state.selected.as_deref(), Some("C"));

        let event = state.click(&snapshot, &scene, pos2(-500.0, -500.0));
        assert_eq!(event, Some(GraphEvent::SelectionCleared));
        assert_eq!(state.selected, None);
    }

    #[test]
    fn clicking_collapsed_group_toggles_it() {
        let (snapshot, scene) = fixture();
        let mut state = InteractionState::default();
        state.zoom = 0.1;
        let group = &scene.groups.groups[0];

        let event = state.click(&snapshot, &scene, group.center);
        assert_eq!(
            event,
            Some(GraphEvent::GroupToggled {
                id: group.id.clone(),
                expanded: true
            })
        );
        assert!(state.expanded_groups.contains(&group.id));
        assert!(!state.toggle_group(&group.id));
    }

    #[test]
    fn context_menu_needs_a_hovered_node() {
        let (snapshot, scene) = fixture();
        let mut state = InteractionState::default();
        assert!(!state.open_context_menu(&snapshot, pos2(10.0, 10.0)));

        state.pointer_moved(&snapshot, &scene, position_of(&snapshot, &scene, "B"));
        assert!(state.open_context_menu(&snapshot, pos2(10.0, 10.0)));
        assert_eq!(state.context_menu.node_id.as_deref(), Some("B"));
        assert_eq!(state.context_menu.position, pos2(10.0, 10.0));

        let event = state.apply_context_action(&snapshot, ContextAction::ShowConnected);
        assert_eq!(event, Some(GraphEvent::ShowConnected { id: "B".to_owned() }));
        assert_eq!(state.focus_range.len(), 3);
        assert!(!state.context_menu.visible);

        assert_eq!(
            state.apply_context_action(&snapshot, ContextAction::FocusNode),
            None
        );
    }

    #[test]
    fn context_actions_delegate_to_traversals() {
        let (snapshot, scene) = fixture();
        let mut state = InteractionState::default();
        state.pointer_moved(&snapshot, &scene, position_of(&snapshot, &scene, "A"));
        state.open_context_menu(&snapshot, pos2(0.0, 0.0));
        state.apply_context_action(&snapshot, ContextAction::ShowUsagePaths);
        let paths = state.usage_paths.as_ref().unwrap();
        assert_eq!(paths.nodes.len(), 4);
        assert_eq!(paths.edges.len(), 3);

        state.pointer_moved(&snapshot, &scene, position_of(&snapshot, &scene, "A"));
        state.open_context_menu(&snapshot, pos2(0.0, 0.0));
        state.apply_context_action(&snapshot, ContextAction::FocusNode);
        assert_eq!(state.focused.as_deref(), Some("A"));
        assert_eq!(state.focus_range.len(), 3);

        state.set_focus_depth(&snapshot, 3);
        assert_eq!(state.focus_range.len(), 4);
    }

    #[test]
    fn refresh_drops_state_for_vanished_nodes() {
        let (snapshot, scene) = fixture();
        let mut state = InteractionState::default();
        state.selected = Some("D".to_owned());
        state.focus_node(&snapshot, "C");
        state.expanded_groups.insert("src/d".to_owned());
        state.expanded_groups.insert("src/a".to_owned());

        let trimmed = GraphSnapshot::new(snapshot.nodes()[..2].to_vec(), snapshot.edges().to_vec());
        let trimmed_scene = Scene::build(
            &trimmed,
            Lens::Structure,
            vec2(1000.0, 800.0),
            &LayoutConstants::default(),
        );
        state.retain_existing(&trimmed, &trimmed_scene);

        assert_eq!(state.selected, None);
        assert_eq!(state.focused, None);
        assert!(state.focus_range.is_empty());
        assert_eq!(state.expanded_groups, HashSet::from(["src/a".to_owned()]));
        assert!(scene.groups.len() > trimmed_scene.groups.len());
    }

    #[test]
    fn refresh_retraces_usage_paths() {
        let nodes = ["A", "B", "C", "D"]
            .into_iter()
            .map(|id| GraphNode::new(id, id, NodeKind::Function))
            .collect::<Vec<_>>();
        let before = GraphSnapshot::new(
            nodes.clone(),
            vec![GraphEdge::new("A", "B", "calls"), GraphEdge::new("B", "C", "calls")],
        );
        let mut state = InteractionState::default();
        state.run_action(&before, ContextAction::ShowUsagePaths, "A");

        let after = GraphSnapshot::new(
            nodes.clone(),
            vec![GraphEdge::new("A", "B", "calls"), GraphEdge::new("A", "D", "calls")],
        );
        let scene = Scene::build(&after, Lens::Structure, vec2(800.0, 600.0), &LayoutConstants::default());
        state.retain_existing(&after, &scene);

        let paths = state.usage_paths.as_ref().unwrap();
        let ids = |values: &[&str]| values.iter().map(|value| value.to_string()).collect::<HashSet<_>>();
        assert_eq!(paths.nodes, ids(&["A", "B", "D"]));
        assert_eq!(paths.edges, ids(&["A-B", "A-D"]));

        let without_start = GraphSnapshot::new(nodes[1..].to_vec(), Vec::new());
        let scene = Scene::build(
            &without_start,
            Lens::Structure,
            vec2(800.0, 600.0),
            &LayoutConstants::default(),
        );
        state.retain_existing(&without_start, &scene);
        assert_eq!(state.usage_paths, None);
    }
}
