use eframe::egui::{Pos2, Vec2};
use serde::{Deserialize, Serialize};

/// Maps layout (world) coordinates onto the canvas. Pan is in screen pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
    pub origin: Pos2,
    pub pan: Vec2,
    pub zoom: f32,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            origin: Pos2::ZERO,
            pan: Vec2::ZERO,
            zoom: 1.0,
        }
    }
}

impl ViewTransform {
    pub fn to_screen(&self, world: Pos2) -> Pos2 {
        self.origin + self.pan + world.to_vec2() * self.zoom
    }

    pub fn to_world(&self, screen: Pos2) -> Pos2 {
        ((screen - self.origin - self.pan) / self.zoom).to_pos2()
    }

    pub fn scale(&self, length: f32) -> f32 {
        length * self.zoom
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DetailLevel {
    GroupsOnly,
    GroupsWithLabels,
    SparseNodes,
    FullDetail,
}

impl DetailLevel {
    pub fn shows_nodes(self) -> bool {
        self >= Self::SparseNodes
    }

    pub fn shows_raw_edges(self) -> bool {
        self == Self::FullDetail
    }

    pub fn shows_group_labels(self) -> bool {
        self >= Self::GroupsWithLabels
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::GroupsOnly => "groups",
            Self::GroupsWithLabels => "groups + labels",
            Self::SparseNodes => "sparse nodes",
            Self::FullDetail => "full detail",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetailThresholds {
    pub group_labels: f32,
    pub sparse_nodes: f32,
    pub full_detail: f32,
    pub all_labels: f32,
}

impl Default for DetailThresholds {
    fn default() -> Self {
        Self {
            group_labels: 0.35,
            sparse_nodes: 0.6,
            full_detail: 1.0,
            all_labels: 1.6,
        }
    }
}

impl DetailThresholds {
    pub fn level_for(&self, zoom: f32) -> DetailLevel {
        if zoom >= self.full_detail {
            DetailLevel::FullDetail
        } else if zoom >= self.sparse_nodes {
            DetailLevel::SparseNodes
        } else if zoom >= self.group_labels {
            DetailLevel::GroupsWithLabels
        } else {
            DetailLevel::GroupsOnly
        }
    }

    pub fn labels_everything(&self, zoom: f32) -> bool {
        zoom > self.all_labels
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::{pos2, vec2};

    use super::*;

    #[test]
    fn screen_and_world_round_trip() {
        let view = ViewTransform {
            origin: pos2(10.0, 20.0),
            pan: vec2(-30.0, 5.0),
            zoom: 2.0,
        };
        let world = pos2(100.0, 50.0);
        let screen = view.to_screen(world);
        assert_eq!(screen, pos2(180.0, 125.0));
        assert_eq!(view.to_world(screen), world);
    }

    #[test]
    fn detail_grows_with_zoom() {
        let thresholds = DetailThresholds::default();
        assert_eq!(thresholds.level_for(0.1), DetailLevel::GroupsOnly);
        assert_eq!(thresholds.level_for(0.4), DetailLevel::GroupsWithLabels);
        assert_eq!(thresholds.level_for(0.8), DetailLevel::SparseNodes);
        assert_eq!(thresholds.level_for(1.0), DetailLevel::FullDetail);
        assert!(!DetailLevel::GroupsWithLabels.shows_nodes());
        assert!(DetailLevel::SparseNodes.shows_nodes());
        assert!(thresholds.labels_everything(2.0));
    }
}
