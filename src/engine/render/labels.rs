use eframe::egui::{Pos2, Rect, Vec2, vec2};

use crate::util::labels_overlap;

const LABEL_PADDING: f32 = 2.0;

/// Greedy label placement: each new box tries a few anchored candidates and takes the
/// first one that stays clear of every box placed so far.
#[derive(Debug, Default)]
pub struct LabelPlacer {
    placed: Vec<Rect>,
}

impl LabelPlacer {
    /// Finds a free spot for a box of `size` next to a mark of `clearance` radius at
    /// `anchor`. Returns `None` when every candidate collides.
    pub fn place(&mut self, anchor: Pos2, clearance: f32, size: Vec2) -> Option<Rect> {
        let rect = candidates(anchor, clearance, size)
            .into_iter()
            .find(|candidate| !self.collides(*candidate))?;
        self.placed.push(rect);
        Some(rect)
    }

    /// Like [`Self::place`] but always yields a box, falling back to the first candidate.
    pub fn place_forced(&mut self, anchor: Pos2, clearance: f32, size: Vec2) -> Rect {
        let options = candidates(anchor, clearance, size);
        let rect = options
            .iter()
            .copied()
            .find(|candidate| !self.collides(*candidate))
            .unwrap_or(options[0]);
        self.placed.push(rect);
        rect
    }

    pub fn len(&self) -> usize {
        self.placed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placed.is_empty()
    }

    fn collides(&self, rect: Rect) -> bool {
        self.placed
            .iter()
            .any(|other| labels_overlap(rect, *other, LABEL_PADDING))
    }
}

fn candidates(anchor: Pos2, clearance: f32, size: Vec2) -> [Rect; 4] {
    let gap = clearance + 4.0;
    [
        Rect::from_min_size(anchor + vec2(gap, -size.y * 0.5), size),
        Rect::from_min_size(anchor + vec2(-size.x * 0.5, -gap - size.y), size),
        Rect::from_min_size(anchor + vec2(-size.x * 0.5, gap), size),
        Rect::from_min_size(anchor + vec2(-gap - size.x, -size.y * 0.5), size),
    ]
}
