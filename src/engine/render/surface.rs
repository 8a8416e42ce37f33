use eframe::egui::{Color32, Pos2, Rect, Stroke, Vec2};

/// Dash pattern for stroked paths, in screen pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Dash {
    pub length: f32,
    pub gap: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Primitive {
    Circle { center: Pos2, radius: f32 },
    /// Convex outline, in drawing order.
    Polygon(Vec<Pos2>),
    Rect { rect: Rect, corner_radius: f32 },
}

impl Primitive {
    pub fn bounds(&self) -> Rect {
        match self {
            Self::Circle { center, radius } => Rect::from_center_size(*center, Vec2::splat(radius * 2.0)),
            Self::Polygon(points) => Rect::from_points(points),
            Self::Rect { rect, .. } => *rect,
        }
    }
}

/// Minimal immediate-mode drawing target. All coordinates are screen space.
pub trait Surface {
    fn fill_background(&mut self, rect: Rect, color: Color32);

    fn stroke_line(&mut self, from: Pos2, to: Pos2, stroke: Stroke);

    /// Open polyline; dashed when `dash` is set.
    fn draw_path(&mut self, points: &[Pos2], stroke: Stroke, dash: Option<Dash>);

    fn fill_shape(&mut self, primitive: &Primitive, fill: Color32, stroke: Stroke);

    fn measure_text(&self, text: &str, size: f32) -> Vec2;

    fn draw_text(&mut self, position: Pos2, text: &str, size: f32, color: Color32);
}

#[cfg(test)]
pub(crate) mod recording {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    pub(crate) enum DrawOp {
        Background(Rect, Color32),
        Line { from: Pos2, to: Pos2, stroke: Stroke },
        Path { points: Vec<Pos2>, stroke: Stroke, dash: Option<Dash> },
        Shape { primitive: Primitive, fill: Color32, stroke: Stroke },
        Text { position: Pos2, text: String, size: f32 },
    }

    /// Captures draw calls; text is measured at a fixed advance per character.
    #[derive(Default)]
    pub(crate) struct RecordingSurface {
        pub(crate) ops: Vec<DrawOp>,
    }

    impl RecordingSurface {
        pub(crate) fn texts(&self) -> Vec<&str> {
            self.ops
                .iter()
                .filter_map(|op| match op {
                    DrawOp::Text { text, .. } => Some(text.as_str()),
                    _ => None,
                })
                .collect()
        }

        pub(crate) fn paths(&self) -> impl Iterator<Item = (&[Pos2], Stroke, Option<Dash>)> {
            self.ops.iter().filter_map(|op| match op {
                DrawOp::Path { points, stroke, dash } => Some((points.as_slice(), *stroke, *dash)),
                _ => None,
            })
        }

        pub(crate) fn shapes(&self) -> impl Iterator<Item = (&Primitive, Color32)> {
            self.ops.iter().filter_map(|op| match op {
                DrawOp::Shape { primitive, fill, .. } => Some((primitive, *fill)),
                _ => None,
            })
        }

        pub(crate) fn lines(&self) -> impl Iterator<Item = (Pos2, Pos2, Stroke)> {
            self.ops.iter().filter_map(|op| match op {
                DrawOp::Line { from, to, stroke } => Some((*from, *to, *stroke)),
                _ => None,
            })
        }
    }

    impl Surface for RecordingSurface {
        fn fill_background(&mut self, rect: Rect, color: Color32) {
            self.ops.push(DrawOp::Background(rect, color));
        }

        fn stroke_line(&mut self, from: Pos2, to: Pos2, stroke: Stroke) {
            self.ops.push(DrawOp::Line { from, to, stroke });
        }

        fn draw_path(&mut self, points: &[Pos2], stroke: Stroke, dash: Option<Dash>) {
            self.ops.push(DrawOp::Path {
                points: points.to_vec(),
                stroke,
                dash,
            });
        }

        fn fill_shape(&mut self, primitive: &Primitive, fill: Color32, stroke: Stroke) {
            self.ops.push(DrawOp::Shape {
                primitive: primitive.clone(),
                fill,
                stroke,
            });
        }

        fn measure_text(&self, text: &str, size: f32) -> Vec2 {
            Vec2::new(text.chars().count() as f32 * size * 0.6, size)
        }

        fn draw_text(&mut self, position: Pos2, text: &str, size: f32, _color: Color32) {
            self.ops.push(DrawOp::Text {
                position,
                text: text.to_owned(),
                size,
            });
        }
    }
}
