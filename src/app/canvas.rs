use eframe::egui::{
    self, Align2, Color32, FontId, Painter, Pos2, Rect, Sense, Shape, Stroke, StrokeKind, Ui, Vec2,
};

use code_lens::engine::interaction::{ContextAction, HitTarget};
use code_lens::engine::render::{Dash, Frame, Primitive, Surface, render};

use super::ViewModel;

const SCROLL_ZOOM_RATE: f32 = 0.0018;
const PAN_BUTTONS: [egui::PointerButton; 2] =
    [egui::PointerButton::Secondary, egui::PointerButton::Middle];

struct EguiSurface<'a> {
    painter: &'a Painter,
}

impl Surface for EguiSurface<'_> {
    fn fill_background(&mut self, rect: Rect, color: Color32) {
        self.painter.rect_filled(rect, 0.0, color);
    }

    fn stroke_line(&mut self, from: Pos2, to: Pos2, stroke: Stroke) {
        self.painter.line_segment([from, to], stroke);
    }

    fn draw_path(&mut self, points: &[Pos2], stroke: Stroke, dash: Option<Dash>) {
        if points.len() < 2 {
            return;
        }
        match dash {
            Some(dash) => {
                self.painter
                    .extend(Shape::dashed_line(points, stroke, dash.length, dash.gap));
            }
            None => {
                self.painter.add(Shape::line(points.to_vec(), stroke));
            }
        }
    }

    fn fill_shape(&mut self, primitive: &Primitive, fill: Color32, stroke: Stroke) {
        match primitive {
            Primitive::Circle { center, radius } => {
                self.painter.circle(*center, *radius, fill, stroke);
            }
            Primitive::Polygon(points) => {
                self.painter
                    .add(Shape::convex_polygon(points.clone(), fill, stroke));
            }
            Primitive::Rect {
                rect,
                corner_radius,
            } => {
                self.painter
                    .rect(*rect, *corner_radius, fill, stroke, StrokeKind::Inside);
            }
        }
    }

    fn measure_text(&self, text: &str, size: f32) -> Vec2 {
        self.painter
            .layout_no_wrap(text.to_owned(), FontId::proportional(size), Color32::WHITE)
            .size()
    }

    fn draw_text(&mut self, position: Pos2, text: &str, size: f32, color: Color32) {
        self.painter.text(
            position,
            Align2::LEFT_TOP,
            text,
            FontId::proportional(size),
            color,
        );
    }
}

impl ViewModel {
    pub(in crate::app) fn draw_canvas(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        self.ensure_scene(rect.size());

        self.handle_canvas_zoom(ui, rect, &response);
        self.handle_canvas_pan(&response);
        self.handle_canvas_pointer(ui, rect, &response);

        let filter_matches = self.filter_matches();
        let Some(scene) = self.scene.as_ref() else {
            return;
        };

        let painter = ui.painter_at(rect);
        let mut surface = EguiSurface { painter: &painter };
        let frame = Frame {
            snapshot: &self.snapshot,
            scene,
            interaction: &self.interaction,
            viewport: rect,
            filter_matches: filter_matches.as_deref(),
        };
        self.stats = render(&mut surface, &frame);

        if self.snapshot.is_empty() {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "The graph is empty.",
                FontId::proportional(16.0),
                Color32::from_gray(200),
            );
        }

        self.draw_context_menu(ui, response.secondary_clicked());
    }

    fn handle_canvas_zoom(&mut self, ui: &Ui, rect: Rect, response: &egui::Response) {
        if !response.hovered() {
            return;
        }

        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return;
        }

        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .unwrap_or_else(|| rect.center());
        let factor = (1.0 + scroll * SCROLL_ZOOM_RATE).clamp(0.85, 1.15);
        self.interaction.zoom_at(rect.min, pointer, factor);
    }

    fn handle_canvas_pan(&mut self, response: &egui::Response) {
        let pointer = response.interact_pointer_pos();
        if PAN_BUTTONS
            .iter()
            .any(|button| response.drag_started_by(*button))
        {
            if let Some(pointer) = pointer {
                self.interaction.begin_pan(pointer);
            }
        } else if response.dragged()
            && let Some(pointer) = pointer
        {
            self.interaction.pan_to(pointer);
        }

        if response.drag_stopped() {
            self.interaction.end_pan();
        }
    }

    fn handle_canvas_pointer(&mut self, ui: &Ui, rect: Rect, response: &egui::Response) {
        let Some(scene) = self.scene.as_ref() else {
            return;
        };
        let view = self.interaction.view_transform(rect.min);

        if self.interaction.is_panning() {
            return;
        }

        match response.hover_pos() {
            Some(pointer) => {
                let world = view.to_world(pointer);
                let hovered = self.interaction.pointer_moved(&self.snapshot, scene, world);
                if matches!(hovered, Some(HitTarget::Node(_) | HitTarget::Group(_))) {
                    ui.output_mut(|output| output.cursor_icon = egui::CursorIcon::PointingHand);
                }
            }
            None => self.interaction.pointer_left(),
        }

        if response.clicked_by(egui::PointerButton::Primary)
            && let Some(pointer) = response.interact_pointer_pos()
        {
            let world = view.to_world(pointer);
            if let Some(event) = self.interaction.click(&self.snapshot, scene, world) {
                self.push_event(event);
            }
        }

        if response.secondary_clicked()
            && let Some(pointer) = response.interact_pointer_pos()
        {
            self.interaction.open_context_menu(&self.snapshot, pointer);
        }
    }

    fn draw_context_menu(&mut self, ui: &Ui, just_opened: bool) {
        if !self.interaction.context_menu.visible {
            return;
        }

        let mut chosen = None;
        let area = egui::Area::new(egui::Id::new("node_context_menu"))
            .order(egui::Order::Foreground)
            .fixed_pos(self.interaction.context_menu.position)
            .show(ui.ctx(), |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    if let Some(id) = &self.interaction.context_menu.node_id {
                        ui.small(id.as_str());
                        ui.separator();
                    }
                    for action in ContextAction::ALL {
                        if ui.button(action.label()).clicked() {
                            chosen = Some(action);
                        }
                    }
                });
            });

        if let Some(action) = chosen {
            if let Some(event) = self.interaction.apply_context_action(&self.snapshot, action) {
                self.push_event(event);
            }
        } else if !just_opened && area.response.clicked_elsewhere() {
            self.interaction.close_context_menu();
        }
    }
}
