use std::collections::VecDeque;

use eframe::egui::{self, Align, Context, Layout};

use code_lens::EngineConfig;
use code_lens::engine::Scene;
use code_lens::engine::interaction::{GraphEvent, InteractionState};
use code_lens::engine::render::RenderStats;
use code_lens::graph::{GraphSnapshot, Lens};
use code_lens::source::GraphRequest;

use super::super::{MAX_EVENT_LOG, ShellCommand, ViewModel};

impl ViewModel {
    pub(in crate::app) fn new(
        snapshot: GraphSnapshot,
        request: GraphRequest,
        base_request: GraphRequest,
        lens: Lens,
        engine: EngineConfig,
    ) -> Self {
        Self {
            interaction: InteractionState::new(engine.interaction.clone()),
            snapshot,
            request,
            base_request,
            lens,
            engine,
            scene: None,
            filter: String::new(),
            filter_cache: None,
            events: VecDeque::new(),
            stats: RenderStats::default(),
            notice: None,
        }
    }

    pub(in crate::app) fn show(&mut self, ctx: &Context, is_loading: bool) -> Option<ShellCommand> {
        let mut command = None;

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("code-lens");
                    ui.separator();
                    ui.label(format!("lens: {}", self.lens));
                    ui.label(format!("nodes: {}", self.snapshot.node_count()));
                    ui.label(format!("edges: {}", self.snapshot.edges().len()));
                    if let GraphRequest::FileDependencies { file_id } = &self.request {
                        ui.label(format!("file dependencies of {file_id}"));
                    }
                    let reload_button = ui.add_enabled(!is_loading, egui::Button::new("Reload"));
                    if reload_button.clicked() {
                        command = Some(ShellCommand::Reload);
                    }
                    if is_loading {
                        ui.spinner();
                        if ui.button("Cancel").clicked() {
                            command = Some(ShellCommand::CancelLoad);
                        }
                    }
                });
            });

        egui::TopBottomPanel::bottom("status_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(self.view_status_text());
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(self.visible_graph_text());
                        if let Some(notice) = &self.notice {
                            ui.colored_label(egui::Color32::from_rgb(241, 146, 94), notice);
                        }
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| {
                if let Some(next) = self.draw_controls(ui) {
                    command = Some(next);
                }
            });

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(340.0)
            .show(ctx, |ui| {
                if let Some(next) = self.draw_details(ui) {
                    command = Some(next);
                }
            });

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| self.draw_canvas(ui));

        command
    }

    fn view_status_text(&self) -> String {
        format!(
            "zoom {:.2}  |  pan ({:.0}, {:.0})  |  {}",
            self.interaction.zoom,
            self.interaction.pan.x,
            self.interaction.pan.y,
            self.interaction.detail_level().label()
        )
    }

    fn visible_graph_text(&self) -> String {
        format!(
            "groups {}  |  bundles {}  |  nodes {}  |  edges {}",
            self.stats.groups, self.stats.bundles, self.stats.nodes, self.stats.edges
        )
    }

    /// Rebuilds the scene when the snapshot, lens or canvas size moved on.
    pub(in crate::app) fn ensure_scene(&mut self, viewport: egui::Vec2) {
        if self
            .scene
            .as_ref()
            .is_some_and(|scene| scene.matches(&self.snapshot, self.lens, viewport))
        {
            return;
        }

        let scene = Scene::build(&self.snapshot, self.lens, viewport, &self.engine.layout);
        self.interaction.retain_existing(&self.snapshot, &scene);
        self.scene = Some(scene);
    }

    pub(in crate::app) fn set_lens(&mut self, lens: Lens) {
        if self.lens == lens {
            return;
        }
        self.lens = lens;
        self.interaction.expanded_groups.clear();
        self.interaction.close_context_menu();
    }

    pub(in crate::app) fn replace_snapshot(&mut self, snapshot: GraphSnapshot, request: GraphRequest) {
        self.snapshot = snapshot;
        self.request = request;
        self.notice = None;
        self.filter_cache = None;
    }

    pub(in crate::app) fn push_event(&mut self, event: GraphEvent) {
        tracing::debug!(?event, "graph event");
        if self.events.len() == MAX_EVENT_LOG {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }
}
