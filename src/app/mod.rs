use std::collections::{HashSet, VecDeque};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context};

use code_lens::EngineConfig;
use code_lens::engine::Scene;
use code_lens::engine::interaction::{GraphEvent, InteractionState};
use code_lens::engine::render::RenderStats;
use code_lens::graph::{GraphSnapshot, Lens};
use code_lens::source::{GraphRequest, LoadTicket, LoadTracker, load_graph};

mod canvas;
mod ui;

pub struct AppConfig {
    pub graph_path: PathBuf,
    pub request: GraphRequest,
    pub lens: Lens,
    pub engine: EngineConfig,
}

pub struct CodeLensApp {
    config: AppConfig,
    tracker: LoadTracker,
    state: AppState,
    pending: Option<PendingLoad>,
}

enum AppState {
    Loading,
    Ready(Box<ViewModel>),
    Error(String),
}

struct LoadOutcome {
    ticket: LoadTicket,
    request: GraphRequest,
    result: Result<GraphSnapshot, String>,
}

struct PendingLoad {
    request: GraphRequest,
    rx: Receiver<LoadOutcome>,
}

enum ShellCommand {
    Reload,
    Request(GraphRequest),
    CancelLoad,
}

struct ViewModel {
    snapshot: GraphSnapshot,
    /// Request the current snapshot answers.
    request: GraphRequest,
    /// Request given on the command line; "back" returns to it.
    base_request: GraphRequest,
    lens: Lens,
    engine: EngineConfig,
    interaction: InteractionState,
    scene: Option<Scene>,
    filter: String,
    filter_cache: Option<FilterCache>,
    events: VecDeque<GraphEvent>,
    stats: RenderStats,
    notice: Option<String>,
}

struct FilterCache {
    query: String,
    graph_revision: u64,
    matches: Arc<HashSet<usize>>,
}

const MAX_EVENT_LOG: usize = 12;

impl CodeLensApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        let mut app = Self {
            config,
            tracker: LoadTracker::default(),
            state: AppState::Loading,
            pending: None,
        };
        let request = app.config.request.clone();
        app.start_load(request);
        app
    }

    fn current_lens(&self) -> Lens {
        match &self.state {
            AppState::Ready(model) => model.lens,
            _ => self.config.lens,
        }
    }

    fn spawn_load(path: PathBuf, request: GraphRequest, ticket: LoadTicket) -> Receiver<LoadOutcome> {
        let (tx, rx) = mpsc::channel();

        let thread_request = request;
        thread::spawn(move || {
            let result =
                load_graph(&path, &thread_request).map_err(|error| format!("{error:#}"));
            let _ = tx.send(LoadOutcome {
                ticket,
                request: thread_request,
                result,
            });
        });

        rx
    }

    fn start_load(&mut self, request: GraphRequest) {
        let ticket = self.tracker.issue(self.current_lens());
        tracing::debug!(generation = ticket.generation, lens = %ticket.lens, "starting graph load");
        let rx = Self::spawn_load(self.config.graph_path.clone(), request.clone(), ticket);
        self.pending = Some(PendingLoad { request, rx });
    }

    fn poll_pending(&mut self) -> Option<LoadOutcome> {
        let pending = self.pending.take()?;
        match pending.rx.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(TryRecvError::Empty) => {
                self.pending = Some(pending);
                None
            }
            Err(TryRecvError::Disconnected) => Some(LoadOutcome {
                ticket: LoadTicket {
                    generation: 0,
                    lens: self.current_lens(),
                },
                request: pending.request,
                result: Err("Background load worker disconnected".to_owned()),
            }),
        }
    }

    fn apply_outcome(&mut self, outcome: LoadOutcome) {
        let lens = self.current_lens();
        let disconnected = outcome.ticket.generation == 0;
        if !disconnected && !self.tracker.is_current(&outcome.ticket, lens) {
            return;
        }

        let next = match (&mut self.state, outcome.result) {
            (AppState::Ready(model), Ok(snapshot)) => {
                model.replace_snapshot(snapshot, outcome.request);
                None
            }
            (AppState::Ready(model), Err(error)) if outcome.request != model.base_request => {
                tracing::warn!(%error, "graph request failed");
                model.notice = Some(error);
                None
            }
            (_, Ok(snapshot)) => Some(AppState::Ready(Box::new(ViewModel::new(
                snapshot,
                outcome.request,
                self.config.request.clone(),
                self.config.lens,
                self.config.engine.clone(),
            )))),
            (_, Err(error)) => {
                tracing::warn!(%error, "graph load failed");
                Some(AppState::Error(error))
            }
        };

        if let Some(state) = next {
            self.state = state;
        }
    }
}

impl eframe::App for CodeLensApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        if let Some(outcome) = self.poll_pending() {
            self.apply_outcome(outcome);
        }

        let mut command = None;
        let mut lens_before = None;
        let is_loading = self.pending.is_some();

        match &mut self.state {
            AppState::Loading => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading code graph...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load code graph");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        command = Some(ShellCommand::Reload);
                    }
                });
            }
            AppState::Ready(model) => {
                lens_before = Some(model.lens);
                command = model.show(ctx, is_loading);
                if lens_before == Some(model.lens) {
                    lens_before = None;
                }
            }
        }

        if let Some(previous) = lens_before
            && let Some(pending) = &self.pending
        {
            tracing::debug!(from = %previous, to = %self.current_lens(), "lens changed during load");
            let request = pending.request.clone();
            self.start_load(request);
        }

        match command {
            Some(ShellCommand::Reload) => {
                let request = match &self.state {
                    AppState::Ready(model) => model.request.clone(),
                    _ => {
                        self.state = AppState::Loading;
                        self.config.request.clone()
                    }
                };
                self.start_load(request);
            }
            Some(ShellCommand::Request(request)) => self.start_load(request),
            Some(ShellCommand::CancelLoad) => {
                self.tracker.cancel();
                self.pending = None;
            }
            None => {}
        }

        if self.pending.is_some() {
            ctx.request_repaint();
        }
    }
}
