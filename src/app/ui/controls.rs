use std::collections::HashSet;
use std::sync::Arc;

use eframe::egui::{self, RichText, Ui};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use code_lens::engine::interaction::GraphEvent;
use code_lens::graph::Lens;
use code_lens::util::short_label;

use super::super::{FilterCache, ShellCommand, ViewModel};

const MAX_FOCUS_DEPTH: usize = 8;

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_ascii_lowercase(), &query.to_ascii_lowercase()))
}

fn describe_event(event: &GraphEvent) -> String {
    match event {
        GraphEvent::NodeSelected { id, kind } => format!("selected {id} ({})", kind.label()),
        GraphEvent::SelectionCleared => "selection cleared".to_owned(),
        GraphEvent::NodeFocused { id } => format!("focused {id}"),
        GraphEvent::ShowUsagePaths { id } => format!("usage paths of {id}"),
        GraphEvent::ShowConnected { id } => format!("connected to {id}"),
        GraphEvent::GroupToggled { id, expanded } => {
            format!("{} {id}", if *expanded { "expanded" } else { "collapsed" })
        }
    }
}

impl ViewModel {
    /// Node indices whose label fuzzily matches the filter, cached per query and snapshot.
    pub(in crate::app) fn filter_matches(&mut self) -> Option<Arc<HashSet<usize>>> {
        let query = self.filter.trim();
        if query.is_empty() {
            return None;
        }

        if let Some(cached) = &self.filter_cache
            && cached.graph_revision == self.snapshot.revision()
            && cached.query == query
        {
            return Some(Arc::clone(&cached.matches));
        }

        let matcher = SkimMatcherV2::default();
        let matches = self
            .snapshot
            .nodes()
            .iter()
            .enumerate()
            .filter(|(_, node)| {
                fuzzy_match_score(&matcher, short_label(&node.label), query).is_some()
                    || fuzzy_match_score(&matcher, &node.id, query).is_some()
            })
            .map(|(index, _)| index)
            .collect::<HashSet<_>>();
        let matches = Arc::new(matches);

        self.filter_cache = Some(FilterCache {
            query: query.to_owned(),
            graph_revision: self.snapshot.revision(),
            matches: Arc::clone(&matches),
        });

        Some(matches)
    }

    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) -> Option<ShellCommand> {
        let mut command = None;

        ui.heading("Graph Controls");
        ui.separator();

        ui.label("Lens")
            .on_hover_text("Decides how nodes are grouped and laid out.");
        let mut lens = self.lens;
        ui.horizontal_wrapped(|ui| {
            for candidate in Lens::ALL {
                ui.selectable_value(&mut lens, candidate, candidate.label());
            }
        });
        self.set_lens(lens);

        ui.separator();

        ui.label("Filter labels")
            .on_hover_text("Fuzzy-highlight matching nodes without changing the layout.");
        ui.text_edit_singleline(&mut self.filter);
        if let Some(matches) = self.filter_matches() {
            ui.small(format!("{} matching nodes", matches.len()));
        }

        ui.separator();

        let mut depth = self.interaction.focus_depth;
        let depth_slider = ui
            .add(egui::Slider::new(&mut depth, 0..=MAX_FOCUS_DEPTH).text("Focus depth"))
            .on_hover_text("Hops around the focused node that stay highlighted.");
        if depth_slider.changed() {
            self.interaction.set_focus_depth(&self.snapshot, depth);
        }

        ui.horizontal(|ui| {
            let has_focus = self.interaction.focused.is_some() || self.interaction.usage_paths.is_some();
            if ui.add_enabled(has_focus, egui::Button::new("Clear focus")).clicked() {
                self.interaction.clear_focus();
            }
            if ui.button("Reset view").clicked() {
                self.interaction.reset_view();
            }
        });

        if self.request != self.base_request && ui.button("Back to full graph").clicked() {
            command = Some(ShellCommand::Request(self.base_request.clone()));
        }

        ui.separator();
        ui.label(RichText::new("Expanded groups").strong());
        if self.interaction.expanded_groups.is_empty() {
            ui.small("Click a collapsed group to expand it.");
        } else {
            let mut expanded = self.interaction.expanded_groups.iter().cloned().collect::<Vec<_>>();
            expanded.sort();
            for group_id in expanded {
                if ui.link(format!("collapse {group_id}")).clicked() {
                    let state = self.interaction.toggle_group(&group_id);
                    self.push_event(GraphEvent::GroupToggled {
                        id: group_id,
                        expanded: state,
                    });
                }
            }
        }

        ui.separator();
        ui.label(RichText::new("Recent events").strong());
        for event in self.events.iter().rev() {
            ui.small(describe_event(event));
        }

        command
    }
}
