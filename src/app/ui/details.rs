use eframe::egui::{self, RichText, Ui};

use code_lens::engine::interaction::{ContextAction, GraphEvent};
use code_lens::graph::{Direction, NodeKind};
use code_lens::source::GraphRequest;
use code_lens::util::short_label;

use super::super::{ShellCommand, ViewModel};

const MAX_NEIGHBOR_ROWS: usize = 40;

fn direction_label(direction: Direction) -> &'static str {
    match direction {
        Direction::Root => "root",
        Direction::Outgoing => "outgoing",
        Direction::Incoming => "incoming",
    }
}

struct NeighborRow {
    id: String,
    label: String,
    edge_type: String,
    outgoing: bool,
}

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) -> Option<ShellCommand> {
        ui.heading("Inspector");
        ui.add_space(6.0);

        let Some(selected_id) = self.interaction.selected.clone() else {
            ui.label("Click a node on the canvas to inspect it.");
            return None;
        };

        let Some(index) = self.snapshot.index_of(&selected_id) else {
            ui.label("The selected node is no longer part of the graph.");
            return None;
        };
        let node = self.snapshot.nodes()[index].clone();

        ui.label(RichText::new(short_label(&node.label)).strong());
        ui.small(node.id.as_str());
        ui.add_space(6.0);

        ui.label(format!("Label: {}", node.label));
        ui.label(format!("Kind: {}", node.kind.label()));
        if let Some(confidence) = node.confidence {
            ui.label(format!("Confidence: {:.0}%", confidence.clamp(0.0, 1.0) * 100.0));
        }
        if let Some(classification) = &node.classification {
            ui.label(format!("Classification: {classification}"));
        }
        if let Some(feature) = &node.feature_context {
            ui.label(format!("Feature: {feature}"));
        }
        if let Some(direction) = node.direction {
            ui.label(format!("Direction: {}", direction_label(direction)));
        }
        if let Some(group) = self
            .scene
            .as_ref()
            .and_then(|scene| scene.groups.group_of(index).and_then(|group| scene.groups.groups.get(group)))
        {
            ui.label(format!("Group: {} ({} nodes)", group.name, group.node_count()));
        }
        if let Some(summary) = &node.purpose_summary {
            ui.add_space(4.0);
            ui.label(RichText::new("Purpose").strong());
            ui.label(summary.as_str());
        }

        ui.separator();
        let mut command = None;
        ui.horizontal_wrapped(|ui| {
            for action in ContextAction::ALL {
                if ui.button(action.label()).clicked()
                    && let Some(event) = self.interaction.run_action(&self.snapshot, action, &node.id)
                {
                    self.push_event(event);
                }
            }
            if node.kind == NodeKind::File
                && ui
                    .button("File dependencies")
                    .on_hover_text("Load only this file and its direct import neighbors.")
                    .clicked()
            {
                command = Some(ShellCommand::Request(GraphRequest::FileDependencies {
                    file_id: node.id.clone(),
                }));
            }
        });

        ui.separator();
        ui.label(RichText::new("Direct neighbors").strong());
        let neighbors = self.neighbor_rows(index);
        if neighbors.is_empty() {
            ui.label("No edges touch this node.");
        } else {
            egui::ScrollArea::vertical()
                .id_salt("neighbor_scroll")
                .max_height(320.0)
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    for row in neighbors.iter().take(MAX_NEIGHBOR_ROWS) {
                        let arrow = if row.outgoing { "->" } else { "<-" };
                        let text = format!("{arrow} {}  [{}]", row.label, row.edge_type);
                        if ui.link(text).on_hover_text(row.id.as_str()).clicked() {
                            self.interaction.selected = Some(row.id.clone());
                            if let Some(neighbor) = self.snapshot.node(&row.id) {
                                let event = GraphEvent::NodeSelected {
                                    id: neighbor.id.clone(),
                                    kind: neighbor.kind,
                                };
                                self.push_event(event);
                            }
                        }
                    }
                    if neighbors.len() > MAX_NEIGHBOR_ROWS {
                        ui.small(format!("... {} more", neighbors.len() - MAX_NEIGHBOR_ROWS));
                    }
                });
        }

        command
    }

    fn neighbor_rows(&self, index: usize) -> Vec<NeighborRow> {
        let nodes = self.snapshot.nodes();
        let outgoing = self.snapshot.outgoing(index).map(|resolved| (resolved, resolved.target, true));
        let incoming = self.snapshot.incoming(index).map(|resolved| (resolved, resolved.source, false));

        let mut rows = outgoing
            .chain(incoming)
            .filter(|(_, other, _)| *other != index)
            .map(|(resolved, other, outgoing)| NeighborRow {
                id: nodes[other].id.clone(),
                label: short_label(&nodes[other].label).to_owned(),
                edge_type: self.snapshot.edge(resolved).edge_type.clone(),
                outgoing,
            })
            .collect::<Vec<_>>();
        rows.sort_by(|a, b| b.outgoing.cmp(&a.outgoing).then_with(|| a.label.cmp(&b.label)));
        rows
    }
}
