use bevy::prelude::ResMut;
use bevy_egui::{egui, EguiContexts};
use bookgraph_core::controls::{ControlOption, ControlSurface};
use bookgraph_core::{Chronology, UiEvent};

use crate::app::dispatch;
use crate::app::resources::{LoadPhase, Settings, ViewerState};
use crate::ui::PANEL_W;
use crate::util::config;

/// Option lists as the explorer wants them shown this frame.
#[derive(Debug, Default)]
struct ControlLists {
    clusters: Vec<ControlOption>,
    institutions: Vec<ControlOption>,
}

impl ControlSurface for ControlLists {
    fn render_options(&mut self, options: &[ControlOption]) {
        self.clusters = options.to_vec();
    }

    fn render_checkbox_list(&mut self, items: &[ControlOption]) {
        self.institutions = items.to_vec();
    }
}

pub fn ui_panel(
    mut contexts: EguiContexts,
    mut st: ResMut<ViewerState>,
    mut settings: ResMut<Settings>,
) {
    let mut events = Vec::new();
    let ViewerState {
        phase,
        search,
        status,
        ..
    } = &mut *st;

    egui::SidePanel::left("controls")
        .exact_width(PANEL_W)
        .show(contexts.ctx_mut(), |ui| {
            ui.heading("Book graph");
            let ex = match phase {
                LoadPhase::Loading => {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label("Loading records…");
                    });
                    return;
                }
                LoadPhase::Failed(_) => {
                    ui.label("No data loaded.");
                    return;
                }
                LoadPhase::Ready(ex) => ex,
            };
            let state = ex.state();
            let mut lists = ControlLists::default();
            ex.populate_controls(&mut lists);

            let stats = ex.stats();
            ui.label(format!(
                "documents: {} / {}",
                stats.nodes, stats.total_documents
            ));
            ui.label(format!("links: {} / {}", stats.links, stats.total_edges));
            ui.separator();

            let current = lists
                .clusters
                .iter()
                .find(|o| o.selected)
                .map(|o| o.label.clone())
                .unwrap_or_default();
            egui::ComboBox::from_label("Cluster")
                .selected_text(current)
                .show_ui(ui, |ui| {
                    for opt in &lists.clusters {
                        if ui.selectable_label(opt.selected, &opt.label).clicked() {
                            events.push(UiEvent::SelectCluster(opt.value.clone()));
                        }
                    }
                });

            ui.add_space(8.0);
            ui.label("Institutions (none checked = all):");
            egui::ScrollArea::vertical()
                .id_source("institutions")
                .max_height(180.0)
                .show(ui, |ui| {
                    for opt in &lists.institutions {
                        let mut on = opt.selected;
                        if ui.checkbox(&mut on, &opt.label).changed() {
                            events.push(UiEvent::ToggleInstitution {
                                id: opt.value.clone(),
                                selected: on,
                            });
                        }
                    }
                });

            ui.add_space(8.0);
            ui.separator();
            ui.heading("Time");
            let mut chrono = state.chronology;
            ui.horizontal(|ui| {
                for c in [Chronology::Produced, Chronology::Analyzed] {
                    ui.radio_value(&mut chrono, c, c.caption());
                }
            });
            if chrono != state.chronology {
                events.push(UiEvent::SetChronology(chrono));
            }

            let mut cursor = state.period_cursor;
            let last = ex.store().last_cursor();
            if ui
                .add(egui::Slider::new(&mut cursor, 0..=last).text("up to period"))
                .changed()
            {
                events.push(UiEvent::SetPeriodCursor(cursor));
            }
            ui.label(ex.cursor_caption());

            let mut anchored = state.anchored_only;
            let anchored_box = egui::Checkbox::new(&mut anchored, "Only documents with analyzed periods");
            if ui
                .add_enabled(state.anchored_only_enabled(), anchored_box)
                .changed()
            {
                events.push(UiEvent::SetAnchoredOnly(anchored));
            }

            ui.add_space(8.0);
            ui.separator();
            ui.label("Search (title / authors):");
            if ui.text_edit_singleline(search).changed() {
                events.push(UiEvent::SetSearch(search.clone()));
            }

            ui.add_space(8.0);
            ui.separator();
            let mut labels = ex.show_labels();
            if ui.checkbox(&mut labels, "Show labels").changed() {
                settings.0.show_labels = labels;
                events.push(UiEvent::ShowLabels(labels));
            }
            if ui.button("Save settings").clicked() {
                *status = Some(match config::save(&settings.0) {
                    Ok(()) => "Settings saved.".to_string(),
                    Err(err) => {
                        tracing::warn!(error = %format!("{err:#}"), "saving viewer config failed");
                        format!("Save failed: {err}")
                    }
                });
            }
            if let Some(msg) = status.as_deref() {
                ui.small(msg);
            }
        });

    dispatch(&mut st, events);
}
