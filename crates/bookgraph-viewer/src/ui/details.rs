use bevy::prelude::ResMut;
use bevy_egui::{egui, EguiContexts};
use bookgraph_core::UiEvent;

use crate::app::dispatch;
use crate::app::resources::ViewerState;

pub fn detail_window(mut contexts: EguiContexts, mut st: ResMut<ViewerState>) {
    let Some(view) = st.detail.as_ref() else {
        return;
    };
    let mut open = true;
    egui::Window::new("Details")
        .open(&mut open)
        .resizable(true)
        .default_width(340.0)
        .show(contexts.ctx_mut(), |ui| {
            ui.heading(&view.title);
            ui.label(&view.authors);
            ui.add_space(6.0);
            egui::Grid::new("detail_fields")
                .num_columns(2)
                .striped(true)
                .show(ui, |ui| {
                    for (label, value) in [
                        ("Cluster", view.cluster.clone()),
                        ("Institutions", view.institutions_text()),
                        ("Produced", view.produced.clone()),
                        ("Analyzes", view.analyzed_text()),
                        ("Status", view.status_text()),
                    ] {
                        ui.strong(label);
                        ui.label(value);
                        ui.end_row();
                    }
                });
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                if let Some(url) = &view.url {
                    ui.hyperlink_to("Open source link", url);
                }
                if ui.button("Copy as HTML").clicked() {
                    ui.output_mut(|o| o.copied_text = view.to_html());
                }
            });
        });
    if !open {
        dispatch(&mut st, vec![UiEvent::ClearSelection]);
        st.detail = None;
    }
}
