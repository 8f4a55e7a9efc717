use bevy::prelude::ResMut;
use bevy_egui::{egui, EguiContexts};
use bookgraph_core::UiEvent;

use crate::app::dispatch;
use crate::app::resources::{Settings, ViewerState};

pub fn handle_shortcuts(
    mut contexts: EguiContexts,
    mut st: ResMut<ViewerState>,
    mut settings: ResMut<Settings>,
) {
    let ctx = contexts.ctx_mut();
    if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        st.hovered = None;
        st.detail = None;
        dispatch(&mut st, vec![UiEvent::ClearSelection]);
    }

    if ctx.wants_keyboard_input() {
        return;
    }

    if ctx.input(|i| i.key_pressed(egui::Key::L)) {
        let Some(labels) = st.explorer().map(|ex| !ex.show_labels()) else {
            return;
        };
        settings.0.show_labels = labels;
        dispatch(&mut st, vec![UiEvent::ShowLabels(labels)]);
    }
}
