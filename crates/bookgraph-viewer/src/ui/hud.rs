use bevy::prelude::{Res, Time};
use bevy_egui::{egui, EguiContexts};
use bookgraph_core::LayoutPhase;

use crate::app::resources::ViewerState;
use crate::ui::{HUD_EDGE_PADDING, HUD_PANEL_GAP, PANEL_W};

pub fn hud_overlay(mut contexts: EguiContexts, st: Res<ViewerState>, time: Res<Time>) {
    let Some(ex) = st.explorer() else {
        return;
    };
    let ctx = contexts.ctx_mut();
    let screen = ctx.screen_rect();
    let pos = egui::pos2(
        screen.min.x + PANEL_W + HUD_PANEL_GAP,
        screen.min.y + HUD_EDGE_PADDING,
    );

    egui::Area::new("hud".into())
        .order(egui::Order::Foreground)
        .fixed_pos(pos)
        .show(ctx, |ui| {
            ui.group(|ui| {
                let dt = time.delta_seconds();
                if dt > 0.0 {
                    ui.label(format!("FPS: {:.0}", 1.0 / dt));
                }
                let layout = ex.layout();
                let phase = match layout.phase() {
                    LayoutPhase::Idle => "idle",
                    LayoutPhase::Running => "running",
                    LayoutPhase::Converged => "settled",
                };
                ui.label(format!(
                    "Layout: {phase} (alpha {:.3}, {} ticks)",
                    layout.alpha(),
                    layout.ticks()
                ));
                if ex.graph().is_empty() {
                    ui.label("No documents match the current filters.");
                }
                if let Some(id) = ex.selected() {
                    ui.label(format!("Selected: {id}"));
                }
            });
        });
}
