use bevy::prelude::{Res, ResMut};
use bevy_egui::{egui, EguiContexts};
use bookgraph_core::{UiEvent, Vec2 as GraphVec2};

use crate::app::dispatch;
use crate::app::resources::{LoadPhase, Settings, ViewerState};
use crate::render::palette;
use crate::ui::tooltips::node_tooltip;

/// Extra pick slack around a node disc, in pixels.
const PICK_SLACK: f32 = 4.0;

/// Paints links and nodes into the central panel and turns pointer input
/// into drag and click events.
pub fn graph_view(
    mut contexts: EguiContexts,
    mut st: ResMut<ViewerState>,
    settings: Res<Settings>,
) {
    let cfg = &settings.0;
    let ctx = contexts.ctx_mut();
    let mut events = Vec::new();
    let ViewerState {
        phase,
        hovered,
        dragging,
        ..
    } = &mut *st;

    egui::CentralPanel::default().show(ctx, |ui| {
        let ex = match phase {
            LoadPhase::Loading => {
                ui.centered_and_justified(|ui| ui.spinner());
                return;
            }
            LoadPhase::Failed(err) => {
                ui.centered_and_justified(|ui| {
                    ui.colored_label(
                        egui::Color32::LIGHT_RED,
                        format!("Could not load records.\n{err}"),
                    )
                });
                return;
            }
            LoadPhase::Ready(ex) => ex,
        };

        let (response, painter) =
            ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
        let rect = response.rect;
        let size = GraphVec2::new(rect.width(), rect.height());
        if size.x >= 1.0 && size.y >= 1.0 && size != ex.viewport() {
            events.push(UiEvent::Resize(size));
        }

        let to_screen = |p: GraphVec2| rect.min + egui::vec2(p.x, p.y);
        let to_graph = |p: egui::Pos2| {
            let v = p - rect.min;
            GraphVec2::new(v.x, v.y)
        };
        let layout = ex.layout();
        let graph = ex.graph();

        for (idx, a, b) in layout.link_segments() {
            let heavy = graph
                .links
                .get(idx)
                .map(|l| l.is_heavy(cfg.heavy_link_weight))
                .unwrap_or(false);
            let width = if heavy { 2.5 } else { 1.0 };
            painter.line_segment(
                [to_screen(a), to_screen(b)],
                egui::Stroke::new(width, palette::LINK),
            );
        }

        let selected = ex.selected();
        let font = egui::FontId::proportional(11.0);
        for (node, (_, pos)) in graph.nodes.iter().zip(layout.positions()) {
            let p = to_screen(pos);
            let color = palette::cluster_color(ex.cluster_color_index(&node.cluster_id));
            painter.circle_filled(p, cfg.node_radius, color);
            if selected == Some(node.id.as_str()) {
                painter.circle_stroke(
                    p,
                    cfg.node_radius + 2.0,
                    egui::Stroke::new(1.5, palette::SELECTED_RING),
                );
            }
            if ex.show_labels() {
                painter.text(
                    p + egui::vec2(9.0, 3.0),
                    egui::Align2::LEFT_CENTER,
                    node.label(cfg.label_max_chars),
                    font.clone(),
                    palette::LABEL,
                );
            }
        }

        let pick = cfg.node_radius + PICK_SLACK;
        let hit = |p: egui::Pos2| layout.node_at(to_graph(p), pick).map(str::to_string);

        if response.drag_started() {
            if let Some(id) = response.interact_pointer_pos().and_then(&hit) {
                *dragging = Some(id.clone());
                events.push(UiEvent::DragStart(id));
            }
        }
        if response.dragged() {
            if let (Some(id), Some(p)) = (dragging.as_ref(), response.interact_pointer_pos()) {
                events.push(UiEvent::DragMove {
                    id: id.clone(),
                    pos: to_graph(p),
                });
            }
        }
        if response.drag_stopped() {
            if let Some(id) = dragging.take() {
                events.push(UiEvent::DragEnd(id));
            }
        }
        if response.clicked() {
            if let Some(id) = response.interact_pointer_pos().and_then(&hit) {
                events.push(UiEvent::NodeClicked(id));
            }
        }

        *hovered = response.hover_pos().and_then(&hit);
        if dragging.is_none() {
            if let (Some(id), Some(p)) = (hovered.as_deref(), response.hover_pos()) {
                if let Some(node) = graph.node(id) {
                    node_tooltip(ui.ctx(), p, node, cfg.label_max_chars);
                }
            }
        }
    });

    dispatch(&mut st, events);
}
