use bevy_egui::egui;
use bookgraph_core::Node;

/// Small floating card next to the pointer for a hovered node.
pub fn node_tooltip(ctx: &egui::Context, pos: egui::Pos2, node: &Node, max_chars: usize) {
    egui::Area::new(egui::Id::new("node_tooltip"))
        .order(egui::Order::Tooltip)
        .fixed_pos(pos + egui::vec2(14.0, 14.0))
        .show(ctx, |ui| {
            ui.group(|ui| {
                ui.strong(node.label(max_chars));
                if !node.authors.is_empty() {
                    ui.label(&node.authors);
                }
                ui.small(format!("{} · {}", node.id, node.produced_period));
            });
        });
}
