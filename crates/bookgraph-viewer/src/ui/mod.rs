pub mod details;
pub mod hud;
pub mod panel;
pub mod shortcuts;
pub mod tooltips;

pub use details::detail_window;
pub use hud::hud_overlay;
pub use panel::ui_panel;
pub use shortcuts::handle_shortcuts;

pub const PANEL_W: f32 = 300.0;
pub const HUD_PANEL_GAP: f32 = 12.0;
pub const HUD_EDGE_PADDING: f32 = 8.0;
