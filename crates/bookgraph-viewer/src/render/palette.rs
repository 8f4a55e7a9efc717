use bevy_egui::egui::Color32;

/// Categorical colours for clusters, indexed by cluster colour index.
const CATEGORY10: [Color32; 10] = [
    Color32::from_rgb(0x4e, 0x79, 0xa7),
    Color32::from_rgb(0xf2, 0x8e, 0x2b),
    Color32::from_rgb(0xe1, 0x57, 0x59),
    Color32::from_rgb(0x76, 0xb7, 0xb2),
    Color32::from_rgb(0x59, 0xa1, 0x4f),
    Color32::from_rgb(0xed, 0xc9, 0x48),
    Color32::from_rgb(0xb0, 0x7a, 0xa1),
    Color32::from_rgb(0xff, 0x9d, 0xa7),
    Color32::from_rgb(0x9c, 0x75, 0x5f),
    Color32::from_rgb(0xba, 0xb0, 0xac),
];

pub const LINK: Color32 = Color32::from_rgba_premultiplied(150, 150, 150, 140);
pub const LABEL: Color32 = Color32::from_gray(210);
pub const SELECTED_RING: Color32 = Color32::WHITE;

pub fn cluster_color(index: usize) -> Color32 {
    CATEGORY10[index % CATEGORY10.len()]
}
