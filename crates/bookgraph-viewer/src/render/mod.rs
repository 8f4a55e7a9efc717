pub mod graph;
pub mod palette;

use bevy::prelude::*;

pub use graph::graph_view;

pub fn setup_scene(mut commands: Commands) {
    commands.spawn(Camera2dBundle::default());
}
