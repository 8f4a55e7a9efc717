mod app;
mod loader;
mod render;
mod ui;
mod util;

use anyhow::Context;
use bevy::prelude::*;
use bevy_egui::EguiPlugin;
use bookgraph_core::{Explorer, Vec2 as GraphVec2};
use std::path::PathBuf;

use crate::app::resources::{LoadRx, Settings};
use crate::app::BookGraphPlugin;
use crate::util::{args, config};

fn main() -> anyhow::Result<()> {
    let _ = tracing_subscriber::fmt::try_init();

    let args = args::parse_args()?;
    let cfg = match &args.config {
        Some(path) => config::load_or_default_from_path(path),
        None => config::load_or_default(),
    };
    let data_dir = args
        .data_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from(&cfg.data_dir));

    if args.dump {
        let store = loader::load_blocking(&data_dir)?;
        let ex = Explorer::new(store, cfg.layout.clone(), GraphVec2::new(960.0, 720.0));
        let json = serde_json::to_string_pretty(ex.graph()).context("serialize graph")?;
        println!("{json}");
        return Ok(());
    }

    tracing::info!(dir = %data_dir.display(), "starting viewer");
    let (tx, rx) = crossbeam_channel::unbounded();
    loader::spawn_loader(data_dir, tx);

    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "bookgraph".into(),
                        ..default()
                    }),
                    ..default()
                })
                .disable::<bevy::log::LogPlugin>(),
        )
        .add_plugins(EguiPlugin)
        .insert_resource(LoadRx(rx))
        .insert_resource(Settings(cfg))
        .add_plugins(BookGraphPlugin)
        .run();

    Ok(())
}
