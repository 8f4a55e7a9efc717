use bevy::prelude::Resource;
use bookgraph_core::{DetailView, Explorer};
use crossbeam_channel::Receiver;

use crate::loader::Loaded;
use crate::util::config::ViewerConfig;

#[derive(Resource)]
pub struct LoadRx(pub Receiver<Loaded>);

#[derive(Resource, Debug, Clone)]
pub struct Settings(pub ViewerConfig);

#[derive(Debug, Default)]
pub enum LoadPhase {
    #[default]
    Loading,
    Failed(String),
    Ready(Box<Explorer>),
}

#[derive(Resource, Debug, Default)]
pub struct ViewerState {
    pub phase: LoadPhase,
    /// Detail window contents; `None` when closed.
    pub detail: Option<DetailView>,
    pub hovered: Option<String>,
    /// Node held by the pointer between drag start and release.
    pub dragging: Option<String>,
    /// Search box buffer, sent to the explorer on every edit.
    pub search: String,
    pub status: Option<String>,
}

impl ViewerState {
    pub fn explorer(&self) -> Option<&Explorer> {
        match &self.phase {
            LoadPhase::Ready(ex) => Some(ex),
            _ => None,
        }
    }

    pub fn explorer_mut(&mut self) -> Option<&mut Explorer> {
        match &mut self.phase {
            LoadPhase::Ready(ex) => Some(ex),
            _ => None,
        }
    }
}
