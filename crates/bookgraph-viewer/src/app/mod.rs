use bevy::prelude::*;
use bookgraph_core::{Explorer, Response, UiEvent, Vec2 as GraphVec2};

use crate::app::resources::{LoadPhase, LoadRx, Settings, ViewerState};
use crate::loader::Loaded;

pub mod resources;

/// Viewport used for the first layout until the central panel reports its size.
const INITIAL_VIEWPORT: GraphVec2 = GraphVec2::new(960.0, 720.0);

pub struct BookGraphPlugin;

impl Plugin for BookGraphPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ViewerState::default())
            .add_systems(Startup, crate::render::setup_scene)
            .add_systems(
                Update,
                (
                    pump_loader,
                    crate::ui::handle_shortcuts,
                    crate::ui::ui_panel,
                    crate::ui::hud_overlay,
                    crate::ui::detail_window,
                    crate::render::graph_view,
                    layout_tick,
                )
                    .chain(),
            );
    }
}

fn pump_loader(mut st: ResMut<ViewerState>, rx: Res<LoadRx>, settings: Res<Settings>) {
    for msg in rx.0.try_iter() {
        match msg {
            Loaded::Ready(store) => {
                let cfg = &settings.0;
                let mut ex = Explorer::new(*store, cfg.layout.clone(), INITIAL_VIEWPORT);
                ex.handle(UiEvent::ShowLabels(cfg.show_labels));
                tracing::info!(
                    documents = ex.stats().total_documents,
                    edges = ex.stats().total_edges,
                    "records loaded"
                );
                st.phase = LoadPhase::Ready(Box::new(ex));
            }
            Loaded::Failed(err) => {
                st.phase = LoadPhase::Failed(err);
            }
        }
    }
}

fn layout_tick(mut st: ResMut<ViewerState>, settings: Res<Settings>) {
    let ticks = settings.0.ticks_per_frame.max(1);
    let Some(ex) = st.explorer_mut() else {
        return;
    };
    if ex.layout().is_running() {
        for _ in 0..ticks {
            if !ex.tick() {
                break;
            }
        }
    }
}

/// Feeds widget events to the explorer and folds the responses into viewer state.
pub fn dispatch(st: &mut ViewerState, events: Vec<UiEvent>) {
    let mut detail = None;
    let mut cleared = false;
    let mut rebuilt = false;
    let LoadPhase::Ready(ex) = &mut st.phase else {
        return;
    };
    for event in events {
        match ex.handle(event) {
            Response::Detail(view) => detail = Some(*view),
            Response::SelectionCleared => {
                detail = None;
                cleared = true;
            }
            Response::Rebuilt(stats) => {
                rebuilt = true;
                tracing::debug!(nodes = stats.nodes, links = stats.links, "filters applied");
            }
            Response::LayoutAdjusted | Response::LabelsChanged(_) | Response::Unchanged => {}
        }
    }
    let still_visible = st
        .detail
        .as_ref()
        .map(|d| ex.graph().node(&d.id).is_some())
        .unwrap_or(true);
    if detail.is_some() {
        st.detail = detail;
    } else if cleared || (rebuilt && !still_visible) {
        st.detail = None;
    }
    if rebuilt {
        st.hovered = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookgraph_core::{Document, LayoutConfig, RecordStore};

    fn ready_state() -> ViewerState {
        let doc = Document {
            id: "b1".to_string(),
            title: "Letters".to_string(),
            ..Document::default()
        };
        let store = RecordStore::new(vec![doc], Vec::new(), Vec::new(), Vec::new(), Vec::new());
        ViewerState {
            phase: LoadPhase::Ready(Box::new(Explorer::new(
                store,
                LayoutConfig::default(),
                INITIAL_VIEWPORT,
            ))),
            ..ViewerState::default()
        }
    }

    #[test]
    fn click_opens_detail_and_clear_closes_it() {
        let mut st = ready_state();
        dispatch(&mut st, vec![UiEvent::NodeClicked("b1".to_string())]);
        assert_eq!(st.detail.as_ref().map(|d| d.id.as_str()), Some("b1"));

        dispatch(&mut st, vec![UiEvent::ClearSelection]);
        assert!(st.detail.is_none());
        assert_eq!(st.explorer().and_then(|ex| ex.selected()), None);
    }

    #[test]
    fn events_before_load_are_dropped() {
        let mut st = ViewerState::default();
        dispatch(&mut st, vec![UiEvent::NodeClicked("b1".to_string())]);
        assert!(st.detail.is_none());
    }
}
