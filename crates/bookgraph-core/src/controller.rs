use bevy_math::Vec2;

use crate::controls::{self, ControlSurface};
use crate::detail::DetailView;
use crate::filter::visible_documents;
use crate::graph::{build_graph, Graph};
use crate::layout::{LayoutConfig, LayoutEngine};
use crate::store::RecordStore;
use crate::ui_state::{Chronology, UiState};

/// Discrete input from the widget layer.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    SelectCluster(String),
    ToggleInstitution { id: String, selected: bool },
    SetPeriodCursor(usize),
    SetChronology(Chronology),
    SetAnchoredOnly(bool),
    SetSearch(String),
    ShowLabels(bool),
    Resize(Vec2),
    NodeClicked(String),
    /// Detail window dismissed.
    ClearSelection,
    DragStart(String),
    DragMove { id: String, pos: Vec2 },
    DragEnd(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GraphStats {
    pub nodes: usize,
    pub links: usize,
    pub total_documents: usize,
    pub total_edges: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// Filter state changed; graph rebuilt and layout restarted.
    Rebuilt(GraphStats),
    /// Pin/drag only; graph untouched.
    LayoutAdjusted,
    Detail(Box<DetailView>),
    SelectionCleared,
    LabelsChanged(bool),
    Unchanged,
}

/// Owns the reference data, the current selection, the derived graph and the
/// layout. Every UI event goes through [`Explorer::handle`].
#[derive(Debug)]
pub struct Explorer {
    store: RecordStore,
    state: UiState,
    graph: Graph,
    layout: LayoutEngine,
    viewport: Vec2,
    show_labels: bool,
    selected: Option<String>,
}

impl Explorer {
    pub fn new(store: RecordStore, layout: LayoutConfig, viewport: Vec2) -> Self {
        let state = UiState::initial(store.last_cursor());
        let mut explorer = Self {
            store,
            state,
            graph: Graph::default(),
            layout: LayoutEngine::new(layout),
            viewport,
            show_labels: false,
            selected: None,
        };
        explorer.rebuild();
        explorer
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn layout(&self) -> &LayoutEngine {
        &self.layout
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    pub fn show_labels(&self) -> bool {
        self.show_labels
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn stats(&self) -> GraphStats {
        GraphStats {
            nodes: self.graph.nodes.len(),
            links: self.graph.links.len(),
            total_documents: self.store.documents().len(),
            total_edges: self.store.edges().len(),
        }
    }

    pub fn populate_controls(&self, surface: &mut dyn ControlSurface) {
        controls::populate(surface, &self.store, &self.state);
    }

    /// `"<label> (<start>–<end>) — <layer>"` for the cursor period.
    pub fn cursor_caption(&self) -> String {
        let layer = self.state.chronology.caption();
        match self.store.period_at_cursor(self.state.period_cursor) {
            Some(p) => format!("{} ({}–{}) — {}", p.label, p.start_year, p.end_year, layer),
            None => format!("no periods — {layer}"),
        }
    }

    pub fn handle(&mut self, event: UiEvent) -> Response {
        match event {
            UiEvent::SelectCluster(cluster) => self.apply(self.state.with_cluster(cluster)),
            UiEvent::ToggleInstitution { id, selected } => {
                self.apply(self.state.with_institution(&id, selected))
            }
            UiEvent::SetPeriodCursor(cursor) => {
                let cursor = cursor.min(self.store.last_cursor());
                self.apply(self.state.with_cursor(cursor))
            }
            UiEvent::SetChronology(c) => self.apply(self.state.with_chronology(c)),
            UiEvent::SetAnchoredOnly(on) => self.apply(self.state.with_anchored_only(on)),
            UiEvent::SetSearch(q) => self.apply(self.state.with_search(q)),
            UiEvent::ShowLabels(on) => {
                self.show_labels = on;
                Response::LabelsChanged(on)
            }
            UiEvent::Resize(size) => {
                if size == self.viewport {
                    return Response::Unchanged;
                }
                self.viewport = size;
                self.rebuild();
                Response::Rebuilt(self.stats())
            }
            UiEvent::NodeClicked(id) => match self.detail(&id) {
                Some(view) => {
                    self.selected = Some(id);
                    Response::Detail(Box::new(view))
                }
                None => Response::Unchanged,
            },
            UiEvent::ClearSelection => match self.selected.take() {
                Some(_) => Response::SelectionCleared,
                None => Response::Unchanged,
            },
            UiEvent::DragStart(id) => adjusted(self.layout.drag_start(&id)),
            UiEvent::DragMove { id, pos } => adjusted(self.layout.drag_to(&id, pos)),
            UiEvent::DragEnd(id) => adjusted(self.layout.drag_end(&id)),
        }
    }

    /// One animation frame of layout.
    pub fn tick(&mut self) -> bool {
        self.layout.tick()
    }

    /// Resolved detail for a currently visible node.
    pub fn detail(&self, id: &str) -> Option<DetailView> {
        self.graph
            .node(id)
            .map(|n| DetailView::resolve(&self.store, n))
    }

    pub fn cluster_color_index(&self, cluster_id: &str) -> usize {
        self.store.cluster_color_index(cluster_id)
    }

    fn apply(&mut self, next: UiState) -> Response {
        if next == self.state {
            return Response::Unchanged;
        }
        self.state = next;
        self.rebuild();
        Response::Rebuilt(self.stats())
    }

    fn rebuild(&mut self) {
        let visible = visible_documents(&self.store, &self.state);
        self.graph = build_graph(&visible, self.store.edges());
        self.layout.start(&self.graph, self.viewport);
        if let Some(sel) = &self.selected {
            if self.graph.node(sel).is_none() {
                self.selected = None;
            }
        }
        tracing::debug!(
            nodes = self.graph.nodes.len(),
            links = self.graph.links.len(),
            "graph rebuilt"
        );
    }
}

fn adjusted(hit: bool) -> Response {
    if hit {
        Response::LayoutAdjusted
    } else {
        Response::Unchanged
    }
}
