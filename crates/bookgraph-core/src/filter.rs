use std::collections::HashSet;

use crate::model::{Document, EdgeRecord};
use crate::store::RecordStore;
use crate::ui_state::{Chronology, UiState};

/// Cursor-derived values shared by every document check in one pass.
struct Window<'a> {
    state: &'a UiState,
    max_order: f64,
    query: String,
}

impl<'a> Window<'a> {
    fn new(store: &RecordStore, state: &'a UiState) -> Self {
        Self {
            state,
            max_order: store.cursor_order(state.period_cursor),
            query: state.search.trim().to_lowercase(),
        }
    }
}

pub fn passes_cluster(doc: &Document, state: &UiState) -> bool {
    state.all_clusters() || doc.cluster_id == state.cluster
}

pub fn passes_institutions(doc: &Document, state: &UiState) -> bool {
    if state.institutions.is_empty() {
        return true;
    }
    doc.institutions
        .values()
        .iter()
        .any(|v| state.institutions.contains(*v))
}

fn passes_chronology(store: &RecordStore, doc: &Document, w: &Window<'_>) -> bool {
    match w.state.chronology {
        Chronology::Produced => store.period_order(&doc.produced_period) <= w.max_order,
        Chronology::Analyzed => {
            let periods = doc.analyzed_periods.values();
            if periods.is_empty() {
                return !w.state.anchored_only;
            }
            periods
                .iter()
                .any(|pid| store.period_order(pid) <= w.max_order)
        }
    }
}

fn passes_search(doc: &Document, w: &Window<'_>) -> bool {
    if w.query.is_empty() {
        return true;
    }
    format!("{} {}", doc.title, doc.authors)
        .to_lowercase()
        .contains(&w.query)
}

fn passes(store: &RecordStore, doc: &Document, w: &Window<'_>) -> bool {
    passes_cluster(doc, w.state)
        && passes_institutions(doc, w.state)
        && passes_chronology(store, doc, w)
        && passes_search(doc, w)
}

/// Documents visible under `state`, in store order.
pub fn visible_documents<'s>(store: &'s RecordStore, state: &UiState) -> Vec<&'s Document> {
    let w = Window::new(store, state);
    let out: Vec<&Document> = store
        .documents()
        .iter()
        .filter(|doc| passes(store, doc, &w))
        .collect();
    tracing::debug!(
        visible = out.len(),
        total = store.documents().len(),
        cluster = %state.cluster,
        cursor = state.period_cursor,
        chronology = ?state.chronology,
        "documents filtered"
    );
    out
}

pub fn visible_ids<'d>(docs: &[&'d Document]) -> HashSet<&'d str> {
    docs.iter().map(|d| d.id.as_str()).collect()
}

pub fn edge_visible(e: &EdgeRecord, vis: &HashSet<&str>) -> bool {
    vis.contains(e.from.as_str()) && vis.contains(e.to.as_str())
}

/// Edges whose endpoints are both visible, in table order.
pub fn visible_edges<'e>(edges: &'e [EdgeRecord], vis: &HashSet<&str>) -> Vec<&'e EdgeRecord> {
    edges.iter().filter(|e| edge_visible(e, vis)).collect()
}
