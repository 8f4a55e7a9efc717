//! Widget glue seen from the core: what the dropdown and the checkbox list
//! should show. Widget toolkits implement [`ControlSurface`]; user input comes
//! back through [`crate::Explorer::handle`].

use crate::store::RecordStore;
use crate::ui_state::{UiState, ALL_CLUSTERS};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

pub trait ControlSurface {
    /// Single-choice list (cluster dropdown).
    fn render_options(&mut self, options: &[ControlOption]);
    /// Multi-choice list (institution checkboxes).
    fn render_checkbox_list(&mut self, items: &[ControlOption]);
}

/// "All clusters" first, then clusters by sort order.
pub fn cluster_options(store: &RecordStore, state: &UiState) -> Vec<ControlOption> {
    std::iter::once((ALL_CLUSTERS.to_string(), "All clusters".to_string()))
        .chain(store.clusters_sorted().map(|c| (c.id.clone(), c.name.clone())))
        .map(|(value, label)| ControlOption {
            selected: value == state.cluster,
            value,
            label,
        })
        .collect()
}

/// Selectable institutions by ring order; the unknown sentinel is left out.
pub fn institution_options(store: &RecordStore, state: &UiState) -> Vec<ControlOption> {
    store
        .selectable_institutions()
        .into_iter()
        .map(|i| ControlOption {
            value: i.id.clone(),
            label: i.name.clone(),
            selected: state.institutions.contains(&i.id),
        })
        .collect()
}

pub fn populate(surface: &mut dyn ControlSurface, store: &RecordStore, state: &UiState) {
    surface.render_options(&cluster_options(store, state));
    surface.render_checkbox_list(&institution_options(store, state));
}
