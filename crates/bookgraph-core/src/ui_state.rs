use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Cluster filter value meaning "no cluster restriction".
pub const ALL_CLUSTERS: &str = "__all__";

/// Which temporal relation the period cursor is compared against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Chronology {
    #[default]
    Produced,
    Analyzed,
}

impl Chronology {
    pub fn caption(self) -> &'static str {
        match self {
            Self::Produced => "Produced-in",
            Self::Analyzed => "Analyzes-period",
        }
    }
}

/// Snapshot of every user selection that affects visibility.
///
/// Values are immutable in use: each transition returns a new state and the
/// filter engine only ever sees a complete snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiState {
    pub cluster: String,
    pub institutions: BTreeSet<String>,
    pub period_cursor: usize,
    pub chronology: Chronology,
    pub anchored_only: bool,
    pub search: String,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            cluster: ALL_CLUSTERS.to_string(),
            institutions: BTreeSet::new(),
            period_cursor: 0,
            chronology: Chronology::Produced,
            anchored_only: false,
            search: String::new(),
        }
    }
}

impl UiState {
    /// Initial state: every cluster, no institution filter, cursor on the
    /// latest period.
    pub fn initial(last_cursor: usize) -> Self {
        Self {
            period_cursor: last_cursor,
            ..Self::default()
        }
    }

    pub fn all_clusters(&self) -> bool {
        self.cluster == ALL_CLUSTERS
    }

    pub fn with_cluster(&self, cluster: impl Into<String>) -> Self {
        Self {
            cluster: cluster.into(),
            ..self.clone()
        }
    }

    pub fn with_institution(&self, inst_id: &str, selected: bool) -> Self {
        let mut next = self.clone();
        if selected {
            next.institutions.insert(inst_id.to_string());
        } else {
            next.institutions.remove(inst_id);
        }
        next
    }

    pub fn with_cursor(&self, cursor: usize) -> Self {
        Self {
            period_cursor: cursor,
            ..self.clone()
        }
    }

    /// Switching away from the analyzed layer always clears `anchored_only`;
    /// the flag has no meaning for produced periods.
    pub fn with_chronology(&self, chronology: Chronology) -> Self {
        Self {
            chronology,
            anchored_only: self.anchored_only && chronology == Chronology::Analyzed,
            ..self.clone()
        }
    }

    /// Ignored outside the analyzed layer, where the control is disabled.
    pub fn with_anchored_only(&self, anchored_only: bool) -> Self {
        if self.chronology != Chronology::Analyzed {
            return self.clone();
        }
        Self {
            anchored_only,
            ..self.clone()
        }
    }

    pub fn with_search(&self, search: impl Into<String>) -> Self {
        Self {
            search: search.into(),
            ..self.clone()
        }
    }

    pub fn anchored_only_enabled(&self) -> bool {
        self.chronology == Chronology::Analyzed
    }
}
