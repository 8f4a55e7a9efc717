use std::collections::HashMap;

use crate::model::{Cluster, Document, EdgeRecord, Institution, Period, LAST_ORDER};
use crate::table::Table;

/// Raw tables as they come off the loader.
#[derive(Debug, Clone, Default)]
pub struct Tables {
    pub documents: Table,
    pub clusters: Table,
    pub institutions: Table,
    pub periods: Table,
    pub edges: Table,
}

/// Immutable reference data plus identifier indices.
///
/// Lookups tolerate dangling references: they return `None`, or fall back to
/// `LAST_ORDER` for ordering.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    documents: Vec<Document>,
    clusters: Vec<Cluster>,
    institutions: Vec<Institution>,
    periods: Vec<Period>,
    edges: Vec<EdgeRecord>,

    clusters_by_id: HashMap<String, usize>,
    institutions_by_id: HashMap<String, usize>,
    periods_by_id: HashMap<String, usize>,
    periods_sorted: Vec<usize>,
    clusters_sorted: Vec<usize>,
}

impl RecordStore {
    pub fn from_tables(tables: &Tables) -> Self {
        Self::new(
            tables.documents.rows.iter().map(Document::from_row).collect(),
            tables.clusters.rows.iter().map(Cluster::from_row).collect(),
            tables.institutions.rows.iter().map(Institution::from_row).collect(),
            tables.periods.rows.iter().map(Period::from_row).collect(),
            tables.edges.rows.iter().map(EdgeRecord::from_row).collect(),
        )
    }

    pub fn new(
        documents: Vec<Document>,
        clusters: Vec<Cluster>,
        institutions: Vec<Institution>,
        periods: Vec<Period>,
        edges: Vec<EdgeRecord>,
    ) -> Self {
        let clusters_by_id = index_by(&clusters, |c| &c.id);
        let institutions_by_id = index_by(&institutions, |i| &i.id);
        let periods_by_id = index_by(&periods, |p| &p.id);

        let mut periods_sorted: Vec<usize> = (0..periods.len()).collect();
        periods_sorted.sort_by(|&a, &b| {
            periods[a].sort_order.total_cmp(&periods[b].sort_order)
        });
        let mut clusters_sorted: Vec<usize> = (0..clusters.len()).collect();
        clusters_sorted.sort_by(|&a, &b| {
            clusters[a].sort_order.total_cmp(&clusters[b].sort_order)
        });

        tracing::info!(
            documents = documents.len(),
            clusters = clusters.len(),
            institutions = institutions.len(),
            periods = periods.len(),
            edges = edges.len(),
            "record store built"
        );

        Self {
            documents,
            clusters,
            institutions,
            periods,
            edges,
            clusters_by_id,
            institutions_by_id,
            periods_by_id,
            periods_sorted,
            clusters_sorted,
        }
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn edges(&self) -> &[EdgeRecord] {
        &self.edges
    }

    pub fn cluster(&self, id: &str) -> Option<&Cluster> {
        self.clusters_by_id.get(id).map(|&i| &self.clusters[i])
    }

    pub fn institution(&self, id: &str) -> Option<&Institution> {
        self.institutions_by_id.get(id).map(|&i| &self.institutions[i])
    }

    pub fn period(&self, id: &str) -> Option<&Period> {
        self.periods_by_id.get(id).map(|&i| &self.periods[i])
    }

    pub fn period_order(&self, id: &str) -> f64 {
        self.period(id).map(|p| p.sort_order).unwrap_or(LAST_ORDER)
    }

    pub fn periods_sorted(&self) -> impl Iterator<Item = &Period> + '_ {
        self.periods_sorted.iter().map(|&i| &self.periods[i])
    }

    pub fn clusters_sorted(&self) -> impl Iterator<Item = &Cluster> + '_ {
        self.clusters_sorted.iter().map(|&i| &self.clusters[i])
    }

    /// Institutions offered for selection, in ring order.
    pub fn selectable_institutions(&self) -> Vec<&Institution> {
        let mut out: Vec<&Institution> = self
            .institutions
            .iter()
            .filter(|i| i.is_selectable())
            .collect();
        out.sort_by(|a, b| a.ring_order.total_cmp(&b.ring_order));
        out
    }

    /// Highest valid cursor index (the latest period).
    pub fn last_cursor(&self) -> usize {
        self.periods.len().saturating_sub(1)
    }

    /// Period at a cursor position; out-of-range cursors clamp to the last one.
    pub fn period_at_cursor(&self, cursor: usize) -> Option<&Period> {
        let idx = cursor.min(self.last_cursor());
        self.periods_sorted.get(idx).map(|&i| &self.periods[i])
    }

    /// Sort order ceiling for a cursor. No periods at all means no ceiling.
    pub fn cursor_order(&self, cursor: usize) -> f64 {
        self.period_at_cursor(cursor)
            .map(|p| p.sort_order)
            .unwrap_or(LAST_ORDER)
    }

    /// Palette slot for a cluster: its rank in sort order, or a stable hash for
    /// dangling references.
    pub fn cluster_color_index(&self, cluster_id: &str) -> usize {
        self.clusters_sorted
            .iter()
            .position(|&i| self.clusters[i].id == cluster_id)
            .unwrap_or_else(|| stable_u32(cluster_id) as usize)
    }
}

fn index_by<T>(items: &[T], key: impl Fn(&T) -> &String) -> HashMap<String, usize> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| (key(item).clone(), i))
        .collect()
}

pub fn stable_u32(s: &str) -> u32 {
    // FNV-1a; std's DefaultHasher is not stable across releases.
    let mut h: u32 = 0x811c_9dc5;
    for b in s.bytes() {
        h ^= u32::from(b);
        h = h.wrapping_mul(0x0100_0193);
    }
    h
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::model::PipeList;

    pub fn period(id: &str, order: f64) -> Period {
        Period {
            id: id.to_string(),
            label: format!("Label {id}"),
            start_year: "1900".to_string(),
            end_year: "1950".to_string(),
            sort_order: order,
        }
    }

    pub fn doc(id: &str) -> Document {
        Document {
            id: id.to_string(),
            title: format!("Title {id}"),
            authors: "Anon".to_string(),
            cluster_id: "c1".to_string(),
            institutions: PipeList(Some(String::new())),
            analyzed_periods: PipeList(Some(String::new())),
            produced_period: "P1".to_string(),
            ..Document::default()
        }
    }

    pub fn edge(from: &str, to: &str) -> EdgeRecord {
        EdgeRecord {
            from: from.to_string(),
            to: to.to_string(),
            weight: 1.0,
            kind: "cites".to_string(),
        }
    }

    pub fn store(documents: Vec<Document>, edges: Vec<EdgeRecord>) -> RecordStore {
        RecordStore::new(
            documents,
            vec![
                Cluster {
                    id: "c2".to_string(),
                    name: "Second".to_string(),
                    sort_order: 2.0,
                },
                Cluster {
                    id: "c1".to_string(),
                    name: "First".to_string(),
                    sort_order: 1.0,
                },
            ],
            vec![
                Institution {
                    id: "instB".to_string(),
                    name: "Institution B".to_string(),
                    ring_order: 2.0,
                },
                Institution {
                    id: "instA".to_string(),
                    name: "Institution A".to_string(),
                    ring_order: 1.0,
                },
                Institution {
                    id: crate::model::UNKNOWN_INSTITUTION.to_string(),
                    name: "Unknown".to_string(),
                    ring_order: 0.0,
                },
            ],
            vec![period("P3", 2.0), period("P1", 0.0), period("P2", 1.0)],
            edges,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn periods_sort_by_order_not_identifier() {
        let st = store(Vec::new(), Vec::new());
        let ids: Vec<&str> = st.periods_sorted().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["P1", "P2", "P3"]);
        assert_eq!(st.period_at_cursor(1).map(|p| p.id.as_str()), Some("P2"));
        assert_eq!(st.period_at_cursor(99).map(|p| p.id.as_str()), Some("P3"));
    }

    #[test]
    fn dangling_period_sorts_last() {
        let st = store(Vec::new(), Vec::new());
        assert_eq!(st.period_order("P2"), 1.0);
        assert_eq!(st.period_order("nope"), LAST_ORDER);
    }

    #[test]
    fn selectable_institutions_skip_unknown_and_use_ring_order() {
        let st = store(Vec::new(), Vec::new());
        let ids: Vec<&str> = st
            .selectable_institutions()
            .into_iter()
            .map(|i| i.id.as_str())
            .collect();
        assert_eq!(ids, vec!["instA", "instB"]);
    }

    #[test]
    fn cluster_color_index_follows_sort_order() {
        let st = store(Vec::new(), Vec::new());
        assert_eq!(st.cluster_color_index("c1"), 0);
        assert_eq!(st.cluster_color_index("c2"), 1);
        assert_eq!(
            st.cluster_color_index("dangling"),
            st.cluster_color_index("dangling")
        );
    }

    #[test]
    fn no_periods_means_no_ceiling() {
        let st = RecordStore::default();
        assert_eq!(st.cursor_order(0), LAST_ORDER);
        assert!(st.period_at_cursor(0).is_none());
    }
}
