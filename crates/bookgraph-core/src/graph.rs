use serde::{Deserialize, Serialize};

use crate::filter::{visible_edges, visible_ids};
use crate::model::{Document, EdgeRecord};

/// Display-ready node. Foreign keys stay as raw strings; they are resolved
/// lazily when a detail view is requested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub title: String,
    pub authors: String,
    pub url: String,
    pub cluster_id: String,
    pub institutions: String,
    pub produced_period: String,
    pub analyzed_periods: String,
    pub confidence: String,
    pub status: String,
    pub provenance: String,
}

impl Node {
    pub fn from_document(doc: &Document) -> Self {
        Self {
            id: doc.id.clone(),
            title: doc.title.clone(),
            authors: doc.authors.clone(),
            url: doc.source_url.clone(),
            cluster_id: doc.cluster_id.clone(),
            institutions: doc.institutions.raw().to_string(),
            produced_period: doc.produced_period.clone(),
            analyzed_periods: doc.analyzed_periods.raw().to_string(),
            confidence: doc.confidence.clone(),
            status: doc.status.clone(),
            provenance: doc.provenance.clone(),
        }
    }

    /// Title shortened to `max_chars` characters, with an ellipsis when cut.
    pub fn label(&self, max_chars: usize) -> String {
        if self.title.chars().count() > max_chars {
            let mut s: String = self.title.chars().take(max_chars).collect();
            s.push('…');
            s
        } else {
            self.title.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub source: String,
    pub target: String,
    pub weight: f64,
    #[serde(rename = "type")]
    pub kind: String,
}

impl Link {
    pub fn from_edge(e: &EdgeRecord) -> Self {
        Self {
            source: e.from.clone(),
            target: e.to.clone(),
            weight: e.weight,
            kind: e.kind.clone(),
        }
    }

    pub fn is_heavy(&self, threshold: f64) -> bool {
        self.weight >= threshold
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub links: Vec<Link>,
}

impl Graph {
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Materialises the visible documents and every edge between them.
///
/// Pure: identical input always yields an equal `Graph`.
pub fn build_graph(visible: &[&Document], edges: &[EdgeRecord]) -> Graph {
    let vis = visible_ids(visible);
    Graph {
        nodes: visible.iter().map(|d| Node::from_document(d)).collect(),
        links: visible_edges(edges, &vis)
            .into_iter()
            .map(Link::from_edge)
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::fixtures::{doc, edge};

    #[test]
    fn build_is_idempotent() {
        let docs = vec![doc("a"), doc("b")];
        let refs: Vec<&Document> = docs.iter().collect();
        let edges = vec![edge("a", "b"), edge("b", "zz")];

        let first = build_graph(&refs, &edges);
        let second = build_graph(&refs, &edges);
        assert_eq!(first, second);
        assert_eq!(first.nodes.len(), 2);
        assert_eq!(first.links.len(), 1);
    }

    #[test]
    fn nodes_keep_raw_foreign_keys() {
        let mut d = doc("a");
        d.cluster_id = "dangling".to_string();
        d.institutions = crate::model::PipeList(Some("x|y".to_string()));
        let g = build_graph(&[&d], &[]);
        let n = g.node("a").expect("node");
        assert_eq!(n.cluster_id, "dangling");
        assert_eq!(n.institutions, "x|y");
    }

    #[test]
    fn label_truncates_on_characters() {
        let mut d = doc("a");
        d.title = "Écrits sur la ville et la campagne".to_string();
        let n = Node::from_document(&d);
        let label = n.label(28);
        assert_eq!(label.chars().count(), 29);
        assert!(label.ends_with('…'));
        assert_eq!(n.label(100), d.title);
    }

    #[test]
    fn heavy_links_start_at_threshold() {
        let mut e = edge("a", "b");
        e.weight = 3.0;
        assert!(Link::from_edge(&e).is_heavy(3.0));
        e.weight = 2.5;
        assert!(!Link::from_edge(&e).is_heavy(3.0));
    }

    #[test]
    fn graph_serializes_link_type_field() {
        let docs = vec![doc("a"), doc("b")];
        let refs: Vec<&Document> = docs.iter().collect();
        let g = build_graph(&refs, &[edge("a", "b")]);
        let json = serde_json::to_value(&g).expect("json");
        assert_eq!(json["links"][0]["type"], "cites");
        assert_eq!(json["links"][0]["weight"], 1.0);
    }
}
