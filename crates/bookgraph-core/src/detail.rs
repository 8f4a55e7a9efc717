use std::fmt::Write as _;

use serde::Serialize;

use crate::graph::Node;
use crate::model::PipeList;
use crate::store::RecordStore;

/// Shown in place of an empty analyzed-period list.
pub const EMPTY_MARKER: &str = "—";

/// Read-only, fully resolved view of one node.
///
/// Every reference falls back to its raw identifier when it does not resolve.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailView {
    pub id: String,
    pub title: String,
    pub authors: String,
    pub cluster: String,
    pub institutions: Vec<String>,
    pub produced: String,
    pub analyzed: Vec<String>,
    pub status: String,
    pub provenance: String,
    pub confidence: String,
    pub url: Option<String>,
}

impl DetailView {
    pub fn resolve(store: &RecordStore, node: &Node) -> Self {
        let cluster = store
            .cluster(&node.cluster_id)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| node.cluster_id.clone());
        let institutions = split(&node.institutions)
            .map(|id| {
                store
                    .institution(id)
                    .map(|i| i.name.clone())
                    .unwrap_or_else(|| id.to_string())
            })
            .collect();
        let produced = store
            .period(&node.produced_period)
            .map(|p| p.label.clone())
            .unwrap_or_else(|| node.produced_period.clone());
        let analyzed = split(&node.analyzed_periods)
            .map(|id| {
                store
                    .period(id)
                    .map(|p| p.label.clone())
                    .unwrap_or_else(|| id.to_string())
            })
            .collect();

        Self {
            id: node.id.clone(),
            title: node.title.clone(),
            authors: node.authors.clone(),
            cluster,
            institutions,
            produced,
            analyzed,
            status: node.status.clone(),
            provenance: node.provenance.clone(),
            confidence: node.confidence.clone(),
            url: Some(node.url.trim())
                .filter(|u| !u.is_empty())
                .map(str::to_string),
        }
    }

    pub fn institutions_text(&self) -> String {
        self.institutions.join(", ")
    }

    pub fn analyzed_text(&self) -> String {
        if self.analyzed.is_empty() {
            EMPTY_MARKER.to_string()
        } else {
            self.analyzed.join(", ")
        }
    }

    pub fn status_text(&self) -> String {
        format!(
            "{} / {} (conf {})",
            self.status, self.provenance, self.confidence
        )
    }

    /// HTML fragment for embedding in a details panel. All source text is escaped.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "<div class=\"title\">{}</div>", escape_html(&self.title));
        let _ = writeln!(out, "<div class=\"small\">{}</div>", escape_html(&self.authors));
        for (label, value) in [
            ("Cluster", self.cluster.clone()),
            ("Institutions", self.institutions_text()),
            ("Produced", self.produced.clone()),
            ("Analyzes", self.analyzed_text()),
            ("Status", self.status_text()),
        ] {
            let _ = writeln!(
                out,
                "<div class=\"small\"><b>{label}:</b> {}</div>",
                escape_html(&value)
            );
        }
        if let Some(url) = &self.url {
            let _ = writeln!(
                out,
                "<a href=\"{}\" target=\"_blank\" rel=\"noreferrer\">Open source link</a>",
                escape_html(url)
            );
        }
        out
    }
}

fn split(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(PipeList::DELIMITER)
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::fixtures::{doc, store};

    #[test]
    fn resolves_names_and_falls_back_to_raw_ids() {
        let mut d = doc("a");
        d.cluster_id = "c-missing".to_string();
        d.institutions = PipeList(Some("instA|inst-missing".to_string()));
        d.produced_period = "P2".to_string();
        d.analyzed_periods = PipeList(Some("P1|P-missing".to_string()));
        let st = store(vec![d.clone()], Vec::new());

        let view = DetailView::resolve(&st, &Node::from_document(&d));
        assert_eq!(view.cluster, "c-missing");
        assert_eq!(view.institutions, vec!["Institution A", "inst-missing"]);
        assert_eq!(view.produced, "Label P2");
        assert_eq!(view.analyzed_text(), "Label P1, P-missing");
        assert_eq!(view.url, None);
    }

    #[test]
    fn spaced_pipe_entries_resolve_like_the_filter_sees_them() {
        let mut d = doc("a");
        d.institutions = PipeList(Some("instA | instB".to_string()));
        d.analyzed_periods = PipeList(Some(" P1 |P2 ".to_string()));
        let st = store(vec![d.clone()], Vec::new());

        let selected = crate::UiState::default().with_institution("instB", true);
        assert_eq!(crate::filter::visible_documents(&st, &selected).len(), 1);

        let view = DetailView::resolve(&st, &Node::from_document(&d));
        assert_eq!(view.institutions, vec!["Institution A", "Institution B"]);
        assert_eq!(view.analyzed, vec!["Label P1", "Label P2"]);
    }

    #[test]
    fn empty_analyzed_list_shows_marker() {
        let d = doc("a");
        let st = store(vec![d.clone()], Vec::new());
        let view = DetailView::resolve(&st, &Node::from_document(&d));
        assert_eq!(view.cluster, "First");
        assert!(view.analyzed.is_empty());
        assert_eq!(view.analyzed_text(), EMPTY_MARKER);
    }

    #[test]
    fn html_escapes_source_text() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#039;s&lt;/a&gt;"
        );

        let mut d = doc("a");
        d.title = "<script>alert(1)</script>".to_string();
        d.source_url = "https://example.org/?a=1&b=\"2\"".to_string();
        let st = store(vec![d.clone()], Vec::new());
        let html = DetailView::resolve(&st, &Node::from_document(&d)).to_html();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("href=\"https://example.org/?a=1&amp;b=&quot;2&quot;\""));
    }
}
