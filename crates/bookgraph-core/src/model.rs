use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::table::Row;

/// Institution that never appears in the selectable list.
pub const UNKNOWN_INSTITUTION: &str = "inst_unknown";

/// Order used for anything that cannot be resolved or parsed: sorts last.
pub const LAST_ORDER: f64 = f64::INFINITY;

pub const DEFAULT_WEIGHT: f64 = 1.0;

/// Orders may be fractional. Blank, unparsable and NaN values sort last.
pub fn parse_order(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(o) if !o.is_nan() => o,
        _ => LAST_ORDER,
    }
}

pub fn parse_weight(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(w) if w.is_finite() => w,
        _ => DEFAULT_WEIGHT,
    }
}

/// Pipe-delimited multi-valued cell.
///
/// `None` means the column was absent from the table; `Some("")` means the
/// column exists and is explicitly empty. Both yield no values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipeList(pub Option<String>);

impl PipeList {
    pub const DELIMITER: char = '|';

    pub fn from_row(row: &Row, column: &str) -> Self {
        Self(row.get(column).map(str::to_string))
    }

    pub fn values(&self) -> SmallVec<[&str; 4]> {
        match &self.0 {
            Some(raw) => raw
                .split(Self::DELIMITER)
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .collect(),
            None => SmallVec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values().is_empty()
    }

    pub fn raw(&self) -> &str {
        self.0.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub title: String,
    pub authors: String,
    pub source_url: String,
    pub cluster_id: String,
    pub institutions: PipeList,
    pub produced_period: String,
    pub analyzed_periods: PipeList,
    pub confidence: String,
    pub status: String,
    pub provenance: String,
}

impl Document {
    pub fn from_row(row: &Row) -> Self {
        Self {
            id: row.text("book_id"),
            title: row.text("title"),
            authors: row.text("authors"),
            source_url: row.text("source_url"),
            cluster_id: row.text("cluster_id"),
            institutions: PipeList::from_row(row, "institutions"),
            produced_period: row.text("produced_period"),
            analyzed_periods: PipeList::from_row(row, "analyzes_periods"),
            confidence: row.text("confidence"),
            status: row.text("status"),
            provenance: row.text("provenance"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    pub id: String,
    pub name: String,
    pub sort_order: f64,
}

impl Cluster {
    pub fn from_row(row: &Row) -> Self {
        Self {
            id: row.text("cluster_id"),
            name: row.text("cluster_name"),
            sort_order: parse_order(row.get("sort_order").unwrap_or_default()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Institution {
    pub id: String,
    pub name: String,
    pub ring_order: f64,
}

impl Institution {
    pub fn from_row(row: &Row) -> Self {
        Self {
            id: row.text("inst_id"),
            name: row.text("inst_name"),
            ring_order: parse_order(row.get("ring_order").unwrap_or_default()),
        }
    }

    pub fn is_selectable(&self) -> bool {
        self.id != UNKNOWN_INSTITUTION
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Period {
    pub id: String,
    pub label: String,
    pub start_year: String,
    pub end_year: String,
    pub sort_order: f64,
}

impl Period {
    pub fn from_row(row: &Row) -> Self {
        Self {
            id: row.text("period_id"),
            label: row.text("label"),
            start_year: row.text("start_year"),
            end_year: row.text("end_year"),
            sort_order: parse_order(row.get("sort_order").unwrap_or_default()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub from: String,
    pub to: String,
    pub weight: f64,
    pub kind: String,
}

impl EdgeRecord {
    pub fn from_row(row: &Row) -> Self {
        Self {
            from: row.text("from_id"),
            to: row.text("to_id"),
            weight: row.get("weight").map(parse_weight).unwrap_or(DEFAULT_WEIGHT),
            kind: row.text("edge_type"),
        }
    }
}
