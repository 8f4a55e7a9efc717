use std::collections::HashMap;

/// One data row keyed by header name. Every header column is present;
/// short rows are padded with empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    cells: HashMap<String, String>,
}

impl Row {
    /// `None` only when the column is not part of the table header.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells.get(column).map(String::as_str)
    }

    /// Convenience accessor: absent columns read as empty text.
    pub fn text(&self, column: &str) -> String {
        self.get(column).unwrap_or_default().to_string()
    }

    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            cells: pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<Row>,
}

/// Parses comma-delimited text with a header row.
///
/// Quoted fields may contain commas and have their quotes removed. Every field
/// is trimmed, and lines that are blank after trimming are skipped, including
/// before the header. Returns `None` when there is no header line at all.
pub fn parse_table(text: &str) -> Option<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut records = reader.records().filter_map(|rec| match rec {
        Ok(rec) if rec.iter().any(|f| !f.is_empty()) => Some(rec),
        Ok(_) => None,
        Err(err) => {
            tracing::warn!(%err, "skipping unreadable table row");
            None
        }
    });

    let header: Vec<String> = records.next()?.iter().map(str::to_string).collect();
    let rows = records
        .map(|rec| {
            let cells = header
                .iter()
                .enumerate()
                .map(|(idx, h)| (h.clone(), rec.get(idx).unwrap_or("").to_string()))
                .collect();
            Row { cells }
        })
        .collect();

    Some(Table { header, rows })
}
