use std::future::Future;
use std::path::PathBuf;

use crate::error::LoadError;
use crate::store::{RecordStore, Tables};
use crate::table::{parse_table, Table};

pub const DOCUMENTS_FILE: &str = "books.csv";
pub const CLUSTERS_FILE: &str = "clusters.csv";
pub const INSTITUTIONS_FILE: &str = "institutions.csv";
pub const PERIODS_FILE: &str = "periods.csv";
pub const EDGES_FILE: &str = "edges.csv";

pub const TABLE_FILES: [&str; 5] = [
    DOCUMENTS_FILE,
    CLUSTERS_FILE,
    INSTITUTIONS_FILE,
    PERIODS_FILE,
    EDGES_FILE,
];

/// Where table text comes from.
pub trait TableSource {
    fn fetch(&self, file: &str) -> impl Future<Output = Result<String, LoadError>> + Send;
}

/// Reads tables from a local data directory.
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn missing_files(&self) -> Vec<&'static str> {
        TABLE_FILES
            .iter()
            .copied()
            .filter(|f| !self.root.join(f).is_file())
            .collect()
    }
}

impl TableSource for DirSource {
    async fn fetch(&self, file: &str) -> Result<String, LoadError> {
        let path = self.root.join(file);
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| LoadError::Read {
                file: path.display().to_string(),
                source,
            })
    }
}

async fn fetch_table<S: TableSource>(source: &S, file: &str) -> Result<Table, LoadError> {
    let text = source.fetch(file).await?;
    parse_table(&text).ok_or_else(|| LoadError::Empty {
        file: file.to_string(),
    })
}

/// Fetches all five tables concurrently. The first failure aborts the load.
pub async fn load_tables<S: TableSource>(source: &S) -> Result<Tables, LoadError> {
    let (documents, clusters, institutions, periods, edges) = tokio::try_join!(
        fetch_table(source, DOCUMENTS_FILE),
        fetch_table(source, CLUSTERS_FILE),
        fetch_table(source, INSTITUTIONS_FILE),
        fetch_table(source, PERIODS_FILE),
        fetch_table(source, EDGES_FILE),
    )?;
    Ok(Tables {
        documents,
        clusters,
        institutions,
        periods,
        edges,
    })
}

pub async fn load_store<S: TableSource>(source: &S) -> Result<RecordStore, LoadError> {
    let tables = load_tables(source).await?;
    Ok(RecordStore::from_tables(&tables))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::tempdir;

    fn write_fixture(dir: &std::path::Path) {
        let files = [
            (
                DOCUMENTS_FILE,
                "book_id,title,authors,source_url,cluster_id,institutions,produced_period,analyzes_periods,confidence,status,provenance\n\
                 b1,\"Letters, Collected\",Smith,https://example.org/b1,c1,instA|instB,P1,,0.9,draft,manual\n\
                 b2,Essays,Jones,,c2,,P2,P1|P2,0.5,final,import\n",
            ),
            (CLUSTERS_FILE, "cluster_id,cluster_name,sort_order\nc1,One,1\nc2,Two,2\n"),
            (
                INSTITUTIONS_FILE,
                "inst_id,inst_name,ring_order\ninstA,A,1\ninstB,B,2\ninst_unknown,Unknown,9\n",
            ),
            (
                PERIODS_FILE,
                "period_id,label,start_year,end_year,sort_order\nP2,Later,1950,2000,1\nP1,Early,1900,1949,0\n",
            ),
            (EDGES_FILE, "from_id,to_id,weight,edge_type\nb1,b2,abc,cites\n"),
        ];
        for (name, body) in files {
            fs::write(dir.join(name), body).expect("write fixture");
        }
    }

    #[tokio::test]
    async fn loads_a_data_directory() {
        let dir = tempdir().expect("tempdir");
        write_fixture(dir.path());

        let store = load_store(&DirSource::new(dir.path())).await.expect("load");
        assert_eq!(store.documents().len(), 2);
        assert_eq!(store.documents()[0].title, "Letters, Collected");
        assert!(store.documents()[0].analyzed_periods.is_empty());
        assert!(store.documents()[0].analyzed_periods.0.is_some());
        assert_eq!(store.edges()[0].weight, 1.0);
        assert_eq!(store.period_at_cursor(0).map(|p| p.label.as_str()), Some("Early"));
    }

    #[tokio::test]
    async fn any_missing_table_aborts() {
        let dir = tempdir().expect("tempdir");
        write_fixture(dir.path());
        fs::remove_file(dir.path().join(PERIODS_FILE)).expect("remove");

        let source = DirSource::new(dir.path());
        assert_eq!(source.missing_files(), vec![PERIODS_FILE]);
        let err = load_store(&source).await.expect_err("must fail");
        assert!(err.file().ends_with(PERIODS_FILE));
    }

    struct MemSource(HashMap<&'static str, &'static str>);

    impl TableSource for MemSource {
        async fn fetch(&self, file: &str) -> Result<String, LoadError> {
            Ok(self.0.get(file).copied().unwrap_or_default().to_string())
        }
    }

    #[tokio::test]
    async fn empty_table_is_a_load_failure() {
        let mut tables: HashMap<&'static str, &'static str> =
            TABLE_FILES.iter().map(|f| (*f, "id\n")).collect();
        tables.insert(EDGES_FILE, "");
        let err = load_tables(&MemSource(tables)).await.expect_err("must fail");
        assert!(matches!(err, LoadError::Empty { ref file } if file == EDGES_FILE));
    }
}
