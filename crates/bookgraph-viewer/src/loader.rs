use anyhow::{Context, Result};
use bookgraph_core::load::{load_store, DirSource};
use bookgraph_core::RecordStore;
use crossbeam_channel::Sender;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum Loaded {
    Ready(Box<RecordStore>),
    Failed(String),
}

/// Loads the tables on a background thread and reports once.
pub fn spawn_loader(data_dir: PathBuf, tx: Sender<Loaded>) {
    std::thread::spawn(move || {
        let msg = match load_blocking(&data_dir) {
            Ok(store) => Loaded::Ready(Box::new(store)),
            Err(e) => {
                tracing::error!(error = %format!("{e:#}"), "startup load failed");
                Loaded::Failed(format!("{e:#}"))
            }
        };
        let _ = tx.send(msg);
    });
}

pub fn load_blocking(data_dir: &Path) -> Result<RecordStore> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("tokio runtime")?;

    let source = DirSource::new(data_dir);
    let missing = source.missing_files();
    if !missing.is_empty() {
        tracing::warn!(dir = %data_dir.display(), ?missing, "data directory is incomplete");
    }

    rt.block_on(load_store(&source))
        .with_context(|| format!("load tables from {}", data_dir.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookgraph_core::load::TABLE_FILES;
    use std::fs;
    use std::time::Duration;
    use tempfile::tempdir;

    #[test]
    fn loader_reports_ready_store() {
        let dir = tempdir().expect("tempdir");
        for file in TABLE_FILES {
            fs::write(dir.path().join(file), "id\n").expect("write");
        }
        let (tx, rx) = crossbeam_channel::unbounded();
        spawn_loader(dir.path().to_path_buf(), tx);

        match rx.recv_timeout(Duration::from_secs(10)).expect("message") {
            Loaded::Ready(store) => assert!(store.documents().is_empty()),
            Loaded::Failed(e) => panic!("unexpected failure: {e}"),
        }
    }

    #[test]
    fn missing_directory_is_fatal() {
        let dir = tempdir().expect("tempdir");
        let err = load_blocking(&dir.path().join("nope")).expect_err("must fail");
        assert!(format!("{err:#}").contains("load tables from"));
    }
}
