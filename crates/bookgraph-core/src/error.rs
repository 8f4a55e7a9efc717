use std::io;

use thiserror::Error;

/// Startup failure. Any of these aborts initialisation; no partial graph is built.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to load {file}: {source}")]
    Read {
        file: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to load {file}: table has no header row")]
    Empty { file: String },
}

impl LoadError {
    pub fn file(&self) -> &str {
        match self {
            Self::Read { file, .. } | Self::Empty { file } => file,
        }
    }
}
