use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{}:{line}: {reason}", path.display())]
    Parse {
        path: PathBuf,
        line: u64,
        reason: String,
    },

    #[error("malformed file {}: {source}", path.display())]
    Csv { path: PathBuf, source: csv::Error },
}

impl StorageError {
    pub fn path(&self) -> &std::path::Path {
        match self {
            StorageError::Io { path, .. }
            | StorageError::Parse { path, .. }
            | StorageError::Csv { path, .. } => path,
        }
    }
}
