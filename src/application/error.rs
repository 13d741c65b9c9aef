use std::path::PathBuf;
use thiserror::Error;

use crate::storage::StorageError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Export to {} failed: {source}", path.display())]
    Export { path: PathBuf, source: csv::Error },

    #[error("Invalid month: {0} (expected 1-12)")]
    InvalidMonth(u32),
}
