use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while producing the output artifact.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to encode report: {0}")]
    Encode(std::io::Error),

    #[error("Failed to resolve output path {path}: {source}")]
    Resolve {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}
