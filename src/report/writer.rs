use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::info;

use super::{Report, ReportError};

/// Writes the report to a fixed, absolute location.
#[derive(Debug, Clone)]
pub struct ReportWriter {
    path: PathBuf,
}

impl ReportWriter {
    /// Resolve `path` against the current working directory.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, ReportError> {
        let path = path.as_ref();
        let resolved = std::path::absolute(path).map_err(|source| ReportError::Resolve {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self { path: resolved })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace any previous artifact with `report`.
    ///
    /// The CSV is rendered before the file is opened, so an encoding failure
    /// leaves the previous artifact untouched.
    pub async fn write(&self, report: &Report) -> Result<(), ReportError> {
        let bytes = report.to_csv()?;

        fs::write(&self.path, bytes)
            .await
            .map_err(|source| ReportError::Write {
                path: self.path.clone(),
                source,
            })?;

        info!(
            "Wrote {} valid bundle(s) to {}",
            report.rows().len(),
            self.path.display()
        );
        Ok(())
    }
}
