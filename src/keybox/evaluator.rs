use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, error, info, instrument};
use walkdir::WalkDir;

use super::certificate::leaf_serial;
use super::errors::BundleResult;
use super::parser::parse_bundle;
use super::types::{AttestationBundle, EvaluationResult, Verdict};
use crate::config::BundleConfig;
use crate::feed::RevocationSet;

/// Classifies keybox files found in one directory.
#[derive(Debug, Clone)]
pub struct BundleEvaluator {
    directory: PathBuf,
    extension: String,
}

impl BundleEvaluator {
    pub fn new(directory: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        let extension = extension.into();
        Self {
            directory: directory.into(),
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// List bundle files directly inside the directory, sorted by name.
    pub fn discover(&self) -> Result<Vec<PathBuf>, walkdir::Error> {
        let mut files = Vec::new();

        let walker = WalkDir::new(&self.directory)
            .follow_links(true)
            .min_depth(1)
            .max_depth(1);

        for entry in walker {
            let entry = entry?;
            let path = entry.path();

            if entry.file_type().is_file()
                && path
                    .extension()
                    .and_then(|s| s.to_str())
                    .is_some_and(|ext| ext.eq_ignore_ascii_case(&self.extension))
            {
                files.push(path.to_path_buf());
            }
        }

        files.sort();
        debug!(
            "Discovered {} bundle files in {}",
            files.len(),
            self.directory.display()
        );
        Ok(files)
    }

    /// Read and parse one bundle file.
    pub async fn load(&self, path: &Path) -> BundleResult<AttestationBundle> {
        let content = fs::read_to_string(path).await?;
        parse_bundle(&file_name(path), &content)
    }

    async fn classify(&self, path: &Path, revoked: &RevocationSet) -> BundleResult<Verdict> {
        let bundle = self.load(path).await?;
        let serial = leaf_serial(&bundle)?;

        if revoked.contains(&serial) {
            Ok(Verdict::Revoked {
                file: bundle.name,
                serial,
            })
        } else {
            debug!("{} leaf serial {} is not revoked", bundle.name, serial);
            Ok(Verdict::Valid(EvaluationResult::valid(bundle.name)))
        }
    }

    /// Evaluate one bundle against the revocation set.
    ///
    /// Revocations and per-file failures are logged here and nowhere else.
    /// An `Err` is contained at the file boundary: callers skip the file and
    /// move on. `Verdict::into_result` gives the report row, if any.
    #[instrument(skip(self, path, revoked), fields(file = %path.display()))]
    pub async fn evaluate(&self, path: &Path, revoked: &RevocationSet) -> BundleResult<Verdict> {
        let verdict = self.classify(path, revoked).await;

        match &verdict {
            Ok(Verdict::Revoked { file, serial }) => {
                info!("{} is revoked (serial {}).", file, serial);
            }
            Ok(Verdict::Valid(_)) => {}
            Err(e) => error!("Error processing {}: {}", file_name(path), e),
        }

        verdict
    }
}

impl From<&BundleConfig> for BundleEvaluator {
    fn from(config: &BundleConfig) -> Self {
        Self::new(&config.directory, &config.extension)
    }
}

pub(crate) fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
