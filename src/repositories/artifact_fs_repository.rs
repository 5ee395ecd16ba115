use std::path::PathBuf;

use crate::{configuration::StorageSettings, helper::error_chain_fmt};

/// Stores the generated artifacts in the local results directory.
///
/// Artifact names are derived from the source file name upstream, so two runs
/// on the same source overwrite each other: last writer wins.
pub struct ArtifactFsRepository {
    results_dir: PathBuf,
}

#[derive(thiserror::Error)]
pub enum ArtifactFsRepositoryError {
    #[error("No artifact named {0:?} in the results directory")]
    NotFound(String),
    #[error(transparent)]
    IOError(#[from] std::io::Error),
    #[error("Failed to write the PDF document: {0}")]
    PdfWriteError(#[from] lopdf::Error),
}

impl std::fmt::Debug for ArtifactFsRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ArtifactFsRepository {
    pub fn new(settings: &StorageSettings) -> Self {
        Self {
            results_dir: settings.results_dir.clone(),
        }
    }

    pub fn artifact_path(&self, artifact_name: &str) -> PathBuf {
        self.results_dir.join(artifact_name)
    }

    /// Writes the generated text verbatim, UTF-8 encoded, overwriting any
    /// previous artifact with the same name.
    #[tracing::instrument(name = "Saving text artifact", skip(self, mcqs))]
    pub fn save_text_artifact(
        &self,
        artifact_name: &str,
        mcqs: &str,
    ) -> Result<PathBuf, ArtifactFsRepositoryError> {
        let path = self.artifact_path(artifact_name);
        std::fs::write(&path, mcqs)?;

        Ok(path)
    }

    /// Writes a rendered PDF document, overwriting any previous artifact with
    /// the same name.
    #[tracing::instrument(name = "Saving PDF artifact", skip(self, document))]
    pub fn save_pdf_artifact(
        &self,
        artifact_name: &str,
        document: &mut lopdf::Document,
    ) -> Result<PathBuf, ArtifactFsRepositoryError> {
        let path = self.artifact_path(artifact_name);
        document.save(&path)?;

        Ok(path)
    }

    /// Reads a previously generated artifact back, for downloads.
    #[tracing::instrument(name = "Reading artifact", skip(self))]
    pub fn read_artifact(&self, artifact_name: &str) -> Result<Vec<u8>, ArtifactFsRepositoryError> {
        let path = self.artifact_path(artifact_name);

        match std::fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Err(
                ArtifactFsRepositoryError::NotFound(artifact_name.to_owned()),
            ),
            Err(error) => Err(error.into()),
        }
    }
}
