use std::path::{Path, PathBuf};

use crate::{configuration::StorageSettings, helper::error_chain_fmt};

/// Persists uploaded source files in the local upload directory.
pub struct SourceFileFsRepository {
    upload_dir: PathBuf,
}

#[derive(thiserror::Error)]
pub enum SourceFileFsRepositoryError {
    #[error(transparent)]
    IOError(#[from] std::io::Error),
}

impl std::fmt::Debug for SourceFileFsRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl SourceFileFsRepository {
    pub fn new(settings: &StorageSettings) -> Self {
        Self {
            upload_dir: settings.upload_dir.clone(),
        }
    }

    /// Persists an uploaded temporary file under its sanitized name,
    /// overwriting a previous upload with the same name.
    ///
    /// # Returns
    /// The path of the persisted file inside the upload directory.
    #[tracing::instrument(name = "Persisting uploaded source file", skip(self))]
    pub fn save_upload(
        &self,
        temp_path: &Path,
        file_name: &str,
    ) -> Result<PathBuf, SourceFileFsRepositoryError> {
        let path = self.upload_dir.join(file_name);
        // Copy rather than rename: the temporary file may live on another filesystem
        std::fs::copy(temp_path, &path)?;

        Ok(path)
    }
}
