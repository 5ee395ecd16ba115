use std::path::{Path, PathBuf};

use crate::helper::error_chain_fmt;

/// The document formats the service accepts.
///
/// Any other extension is rejected before the extraction services are reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
    Txt,
}

impl DocumentFormat {
    /// Derives the format from a file name's extension, case-insensitively.
    ///
    /// # Returns
    /// `None` when the extension is missing or not one of the supported formats.
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let extension = Path::new(file_name).extension()?.to_str()?;

        match extension.to_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            "txt" => Some(Self::Txt),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
            Self::Txt => "txt",
        }
    }
}

#[derive(thiserror::Error)]
pub enum SourceDocumentError {
    #[error("The file name {0:?} is empty once sanitized")]
    EmptySanitizedFileName(String),
}

impl std::fmt::Debug for SourceDocumentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

/// An uploaded file persisted in the upload directory, tagged with its format.
///
/// Owned by a single request: it is built after the upload has been validated
/// and persisted, and dropped once its text has been extracted.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    file_name: String,
    path: PathBuf,
    format: DocumentFormat,
}

impl SourceDocument {
    pub fn new(file_name: String, path: PathBuf, format: DocumentFormat) -> Self {
        Self {
            file_name,
            path,
            format,
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> DocumentFormat {
        self.format
    }

    /// The file name without its extension, used to derive the artifact names.
    pub fn file_stem(&self) -> &str {
        Path::new(&self.file_name)
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or(&self.file_name)
    }
}

/// Sanitizes a client-provided file name before it is used on the filesystem.
///
/// Keeps the final path component only, maps spaces to underscores, drops any
/// character outside ASCII alphanumerics, `.`, `-` and `_`, and strips leading
/// dots so the result can neither traverse directories nor become hidden.
pub fn sanitize_file_name(file_name: &str) -> Result<String, SourceDocumentError> {
    let last_component = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(file_name);

    let sanitized: String = last_component
        .chars()
        .filter_map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                Some(c)
            } else if c == ' ' {
                Some('_')
            } else {
                None
            }
        })
        .collect();
    let sanitized = sanitized.trim_start_matches('.').to_owned();

    if sanitized.is_empty() {
        return Err(SourceDocumentError::EmptySanitizedFileName(
            file_name.to_owned(),
        ));
    }

    Ok(sanitized)
}
