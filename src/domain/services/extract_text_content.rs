use std::path::Path;

use crate::{domain::entities::source_document::DocumentFormat, helper::error_chain_fmt};

use super::{
    extract_docx_content::{extract_docx_content, ExtractDocxContentError},
    extract_pdf_content::{extract_pdf_content, ExtractPdfContentError},
};

#[derive(thiserror::Error)]
pub enum ExtractTextError {
    #[error("Failed to extract text from the PDF document: {0}")]
    PdfError(#[from] ExtractPdfContentError),
    #[error("Failed to extract text from the DOCX document: {0}")]
    DocxError(#[from] ExtractDocxContentError),
    #[error("Failed to read the text file: {0}")]
    TxtError(#[from] std::io::Error),
}

impl std::fmt::Debug for ExtractTextError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

/// Extracts the plain-text content of a source document, dispatching on its format.
///
/// A plain-text file is read verbatim as UTF-8. An extraction that succeeds on
/// a document without any text gives `Ok("")`: deciding what to do with an
/// empty content belongs to the caller.
#[tracing::instrument(name = "Extracting text from source document")]
pub fn extract_text_content(
    path: &Path,
    format: DocumentFormat,
) -> Result<String, ExtractTextError> {
    match format {
        DocumentFormat::Pdf => Ok(extract_pdf_content(path)?),
        DocumentFormat::Docx => Ok(extract_docx_content(path)?),
        DocumentFormat::Txt => Ok(std::fs::read_to_string(path)?),
    }
}
