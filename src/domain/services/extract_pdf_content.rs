use std::path::Path;

use lopdf::Document;
use tracing::debug;

use crate::helper::error_chain_fmt;

#[derive(thiserror::Error)]
pub enum ExtractPdfContentError {
    #[error(transparent)]
    PdfDocError(#[from] lopdf::Error),
}

impl std::fmt::Debug for ExtractPdfContentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

/// Extracts the text of a PDF document, page by page.
///
/// Only able to read text content that is not "drawn".
/// Page texts are concatenated with no separator; pages yielding no text are
/// skipped silently, so a document with zero extractable pages gives an empty
/// string rather than an error.
#[tracing::instrument(name = "Extracting PDF content")]
pub fn extract_pdf_content(path: &Path) -> Result<String, ExtractPdfContentError> {
    let document = Document::load(path)?;
    let page_numbers: Vec<u32> = document.get_pages().keys().copied().collect();

    debug!("PDF source: nb pages: {}", page_numbers.len());

    let mut content = String::new();
    for page_number in page_numbers {
        let page_text = document.extract_text(&[page_number])?;

        if page_text.is_empty() {
            continue;
        }
        content.push_str(&page_text);
    }

    Ok(content)
}
