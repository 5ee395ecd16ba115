use std::{fs::File, io::BufReader, path::Path};

use quick_xml::{events::Event, reader::Reader};

use crate::helper::error_chain_fmt;

/// Entry of the OOXML container holding the document body
const DOCX_DOCUMENT_ENTRY: &str = "word/document.xml";

#[derive(thiserror::Error)]
pub enum ExtractDocxContentError {
    #[error(transparent)]
    IOError(#[from] std::io::Error),
    #[error("Failed to open the DOCX container: {0}")]
    ContainerError(#[from] zip::result::ZipError),
    #[error("Failed to parse the document XML: {0}")]
    XmlError(#[from] quick_xml::Error),
}

impl std::fmt::Debug for ExtractDocxContentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

/// Extracts the text of a DOCX document.
///
/// A DOCX file is a zip archive; the body lives in `word/document.xml` as
/// `<w:p>` paragraphs whose text is carried by `<w:t>` runs. Paragraph texts
/// are concatenated with single-space separators, preserving document order
/// (empty paragraphs are kept, like the original document flow).
#[tracing::instrument(name = "Extracting DOCX content")]
pub fn extract_docx_content(path: &Path) -> Result<String, ExtractDocxContentError> {
    let file = File::open(path)?;
    let mut archive = zip::ZipArchive::new(BufReader::new(file))?;
    let document_xml = archive.by_name(DOCX_DOCUMENT_ENTRY)?;

    let mut reader = Reader::from_reader(BufReader::new(document_xml));

    let mut buf: Vec<u8> = Vec::new();
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current_paragraph = String::new();
    // Depth counter, like the <body> tracking of an XHTML extraction:
    // only text inside a <w:t> run belongs to the document content.
    let mut inside_run_text = 0;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Eof => break,

            Event::Start(e) => match e.name().as_ref() {
                b"w:p" => current_paragraph.clear(),
                b"w:t" => inside_run_text += 1,
                _ => (),
            },
            Event::End(e) => match e.name().as_ref() {
                b"w:p" => paragraphs.push(std::mem::take(&mut current_paragraph)),
                b"w:t" => inside_run_text -= 1,
                _ => (),
            },
            // A self-closing <w:p/> is an empty paragraph
            Event::Empty(e) => {
                if e.name().as_ref() == b"w:p" {
                    paragraphs.push(String::new());
                }
            }
            Event::Text(e) => {
                if inside_run_text > 0 {
                    current_paragraph.push_str(&e.unescape()?);
                }
            }

            // There are several other `Event`s we do not consider here
            _ => (),
        }
        buf.clear();
    }

    Ok(paragraphs.join(" "))
}
