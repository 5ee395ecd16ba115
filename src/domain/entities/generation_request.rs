use crate::helper::error_chain_fmt;

#[derive(thiserror::Error)]
pub enum GenerationRequestError {
    #[error("No text content to generate questions from")]
    EmptyText,
}

impl std::fmt::Debug for GenerationRequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

/// The input of one generation call: the extracted text and the number of
/// questions asked for.
///
/// Can only be built from non-empty text: a document from which nothing could
/// be extracted must abort the pipeline before any completion request is made.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    text: String,
    nb_questions: u32,
}

impl GenerationRequest {
    pub fn try_new(text: String, nb_questions: u32) -> Result<Self, GenerationRequestError> {
        if text.is_empty() {
            return Err(GenerationRequestError::EmptyText);
        }

        Ok(Self { text, nb_questions })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn nb_questions(&self) -> u32 {
        self.nb_questions
    }
}
