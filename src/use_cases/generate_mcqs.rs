use tracing::info;

use crate::{
    domain::{
        entities::{
            generation_request::GenerationRequest, mcq_document::McqDocument,
            source_document::SourceDocument,
        },
        services::{
            extract_text_content::{extract_text_content, ExtractTextError},
            mcq_prompt::build_mcq_prompt,
            render_mcq_pdf::{render_mcq_pdf, RenderMcqPdfError},
        },
    },
    helper::error_chain_fmt,
    repositories::{
        artifact_fs_repository::{ArtifactFsRepository, ArtifactFsRepositoryError},
        completion_groq_repository::{GroqCompletionRepository, GroqCompletionRepositoryError},
    },
};

/// Prefix of both artifact names, ahead of the source file stem
pub const ARTIFACT_NAME_PREFIX: &str = "generated_mcqs_";

/// The outcome of one pipeline run: the generated text and the names under
/// which both artifacts can be downloaded.
#[derive(Debug)]
pub struct GeneratedArtifacts {
    pub mcqs: String,
    pub txt_file_name: String,
    pub pdf_file_name: String,
}

#[derive(thiserror::Error)]
pub enum GenerateMcqsError {
    #[error("No text could be extracted from the uploaded document")]
    NoExtractableText,
    #[error(transparent)]
    ExtractionError(#[from] ExtractTextError),
    #[error(transparent)]
    CompletionError(#[from] GroqCompletionRepositoryError),
    #[error("Failed to render the PDF artifact: {0}")]
    RenderError(#[from] RenderMcqPdfError),
    #[error("Failed to persist an artifact: {0}")]
    WriteError(#[from] ArtifactFsRepositoryError),
}

impl std::fmt::Debug for GenerateMcqsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

/// Runs the whole generation pipeline for one uploaded document:
/// extract the text, build the prompt, request the completion, and persist
/// the completion as a verbatim text artifact and a rendered PDF artifact.
///
/// Aborts before any completion request when no text could be extracted.
/// Nothing is retried; if persisting fails after a successful generation the
/// failure propagates and no success is reported.
#[tracing::instrument(
    name = "Generating MCQs from a source document",
    skip(groq_repository, artifact_repository)
)]
pub async fn generate_mcqs(
    source_document: &SourceDocument,
    nb_questions: u32,
    groq_repository: &GroqCompletionRepository,
    artifact_repository: &ArtifactFsRepository,
) -> Result<GeneratedArtifacts, GenerateMcqsError> {
    let text = extract_text_content(source_document.path(), source_document.format())?;

    let generation_request = GenerationRequest::try_new(text, nb_questions)
        .map_err(|_| GenerateMcqsError::NoExtractableText)?;

    let prompt = build_mcq_prompt(&generation_request);
    let completion = groq_repository.complete(&prompt).await?;

    let mcq_document = McqDocument::parse(&completion);
    info!(
        nb_blocks = mcq_document.blocks().len(),
        "Parsed the generated MCQs"
    );

    let stem = source_document.file_stem();
    let txt_file_name = format!("{ARTIFACT_NAME_PREFIX}{stem}.txt");
    let pdf_file_name = format!("{ARTIFACT_NAME_PREFIX}{stem}.pdf");

    artifact_repository.save_text_artifact(&txt_file_name, mcq_document.raw())?;

    let mut pdf_document = render_mcq_pdf(mcq_document.blocks())?;
    artifact_repository.save_pdf_artifact(&pdf_file_name, &mut pdf_document)?;

    Ok(GeneratedArtifacts {
        mcqs: completion,
        txt_file_name,
        pdf_file_name,
    })
}
