use actix_multipart::form::{tempfile::TempFile, text::Text, MultipartForm};
use actix_web::{http::StatusCode, web, HttpResponse, ResponseError};
use serde_json::json;
use tracing::info;

use crate::{
    domain::entities::source_document::{sanitize_file_name, DocumentFormat, SourceDocument},
    helper::error_chain_fmt,
    repositories::{
        artifact_fs_repository::ArtifactFsRepository,
        completion_groq_repository::GroqCompletionRepository,
        source_file_fs_repository::{SourceFileFsRepository, SourceFileFsRepositoryError},
    },
    use_cases::generate_mcqs::{self as use_case, GenerateMcqsError},
};

#[derive(Debug, MultipartForm)]
pub struct GenerateMcqsForm {
    #[multipart(rename = "file")]
    pub file: TempFile,
    pub num_questions: Text<u32>,
}

/// Accepts a document upload and answers with the generated MCQs and the
/// names of the two downloadable artifacts.
///
/// The upload is validated (sanitized name, supported extension) and
/// persisted before the generation pipeline runs: an unsupported file never
/// reaches the extraction services.
#[tracing::instrument(
    name = "Generate MCQs handler",
    skip(form, source_file_repository, groq_repository, artifact_repository)
)]
pub async fn generate_mcqs(
    MultipartForm(form): MultipartForm<GenerateMcqsForm>,
    source_file_repository: web::Data<SourceFileFsRepository>,
    groq_repository: web::Data<GroqCompletionRepository>,
    artifact_repository: web::Data<ArtifactFsRepository>,
) -> Result<HttpResponse, GenerateMcqsResponseError> {
    let client_file_name = form
        .file
        .file_name
        .as_deref()
        .ok_or(GenerateMcqsResponseError::MissingFileName)?;
    let file_name = sanitize_file_name(client_file_name)
        .map_err(|_| GenerateMcqsResponseError::InvalidFileName(client_file_name.to_owned()))?;

    let format = DocumentFormat::from_file_name(&file_name)
        .ok_or_else(|| GenerateMcqsResponseError::UnsupportedFileType(file_name.clone()))?;

    let nb_questions = form.num_questions.into_inner();
    info!(
        file_name = %file_name,
        format = format.as_str(),
        nb_questions = nb_questions,
        "Received a source document upload"
    );

    let path = source_file_repository.save_upload(form.file.file.path(), &file_name)?;
    let source_document = SourceDocument::new(file_name, path, format);

    let artifacts = use_case::generate_mcqs(
        &source_document,
        nb_questions,
        &groq_repository,
        &artifact_repository,
    )
    .await?;

    Ok(HttpResponse::Ok().json(json!({
        "mcqs": artifacts.mcqs,
        "txt_filename": artifacts.txt_file_name,
        "pdf_filename": artifacts.pdf_file_name,
    })))
}

#[derive(thiserror::Error)]
pub enum GenerateMcqsResponseError {
    #[error("No file was uploaded with the request")]
    MissingFileName,
    #[error("Invalid uploaded file name: {0}")]
    InvalidFileName(String),
    #[error("Unsupported file type: {0}. Supported extensions: pdf, txt, docx")]
    UnsupportedFileType(String),
    #[error("Failed to persist the uploaded file: {0}")]
    SaveUploadError(#[from] SourceFileFsRepositoryError),
    #[error(transparent)]
    GenerationError(#[from] GenerateMcqsError),
}

impl std::fmt::Debug for GenerateMcqsResponseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for GenerateMcqsResponseError {
    fn status_code(&self) -> StatusCode {
        match self {
            GenerateMcqsResponseError::MissingFileName
            | GenerateMcqsResponseError::InvalidFileName(_)
            | GenerateMcqsResponseError::UnsupportedFileType(_)
            | GenerateMcqsResponseError::GenerationError(GenerateMcqsError::NoExtractableText) => {
                StatusCode::BAD_REQUEST
            }
            GenerateMcqsResponseError::GenerationError(GenerateMcqsError::ExtractionError(_)) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            GenerateMcqsResponseError::GenerationError(GenerateMcqsError::CompletionError(_)) => {
                StatusCode::BAD_GATEWAY
            }
            GenerateMcqsResponseError::SaveUploadError(_)
            | GenerateMcqsResponseError::GenerationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
