use std::path::Path;

use actix_web::{
    http::{
        header::{ContentDisposition, DispositionParam, DispositionType},
        StatusCode,
    },
    web, HttpResponse, ResponseError,
};

use crate::{
    domain::entities::source_document::sanitize_file_name,
    helper::error_chain_fmt,
    repositories::artifact_fs_repository::{ArtifactFsRepository, ArtifactFsRepositoryError},
};

/// Streams a previously generated artifact back as an attachment.
///
/// The requested name goes through the same sanitization as uploaded file
/// names, so a crafted path cannot escape the results directory.
#[tracing::instrument(name = "Download artifact handler", skip(artifact_repository))]
pub async fn download_file(
    file_name: web::Path<String>,
    artifact_repository: web::Data<ArtifactFsRepository>,
) -> Result<HttpResponse, DownloadFileError> {
    let requested_name = file_name.into_inner();
    let file_name = sanitize_file_name(&requested_name)
        .map_err(|_| DownloadFileError::NotFound(requested_name.clone()))?;

    let bytes = artifact_repository
        .read_artifact(&file_name)
        .map_err(|error| match error {
            ArtifactFsRepositoryError::NotFound(name) => DownloadFileError::NotFound(name),
            other => DownloadFileError::ReadError(other),
        })?;

    let content_type = match Path::new(&file_name).extension().and_then(|e| e.to_str()) {
        Some("pdf") => "application/pdf",
        Some("txt") => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    };

    // TODO: stream the artifact instead of buffering it fully in memory
    Ok(HttpResponse::Ok()
        .content_type(content_type)
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(file_name)],
        })
        .body(bytes))
}

#[derive(thiserror::Error)]
pub enum DownloadFileError {
    #[error("No generated file named {0:?}")]
    NotFound(String),
    #[error("Failed to read the generated file: {0}")]
    ReadError(#[source] ArtifactFsRepositoryError),
}

impl std::fmt::Debug for DownloadFileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for DownloadFileError {
    fn status_code(&self) -> StatusCode {
        match self {
            DownloadFileError::NotFound(_) => StatusCode::NOT_FOUND,
            DownloadFileError::ReadError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
