use std::net::TcpListener;

use actix_web::{
    dev::Server,
    web::{self, Data},
    App, HttpServer,
};
use tracing::info;
use tracing_actix_web::TracingLogger;

use crate::{
    configuration::Settings,
    helper::error_chain_fmt,
    repositories::{
        artifact_fs_repository::ArtifactFsRepository,
        completion_groq_repository::GroqCompletionRepository,
        source_file_fs_repository::SourceFileFsRepository,
    },
    routes::{download_file::download_file, generate_mcqs::generate_mcqs, health_check},
};

/// Holds the newly built server, and some useful properties
pub struct Application {
    server: Server,
    port: u16,
}

#[derive(thiserror::Error)]
pub enum ApplicationBuildError {
    #[error(transparent)]
    IOError(#[from] std::io::Error),
}

impl std::fmt::Debug for ApplicationBuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl Application {
    #[tracing::instrument(name = "Building application")]
    pub async fn build(settings: Settings) -> Result<Self, ApplicationBuildError> {
        // The storage directories must exist before the first request comes in
        std::fs::create_dir_all(&settings.storage.upload_dir)?;
        std::fs::create_dir_all(&settings.storage.results_dir)?;

        let address = format!(
            "{}:{}",
            settings.application.host, settings.application.port
        );
        let listener = TcpListener::bind(address)?;
        let port = listener.local_addr()?.port();

        let source_file_repository = SourceFileFsRepository::new(&settings.storage);
        let artifact_repository = ArtifactFsRepository::new(&settings.storage);
        let groq_repository = GroqCompletionRepository::new(&settings.groq);

        let server = run(
            listener,
            source_file_repository,
            groq_repository,
            artifact_repository,
        )?;

        Ok(Self { server, port })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// This function only returns when the application is stopped
    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        info!("Running server ...");
        self.server.await
    }
}

/// listener: the consumer binds their own port
///
/// TracingLogger middleware: helps collecting telemetry data.
/// It generates a unique identifier for each incoming request: `request_id`.
pub fn run(
    listener: TcpListener,
    source_file_repository: SourceFileFsRepository,
    groq_repository: GroqCompletionRepository,
    artifact_repository: ArtifactFsRepository,
) -> Result<Server, std::io::Error> {
    // Wraps repositories in a `actix_web::Data` (`Arc`) to be able to register them
    // and access them from handlers. They are shared among all threads.
    let source_file_repository = Data::new(source_file_repository);
    let groq_repository = Data::new(groq_repository);
    let artifact_repository = Data::new(artifact_repository);

    // `move` to capture variables from the surrounding environment
    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .route("/health_check", web::get().to(health_check))
            .route("/generate", web::post().to(generate_mcqs))
            .route("/download/{file_name}", web::get().to(download_file))
            .app_data(source_file_repository.clone())
            .app_data(groq_repository.clone())
            .app_data(artifact_repository.clone())
    })
    .listen(listener)?;

    // No await
    Ok(server.run())
}
