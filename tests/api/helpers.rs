use std::{net::TcpListener, path::PathBuf};

use actix_web::{web, App, HttpResponse, HttpServer};
use mcq_generation_service::{
    configuration::get_configuration,
    startup::Application,
    telemetry::{get_tracing_subscriber, init_tracing_subscriber},
};
use once_cell::sync::Lazy;
use serde_json::json;
use tempfile::TempDir;

// Ensures that the `tracing` stack is only initialized once using `once_cell`
static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();

    if std::env::var("TEST_LOG").is_ok() {
        let subscriber =
            get_tracing_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_tracing_subscriber(subscriber);
    } else {
        let subscriber =
            get_tracing_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_tracing_subscriber(subscriber);
    };
});

/// A completion of two well-formed MCQ blocks, as the prompt asks for
pub fn two_block_completion() -> String {
    [
        "## MCQ",
        "Question: What color is the sky?",
        "A) Green",
        "B) Blue",
        "C) Red",
        "D) Yellow",
        "Correct Answer: B) Blue",
        "## MCQ",
        "Question: What is the sky?",
        "A) An ocean",
        "B) A forest",
        "C) The atmosphere seen from the ground",
        "D) A mirror",
        "Correct Answer: C) The atmosphere seen from the ground",
    ]
    .join("\n")
}

pub struct TestApp {
    pub address: String,
    /// Results directory of this app instance, used to assert on the generated artifacts
    pub results_dir: PathBuf,
    pub api_client: reqwest::Client,
    // Keeps the temporary storage directories alive for the duration of the test
    _storage_dir: TempDir,
}

/// A test API client / test suite
impl TestApp {
    /// Sends a multipart POST request to the "/generate" route
    pub async fn post_generate(
        &self,
        file_name: &str,
        file_content: &[u8],
        num_questions: u32,
    ) -> reqwest::Response {
        let form = reqwest::multipart::Form::new()
            .part(
                "file",
                reqwest::multipart::Part::bytes(file_content.to_vec())
                    .file_name(file_name.to_owned()),
            )
            .text("num_questions", num_questions.to_string());

        self.api_client
            .post(format!("{}/generate", self.address))
            .multipart(form)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    /// Sends a GET request to the "/download" route
    pub async fn get_download(&self, file_name: &str) -> reqwest::Response {
        self.api_client
            .get(format!("{}/download/{}", self.address, file_name))
            .send()
            .await
            .expect("Failed to execute request.")
    }
}

/// Launches the server as a background task, wired to a stub completion API
/// answering every request with [`two_block_completion`].
///
/// When a tokio runtime is shut down all tasks spawned on it are dropped, so
/// there is no clean-up logic to avoid leaking resources between test runs.
pub async fn spawn_app() -> TestApp {
    spawn_app_with_completion(&two_block_completion()).await
}

/// Same as [`spawn_app`], with a custom stub completion text
pub async fn spawn_app_with_completion(stub_completion: &str) -> TestApp {
    spawn_app_with_stub(StubCompletionApi::AnswersWith(stub_completion.to_owned())).await
}

/// Same as [`spawn_app`], with a stub completion API that always fails
pub async fn spawn_app_with_failing_completion_api() -> TestApp {
    spawn_app_with_stub(StubCompletionApi::Fails).await
}

enum StubCompletionApi {
    AnswersWith(String),
    Fails,
}

async fn spawn_app_with_stub(stub: StubCompletionApi) -> TestApp {
    // The first time `initialize` is invoked the code in `TRACING` is executed.
    // All other invocations will instead skip execution.
    Lazy::force(&TRACING);

    let completion_api_url = spawn_stub_completion_api(stub);

    let storage_dir =
        tempfile::tempdir().expect("Failed to create a temporary storage directory");

    // Randomizes configuration to ensure test isolation
    let configuration = {
        let mut c = get_configuration().expect("Failed to read configuration.");
        // Uses a random OS port: trying to bind port 0 triggers an OS scan for
        // an available port which is then bound to the application.
        c.application.port = 0;
        // Each test case gets its own storage directories
        c.storage.upload_dir = storage_dir.path().join("uploads");
        c.storage.results_dir = storage_dir.path().join("results");
        c.groq.base_url = completion_api_url;
        c
    };

    let results_dir = configuration.storage.results_dir.clone();

    let application = Application::build(configuration)
        .await
        .expect("Failed to build application.");
    let application_port = application.port();

    // Launches the application as a background task
    let _ = tokio::spawn(application.run_until_stopped());

    TestApp {
        address: format!("http://127.0.0.1:{}", application_port),
        results_dir,
        api_client: reqwest::Client::new(),
        _storage_dir: storage_dir,
    }
}

/// Minimal stand-in for the Groq chat-completions endpoint
fn spawn_stub_completion_api(stub: StubCompletionApi) -> String {
    let listener =
        TcpListener::bind("127.0.0.1:0").expect("Failed to bind the stub completion API");
    let port = listener.local_addr().unwrap().port();

    let stub = web::Data::new(stub);
    let server = HttpServer::new(move || {
        App::new().app_data(stub.clone()).route(
            "/openai/v1/chat/completions",
            web::post().to(|stub: web::Data<StubCompletionApi>| async move {
                match stub.get_ref() {
                    StubCompletionApi::AnswersWith(completion) => {
                        HttpResponse::Ok().json(json!({
                            "choices": [
                                {
                                    "index": 0,
                                    "message": { "role": "assistant", "content": completion }
                                }
                            ]
                        }))
                    }
                    StubCompletionApi::Fails => HttpResponse::InternalServerError()
                        .body("stub completion API unavailable"),
                }
            }),
        )
    })
    .listen(listener)
    .expect("Failed to start the stub completion API")
    .run();

    tokio::spawn(server);

    format!("http://127.0.0.1:{port}")
}
