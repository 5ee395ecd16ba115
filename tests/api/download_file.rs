use crate::helpers::{spawn_app, two_block_completion};

#[tokio::test]
async fn download_returns_the_text_artifact_as_an_attachment() {
    let app = spawn_app().await;
    app.post_generate("sky.txt", b"The sky is blue.", 2).await;

    let response = app.get_download("generated_mcqs_sky.txt").await;

    assert!(response.status().is_success());
    let content_disposition = response
        .headers()
        .get("content-disposition")
        .expect("Missing content-disposition header")
        .to_str()
        .unwrap()
        .to_owned();
    assert!(content_disposition.starts_with("attachment"));
    assert!(content_disposition.contains("generated_mcqs_sky.txt"));

    assert_eq!(response.text().await.unwrap(), two_block_completion());
}

#[tokio::test]
async fn download_returns_the_pdf_artifact_with_its_content_type() {
    let app = spawn_app().await;
    app.post_generate("sky.txt", b"The sky is blue.", 2).await;

    let response = app.get_download("generated_mcqs_sky.pdf").await;

    assert!(response.status().is_success());
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "application/pdf"
    );
    let body = response.bytes().await.unwrap();
    assert!(body.starts_with(b"%PDF"));
}

#[tokio::test]
async fn download_returns_404_on_an_unknown_artifact() {
    let app = spawn_app().await;

    let response = app.get_download("generated_mcqs_unknown.txt").await;

    assert_eq!(response.status().as_u16(), 404);
}
