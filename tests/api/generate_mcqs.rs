use std::io::Write;

use lopdf::{content::Content, Object};

use crate::helpers::{
    spawn_app, spawn_app_with_completion, spawn_app_with_failing_completion_api,
    two_block_completion,
};

/// The text-showing operands of the first page of a generated PDF
fn first_page_texts(pdf_path: &std::path::Path) -> Vec<String> {
    let document = lopdf::Document::load(pdf_path).expect("Failed to load the generated PDF");
    let pages = document.get_pages();
    let page_id = *pages.get(&1).expect("The generated PDF has no page");
    let content_data = document.get_page_content(page_id).unwrap();

    Content::decode(&content_data)
        .unwrap()
        .operations
        .iter()
        .filter(|operation| operation.operator == "Tj")
        .map(|operation| match &operation.operands[0] {
            Object::String(bytes, _) => String::from_utf8_lossy(bytes).into_owned(),
            other => panic!("Unexpected Tj operand: {:?}", other),
        })
        .collect()
}

#[tokio::test]
async fn generate_returns_the_mcqs_and_persists_both_artifacts() {
    let app = spawn_app().await;

    let response = app
        .post_generate("sky.txt", b"The sky is blue.", 2)
        .await;

    assert!(response.status().is_success());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["mcqs"], two_block_completion());
    assert_eq!(body["txt_filename"], "generated_mcqs_sky.txt");
    assert_eq!(body["pdf_filename"], "generated_mcqs_sky.pdf");

    // The text artifact is byte-identical to the completion
    let txt_content =
        std::fs::read_to_string(app.results_dir.join("generated_mcqs_sky.txt")).unwrap();
    assert_eq!(txt_content, two_block_completion());

    // The PDF artifact has one numbered heading per generated block
    let texts = first_page_texts(&app.results_dir.join("generated_mcqs_sky.pdf"));
    assert!(texts.iter().any(|t| t == "Q1."));
    assert!(texts.iter().any(|t| t == "Q2."));
    assert!(!texts.iter().any(|t| t == "Q0."));
}

#[tokio::test]
async fn generate_accepts_a_docx_upload() {
    let app = spawn_app().await;

    // A minimal OOXML container with one paragraph
    let mut docx = Vec::new();
    {
        let mut writer = zip::ZipWriter::new(std::io::Cursor::new(&mut docx));
        writer
            .start_file("word/document.xml", zip::write::SimpleFileOptions::default())
            .unwrap();
        writer
            .write_all(
                b"<w:document><w:body>\
                  <w:p><w:r><w:t>The sky is blue.</w:t></w:r></w:p>\
                  </w:body></w:document>",
            )
            .unwrap();
        writer.finish().unwrap();
    }

    let response = app.post_generate("notes.docx", &docx, 1).await;

    assert!(response.status().is_success());
    assert!(app.results_dir.join("generated_mcqs_notes.txt").exists());
    assert!(app.results_dir.join("generated_mcqs_notes.pdf").exists());
}

#[tokio::test]
async fn generate_numbers_questions_from_1_even_with_a_model_preamble() {
    let completion = format!("Here are your questions:\n\n{}", two_block_completion());
    let app = spawn_app_with_completion(&completion).await;

    let response = app.post_generate("sky.txt", b"The sky is blue.", 2).await;
    assert!(response.status().is_success());

    // The preamble is not a question block: numbering starts at Q1 and stops at Q2
    let texts = first_page_texts(&app.results_dir.join("generated_mcqs_sky.pdf"));
    assert!(texts.iter().any(|t| t == "Q1."));
    assert!(texts.iter().any(|t| t == "Q2."));
    assert!(!texts.iter().any(|t| t == "Q0."));
    assert!(!texts.iter().any(|t| t == "Q3."));

    // The text artifact still carries the completion verbatim, preamble included
    let txt_content =
        std::fs::read_to_string(app.results_dir.join("generated_mcqs_sky.txt")).unwrap();
    assert_eq!(txt_content, completion);
}

#[tokio::test]
async fn generate_rejects_an_unsupported_extension_before_any_extraction() {
    let app = spawn_app().await;

    let response = app
        .post_generate("binary.exe", b"The sky is blue.", 2)
        .await;

    assert_eq!(response.status().as_u16(), 400);
    let body = response.text().await.unwrap();
    assert!(body.contains("Unsupported file type"));

    // Nothing was generated
    assert!(std::fs::read_dir(&app.results_dir).unwrap().next().is_none());
}

#[tokio::test]
async fn generate_rejects_an_upload_without_extractable_text() {
    let app = spawn_app().await;

    let response = app.post_generate("empty.txt", b"", 2).await;

    assert_eq!(response.status().as_u16(), 400);
    let body = response.text().await.unwrap();
    assert!(body.contains("No text could be extracted"));
}

#[tokio::test]
async fn generate_rejects_a_request_without_a_file_field() {
    let app = spawn_app().await;

    let form = reqwest::multipart::Form::new().text("num_questions", "2");
    let response = app
        .api_client
        .post(format!("{}/generate", app.address))
        .multipart(form)
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn generate_rejects_a_non_integer_question_count() {
    let app = spawn_app().await;

    let form = reqwest::multipart::Form::new()
        .part(
            "file",
            reqwest::multipart::Part::bytes(b"The sky is blue.".to_vec())
                .file_name("sky.txt".to_owned()),
        )
        .text("num_questions", "a couple");
    let response = app
        .api_client
        .post(format!("{}/generate", app.address))
        .multipart(form)
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn generate_overwrites_previous_artifacts_for_the_same_source_name() {
    let app = spawn_app().await;

    let response = app.post_generate("sky.txt", b"The sky is blue.", 2).await;
    assert!(response.status().is_success());

    // Simulates a stale previous run
    let txt_path = app.results_dir.join("generated_mcqs_sky.txt");
    let pdf_path = app.results_dir.join("generated_mcqs_sky.pdf");
    std::fs::write(&txt_path, "stale text artifact").unwrap();
    std::fs::write(&pdf_path, "stale pdf artifact").unwrap();

    let response = app.post_generate("sky.txt", b"The sky is blue.", 2).await;
    assert!(response.status().is_success());

    assert_eq!(
        std::fs::read_to_string(&txt_path).unwrap(),
        two_block_completion()
    );
    // The PDF was rewritten as a real document
    let pdf_content = std::fs::read(&pdf_path).unwrap();
    assert!(pdf_content.starts_with(b"%PDF"));
}

#[tokio::test]
async fn generate_answers_502_when_the_completion_api_fails() {
    let app = spawn_app_with_failing_completion_api().await;

    let response = app.post_generate("sky.txt", b"The sky is blue.", 2).await;

    assert_eq!(response.status().as_u16(), 502);
}
