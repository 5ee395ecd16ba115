pub mod extract_docx_content;
pub mod extract_pdf_content;
pub mod extract_text_content;
pub mod mcq_prompt;
pub mod render_mcq_pdf;
