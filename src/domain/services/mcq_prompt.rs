//! The single place where the generation prompt is written.
//!
//! The format section of the prompt is rendered from the block constants of
//! [`crate::domain::entities::mcq_document`], the same ones the parser uses,
//! so the contract with the completion cannot drift on one side only.

use crate::domain::entities::{
    generation_request::GenerationRequest,
    mcq_document::{CORRECT_ANSWER_PREFIX, MCQ_BLOCK_MARKER, QUESTION_PREFIX},
};

/// Builds the completion prompt for a generation request.
///
/// Embeds the full extracted text, the requested question count and the
/// strict per-question output format.
pub fn build_mcq_prompt(request: &GenerationRequest) -> String {
    format!(
        r#"You are an AI assistant helping the user generate multiple-choice questions (MCQs) from the text below:

Text:
{text}

Generate {nb_questions} MCQs. Each should include:
- A clear question
- Four answer options labeled A, B, C, and D
- The correct answer clearly indicated at the end

Format:
{marker}
{question_prefix} [question]
A) [option A]
B) [option B]
C) [option C]
D) [option D]
{correct_answer_prefix} [correct option]"#,
        text = request.text(),
        nb_questions = request.nb_questions(),
        marker = MCQ_BLOCK_MARKER,
        question_prefix = QUESTION_PREFIX,
        correct_answer_prefix = CORRECT_ANSWER_PREFIX,
    )
}
