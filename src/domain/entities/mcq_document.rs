//! The structure shared between the generation prompt and the PDF renderer.
//!
//! The completion is asked to delimit each question with [`MCQ_BLOCK_MARKER`]
//! and to prefix its lines with the constants below. Keeping the prompt
//! template and the parser on the same constants means the contract cannot
//! drift on one side only.

/// Delimiter the completion puts before each generated question.
pub const MCQ_BLOCK_MARKER: &str = "## MCQ";

pub const QUESTION_PREFIX: &str = "Question:";
pub const OPTION_PREFIXES: [&str; 4] = ["A)", "B)", "C)", "D)"];
pub const CORRECT_ANSWER_PREFIX: &str = "Correct Answer:";

/// One parsed multiple-choice question.
///
/// Parsing is lenient: the completion is not validated against the requested
/// question count, and a malformed block keeps whatever lines were recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct McqBlock {
    /// The question text, without its `Question:` prefix
    pub question: Option<String>,
    /// The option lines, with their `A)`..`D)` labels kept
    pub options: Vec<String>,
    /// The correct answer, without its `Correct Answer:` prefix
    pub correct_answer: Option<String>,
}

impl McqBlock {
    fn is_empty(&self) -> bool {
        self.question.is_none() && self.options.is_empty() && self.correct_answer.is_none()
    }
}

/// The raw completion text together with its parsed question blocks.
#[derive(Debug, Clone)]
pub struct McqDocument {
    raw: String,
    blocks: Vec<McqBlock>,
}

impl McqDocument {
    /// Splits a completion on [`MCQ_BLOCK_MARKER`] and classifies each block's
    /// lines by prefix.
    ///
    /// Marker-delimited segments containing no recognizable MCQ line (for
    /// example a preamble sentence the model added before the first marker)
    /// are dropped, so block numbering downstream always starts at the first
    /// real question.
    pub fn parse(raw: &str) -> Self {
        let mut blocks = Vec::new();

        for segment in raw.split(MCQ_BLOCK_MARKER) {
            let mut block = McqBlock {
                question: None,
                options: Vec::new(),
                correct_answer: None,
            };

            for line in segment.lines() {
                let line = line.trim();

                if let Some(question) = line.strip_prefix(QUESTION_PREFIX) {
                    block.question = Some(question.trim().to_owned());
                } else if OPTION_PREFIXES
                    .iter()
                    .any(|prefix| line.starts_with(prefix))
                {
                    block.options.push(line.to_owned());
                } else if let Some(answer) = line.strip_prefix(CORRECT_ANSWER_PREFIX) {
                    block.correct_answer = Some(answer.trim().to_owned());
                }
            }

            if !block.is_empty() {
                blocks.push(block);
            }
        }

        Self {
            raw: raw.to_owned(),
            blocks,
        }
    }

    /// The completion exactly as generated, used for the text artifact.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn blocks(&self) -> &[McqBlock] {
        &self.blocks
    }
}
