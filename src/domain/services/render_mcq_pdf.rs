use lopdf::{
    content::{Content, Operation},
    dictionary, Document, Object, Stream, StringFormat,
};

use crate::{
    domain::entities::mcq_document::{McqBlock, CORRECT_ANSWER_PREFIX, QUESTION_PREFIX},
    helper::error_chain_fmt,
};

const DOCUMENT_TITLE: &str = "Generated MCQs";

// A4 page geometry, in points
const PAGE_WIDTH: f32 = 595.0;
const PAGE_HEIGHT: f32 = 842.0;
const MARGIN: f32 = 50.0;
const LINE_HEIGHT: f32 = 16.0;
/// Vertical gap left after each question block
const BLOCK_GAP: f32 = 12.0;

const BODY_FONT_SIZE: f32 = 12.0;
const OPTION_FONT_SIZE: f32 = 11.0;
const OPTION_INDENT: f32 = 12.0;

// Resource names of the base-14 fonts registered on the page tree
const FONT_REGULAR: &str = "F1";
const FONT_BOLD: &str = "F2";
const FONT_OBLIQUE: &str = "F3";

/// Dark gray body text (33, 37, 41)
const BODY_COLOR: [f32; 3] = [0.129, 0.145, 0.161];
/// Green used for the correct-answer lines (40, 167, 69)
const CORRECT_ANSWER_COLOR: [f32; 3] = [0.157, 0.655, 0.271];

#[derive(thiserror::Error)]
pub enum RenderMcqPdfError {
    #[error("Failed to encode a page content stream: {0}")]
    ContentEncodingError(#[from] lopdf::Error),
}

impl std::fmt::Debug for RenderMcqPdfError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

/// One styled line of the rendered document
#[derive(Debug, Clone, PartialEq, Eq)]
enum McqLine {
    /// `Q<n>.` block heading, bold
    Heading(String),
    /// The question itself, regular body style
    Question(String),
    /// An option line, indented and slightly smaller
    Option(String),
    /// The correct answer, italic and colored
    CorrectAnswer(String),
    /// Vertical gap closing a block
    BlockEnd,
}

struct LineStyle {
    font: &'static str,
    size: f32,
    color: [f32; 3],
    indent: f32,
}

impl McqLine {
    fn style(&self) -> LineStyle {
        match self {
            McqLine::Heading(_) => LineStyle {
                font: FONT_BOLD,
                size: BODY_FONT_SIZE,
                color: BODY_COLOR,
                indent: 0.0,
            },
            McqLine::Question(_) => LineStyle {
                font: FONT_REGULAR,
                size: BODY_FONT_SIZE,
                color: BODY_COLOR,
                indent: 0.0,
            },
            McqLine::Option(_) => LineStyle {
                font: FONT_REGULAR,
                size: OPTION_FONT_SIZE,
                color: BODY_COLOR,
                indent: OPTION_INDENT,
            },
            McqLine::CorrectAnswer(_) => LineStyle {
                font: FONT_OBLIQUE,
                size: OPTION_FONT_SIZE,
                color: CORRECT_ANSWER_COLOR,
                indent: 0.0,
            },
            McqLine::BlockEnd => LineStyle {
                font: FONT_REGULAR,
                size: BODY_FONT_SIZE,
                color: BODY_COLOR,
                indent: 0.0,
            },
        }
    }

    fn text(&self) -> &str {
        match self {
            McqLine::Heading(text)
            | McqLine::Question(text)
            | McqLine::Option(text)
            | McqLine::CorrectAnswer(text) => text,
            McqLine::BlockEnd => "",
        }
    }
}

/// Flattens parsed blocks into the styled lines of the document.
///
/// Headings are numbered from 1 in block order.
fn layout_blocks(blocks: &[McqBlock]) -> Vec<McqLine> {
    let mut lines = Vec::new();

    for (index, block) in blocks.iter().enumerate() {
        lines.push(McqLine::Heading(format!("Q{}.", index + 1)));

        if let Some(question) = &block.question {
            lines.push(McqLine::Question(format!("{QUESTION_PREFIX} {question}")));
        }
        for option in &block.options {
            lines.push(McqLine::Option(option.clone()));
        }
        if let Some(answer) = &block.correct_answer {
            lines.push(McqLine::CorrectAnswer(format!(
                "{CORRECT_ANSWER_PREFIX} {answer}"
            )));
        }

        lines.push(McqLine::BlockEnd);
    }

    lines
}

/// Renders parsed MCQ blocks into a paginated, styled PDF document.
///
/// Pagination is cursor-based: a new page starts whenever the next line would
/// cross the bottom margin. Lines longer than the content width wrap.
#[tracing::instrument(name = "Rendering MCQ PDF document", skip(blocks), fields(nb_blocks = blocks.len()))]
pub fn render_mcq_pdf(blocks: &[McqBlock]) -> Result<Document, RenderMcqPdfError> {
    let lines = layout_blocks(blocks);

    let mut pages_operations: Vec<Vec<Operation>> = Vec::new();
    let mut current_operations: Vec<Operation> = Vec::new();
    let mut cursor_y = PAGE_HEIGHT - MARGIN;

    for line in &lines {
        if let McqLine::BlockEnd = line {
            cursor_y -= BLOCK_GAP;
            continue;
        }

        let style = line.style();
        for wrapped in wrap_text(line.text(), max_chars_per_line(&style)) {
            if cursor_y < MARGIN + LINE_HEIGHT {
                pages_operations.push(std::mem::take(&mut current_operations));
                cursor_y = PAGE_HEIGHT - MARGIN;
            }

            current_operations.extend(text_line_operations(&wrapped, &style, cursor_y));
            cursor_y -= LINE_HEIGHT;
        }
    }

    // An empty document still gets one (blank) page
    if !current_operations.is_empty() || pages_operations.is_empty() {
        pages_operations.push(current_operations);
    }

    build_document(pages_operations)
}

/// Conservative character budget for a line: Helvetica averages about half an
/// em per glyph.
fn max_chars_per_line(style: &LineStyle) -> usize {
    let content_width = PAGE_WIDTH - 2.0 * MARGIN - style.indent;
    ((content_width / (0.5 * style.size)) as usize).max(1)
}

/// Greedy word wrapping; a single word longer than the budget keeps its line.
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    if text.chars().count() <= max_chars {
        return vec![text.to_owned()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty()
            && current.chars().count() + 1 + word.chars().count() > max_chars
        {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

/// The fonts carry a WinAnsi encoding: code points outside it are replaced.
fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| {
            let code = c as u32;
            if code <= 0xFF {
                code as u8
            } else {
                b'?'
            }
        })
        .collect()
}

fn text_line_operations(text: &str, style: &LineStyle, y: f32) -> Vec<Operation> {
    vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec![style.font.into(), style.size.into()]),
        Operation::new(
            "rg",
            vec![
                style.color[0].into(),
                style.color[1].into(),
                style.color[2].into(),
            ],
        ),
        Operation::new("Td", vec![(MARGIN + style.indent).into(), y.into()]),
        Operation::new(
            "Tj",
            vec![Object::String(
                encode_win_ansi(text),
                StringFormat::Literal,
            )],
        ),
        Operation::new("ET", vec![]),
    ]
}

fn build_document(pages_operations: Vec<Vec<Operation>>) -> Result<Document, RenderMcqPdfError> {
    let mut document = Document::with_version("1.5");
    let pages_id = document.new_object_id();

    let mut fonts = lopdf::Dictionary::new();
    for (resource_name, base_font) in [
        (FONT_REGULAR, "Helvetica"),
        (FONT_BOLD, "Helvetica-Bold"),
        (FONT_OBLIQUE, "Helvetica-Oblique"),
    ] {
        let font_id = document.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => base_font,
            "Encoding" => "WinAnsiEncoding",
        });
        fonts.set(resource_name, font_id);
    }
    let resources_id = document.add_object(dictionary! { "Font" => fonts });

    let mut kids: Vec<Object> = Vec::new();
    for operations in pages_operations {
        let content = Content { operations };
        let content_id =
            document.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = document.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let nb_pages = kids.len() as i64;
    document.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => nb_pages,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        }),
    );

    let catalog_id = document.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    document.trailer.set("Root", catalog_id);

    let info_id = document.add_object(dictionary! {
        "Title" => Object::string_literal(DOCUMENT_TITLE),
    });
    document.trailer.set("Info", info_id);

    document.compress();

    Ok(document)
}
