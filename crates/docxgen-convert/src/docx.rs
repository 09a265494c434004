//! DOCX serializer.
//!
//! Maps a [`DocumentModel`] onto `docx-rs` paragraphs and runs and packs the
//! result into Word document bytes.

use std::io::Cursor;

use docx_rs::{
    BreakType, Docx, LineSpacing, Paragraph, Run, RunFonts, Shading, Style, StyleType,
};

use crate::error::ConvertError;
use crate::inline::InlineSpan;
use crate::model::{BodyParagraph, DocumentModel, MAX_HEADING_LEVEL, ParagraphNode, ParagraphStyle};
use crate::util::xml_safe;

/// MIME type of a Word document.
pub const DOCX_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Body run size in half-points (12pt).
const BODY_SIZE: usize = 24;
/// Code block run size in half-points (10pt).
const CODE_SIZE: usize = 20;
/// Indent per level in twips (0.5in).
const INDENT_TWIPS: i32 = 720;
const HEADING_SPACING_BEFORE: u32 = 240;
const HEADING_SPACING_AFTER: u32 = 120;
const BODY_SPACING_AFTER: u32 = 200;
const MONOSPACE_FONT: &str = "Courier New";
const SHADING_FILL: &str = "F2F2F2";

/// Serialize a document model into DOCX bytes.
pub fn to_docx(doc: &DocumentModel) -> Result<Vec<u8>, ConvertError> {
    let mut docx = heading_styles(Docx::new());
    for paragraph in doc {
        docx = docx.add_paragraph(match paragraph {
            ParagraphNode::Heading { level, text } => heading_paragraph(*level, text),
            ParagraphNode::Body(body) => body_paragraph(body),
        });
    }

    let mut buffer = Vec::new();
    docx.build()
        .pack(&mut Cursor::new(&mut buffer))
        .map_err(|e| ConvertError::Pack(e.to_string()))?;
    Ok(buffer)
}

fn heading_paragraph(level: u8, text: &str) -> Paragraph {
    Paragraph::new()
        .style(&heading_style_id(level))
        .line_spacing(
            LineSpacing::new()
                .before(HEADING_SPACING_BEFORE)
                .after(HEADING_SPACING_AFTER),
        )
        .add_run(add_text(Run::new(), text))
}

fn body_paragraph(body: &BodyParagraph) -> Paragraph {
    let style = &body.style;
    let after = if style.monospace { 0 } else { BODY_SPACING_AFTER };
    let mut paragraph = Paragraph::new().line_spacing(LineSpacing::new().after(after));
    if style.indent > 0 {
        let left = i32::from(style.indent) * INDENT_TWIPS;
        paragraph = paragraph.indent(Some(left), None, None, None);
    }
    for span in &body.runs {
        paragraph = paragraph.add_run(RunFormat::for_span(span, style).apply(span.text()));
    }
    paragraph
}

/// Character formatting of a single run.
#[derive(Debug, Default, PartialEq, Eq)]
struct RunFormat {
    bold: bool,
    italic: bool,
    strike: bool,
    monospace: bool,
    shaded: bool,
    /// Size in half-points.
    size: usize,
}

impl RunFormat {
    fn for_span(span: &InlineSpan, style: &ParagraphStyle) -> Self {
        let mut format = Self {
            italic: style.italic,
            monospace: style.monospace,
            shaded: style.shaded,
            size: if style.monospace { CODE_SIZE } else { BODY_SIZE },
            ..Self::default()
        };
        match span {
            InlineSpan::Bold(_) => format.bold = true,
            InlineSpan::Italic(_) => format.italic = true,
            InlineSpan::Strikethrough(_) => format.strike = true,
            InlineSpan::Code(_) => {
                format.monospace = true;
                format.shaded = true;
            }
            InlineSpan::Plain(_) => {}
        }
        format
    }

    fn apply(&self, text: &str) -> Run {
        let mut run = Run::new().size(self.size);
        if self.monospace {
            run = run.fonts(
                RunFonts::new()
                    .ascii(MONOSPACE_FONT)
                    .hi_ansi(MONOSPACE_FONT)
                    .cs(MONOSPACE_FONT),
            );
        }
        if self.bold {
            run = run.bold();
        }
        if self.italic {
            run = run.italic();
        }
        if self.strike {
            run = run.strike();
        }
        if self.shaded {
            run = run.shading(Shading::new().fill(SHADING_FILL));
        }
        add_text(run, text)
    }
}

/// Append `text` to `run`; `\n` becomes a line break and `\t` a tab.
fn add_text(mut run: Run, text: &str) -> Run {
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            run = run.add_break(BreakType::TextWrapping);
        }
        for (j, segment) in line.split('\t').enumerate() {
            if j > 0 {
                run = run.add_tab();
            }
            let segment = xml_safe(segment);
            if !segment.is_empty() {
                run = run.add_text(segment);
            }
        }
    }
    run
}

/// Register one bold paragraph style per heading level.
fn heading_styles(mut docx: Docx) -> Docx {
    for level in 1..=MAX_HEADING_LEVEL {
        docx = docx.add_style(
            Style::new(&heading_style_id(level), StyleType::Paragraph)
                .name(format!("heading {level}"))
                .bold()
                .size(heading_size(level)),
        );
    }
    docx
}

fn heading_style_id(level: u8) -> String {
    format!("Heading{level}")
}

/// Heading run size in half-points, shrinking with depth.
fn heading_size(level: u8) -> usize {
    match level {
        1 => 32,
        2 => 28,
        3 => 26,
        _ => BODY_SIZE,
    }
}
