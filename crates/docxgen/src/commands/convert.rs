//! `docxgen convert` command implementation.

use std::path::{Path, PathBuf};

use clap::Args;
use docxgen_convert::{InputFormat, convert, to_docx};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the convert command.
#[derive(Args)]
pub(crate) struct ConvertArgs {
    /// Text or Markdown file to convert.
    input: PathBuf,

    /// Output path (default: input with a `.docx` extension).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Treat the input as plain text instead of Markdown.
    #[arg(long)]
    plain: bool,
}

impl ConvertArgs {
    /// Execute the convert command.
    ///
    /// # Errors
    ///
    /// Returns an error if the input cannot be read or the output written.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let text = std::fs::read_to_string(&self.input).map_err(|source| CliError::Read {
            path: self.input.clone(),
            source,
        })?;
        let format = if self.plain {
            InputFormat::Plain
        } else {
            InputFormat::Markdown
        };
        let target = self.output.unwrap_or_else(|| default_output(&self.input));

        let written = write_docx(&text, format, &target)?;

        output.document_written(&target, written.paragraphs, written.bytes);
        Ok(())
    }
}

/// Sizes of a written document.
#[derive(Debug, PartialEq, Eq)]
struct Written {
    paragraphs: usize,
    bytes: usize,
}

/// Convert `text` and write the document to `target`.
fn write_docx(text: &str, format: InputFormat, target: &Path) -> Result<Written, CliError> {
    let doc = convert(text, format);
    let bytes = to_docx(&doc)?;
    std::fs::write(target, &bytes)?;
    tracing::info!(
        path = %target.display(),
        format = %format,
        paragraphs = doc.len(),
        size = bytes.len(),
        "Document written"
    );
    Ok(Written {
        paragraphs: doc.len(),
        bytes: bytes.len(),
    })
}

fn default_output(input: &Path) -> PathBuf {
    input.with_extension("docx")
}
