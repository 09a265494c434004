//! Terminal messages for the `serve` and `convert` commands.

use std::error::Error;
use std::fmt::Write as _;
use std::path::Path;

use console::{Style, Term};

/// Writes styled status lines to stderr.
pub(crate) struct Output {
    term: Term,
    ok: Style,
    failure: Style,
    heading: Style,
    dim: Style,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            ok: Style::new().green(),
            failure: Style::new().red(),
            heading: Style::new().cyan().bold(),
            dim: Style::new().dim(),
        }
    }

    /// Startup summary printed before the server binds.
    pub(crate) fn serving(&self, address: &str, storage: &str, development: bool) {
        let banner = format!("docxgen listening on http://{address}");
        self.line(&self.heading.apply_to(banner).to_string());
        self.line(&self.dim.apply_to(detail("POST", "/api/text-to-docx")).to_string());
        self.line(&self.dim.apply_to(detail("storage", storage)).to_string());
        if development {
            self.line(&self.dim.apply_to(detail("mode", "development")).to_string());
        }
    }

    /// Confirmation for `docxgen convert`.
    pub(crate) fn document_written(&self, path: &Path, paragraphs: usize, bytes: usize) {
        self.line(&self.ok.apply_to(written_summary(path, paragraphs, bytes)).to_string());
    }

    /// Report a failed command with its error chain.
    pub(crate) fn failure(&self, err: &dyn Error) {
        self.line(&self.failure.apply_to(error_report(err)).to_string());
    }

    fn line(&self, text: &str) {
        let _ = self.term.write_line(text);
    }
}

fn detail(label: &str, value: &str) -> String {
    format!("  {label:<8} {value}")
}

fn written_summary(path: &Path, paragraphs: usize, bytes: usize) -> String {
    let unit = if paragraphs == 1 { "paragraph" } else { "paragraphs" };
    format!("Wrote {} ({paragraphs} {unit}, {bytes} bytes)", path.display())
}

/// `Error: <err>` followed by one `caused by:` line per source.
fn error_report(err: &dyn Error) -> String {
    let mut report = format!("Error: {err}");
    let mut source = err.source();
    while let Some(cause) = source {
        let _ = write!(report, "\n  caused by: {cause}");
        source = cause.source();
    }
    report
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("upload failed")]
    struct Outer(#[source] std::io::Error);

    #[test]
    fn test_error_report_includes_sources() {
        let err = Outer(std::io::Error::other("connection reset"));
        assert_eq!(
            error_report(&err),
            "Error: upload failed\n  caused by: connection reset"
        );
    }

    #[test]
    fn test_written_summary_pluralizes() {
        assert_eq!(
            written_summary(Path::new("a.docx"), 1, 2048),
            "Wrote a.docx (1 paragraph, 2048 bytes)"
        );
        assert_eq!(
            written_summary(Path::new("b.docx"), 3, 10),
            "Wrote b.docx (3 paragraphs, 10 bytes)"
        );
    }

    #[test]
    fn test_detail_aligns_labels() {
        assert_eq!(detail("mode", "development"), "  mode     development");
    }
}
