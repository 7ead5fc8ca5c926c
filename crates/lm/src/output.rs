//! Terminal reporting for `lm compile` and `lm check`.

use std::path::Path;

use console::{Style, Term};

/// Diagnostics go to stderr, coloured; compiled HTML or JSON goes to stdout
/// untouched so it can be piped.
pub(crate) struct Output {
    diag: Term,
    out: Term,
    ok: Style,
    warn: Style,
    fail: Style,
    summary: Style,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            diag: Term::stderr(),
            out: Term::stdout(),
            ok: Style::new().green(),
            warn: Style::new().yellow(),
            fail: Style::new().red(),
            summary: Style::new().cyan().bold(),
        }
    }

    pub(crate) fn note(&self, msg: &str) {
        let _ = self.diag.write_line(msg);
    }

    /// An authoring warning raised while compiling.
    pub(crate) fn compile_warning(&self, warning: &str) {
        self.styled(&self.warn, &format!("Warning: {warning}"));
    }

    pub(crate) fn file_ok(&self, file: &Path) {
        self.styled(&self.ok, &format!("{}: ok", file.display()));
    }

    /// The file name, then one indented line per problem.
    pub(crate) fn file_problems(&self, file: &Path, problems: &[String]) {
        self.styled(&self.warn, &format!("{}:", file.display()));
        for problem in problems {
            self.styled(&self.warn, &format!("  {problem}"));
        }
    }

    pub(crate) fn clean_summary(&self, files: usize) {
        self.styled(&self.summary, &format!("{files} file(s) checked, no problems"));
    }

    pub(crate) fn error(&self, msg: &str) {
        self.styled(&self.fail, &format!("Error: {msg}"));
    }

    /// Write compiled output to stdout, uncoloured.
    pub(crate) fn result(&self, text: &str) -> std::io::Result<()> {
        self.out.write_line(text)
    }

    fn styled(&self, style: &Style, msg: &str) {
        let _ = self.diag.write_line(&style.apply_to(msg).to_string());
    }
}
