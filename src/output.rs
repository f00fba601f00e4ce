//! Terminal output: report building, terminal size and paging.

use crate::error::{ErrorKind, Result};
use console::{Term, style};
use exn::ResultExt;
use pypi_chart::thousands;
use pypi_index::DownloadWindows;
use std::fmt::Display;
use std::io::{ErrorKind as IoErrorKind, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// Width assumed when stdout is not a terminal.
pub(crate) const FALLBACK_WIDTH: usize = 80;

/// Width of stdout in columns.
pub(crate) fn terminal_width() -> usize {
    Term::stdout().size_checked().map(|(_rows, columns)| usize::from(columns)).unwrap_or(FALLBACK_WIDTH)
}

/// Text accumulated line by line, then written in one go.
#[derive(Debug, Default)]
pub(crate) struct Report {
    text: String,
}
impl Report {
    pub(crate) fn line(&mut self, line: impl Display) -> &mut Self {
        self.text.push_str(&line.to_string());
        self.text.push('\n');
        self
    }

    pub(crate) fn blank(&mut self) -> &mut Self {
        self.text.push('\n');
        self
    }

    /// Bold text underlined with `=`.
    pub(crate) fn header(&mut self, text: &str) -> &mut Self {
        let rule = "=".repeat(text.chars().count());
        self.line(style(text).bold()).line(style(rule).bold())
    }

    pub(crate) fn downloads(&mut self, windows: &DownloadWindows) -> &mut Self {
        self.line(format_args!("Last day:    {:>12}", thousands(windows.last_day)))
            .line(format_args!("Last week:   {:>12}", thousands(windows.last_week)))
            .line(format_args!("Last month:  {:>12}", thousands(windows.last_month)))
    }

    pub(crate) fn write_to(&self, out: &mut dyn Write) -> Result<()> {
        out.write_all(self.text.as_bytes()).or_raise(|| ErrorKind::Output)
    }
}

/// Writes a single line to stdout.
pub(crate) fn say(out: &mut dyn Write, line: impl Display) -> Result<()> {
    writeln!(out, "{line}").or_raise(|| ErrorKind::Output)
}

/// Writes a single red line, meant for stderr.
pub(crate) fn warn(err: &mut dyn Write, line: impl Display) -> Result<()> {
    writeln!(err, "{}", style(line).red()).or_raise(|| ErrorKind::Output)
}

/// An external pager program.
struct Pager {
    program: PathBuf,
    args: Vec<String>,
}
impl Pager {
    /// `$PAGER` when set, otherwise `less -R` when installed.
    fn discover() -> Option<Self> {
        if let Some(pager) = std::env::var("PAGER").ok().filter(|p| !p.trim().is_empty()) {
            let mut parts = pager.split_whitespace().map(str::to_string);
            let program = parts.next()?;
            return Some(Self {
                program: PathBuf::from(program),
                args: parts.collect(),
            });
        }
        let less = which::which("less").ok()?;
        Some(Self {
            program: less,
            args: vec!["-R".to_string()],
        })
    }

    fn show(&self, text: &str) -> std::io::Result<()> {
        let mut child = Command::new(&self.program).args(&self.args).stdin(Stdio::piped()).spawn()?;
        if let Some(mut stdin) = child.stdin.take() {
            // The user may quit the pager before reading everything.
            match stdin.write_all(text.as_bytes()) {
                Err(err) if err.kind() != IoErrorKind::BrokenPipe => return Err(err),
                _ => {},
            }
        }
        child.wait()?;
        Ok(())
    }
}

/// Shows `text` through a pager when stdout is a terminal, otherwise
/// writes it to stdout directly.
pub(crate) fn page(text: &str) -> Result<()> {
    if Term::stdout().is_term() {
        if let Some(pager) = Pager::discover() {
            match pager.show(text) {
                Ok(()) => return Ok(()),
                Err(err) => {
                    tracing::warn!(pager = %pager.program.display(), error = %err, "Pager failed; writing directly");
                },
            }
        }
    }
    std::io::stdout().lock().write_all(text.as_bytes()).or_raise(|| ErrorKind::Output)
}
