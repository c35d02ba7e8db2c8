//! Output mode selection and the three renderers (human, quiet, JSON).
//!
//! Every command builds a report value and hands it to [`Printer::emit`],
//! which runs exactly one renderer. Diagnostics never go through the printer:
//! they are written to stderr so stdout stays parseable.

use std::io::{self, IsTerminal, Write};

use clap::Args;
use serde::Serialize;
use unicode_width::UnicodeWidthStr;

use super::table::{color, ellipsize};

/// Display width used for headers and truncated free-text fields.
pub const DISPLAY_WIDTH: usize = 72;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Quiet,
    Json,
}

/// `--json` / `--quiet` flags shared by every command.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputArgs {
    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,

    /// Print only the essential result (a URL, or a one-line summary)
    #[arg(long)]
    pub quiet: bool,
}

impl OutputArgs {
    /// JSON wins when both flags are given.
    pub fn mode(&self) -> OutputMode {
        if self.json {
            if self.quiet {
                tracing::debug!("--json and --quiet both given; using JSON");
            }
            OutputMode::Json
        } else if self.quiet {
            OutputMode::Quiet
        } else {
            OutputMode::Human
        }
    }
}

/// Whether colour and box decoration may be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Style {
    decorate: bool,
}

impl Style {
    /// Decorate only when stdout is a terminal and NO_COLOR is unset.
    pub fn detect() -> Self {
        Self::for_terminal(io::stdout().is_terminal())
    }

    /// Same rule as [`Style::detect`], for diagnostics written to stderr.
    pub fn detect_stderr() -> Self {
        Self::for_terminal(io::stderr().is_terminal())
    }

    fn for_terminal(is_terminal: bool) -> Self {
        let no_color = std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());
        Self {
            decorate: is_terminal && !no_color,
        }
    }

    #[cfg(test)]
    pub fn plain() -> Self {
        Self { decorate: false }
    }

    #[cfg(test)]
    pub fn decorated() -> Self {
        Self { decorate: true }
    }

    #[cfg(test)]
    pub fn is_decorated(&self) -> bool {
        self.decorate
    }

    /// Wrap `text` in an ANSI colour when decorating.
    pub fn paint(&self, text: &str, code: &str) -> String {
        if self.decorate {
            format!("{code}{text}{}", color::RESET)
        } else {
            text.to_string()
        }
    }

    pub fn bold(&self, text: &str) -> String {
        self.paint(text, color::BOLD)
    }

    pub fn dim(&self, text: &str) -> String {
        self.paint(text, color::DIM)
    }

    /// Title line: a box when decorating, the bare title otherwise.
    pub fn title(&self, text: &str) -> String {
        let text = ellipsize(text, DISPLAY_WIDTH);
        if !self.decorate {
            return format!("{text}\n");
        }
        let bar = "─".repeat(text.width() + 2);
        format!(
            "┌{bar}┐\n│ {} │\n└{bar}┘\n",
            self.paint(&text, color::BOLD)
        )
    }

    /// Section divider, e.g. before a comment list.
    pub fn section(&self, text: &str) -> String {
        if self.decorate {
            format!("{}\n", self.paint(&format!("── {text} ──"), color::CYAN))
        } else {
            format!("{text}:\n")
        }
    }

    /// Success marker for one-line confirmations.
    pub fn ok_mark(&self) -> String {
        if self.decorate {
            self.paint("✓", color::GREEN)
        } else {
            "OK".to_string()
        }
    }
}

/// A command result that can be rendered in all three modes.
///
/// The `Serialize` impl is the JSON schema of the result.
pub trait Render: Serialize {
    fn render_human(&self, w: &mut dyn Write, style: &Style) -> io::Result<()>;

    fn render_quiet(&self, w: &mut dyn Write) -> io::Result<()>;
}

/// Writes reports to stdout (or any writer) in the selected mode.
pub struct Printer<W: Write> {
    writer: W,
    mode: OutputMode,
    style: Style,
}

impl Printer<io::Stdout> {
    pub fn stdout(mode: OutputMode) -> Self {
        Self::new(io::stdout(), mode, Style::detect())
    }
}

impl<W: Write> Printer<W> {
    pub fn new(writer: W, mode: OutputMode, style: Style) -> Self {
        Self {
            writer,
            mode,
            style,
        }
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    pub fn emit<R: Render>(&mut self, report: &R) -> io::Result<()> {
        match self.mode {
            OutputMode::Json => {
                serde_json::to_writer_pretty(&mut self.writer, report)?;
                writeln!(self.writer)?;
            }
            OutputMode::Quiet => report.render_quiet(&mut self.writer)?,
            OutputMode::Human => report.render_human(&mut self.writer, &self.style)?,
        }
        self.writer.flush()
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.writer
    }
}
