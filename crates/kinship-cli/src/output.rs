//! Output modes and rendering shared by every `kin` subcommand.
//!
//! A command builds one `Serialize` payload and supplies two writers for it:
//! a compact text form (whitespace-separated rows, easy to `awk`) and a pretty
//! form for terminals. JSON comes for free from the payload itself.
//!
//! The mode is picked from, in order: `--format`, `--json`, the `FORMAT`
//! environment variable, and finally whether stdout is a terminal.

use std::io::{self, IsTerminal, Write};

use clap::ValueEnum;
use kinship_core::error::ErrorCode;
use serde::Serialize;

const RULE: &str = "------------------------------------------------------------------------";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// Aligned sections for people.
    Pretty,
    /// Plain rows for pipes.
    Text,
    /// JSON for scripts.
    Json,
}

impl OutputMode {
    pub const fn is_json(self) -> bool {
        matches!(self, Self::Json)
    }

    fn from_env_value(value: &str) -> Option<Self> {
        Self::from_str(value, true).ok()
    }
}

fn pick_mode(
    format_flag: Option<OutputMode>,
    json_flag: bool,
    env_value: Option<&str>,
    stdout_is_tty: bool,
) -> OutputMode {
    let tty_default = if stdout_is_tty {
        OutputMode::Pretty
    } else {
        OutputMode::Text
    };

    format_flag
        .or_else(|| json_flag.then_some(OutputMode::Json))
        .or_else(|| env_value.and_then(OutputMode::from_env_value))
        .unwrap_or(tty_default)
}

/// Resolve the output mode for this process.
pub fn resolve_output_mode(format_flag: Option<OutputMode>, json_flag: bool) -> OutputMode {
    let env_value = std::env::var("FORMAT").ok();
    pick_mode(
        format_flag,
        json_flag,
        env_value.as_deref(),
        io::stdout().is_terminal(),
    )
}

// ---------------------------------------------------------------------------
// Pretty helpers
// ---------------------------------------------------------------------------

/// Heading line underlined with a rule.
pub fn pretty_section(w: &mut dyn Write, heading: &str) -> io::Result<()> {
    writeln!(w, "{heading}\n{RULE}")
}

/// `key:` padded to a fixed column, then the value.
pub fn pretty_kv(w: &mut dyn Write, key: &str, value: impl AsRef<str>) -> io::Result<()> {
    let key = format!("{key}:");
    writeln!(w, "{key:<18} {}", value.as_ref())
}

pub fn fmt_score(score: f64) -> String {
    format!("{score:.4}")
}

/// Write `value` in `mode`, using the given writers for text and pretty.
pub fn render_mode<T: Serialize>(
    out: &mut dyn Write,
    mode: OutputMode,
    value: &T,
    text: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
    pretty: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
) -> anyhow::Result<()> {
    match mode {
        OutputMode::Text => text(value, out)?,
        OutputMode::Pretty => pretty(value, out)?,
        OutputMode::Json => {
            serde_json::to_writer_pretty(&mut *out, value)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Error envelope written to stderr. JSON mode wraps it as `{"error": ...}`.
#[derive(Debug, Serialize)]
pub struct CliError {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    pub error_code: String,
}

impl CliError {
    pub fn from_code(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            suggestion: code.hint().map(String::from),
            error_code: code.code().to_string(),
        }
    }

    fn write_to(&self, mode: OutputMode, w: &mut dyn Write) -> anyhow::Result<()> {
        if mode.is_json() {
            serde_json::to_writer_pretty(&mut *w, &serde_json::json!({ "error": self }))?;
            writeln!(w)?;
            return Ok(());
        }

        writeln!(w, "error[{}]: {}", self.error_code, self.message)?;
        if let Some(suggestion) = &self.suggestion {
            writeln!(w, "  hint: {suggestion}")?;
        }
        Ok(())
    }
}

/// An error whose envelope is already on stderr. `main` only sets the exit
/// status for these.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct Reported {
    pub code: ErrorCode,
    message: String,
}

/// Print `err` to stderr under `code`, then hand back a [`Reported`] for `?`.
pub fn report(mode: OutputMode, code: ErrorCode, err: anyhow::Error) -> anyhow::Error {
    tracing::debug!(%code, kind = code.message(), "command failed");
    let envelope = CliError::from_code(code, format!("{err:#}"));
    if let Err(write_err) = envelope.write_to(mode, &mut io::stderr().lock()) {
        tracing::warn!(%write_err, "could not write error to stderr");
    }
    anyhow::Error::new(Reported {
        code,
        message: envelope.message,
    })
}
