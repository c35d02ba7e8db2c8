//! Compose free text (issue bodies, comments) in the user's editor.

use std::io::Write;
use std::process::Command;

use thiserror::Error;

const DEFAULT_EDITOR: &str = "vi";

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Invalid editor command: {0}")]
    InvalidCommand(String),

    #[error("Editor `{command}` exited with {status}")]
    Failed { command: String, status: String },

    #[error("Failed to run editor: {0}")]
    Io(#[from] std::io::Error),
}

/// Editor command from $VISUAL, then $EDITOR, then `vi`.
pub fn editor_command() -> String {
    ["VISUAL", "EDITOR"]
        .iter()
        .filter_map(|key| std::env::var(key).ok())
        .find(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_EDITOR.to_string())
}

/// Split an editor command line such as `code --wait` into program and args.
fn split_command(command: &str) -> Result<(String, Vec<String>), EditorError> {
    let mut parts = shlex::split(command)
        .filter(|p| !p.is_empty())
        .ok_or_else(|| EditorError::InvalidCommand(command.to_string()))?;
    let program = parts.remove(0);
    Ok((program, parts))
}

/// Open `initial` in the editor and return the saved text without trailing newlines.
///
/// Blocks until the editor exits. The editor inherits the terminal.
pub fn compose(initial: &str, suffix: &str) -> Result<String, EditorError> {
    compose_with(&editor_command(), initial, suffix)
}

fn compose_with(command: &str, initial: &str, suffix: &str) -> Result<String, EditorError> {
    let (program, args) = split_command(command)?;

    let mut file = tempfile::Builder::new()
        .prefix("ghk-")
        .suffix(suffix)
        .tempfile()?;
    file.write_all(initial.as_bytes())?;
    file.flush()?;

    tracing::debug!(editor = %command, path = %file.path().display(), "opening editor");
    let status = Command::new(&program).args(&args).arg(file.path()).status()?;
    if !status.success() {
        return Err(EditorError::Failed {
            command: command.to_string(),
            status: status.to_string(),
        });
    }

    let text = std::fs::read_to_string(file.path())?;
    Ok(text.trim_end_matches(['\n', '\r']).to_string())
}
