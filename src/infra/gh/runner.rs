//! Process seam for `gh` invocations.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;

use super::error::{GhError, Result};

/// Captured result of one `gh` invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GhOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl GhOutput {
    /// Turn a non-zero exit into [`GhError::CommandFailed`], keeping gh's stderr.
    pub fn into_stdout(self, args: &[String]) -> Result<String> {
        if self.success {
            Ok(self.stdout)
        } else {
            let stderr = self.stderr.trim();
            Err(GhError::CommandFailed {
                command: describe(args),
                stderr: if stderr.is_empty() {
                    "exited with a non-zero status".to_string()
                } else {
                    stderr.to_string()
                },
            })
        }
    }
}

/// Runs `gh` with the given arguments.
/// Production uses [`ProcessRunner`]; tests substitute canned outputs.
pub trait GhRunner {
    async fn run(&self, args: &[String]) -> Result<GhOutput>;
}

/// Spawns the real `gh` binary with a per-call timeout.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    program: PathBuf,
    timeout: Duration,
}

impl ProcessRunner {
    pub fn new(program: PathBuf, timeout: Duration) -> Self {
        Self { program, timeout }
    }
}

impl GhRunner for ProcessRunner {
    async fn run(&self, args: &[String]) -> Result<GhOutput> {
        tracing::debug!(program = %self.program.display(), ?args, "running gh");

        let mut cmd = Command::new(&self.program);
        cmd.args(args)
            .stdin(Stdio::null())
            // Keep gh from paging or prompting; we always capture output.
            .env("GH_PAGER", "")
            .env("GH_PROMPT_DISABLED", "1")
            .kill_on_drop(true);

        let output = tokio::time::timeout(self.timeout, cmd.output())
            .await
            .map_err(|_| GhError::Timeout {
                command: describe(args),
                timeout: self.timeout,
            })??;

        let result = GhOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        tracing::debug!(success = result.success, "gh finished");
        Ok(result)
    }
}

/// Short label for error messages: the subcommand words before the first flag.
pub fn describe(args: &[String]) -> String {
    let words: Vec<&str> = args
        .iter()
        .take_while(|a| !a.starts_with('-'))
        .take(2)
        .map(String::as_str)
        .collect();
    if words.is_empty() {
        "command".to_string()
    } else {
        words.join(" ")
    }
}
