//! GitHub CLI error types.

use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GhError {
    #[error("GitHub CLI (gh) is not installed")]
    NotInstalled,

    #[error("GitHub CLI is not authenticated: {0}")]
    NotAuthenticated(String),

    #[error("gh {command} failed: {stderr}")]
    CommandFailed { command: String, stderr: String },

    #[error("gh {command} timed out after {}s", .timeout.as_secs())]
    Timeout { command: String, timeout: Duration },

    #[error("Failed to run gh: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unexpected output from gh: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("No item number at the end of {0:?}")]
    MissingNumber(String),

    #[error("gh printed no URL for the new item")]
    MissingUrl,
}

pub type Result<T> = std::result::Result<T, GhError>;
