//! User-facing error taxonomy shared by every command.

use thiserror::Error;

use crate::infra::gh::GhError;

const INSTALL_HINT: &str = "Install from https://cli.github.com/";
const AUTH_HINT: &str = "Run: gh auth login";
const REPO_HINT: &str = "Pass --repo owner/name explicitly";

#[derive(Error, Debug)]
pub enum CommandError {
    /// A required tool is missing or unusable.
    #[error("{message}")]
    Precondition { message: String, hint: String },

    /// Arguments are well-formed for clap but not acceptable.
    #[error("{0}")]
    Validation(String),

    /// The target repository could not be determined.
    #[error("Could not determine the repository: {0}")]
    Resolution(String),

    /// The remote call failed; the text is gh's own.
    #[error("{0}")]
    Remote(String),
}

impl CommandError {
    pub fn validation(flag: &str, problem: impl std::fmt::Display) -> Self {
        Self::Validation(format!("{flag}: {problem}"))
    }

    /// One-line remediation printed under the error, if there is one.
    pub fn hint(&self) -> Option<&str> {
        match self {
            Self::Precondition { hint, .. } => Some(hint),
            Self::Resolution(_) => Some(REPO_HINT),
            Self::Validation(_) | Self::Remote(_) => None,
        }
    }
}

impl From<GhError> for CommandError {
    fn from(err: GhError) -> Self {
        match err {
            GhError::NotInstalled => Self::Precondition {
                message: err.to_string(),
                hint: INSTALL_HINT.to_string(),
            },
            GhError::NotAuthenticated(_) => Self::Precondition {
                message: err.to_string(),
                hint: AUTH_HINT.to_string(),
            },
            other => Self::Remote(other.to_string()),
        }
    }
}

pub type Result<T> = anyhow::Result<T>;
