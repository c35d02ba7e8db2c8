//! Git error types.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GitError {
    #[error("Not in a git repository")]
    NotInRepo,

    #[error("No remote 'origin' found")]
    NoOriginRemote,

    #[error("Could not parse GitHub URL: {0}")]
    InvalidGitHubUrl(String),

    #[error("HEAD is detached")]
    DetachedHead,

    #[error("Branch not found: {0}")]
    BranchNotFound(String),

    #[error("{0} cannot be fast-forwarded to its upstream")]
    Diverged(String),

    #[error("Git error: {}", .0.message())]
    Git2(#[from] git2::Error),
}

pub type Result<T> = std::result::Result<T, GitError>;
