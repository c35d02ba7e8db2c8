//! GitHub-related git operations.

use git2::Repository;
use regex::Regex;
use std::sync::LazyLock;

use super::error::{GitError, Result};
use super::repo::origin_url;
use crate::infra::gh::RepoId;

#[expect(clippy::expect_used, reason = "static pattern")]
static GITHUB_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"github\.com[:/]([^/]+)/([^/]+?)(?:\.git)?/?$").expect("valid regex")
});

/// Parse owner and repo from a GitHub URL.
/// Supports both SSH (git@github.com:owner/repo.git) and HTTPS formats.
pub fn parse_github_url(url: &str) -> Result<RepoId> {
    GITHUB_URL_RE
        .captures(url.trim())
        .and_then(|c| Some(RepoId::new(c.get(1)?.as_str(), c.get(2)?.as_str())))
        .ok_or_else(|| GitError::InvalidGitHubUrl(url.to_string()))
}

/// Owner and repo of the origin remote.
pub fn github_repo_id(repo: &Repository) -> Result<RepoId> {
    parse_github_url(&origin_url(repo)?)
}
