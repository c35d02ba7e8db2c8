//! Tracker data shapes shared by the client, the commands and the renderers.
//!
//! The `Serialize` impls define the JSON printed by `--json`. Optional
//! values are serialized as `""` or `[]` so consumers see a fixed schema.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::error::{GhError, Result};

/// `owner/name` of a remote repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RepoId {
    pub owner: String,
    pub name: String,
}

impl RepoId {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl Serialize for RepoId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Error for strings that are not `owner/name`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid repository {0:?}: expected owner/name")]
pub struct InvalidRepoId(pub String);

impl FromStr for RepoId {
    type Err = InvalidRepoId;

    /// Exactly one slash with non-empty parts on both sides.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.split_once('/') {
            Some((owner, name))
                if !owner.is_empty() && !name.is_empty() && !name.contains('/') =>
            {
                Ok(Self::new(owner, name))
            }
            _ => Err(InvalidRepoId(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ItemState {
    Open,
    Closed,
    Merged,
}

impl ItemState {
    /// Parse gh's state strings ("OPEN", "closed", ...). Unknown states count as closed.
    pub fn from_gh(state: &str) -> Self {
        match state.to_ascii_uppercase().as_str() {
            "OPEN" => Self::Open,
            "MERGED" => Self::Merged,
            _ => Self::Closed,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Closed => "CLOSED",
            Self::Merged => "MERGED",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comment {
    pub author: String,
    pub created: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Review {
    pub author: String,
    pub state: String,
    pub body: String,
    pub submitted: String,
}

/// Pull-request-only fields of a [`TrackerItem`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PullDetails {
    pub base: String,
    pub head: String,
    pub draft: bool,
    pub reviews: Vec<Review>,
}

/// An issue or pull request as shown by `issue read` / `pr read`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackerItem {
    pub number: u64,
    pub title: String,
    pub state: ItemState,
    pub author: String,
    pub labels: Vec<String>,
    pub assignees: Vec<String>,
    pub body: String,
    pub created: String,
    pub updated: String,
    pub url: String,
    /// Oldest first.
    pub comments: Vec<Comment>,
    #[serde(flatten)]
    pub pull: Option<PullDetails>,
}

/// One row of `issue list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueSummary {
    pub number: u64,
    pub title: String,
    pub state: ItemState,
    pub labels: Vec<String>,
    pub created: String,
}

/// Locator of a newly created issue or pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Created {
    pub url: String,
    pub number: u64,
}

impl Created {
    pub fn from_url(url: &str) -> Result<Self> {
        Ok(Self {
            url: url.to_string(),
            number: trailing_number(url)?,
        })
    }
}

/// The number at the very end of an issue/PR URL.
///
/// Only the final digit run counts, so `.../repo2/issues/42` yields 42.
pub fn trailing_number(url: &str) -> Result<u64> {
    let trimmed = url.trim().trim_end_matches('/');
    let digits_start = trimmed
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, _)| i);
    digits_start
        .and_then(|start| trimmed[start..].parse().ok())
        .ok_or_else(|| GhError::MissingNumber(url.to_string()))
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewIssue {
    pub title: String,
    pub body: String,
    pub labels: Vec<String>,
    pub assignees: Vec<String>,
    pub milestone: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewPullRequest {
    pub title: String,
    pub body: String,
    pub base: Option<String>,
    pub head: Option<String>,
    pub labels: Vec<String>,
    pub reviewers: Vec<String>,
    pub draft: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum StateFilter {
    #[default]
    Open,
    Closed,
    All,
}

impl StateFilter {
    pub fn as_gh_arg(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::All => "all",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IssueFilter {
    pub state: StateFilter,
    pub limit: u32,
}
