//! Remote tracker access through the GitHub CLI.
//!
//! `gh` handles authentication, hosts and pagination; this module builds its
//! arguments, enforces a per-call timeout and parses its `--json` output.

mod client;
mod error;
#[cfg(test)]
mod mock;
mod models;
mod runner;

pub use client::{GhCli, TrackerClient};
pub use error::GhError;
#[cfg(test)]
pub use mock::MockTrackerClient;
#[cfg(test)]
pub use models::PullDetails;
pub use models::{
    Comment, Created, IssueFilter, IssueSummary, ItemState, NewIssue, NewPullRequest, RepoId,
    Review, StateFilter, TrackerItem,
};
