//! Git operations using git2 (libgit2).
//!
//! Everything here works on an opened [`git2::Repository`] without
//! spawning external git processes.

mod branch;
mod error;
mod github;
mod repo;
mod stash;
mod sync;
#[cfg(test)]
pub mod test_utils;

pub use branch::{BranchDeletion, checkout_trunk, delete_branches_except, find_trunk};
pub use github::github_repo_id;
pub use repo::{current_branch, has_uncommitted_changes, open_repo_at, open_repo_exact};
pub use stash::stash_changes;
pub use sync::{PullOutcome, fast_forward};

#[cfg(test)]
pub use branch::checkout_branch;
