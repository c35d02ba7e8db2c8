//! Branch operations used by the cleanup engine.

use git2::build::CheckoutBuilder;
use git2::{BranchType, Repository};

use super::error::{GitError, Result};

/// Where the trunk branch was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrunkSource {
    Local,
    /// Only the remote-tracking branch exists, e.g. `origin/main`.
    Remote(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trunk {
    pub name: String,
    pub source: TrunkSource,
}

/// Pick the first candidate that exists locally or as `origin/<name>`.
pub fn find_trunk(repo: &Repository, candidates: &[String]) -> Option<Trunk> {
    candidates.iter().find_map(|name| {
        if repo.find_branch(name, BranchType::Local).is_ok() {
            return Some(Trunk {
                name: name.clone(),
                source: TrunkSource::Local,
            });
        }
        let remote = format!("origin/{name}");
        repo.find_branch(&remote, BranchType::Remote)
            .is_ok()
            .then(|| Trunk {
                name: name.clone(),
                source: TrunkSource::Remote(remote),
            })
    })
}

/// Check out the trunk, creating a tracking branch first if it only exists remotely.
pub fn checkout_trunk(repo: &Repository, trunk: &Trunk) -> Result<()> {
    if let TrunkSource::Remote(remote_ref) = &trunk.source {
        let remote_branch = repo
            .find_branch(remote_ref, BranchType::Remote)
            .map_err(|_| GitError::BranchNotFound(remote_ref.clone()))?;
        let commit = remote_branch.get().peel_to_commit()?;
        let mut local = repo.branch(&trunk.name, &commit, false)?;
        local.set_upstream(Some(remote_ref))?;
    }
    checkout_branch(repo, &trunk.name)
}

/// Switch the working tree and HEAD to a local branch.
/// Uses a safe checkout, so local modifications make it fail instead of being lost.
pub fn checkout_branch(repo: &Repository, name: &str) -> Result<()> {
    let refname = format!("refs/heads/{name}");
    let target = repo
        .revparse_single(&refname)
        .map_err(|_| GitError::BranchNotFound(name.to_string()))?;
    repo.checkout_tree(&target, Some(CheckoutBuilder::new().safe()))?;
    repo.set_head(&refname)?;
    Ok(())
}

/// Result of deleting one local branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchDeletion {
    Deleted { branch: String },
    DeletionFailed { branch: String, reason: String },
}

impl BranchDeletion {
    #[cfg(test)]
    pub fn branch(&self) -> &str {
        match self {
            Self::Deleted { branch } | Self::DeletionFailed { branch, .. } => branch,
        }
    }
}

/// Force-delete every local branch except `keep`, in name order.
///
/// Individual failures (e.g. a branch checked out in another worktree) are
/// recorded and do not stop the remaining deletions.
pub fn delete_branches_except(repo: &Repository, keep: &str) -> Result<Vec<BranchDeletion>> {
    let mut names: Vec<String> = repo
        .branches(Some(BranchType::Local))?
        .filter_map(|entry| entry.ok())
        .filter_map(|(branch, _)| branch.name().ok().flatten().map(str::to_string))
        .filter(|name| name != keep)
        .collect();
    names.sort();

    Ok(names
        .into_iter()
        .map(|name| {
            let result = repo
                .find_branch(&name, BranchType::Local)
                .and_then(|mut branch| branch.delete());
            match result {
                Ok(()) => {
                    tracing::debug!(branch = %name, "deleted branch");
                    BranchDeletion::Deleted { branch: name }
                }
                Err(e) => {
                    tracing::warn!(branch = %name, error = %e.message(), "could not delete branch");
                    BranchDeletion::DeletionFailed {
                        branch: name,
                        reason: e.message().to_string(),
                    }
                }
            }
        })
        .collect())
}
