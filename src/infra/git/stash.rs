//! Stashing uncommitted work before switching branches.

use git2::{Oid, Repository, Signature, StashFlags};

use super::error::Result;

/// Stash tracked and untracked changes under `message`.
///
/// Falls back to a fixed identity when the repository has no `user.name`
/// configured, so stashing never fails for that reason alone.
pub fn stash_changes(repo: &mut Repository, message: &str) -> Result<Oid> {
    let signature = match repo.signature() {
        Ok(sig) => sig,
        Err(_) => Signature::now("ghk", "ghk@localhost")?,
    };
    let oid = repo.stash_save(&signature, message, Some(StashFlags::INCLUDE_UNTRACKED))?;
    tracing::debug!(%oid, message, "stashed changes");
    Ok(oid)
}
