//! Per-repository cleanup: stash, check out trunk, prune, fast-forward.

use std::path::Path;

use super::report::{CleanupOutcome, Disposition, FailureReason, SkipReason};
use crate::infra::git::{self, PullOutcome};

/// Clean one discovered entry. Never panics on repository state; every
/// problem ends up in the returned outcome.
pub fn clean_repository(path: &Path, trunk_names: &[String], stash_message: &str) -> CleanupOutcome {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let mut outcome = CleanupOutcome::new(name, path.to_path_buf());

    if !path.is_dir() {
        outcome.disposition = Disposition::Skipped(SkipReason::NotADirectory);
        return outcome;
    }
    if !path.join(".git").exists() {
        outcome.disposition = Disposition::Skipped(SkipReason::NotARepository);
        return outcome;
    }
    let Ok(mut repo) = git::open_repo_exact(path) else {
        outcome.disposition = Disposition::Skipped(SkipReason::NotARepository);
        return outcome;
    };

    let Some(trunk) = git::find_trunk(&repo, trunk_names) else {
        outcome.disposition = Disposition::Failed(FailureReason::NoTrunkBranch {
            tried: trunk_names.to_vec(),
        });
        return outcome;
    };
    outcome.trunk = Some(trunk.name.clone());

    let dirty = match git::has_uncommitted_changes(&repo) {
        Ok(dirty) => dirty,
        Err(e) => {
            outcome.disposition = Disposition::Failed(FailureReason::StashFailed(e.to_string()));
            return outcome;
        }
    };
    if dirty {
        if let Err(e) = git::stash_changes(&mut repo, stash_message) {
            outcome.disposition = Disposition::Failed(FailureReason::StashFailed(e.to_string()));
            return outcome;
        }
        outcome.stashed = true;
    }

    if let Err(e) = git::checkout_trunk(&repo, &trunk) {
        outcome.disposition = Disposition::Failed(FailureReason::CheckoutFailed(e.to_string()));
        return outcome;
    }

    match git::delete_branches_except(&repo, &trunk.name) {
        Ok(deletions) => outcome.deletions = deletions,
        Err(e) => tracing::warn!(repo = %outcome.name, error = %e, "could not list branches"),
    }

    match git::fast_forward(&repo, &trunk.name) {
        Ok(PullOutcome::UpToDate) => tracing::debug!(repo = %outcome.name, "already up to date"),
        Ok(PullOutcome::FastForwarded) => tracing::debug!(repo = %outcome.name, "fast-forwarded"),
        Err(e) => {
            outcome.disposition = Disposition::Failed(FailureReason::PullFailed(e.to_string()));
        }
    }
    outcome
}
