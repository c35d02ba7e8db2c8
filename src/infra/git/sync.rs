//! Fetching and fast-forwarding a branch from its remote.

use git2::build::CheckoutBuilder;
use git2::{Cred, FetchOptions, RemoteCallbacks, Repository};

use super::error::{GitError, Result};

/// What a fast-forward pull did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullOutcome {
    UpToDate,
    FastForwarded,
}

/// Fetch `branch` from its upstream remote (default `origin`) and fast-forward
/// the local branch, which must be checked out.
///
/// Refuses to merge: a branch that has diverged yields [`GitError::Diverged`].
pub fn fast_forward(repo: &Repository, branch: &str) -> Result<PullOutcome> {
    let local_ref = format!("refs/heads/{branch}");
    let remote_name = repo
        .branch_upstream_remote(&local_ref)
        .ok()
        .and_then(|buf| buf.as_str().map(str::to_string))
        .unwrap_or_else(|| "origin".to_string());

    let mut remote = repo
        .find_remote(&remote_name)
        .map_err(|_| GitError::NoOriginRemote)?;

    let tracking_ref = format!("refs/remotes/{remote_name}/{branch}");
    let refspec = format!("+{local_ref}:{tracking_ref}");
    tracing::debug!(remote = %remote_name, %refspec, "fetching");
    remote.fetch(&[refspec.as_str()], Some(&mut fetch_options(repo)?), None)?;

    let fetched = repo.find_reference(&tracking_ref)?;
    let fetched_commit = repo.reference_to_annotated_commit(&fetched)?;
    let (analysis, _) = repo.merge_analysis(&[&fetched_commit])?;

    if analysis.is_up_to_date() {
        return Ok(PullOutcome::UpToDate);
    }
    if !analysis.is_fast_forward() {
        return Err(GitError::Diverged(branch.to_string()));
    }

    let target = repo.find_object(fetched_commit.id(), None)?;
    repo.checkout_tree(&target, Some(CheckoutBuilder::new().safe()))?;
    repo.find_reference(&local_ref)?
        .set_target(fetched_commit.id(), "ghk: fast-forward")?;
    repo.set_head(&local_ref)?;
    tracing::debug!(branch, to = %fetched_commit.id(), "fast-forwarded");
    Ok(PullOutcome::FastForwarded)
}

fn fetch_options(repo: &Repository) -> Result<FetchOptions<'static>> {
    let config = repo.config()?.snapshot()?;

    let mut callbacks = RemoteCallbacks::new();
    callbacks.credentials(move |url, username_from_url, allowed_types| {
        if allowed_types.contains(git2::CredentialType::SSH_KEY)
            && let Some(username) = username_from_url
            && let Ok(cred) = Cred::ssh_key_from_agent(username)
        {
            return Ok(cred);
        }

        if allowed_types.contains(git2::CredentialType::USER_PASS_PLAINTEXT)
            && let Ok(cred) = Cred::credential_helper(&config, url, username_from_url)
        {
            return Ok(cred);
        }

        Cred::default()
    });

    let mut opts = FetchOptions::new();
    opts.remote_callbacks(callbacks);
    Ok(opts)
}
